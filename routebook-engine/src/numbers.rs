//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Round a f64 to two decimal places, returning 0.0 for non-finite values.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Express a minute count as hours rounded to two decimals.
#[must_use]
pub fn minutes_to_hours(minutes: u32) -> f64 {
    round_to_hundredths(f64::from(minutes) / MINUTES_PER_HOUR)
}

/// Convert a usize to u32, saturating at `u32::MAX`.
#[must_use]
pub fn usize_to_u32(value: usize) -> u32 {
    cast::<usize, u32>(value).unwrap_or(u32::MAX)
}
