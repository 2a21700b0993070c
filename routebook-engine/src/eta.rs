//! ETA schedules for walking a route from an origin at a start time.
//!
//! Clock arithmetic is linear minutes since midnight with no day rollover:
//! a schedule that runs past midnight reports hours of 24 and above.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::catalog::Route;
use crate::legs::{LegGraph, LegSource, LegTime};
use crate::numbers::{minutes_to_hours, usize_to_u32};
use crate::traversal::{EntryKind, resolve_traversal};

const CLOCK_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Parse a wall-clock start time into minutes since midnight.
///
/// Accepts `H:MM`, `HH:MM` and `HH:MM:SS`; seconds are dropped. Minutes and
/// seconds must have two digits, and leap seconds are rejected.
#[must_use]
pub fn parse_clock(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.split(':').skip(1).all(|part| part.len() == 2) {
        return None;
    }
    CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .filter(|time| time.nanosecond() < 1_000_000_000)
        .map(|time| time.hour() * 60 + time.minute())
}

/// Format minutes since midnight as `HH:MM` without wrapping at 24 hours.
#[must_use]
pub fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// One traversed leg of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegRow {
    /// 1-based position within the schedule.
    pub leg_index: u32,
    pub from: String,
    pub to: String,
    pub minutes: u32,
    pub hours: f64,
    pub eta: String,
    pub source: LegSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtaSummary {
    pub total_minutes: u32,
    pub total_hours: f64,
    pub final_eta: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Ready,
    /// The start time was blank or not a valid clock time.
    MissingStartTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtaSchedule {
    pub route_id: String,
    pub origin: String,
    pub start_time: String,
    pub status: ScheduleStatus,
    pub entry: Option<EntryKind>,
    pub rows: Vec<LegRow>,
    pub summary: EtaSummary,
}

impl EtaSchedule {
    fn empty(route: &Route, origin: &str, start_time: &str, status: ScheduleStatus) -> Self {
        Self {
            route_id: route.id.clone(),
            origin: origin.to_string(),
            start_time: start_time.to_string(),
            status,
            entry: None,
            rows: Vec::new(),
            summary: EtaSummary {
                total_minutes: 0,
                total_hours: 0.0,
                final_eta: start_time.to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == ScheduleStatus::Ready
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Legs whose duration is not configured in either direction.
    pub fn unknown_legs(&self) -> impl Iterator<Item = &LegRow> {
        self.rows
            .iter()
            .filter(|row| row.source == LegSource::Unknown)
    }
}

/// Compute the leg-by-leg schedule for `route` from `origin` at `start_time`.
///
/// An origin that is not a checkpoint of the route gets a synthetic first
/// leg into the traversal. A blank or unparseable start time yields an
/// empty schedule with [`ScheduleStatus::MissingStartTime`].
#[must_use]
pub fn compute_schedule(
    start_time: &str,
    origin: &str,
    route: &Route,
    legs: &LegGraph,
) -> EtaSchedule {
    let Some(start_minutes) = parse_clock(start_time) else {
        return EtaSchedule::empty(route, origin, start_time, ScheduleStatus::MissingStartTime);
    };

    let traversal = resolve_traversal(route, origin, legs);
    let mut schedule = EtaSchedule::empty(route, origin, start_time, ScheduleStatus::Ready);
    schedule.entry = Some(traversal.entry);

    let Some(first) = traversal.first() else {
        return schedule;
    };

    let mut clock = start_minutes;
    let mut push_leg = |from: &str, to: &str, leg: LegTime| {
        if !leg.is_known() {
            log::warn!("no leg time configured between `{from}` and `{to}`; counting 0 minutes");
        }
        clock = clock.saturating_add(leg.minutes);
        let leg_index = usize_to_u32(schedule.rows.len() + 1);
        schedule.rows.push(LegRow {
            leg_index,
            from: from.to_string(),
            to: to.to_string(),
            minutes: leg.minutes,
            hours: minutes_to_hours(leg.minutes),
            eta: format_clock(clock),
            source: leg.source,
        });
    };

    if origin != first.id {
        push_leg(origin, &first.id, legs.resolve_leg(origin, &first.id));
    }
    for pair in traversal.checkpoints.windows(2) {
        let (from, to) = (&pair[0].id, &pair[1].id);
        push_leg(from, to, legs.resolve_leg(from, to));
    }

    let total_minutes = schedule
        .rows
        .iter()
        .fold(0_u32, |acc, row| acc.saturating_add(row.minutes));
    schedule.summary = EtaSummary {
        total_minutes,
        total_hours: minutes_to_hours(total_minutes),
        final_eta: schedule
            .rows
            .last()
            .map_or_else(|| start_time.to_string(), |row| row.eta.clone()),
    };
    schedule
}
