//! Sparse directed table of travel minutes between checkpoints.
//!
//! Entries are keyed by checkpoint id or by an external origin token such as
//! a depot. Lookups fall back to the opposite direction only when the
//! requested direction is absent; when both directions exist the forward
//! value wins even if the two disagree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which entry of the graph produced a leg duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegSource {
    /// The directed `from -> to` entry.
    Forward,
    /// The `to -> from` entry, used because `from -> to` is missing.
    Reverse,
    /// Neither direction is configured.
    Unknown,
}

/// A leg duration together with the entry it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegTime {
    pub minutes: u32,
    pub source: LegSource,
}

impl LegTime {
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            minutes: 0,
            source: LegSource::Unknown,
        }
    }

    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self.source, LegSource::Unknown)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegGraph {
    edges: BTreeMap<String, BTreeMap<String, u32>>,
}

impl LegGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(from, to, minutes)` triples. Later duplicates
    /// replace earlier ones.
    #[must_use]
    pub fn from_edges<I, F, T>(edges: I) -> Self
    where
        I: IntoIterator<Item = (F, T, u32)>,
        F: Into<String>,
        T: Into<String>,
    {
        let mut graph = Self::new();
        for (from, to, minutes) in edges {
            graph
                .edges
                .entry(from.into())
                .or_default()
                .insert(to.into(), minutes);
        }
        graph
    }

    /// The directed entry only, without any fallback.
    #[must_use]
    pub fn direct(&self, from: &str, to: &str) -> Option<u32> {
        self.edges.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Look up a leg, falling back to the reverse direction. `None` means
    /// the duration is unknown, which is distinct from a zero-minute leg.
    #[must_use]
    pub fn lookup(&self, from: &str, to: &str) -> Option<LegTime> {
        if let Some(minutes) = self.direct(from, to) {
            return Some(LegTime {
                minutes,
                source: LegSource::Forward,
            });
        }
        self.direct(to, from).map(|minutes| LegTime {
            minutes,
            source: LegSource::Reverse,
        })
    }

    /// Like [`lookup`](Self::lookup) but reports unknown legs as a
    /// zero-minute [`LegSource::Unknown`] entry.
    #[must_use]
    pub fn resolve_leg(&self, from: &str, to: &str) -> LegTime {
        self.lookup(from, to).unwrap_or_else(LegTime::unknown)
    }

    /// Travel minutes with 0 standing in for "no known leg".
    #[must_use]
    pub fn leg_time(&self, from: &str, to: &str) -> u32 {
        self.resolve_leg(from, to).minutes
    }

    /// Whether the id appears as the source or target of any entry.
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.edges.contains_key(id) || self.edges.values().any(|row| row.contains_key(id))
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }
}

impl<F, T> FromIterator<(F, T, u32)> for LegGraph
where
    F: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, T, u32)>>(iter: I) -> Self {
        Self::from_edges(iter)
    }
}
