//! Resolve which part of a route is actually walked from a given origin.
//!
//! Routes are mandated corridors, so this never searches for a better path:
//! it resumes the fixed ordering from the first checkpoint the origin can
//! reach and never wraps around to earlier checkpoints.

use serde::{Deserialize, Serialize};

use crate::catalog::{Checkpoint, Route};
use crate::legs::LegGraph;

/// How the origin joined the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// The origin is itself a checkpoint of the route.
    OnRoute,
    /// An external origin with a known leg into the route.
    Reachable,
    /// An external origin with no known leg into the route; the whole
    /// route is used and the origin only contributes an unknown first leg.
    Unreachable,
}

/// Ordered suffix of a route's checkpoints to visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal<'r> {
    pub checkpoints: &'r [Checkpoint],
    pub entry: EntryKind,
}

impl<'r> Traversal<'r> {
    pub fn ids(&self) -> impl Iterator<Item = &'r str> + use<'r> {
        self.checkpoints.iter().map(|point| point.id.as_str())
    }

    #[must_use]
    pub fn first(&self) -> Option<&'r Checkpoint> {
        self.checkpoints.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

/// Resolve the traversal sequence for `origin` on `route`.
#[must_use]
pub fn resolve_traversal<'r>(route: &'r Route, origin: &str, legs: &LegGraph) -> Traversal<'r> {
    if let Some(start) = route.position(origin) {
        return Traversal {
            checkpoints: &route.points[start..],
            entry: EntryKind::OnRoute,
        };
    }

    let entry_point = route
        .points
        .iter()
        .position(|point| legs.leg_time(origin, &point.id) > 0);

    if let Some(start) = entry_point {
        log::debug!(
            "origin `{origin}` joins route `{}` at `{}`",
            route.id,
            route.points[start].id
        );
        return Traversal {
            checkpoints: &route.points[start..],
            entry: EntryKind::Reachable,
        };
    }

    if !route.is_empty() {
        log::warn!(
            "origin `{origin}` has no known leg into route `{}`; using the full route",
            route.id
        );
    }
    Traversal {
        checkpoints: &route.points,
        entry: EntryKind::Unreachable,
    }
}
