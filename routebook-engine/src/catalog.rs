use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// A waypoint with its briefing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl Checkpoint {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            objective: String::new(),
            bullets: Vec::new(),
        }
    }
}

/// A named, ordered list of checkpoints. Order is the physical traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub points: Vec<Checkpoint>,
}

impl Route {
    /// Index of the checkpoint within this route.
    #[must_use]
    pub fn position(&self, point_id: &str) -> Option<usize> {
        self.points.iter().position(|point| point.id == point_id)
    }

    #[must_use]
    pub fn contains(&self, point_id: &str) -> bool {
        self.position(point_id).is_some()
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Option<&Checkpoint> {
        self.points.get(index)
    }

    pub fn point_ids(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|point| point.id.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Structural problems found while building a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("route catalog is empty")]
    Empty,
    #[error("route #{index} has an empty id")]
    EmptyRouteId { index: usize },
    #[error("duplicate route id `{id}`")]
    DuplicateRoute { id: String },
    #[error("route `{route}` has an empty checkpoint id at position {position}")]
    EmptyCheckpointId { route: String, position: usize },
    #[error("checkpoint `{checkpoint}` appears twice in route `{route}`")]
    DuplicateCheckpoint { route: String, checkpoint: String },
}

/// Immutable set of routes, always holding at least one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteCatalog {
    routes: Vec<Route>,
}

impl RouteCatalog {
    /// Validate and wrap a list of routes.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, a route id is empty or repeated,
    /// or a route lists the same checkpoint twice.
    pub fn new(routes: Vec<Route>) -> Result<Self, CatalogError> {
        if routes.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut route_ids = HashSet::new();
        for (index, route) in routes.iter().enumerate() {
            if route.id.is_empty() {
                return Err(CatalogError::EmptyRouteId { index });
            }
            if !route_ids.insert(route.id.as_str()) {
                return Err(CatalogError::DuplicateRoute {
                    id: route.id.clone(),
                });
            }
            let mut point_ids = HashSet::new();
            for (position, point) in route.points.iter().enumerate() {
                if point.id.is_empty() {
                    return Err(CatalogError::EmptyCheckpointId {
                        route: route.id.clone(),
                        position,
                    });
                }
                if !point_ids.insert(point.id.as_str()) {
                    return Err(CatalogError::DuplicateCheckpoint {
                        route: route.id.clone(),
                        checkpoint: point.id.clone(),
                    });
                }
            }
        }
        Ok(Self { routes })
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The first configured route; the catalog is never empty.
    #[must_use]
    pub fn first(&self) -> &Route {
        &self.routes[0]
    }

    #[must_use]
    pub fn get(&self, route_id: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.id == route_id)
    }

    /// The named route, or the first route when the id is unknown.
    #[must_use]
    pub fn get_or_first(&self, route_id: &str) -> &Route {
        self.get(route_id).unwrap_or_else(|| self.first())
    }

    /// Routes listing the checkpoint, in catalog order.
    pub fn routes_containing<'a>(&'a self, point_id: &'a str) -> impl Iterator<Item = &'a Route> {
        self.routes.iter().filter(move |route| route.contains(point_id))
    }

    /// First checkpoint record with this id across all routes.
    #[must_use]
    pub fn checkpoint(&self, point_id: &str) -> Option<&Checkpoint> {
        self.routes
            .iter()
            .flat_map(|route| route.points.iter())
            .find(|point| point.id == point_id)
    }

    /// Every distinct checkpoint id in the catalog.
    #[must_use]
    pub fn checkpoint_ids(&self) -> BTreeSet<&str> {
        self.routes.iter().flat_map(Route::point_ids).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
