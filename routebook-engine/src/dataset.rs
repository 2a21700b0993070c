//! Static configuration: routes, leg minutes, external origins and defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogError, Route, RouteCatalog};
use crate::legs::LegGraph;

const EMBEDDED_DATASET: &str = include_str!("../static/data/routes.json");

/// A start point known to the leg graph but not listed on any route, such as a depot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalOrigin {
    pub id: String,
    pub label: String,
}

/// Values a presentation layer pre-fills in its ETA form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Defaults {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
}

impl Defaults {
    /// The requested start time, or the pre-filled default when none was
    /// given. An explicit blank stays blank so the operator is prompted.
    #[must_use]
    pub fn start_time_for(&self, requested: Option<&str>) -> String {
        requested
            .or(self.start_time.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    /// The requested origin as given, or a default for `route`.
    ///
    /// The configured default origin only applies when `route` lists it or
    /// it is a declared external origin; otherwise the route's first
    /// checkpoint is used.
    #[must_use]
    pub fn origin_for(
        &self,
        requested: Option<&str>,
        route: &Route,
        origins: &[ExternalOrigin],
    ) -> String {
        if let Some(origin) = requested {
            return origin.to_string();
        }
        let configured = self.origin.as_deref().filter(|id| {
            let usable = route.contains(id) || origins.iter().any(|origin| origin.id == *id);
            if !usable {
                log::debug!("default origin `{id}` does not apply to route `{}`", route.id);
            }
            usable
        });
        configured
            .or_else(|| route.points.first().map(|point| point.id.as_str()))
            .unwrap_or_default()
            .to_string()
    }
}

/// On-disk shape of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDocument {
    pub routes: Vec<Route>,
    #[serde(default)]
    pub legs: LegGraph,
    #[serde(default)]
    pub origins: Vec<ExternalOrigin>,
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid route catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Validated configuration, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub catalog: RouteCatalog,
    pub legs: LegGraph,
    pub origins: Vec<ExternalOrigin>,
    pub defaults: Defaults,
}

impl Dataset {
    /// Validate a parsed document.
    ///
    /// # Errors
    ///
    /// Returns an error if the route list fails catalog validation.
    pub fn from_document(document: DatasetDocument) -> Result<Self, DatasetError> {
        let catalog = RouteCatalog::new(document.routes)?;
        let known_ids = catalog.checkpoint_ids();
        for origin in &document.origins {
            if known_ids.contains(origin.id.as_str()) {
                log::debug!("external origin `{}` is also a checkpoint id", origin.id);
            }
            if !document.legs.contains_node(&origin.id) {
                log::warn!("external origin `{}` has no configured legs", origin.id);
            }
        }
        Ok(Self {
            catalog,
            legs: document.legs,
            origins: document.origins,
            defaults: document.defaults,
        })
    }

    /// Load a dataset from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the routes are invalid.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let document: DatasetDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// The dataset bundled with the engine.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled file is broken.
    pub fn embedded() -> Result<Self, DatasetError> {
        Self::from_json(EMBEDDED_DATASET)
    }

    #[must_use]
    pub fn origin(&self, id: &str) -> Option<&ExternalOrigin> {
        self.origins.iter().find(|origin| origin.id == id)
    }

    /// Back to the serializable document form.
    #[must_use]
    pub fn to_document(&self) -> DatasetDocument {
        DatasetDocument {
            routes: self.catalog.routes().to_vec(),
            legs: self.legs.clone(),
            origins: self.origins.clone(),
            defaults: self.defaults.clone(),
        }
    }
}
