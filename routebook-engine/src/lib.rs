//! Routebook Engine
//!
//! Platform-agnostic core for exploring fixed checkpoint routes: the leg-time
//! graph, traversal resolution, ETA schedules and the selection/highlight
//! state machine. Rendering is delegated to a [`Presenter`].

pub mod catalog;
pub mod dataset;
pub mod eta;
pub mod explorer;
pub mod legs;
pub mod numbers;
pub mod presenter;
pub mod selection;
pub mod traversal;

// Re-export commonly used types
pub use catalog::{CatalogError, Checkpoint, Route, RouteCatalog};
pub use dataset::{Dataset, DatasetDocument, DatasetError, Defaults, ExternalOrigin};
pub use eta::{
    EtaSchedule, EtaSummary, LegRow, ScheduleStatus, compute_schedule, format_clock, parse_clock,
};
pub use explorer::{ExplorerEvent, OriginOption, RouteExplorer};
pub use legs::{LegGraph, LegSource, LegTime};
pub use presenter::Presenter;
pub use selection::{
    Highlight, Pager, Panel, RouteOption, SelectionController, SelectionState, SelectionView, Tint,
};
pub use traversal::{EntryKind, Traversal, resolve_traversal};

/// Trait for abstracting dataset loading.
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the routes, legs and origins.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be read or fails validation.
    fn load_dataset(&self) -> Result<Dataset, Self::Error>;
}

/// Loader for the dataset compiled into the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLoader;

impl DataLoader for EmbeddedLoader {
    type Error = DatasetError;

    fn load_dataset(&self) -> Result<Dataset, Self::Error> {
        Dataset::embedded()
    }
}

/// Load a dataset and build an explorer around it.
///
/// # Errors
///
/// Returns the loader's error if the dataset cannot be loaded.
pub fn open_explorer<L, P>(loader: &L, presenter: P) -> Result<RouteExplorer<P>, L::Error>
where
    L: DataLoader,
    P: Presenter,
{
    let dataset = loader.load_dataset()?;
    log::info!(
        "loaded {} routes and {} legs",
        dataset.catalog.len(),
        dataset.legs.edge_count()
    );
    Ok(RouteExplorer::new(dataset, presenter))
}
