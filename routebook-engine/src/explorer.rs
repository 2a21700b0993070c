use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Defaults, ExternalOrigin};
use crate::eta::{EtaSchedule, compute_schedule};
use crate::legs::LegGraph;
use crate::presenter::Presenter;
use crate::selection::{SelectionController, SelectionView};

/// Discrete operator actions delivered by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExplorerEvent {
    SelectRoute {
        route_id: String,
    },
    PointClicked {
        point_id: String,
    },
    Next,
    Prev,
    ToggleVisibility {
        visible: bool,
    },
    Reset,
    /// Compute an ETA table for the current route. Missing fields take the
    /// dataset defaults; a blank start time prompts the operator.
    RequestEta {
        #[serde(default)]
        start_time: Option<String>,
        #[serde(default)]
        origin: Option<String>,
    },
}

/// Selectable start point for the ETA form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginOption {
    pub id: String,
    pub label: String,
    pub external: bool,
}

/// Binds the selection state machine, the static data and a presenter.
///
/// Every event runs to completion and ends with exactly one call into the
/// presenter.
pub struct RouteExplorer<P: Presenter> {
    selection: SelectionController,
    legs: LegGraph,
    origins: Vec<ExternalOrigin>,
    defaults: Defaults,
    presenter: P,
}

impl<P: Presenter> RouteExplorer<P> {
    #[must_use]
    pub fn new(dataset: Dataset, presenter: P) -> Self {
        let Dataset {
            catalog,
            legs,
            origins,
            defaults,
        } = dataset;
        Self {
            selection: SelectionController::new(catalog),
            legs,
            origins,
            defaults,
            presenter,
        }
    }

    /// Draw the initial selection.
    pub fn start(&mut self) -> SelectionView {
        let view = self.selection.view();
        self.presenter.render_selection(&view);
        view
    }

    /// Dispatch one event.
    pub fn handle(&mut self, event: ExplorerEvent) {
        log::debug!("handling {event:?}");
        let view = match event {
            ExplorerEvent::SelectRoute { route_id } => self.selection.select_route(&route_id),
            ExplorerEvent::PointClicked { point_id } => {
                self.selection.select_point_by_click(&point_id)
            }
            ExplorerEvent::Next => self.selection.next(),
            ExplorerEvent::Prev => self.selection.prev(),
            ExplorerEvent::ToggleVisibility { visible } => {
                self.selection.toggle_visibility(visible)
            }
            ExplorerEvent::Reset => self.selection.reset(),
            ExplorerEvent::RequestEta { start_time, origin } => {
                self.request_eta(start_time.as_deref(), origin.as_deref());
                return;
            }
        };
        self.presenter.render_selection(&view);
    }

    /// Compute and present the ETA table for the current route.
    pub fn request_eta(&mut self, start_time: Option<&str>, origin: Option<&str>) -> EtaSchedule {
        let route = self.selection.current_route();
        let start_time = self.defaults.start_time_for(start_time);
        let origin = self.defaults.origin_for(origin, route, &self.origins);
        let schedule = compute_schedule(&start_time, &origin, route, &self.legs);
        if schedule.is_ready() {
            self.presenter.render_schedule(&schedule);
        } else {
            self.presenter.prompt_start_time();
        }
        schedule
    }

    /// Checkpoints of the current route followed by the external origins.
    #[must_use]
    pub fn origin_options(&self) -> Vec<OriginOption> {
        let route = self.selection.current_route();
        route
            .points
            .iter()
            .map(|point| OriginOption {
                id: point.id.clone(),
                label: point.title.clone(),
                external: false,
            })
            .chain(self.origins.iter().map(|origin| OriginOption {
                id: origin.id.clone(),
                label: origin.label.clone(),
                external: true,
            }))
            .collect()
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionController {
        &self.selection
    }

    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    #[must_use]
    pub fn into_presenter(self) -> P {
        self.presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        views: Vec<SelectionView>,
        schedules: Vec<EtaSchedule>,
        prompts: usize,
    }

    impl Presenter for Recorder {
        fn render_selection(&mut self, view: &SelectionView) {
            self.views.push(view.clone());
        }

        fn render_schedule(&mut self, schedule: &EtaSchedule) {
            self.schedules.push(schedule.clone());
        }

        fn prompt_start_time(&mut self) {
            self.prompts += 1;
        }
    }

    fn explorer() -> RouteExplorer<Recorder> {
        RouteExplorer::new(Dataset::embedded().unwrap(), Recorder::default())
    }

    #[test]
    fn each_navigation_event_renders_once() {
        let mut ex = explorer();
        ex.start();
        ex.handle(ExplorerEvent::Next);
        ex.handle(ExplorerEvent::ToggleVisibility { visible: false });
        ex.handle(ExplorerEvent::Reset);
        let recorder = ex.into_presenter();
        assert_eq!(recorder.views.len(), 4);
        assert!(recorder.schedules.is_empty());
        assert!(recorder.views[3].highlight.points_visible);
    }

    #[test]
    fn eta_request_uses_current_route() {
        let mut ex = explorer();
        ex.handle(ExplorerEvent::SelectRoute {
            route_id: "river".to_string(),
        });
        ex.handle(ExplorerEvent::RequestEta {
            start_time: Some("07:00".to_string()),
            origin: None,
        });
        let recorder = ex.presenter();
        assert_eq!(recorder.schedules.len(), 1);
        let schedule = &recorder.schedules[0];
        assert_eq!(schedule.route_id, "river");
        assert_eq!(schedule.origin, "staging");
        assert_eq!(schedule.rows.len(), 4);
    }

    #[test]
    fn bare_eta_request_uses_dataset_defaults() {
        let mut ex = explorer();
        ex.handle(ExplorerEvent::RequestEta {
            start_time: None,
            origin: None,
        });
        let schedule = &ex.presenter().schedules[0];
        assert_eq!(schedule.start_time, "06:00");
        assert_eq!(schedule.origin, "gate-north");
        assert_eq!(schedule.summary.final_eta, "07:09");

        ex.handle(ExplorerEvent::SelectRoute {
            route_id: "river".to_string(),
        });
        let schedule = ex.request_eta(None, None);
        assert_eq!(schedule.origin, "staging");
        assert_eq!(schedule.start_time, "06:00");
        assert_eq!(schedule.entry, Some(crate::EntryKind::OnRoute));
    }

    #[test]
    fn blank_start_time_prompts_instead_of_rendering() {
        let mut ex = explorer();
        let schedule = ex.request_eta(Some("  "), Some("gate-north"));
        assert!(schedule.is_empty());
        assert_eq!(ex.presenter().prompts, 1);
        assert!(ex.presenter().schedules.is_empty());
    }

    #[test]
    fn origin_options_list_route_points_then_depots() {
        let ex = explorer();
        let options = ex.origin_options();
        assert_eq!(options.first().map(|o| o.id.as_str()), Some("gate-north"));
        let external: Vec<&str> = options
            .iter()
            .filter(|o| o.external)
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(external, vec!["depot-main", "depot-south"]);
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let event: ExplorerEvent =
            serde_json::from_str(r#"{ "event": "point_clicked", "point_id": "quarry" }"#).unwrap();
        assert_eq!(
            event,
            ExplorerEvent::PointClicked {
                point_id: "quarry".to_string()
            }
        );
        let eta: ExplorerEvent =
            serde_json::from_str(r#"{ "event": "request_eta", "start_time": "06:00" }"#).unwrap();
        assert_eq!(
            eta,
            ExplorerEvent::RequestEta {
                start_time: Some("06:00".to_string()),
                origin: None
            }
        );
    }
}
