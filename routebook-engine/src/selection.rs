//! Route/checkpoint selection state machine.
//!
//! [`SelectionController`] owns the only mutable state in the engine. Every
//! transition is total: unknown ids fall back instead of failing, and each
//! transition returns the [`SelectionView`] the presentation layer should
//! draw next.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{Route, RouteCatalog};
use crate::numbers::usize_to_u32;

const DETACHED_SUBTITLE: &str = "Not on any configured route";
const EMPTY_ROUTE_TITLE: &str = "No checkpoints";

/// Which route and checkpoint are selected, and what is highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub current_route_id: String,
    /// Always within the current route's points when it has any.
    pub current_point_index: usize,
    /// The single highlighted checkpoint, if any.
    pub active_point_id: Option<String>,
    pub points_visible: bool,
}

/// Display colour for a checkpoint hotspot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "color", rename_all = "snake_case")]
pub enum Tint {
    Route(String),
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub subtitle: String,
    pub objective: String,
    pub bullets: Vec<String>,
    /// True when showing a hotspot that belongs to no route.
    pub detached: bool,
}

/// Hotspot highlighting instructions.
///
/// `dimmed` lists every catalog checkpoint except the active one while a
/// checkpoint is active. When `points_visible` is false the presenter hides
/// every hotspot other than `active_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub active_id: Option<String>,
    pub dimmed: BTreeSet<String>,
    pub tint: BTreeMap<String, Tint>,
    pub points_visible: bool,
}

/// Previous/next affordances for paging through the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    pub index: u32,
    pub len: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Everything the presentation layer needs to redraw after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionView {
    pub route_id: String,
    pub route_name: String,
    pub route_color: String,
    pub panel: Panel,
    pub highlight: Highlight,
    pub pager: Pager,
}

/// Entry for a route picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOption {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    catalog: RouteCatalog,
    state: SelectionState,
    detached_point: Option<String>,
}

impl SelectionController {
    /// Start on the first route at its first checkpoint with nothing highlighted.
    #[must_use]
    pub fn new(catalog: RouteCatalog) -> Self {
        let state = SelectionState {
            current_route_id: catalog.first().id.clone(),
            current_point_index: 0,
            active_point_id: None,
            points_visible: true,
        };
        Self {
            catalog,
            state,
            detached_point: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    #[must_use]
    pub const fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn current_route(&self) -> &Route {
        self.catalog.get_or_first(&self.state.current_route_id)
    }

    #[must_use]
    pub fn route_options(&self) -> Vec<RouteOption> {
        self.catalog
            .routes()
            .iter()
            .map(|route| RouteOption {
                id: route.id.clone(),
                name: route.name.clone(),
                color: route.color.clone(),
            })
            .collect()
    }

    /// Switch routes, substituting the first route for an unknown id.
    ///
    /// A highlighted checkpoint the new route also lists stays highlighted
    /// and becomes the current point. Otherwise the highlight is cleared and
    /// the point index is kept when it is still in range.
    pub fn select_route(&mut self, route_id: &str) -> SelectionView {
        self.detached_point = None;
        self.apply_route(route_id);
        self.view()
    }

    /// Focus the clicked checkpoint, switching routes if needed.
    pub fn select_point_by_click(&mut self, point_id: &str) -> SelectionView {
        self.detached_point = None;
        if let Some(index) = self.current_route().position(point_id) {
            self.focus(index);
            return self.view();
        }

        let owner = self
            .catalog
            .routes_containing(point_id)
            .next()
            .map(|route| route.id.clone());
        if let Some(route_id) = owner {
            self.apply_route(&route_id);
            if let Some(index) = self.current_route().position(point_id) {
                self.focus(index);
            }
            return self.view();
        }

        log::debug!("checkpoint `{point_id}` is not on any route; showing detached panel");
        self.activate(point_id);
        self.detached_point = Some(point_id.to_string());
        self.view()
    }

    /// Advance to the next checkpoint; a no-op on the last one.
    pub fn next(&mut self) -> SelectionView {
        let len = self.current_route().len();
        let index = self.state.current_point_index;
        if index + 1 < len {
            self.detached_point = None;
            self.focus(index + 1);
        }
        self.view()
    }

    /// Step back to the previous checkpoint; a no-op on the first one.
    pub fn prev(&mut self) -> SelectionView {
        let index = self.state.current_point_index;
        if index > 0 && !self.current_route().is_empty() {
            self.detached_point = None;
            self.focus(index - 1);
        }
        self.view()
    }

    /// Show or hide the non-active hotspots.
    pub fn toggle_visibility(&mut self, visible: bool) -> SelectionView {
        self.state.points_visible = visible;
        self.view()
    }

    /// Clear the highlight, show every hotspot and return to the first
    /// checkpoint of the current route.
    pub fn reset(&mut self) -> SelectionView {
        self.detached_point = None;
        self.state.active_point_id = None;
        self.state.points_visible = true;
        self.state.current_point_index = 0;
        let route_id = self.state.current_route_id.clone();
        self.apply_route(&route_id);
        self.view()
    }

    /// Render instructions for the current state.
    #[must_use]
    pub fn view(&self) -> SelectionView {
        let route = self.current_route();
        SelectionView {
            route_id: route.id.clone(),
            route_name: route.name.clone(),
            route_color: route.color.clone(),
            panel: self.panel(route),
            highlight: self.highlight(route),
            pager: self.pager(route),
        }
    }

    fn apply_route(&mut self, route_id: &str) {
        let route = match self.catalog.get(route_id) {
            Some(route) => route,
            None => {
                log::debug!("unknown route `{route_id}`; falling back to the first route");
                self.catalog.first()
            }
        };
        let resolved_id = route.id.clone();
        let len = route.len();
        let active_position = self
            .state
            .active_point_id
            .as_deref()
            .and_then(|active| route.position(active));

        self.state.current_route_id = resolved_id;
        match active_position {
            // The panel follows a highlight the new route shares.
            Some(position) => self.state.current_point_index = position,
            None => {
                self.state.active_point_id = None;
                if self.state.current_point_index >= len {
                    self.state.current_point_index = 0;
                }
            }
        }
    }

    fn focus(&mut self, index: usize) {
        self.state.current_point_index = index;
        let point_id = self
            .current_route()
            .point(index)
            .map(|point| point.id.clone());
        if let Some(point_id) = point_id {
            self.activate(&point_id);
        }
    }

    // Single slot: marking a new checkpoint drops the previous highlight.
    fn activate(&mut self, point_id: &str) {
        if let Some(previous) = self.state.active_point_id.replace(point_id.to_string()) {
            log::trace!("highlight moved from `{previous}` to `{point_id}`");
        }
    }

    fn panel(&self, route: &Route) -> Panel {
        if let Some(point_id) = &self.detached_point {
            return Panel {
                title: point_id.clone(),
                subtitle: DETACHED_SUBTITLE.to_string(),
                objective: String::new(),
                bullets: Vec::new(),
                detached: true,
            };
        }
        match route.point(self.state.current_point_index) {
            Some(point) => Panel {
                title: point.title.clone(),
                subtitle: format!(
                    "{} · Checkpoint {} of {}",
                    route.name,
                    self.state.current_point_index + 1,
                    route.len()
                ),
                objective: point.objective.clone(),
                bullets: point.bullets.clone(),
                detached: false,
            },
            None => Panel {
                title: EMPTY_ROUTE_TITLE.to_string(),
                subtitle: route.name.clone(),
                objective: String::new(),
                bullets: Vec::new(),
                detached: false,
            },
        }
    }

    fn highlight(&self, route: &Route) -> Highlight {
        let active_id = self.state.active_point_id.clone();
        let all_ids = self.catalog.checkpoint_ids();
        let dimmed = match active_id.as_deref() {
            Some(active) => all_ids
                .iter()
                .filter(|id| **id != active)
                .map(|id| (*id).to_string())
                .collect(),
            None => BTreeSet::new(),
        };
        let tint = all_ids
            .iter()
            .map(|id| {
                let tint = if route.contains(id) {
                    Tint::Route(route.color.clone())
                } else {
                    Tint::Neutral
                };
                ((*id).to_string(), tint)
            })
            .collect();
        Highlight {
            active_id,
            dimmed,
            tint,
            points_visible: self.state.points_visible,
        }
    }

    fn pager(&self, route: &Route) -> Pager {
        let len = route.len();
        let index = self.state.current_point_index;
        Pager {
            index: usize_to_u32(index),
            len: usize_to_u32(len),
            has_prev: index > 0 && len > 0,
            has_next: index + 1 < len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Checkpoint;

    fn route(id: &str, color: &str, points: &[&str]) -> Route {
        Route {
            id: id.to_string(),
            name: format!("Route {}", id.to_uppercase()),
            color: color.to_string(),
            points: points
                .iter()
                .map(|point| Checkpoint {
                    id: (*point).to_string(),
                    title: format!("Checkpoint {}", point.to_uppercase()),
                    objective: format!("Secure {point}"),
                    bullets: vec![format!("Report from {point}")],
                })
                .collect(),
        }
    }

    fn controller() -> SelectionController {
        let catalog = RouteCatalog::new(vec![
            route("a", "#aa0000", &["a1", "a2", "hub", "a4"]),
            route("b", "#0000bb", &["b1", "hub"]),
            route("c", "#00cc00", &[]),
        ])
        .unwrap();
        SelectionController::new(catalog)
    }

    #[test]
    fn starts_on_first_route_without_highlight() {
        let ctl = controller();
        assert_eq!(ctl.state().current_route_id, "a");
        assert_eq!(ctl.state().current_point_index, 0);
        assert_eq!(ctl.state().active_point_id, None);
        assert!(ctl.state().points_visible);
        let view = ctl.view();
        assert_eq!(view.panel.title, "Checkpoint A1");
        assert_eq!(view.panel.subtitle, "Route A · Checkpoint 1 of 4");
        assert!(view.highlight.dimmed.is_empty());
    }

    #[test]
    fn select_route_keeps_index_in_range_and_tints_members() {
        let mut ctl = controller();
        ctl.next();
        let view = ctl.select_route("b");
        assert_eq!(ctl.state().current_route_id, "b");
        assert_eq!(ctl.state().current_point_index, 1);
        assert_eq!(view.panel.title, "Checkpoint HUB");
        assert_eq!(
            view.highlight.tint.get("hub"),
            Some(&Tint::Route("#0000bb".to_string()))
        );
        assert_eq!(view.highlight.tint.get("a1"), Some(&Tint::Neutral));
    }

    #[test]
    fn select_route_resets_out_of_range_index() {
        let mut ctl = controller();
        ctl.select_point_by_click("a4");
        ctl.select_route("b");
        assert_eq!(ctl.state().current_point_index, 0);
        assert_eq!(ctl.state().active_point_id, None);
    }

    #[test]
    fn select_route_follows_shared_highlight() {
        let mut ctl = controller();
        ctl.select_point_by_click("hub");
        assert_eq!(ctl.state().current_point_index, 2);
        let view = ctl.select_route("b");
        assert_eq!(ctl.state().current_point_index, 1);
        assert_eq!(ctl.state().active_point_id.as_deref(), Some("hub"));
        assert_eq!(view.panel.title, "Checkpoint HUB");
        assert_eq!(view.highlight.active_id.as_deref(), Some("hub"));

        let view = ctl.select_route("a");
        assert_eq!(ctl.state().current_point_index, 2);
        assert_eq!(view.panel.title, "Checkpoint HUB");
    }

    #[test]
    fn unknown_route_falls_back_to_first() {
        let mut ctl = controller();
        ctl.select_route("b");
        let view = ctl.select_route("zzz");
        assert_eq!(view.route_id, "a");
        assert_eq!(ctl.state().current_route_id, "a");
    }

    #[test]
    fn visibility_survives_route_change() {
        let mut ctl = controller();
        ctl.toggle_visibility(false);
        let view = ctl.select_route("b");
        assert!(!view.highlight.points_visible);
        assert!(!ctl.state().points_visible);
    }

    #[test]
    fn click_in_current_route_moves_index() {
        let mut ctl = controller();
        let view = ctl.select_point_by_click("hub");
        assert_eq!(ctl.state().current_route_id, "a");
        assert_eq!(ctl.state().current_point_index, 2);
        assert_eq!(view.highlight.active_id.as_deref(), Some("hub"));
        assert!(!view.highlight.dimmed.contains("hub"));
        assert!(view.highlight.dimmed.contains("a1"));
        assert!(view.highlight.dimmed.contains("b1"));
    }

    #[test]
    fn click_in_other_route_switches_route() {
        let mut ctl = controller();
        let view = ctl.select_point_by_click("b1");
        assert_eq!(ctl.state().current_route_id, "b");
        assert_eq!(ctl.state().current_point_index, 0);
        assert_eq!(view.route_id, "b");
        assert_eq!(view.highlight.active_id.as_deref(), Some("b1"));
    }

    #[test]
    fn click_on_unlisted_point_is_detached() {
        let mut ctl = controller();
        ctl.next();
        let view = ctl.select_point_by_click("ghost");
        assert!(view.panel.detached);
        assert_eq!(view.panel.title, "ghost");
        assert_eq!(ctl.state().current_route_id, "a");
        assert_eq!(ctl.state().current_point_index, 1);

        let view = ctl.next();
        assert!(!view.panel.detached);
        assert_eq!(ctl.state().current_point_index, 2);
    }

    #[test]
    fn highlight_is_exclusive() {
        let mut ctl = controller();
        ctl.select_point_by_click("a1");
        let view = ctl.select_point_by_click("a2");
        assert_eq!(ctl.state().active_point_id.as_deref(), Some("a2"));
        assert_eq!(view.highlight.active_id.as_deref(), Some("a2"));
        assert!(view.highlight.dimmed.contains("a1"));
    }

    #[test]
    fn paging_is_clamped() {
        let mut ctl = controller();
        let view = ctl.prev();
        assert_eq!(ctl.state().current_point_index, 0);
        assert!(!view.pager.has_prev);
        assert!(view.pager.has_next);

        for _ in 0..10 {
            ctl.next();
        }
        let view = ctl.view();
        assert_eq!(ctl.state().current_point_index, 3);
        assert!(!view.pager.has_next);
        assert!(view.pager.has_prev);
    }

    #[test]
    fn empty_route_shows_placeholder_and_ignores_paging() {
        let mut ctl = controller();
        let view = ctl.select_route("c");
        assert_eq!(view.panel.title, EMPTY_ROUTE_TITLE);
        assert_eq!(view.pager.len, 0);
        assert!(!view.pager.has_prev && !view.pager.has_next);
        ctl.next();
        ctl.prev();
        assert_eq!(ctl.state().current_point_index, 0);
    }

    #[test]
    fn reset_clears_highlight_and_rewinds() {
        let mut ctl = controller();
        ctl.select_point_by_click("hub");
        ctl.toggle_visibility(false);
        let view = ctl.reset();
        assert_eq!(ctl.state().current_point_index, 0);
        assert_eq!(ctl.state().active_point_id, None);
        assert!(ctl.state().points_visible);
        assert_eq!(view.route_id, "a");
        assert!(view.highlight.dimmed.is_empty());
    }

    #[test]
    fn route_options_follow_catalog_order() {
        let ctl = controller();
        let ids: Vec<String> = ctl.route_options().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
