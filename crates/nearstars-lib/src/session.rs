//! Per-user interactive state and the commands that change it.
//!
//! A [`Session`] bundles the view, selection, pinned measurements, the
//! hand-built route and any planned star-hop routes for one user on top of a
//! shared, read-only [`StarCatalog`]. Every user action is expressed as a
//! [`Command`] and applied through [`Session::apply`]; a command that fails
//! leaves the session exactly as it was before.
//!
//! Saving a view captures more than the camera: the selection, pinned
//! measurements and both kinds of route come back on restore as well.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::{Star, StarCatalog, DEFAULT_MAX_DISTANCE};
use crate::error::{Error, Result};
use crate::measure::{self, format_distance, Measurement, MeasurementToggle, Measurements};
use crate::output::{RouteOutputKind, RouteSummary};
use crate::picking::pick_star;
use crate::route::{plan_star_hops, HopPlannerConfig, RouteBuilder, RouteState};
use crate::selection::SelectionManager;
use crate::spatial::SpatialIndex;
use crate::view::{DisplayToggle, ViewDelta, ViewSnapshot, ViewState, MAX_SAVED_VIEWS};

/// How close, in light-years, a star must sit to the rotation center to count
/// as the center star when none was chosen explicitly.
const CENTER_TOLERANCE: f64 = 1e-4;

/// A single user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select(String),
    Deselect(String),
    ClearSelection,
    ToggleHighlight(String),
    /// Select the star under a screen point, optionally rotating around it.
    Pick { x: f64, y: f64, center: bool },
    UpdateView(ViewDelta),
    CenterOn(String),
    CenterOnFocus,
    ResetView,
    Toggle(DisplayToggle),
    AdjustRenderDistance(f64),
    SaveView,
    RestoreView(usize),
    /// Pin or unpin the measurement line between two stars.
    Measure { from: String, to: String },
    /// Pin or unpin the line from the focused star to another star.
    MeasureFocus(String),
    /// Pin or unpin the line from the rotation-center star to the focused star.
    MeasureFromCenter,
    ClearMeasurements,
    AppendHop(String),
    RemoveHop(usize),
    ResetRoute,
    /// Plan a star-hop route and add it to the planned routes.
    PlanRoute { from: String, to: String },
    /// Plan from the rotation-center star to the focused star.
    PlanFromCenter,
    ClearPlannedRoutes,
}

/// What a successful [`Command`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Selected { name: String, changed: bool },
    Deselected { name: String, changed: bool },
    SelectionCleared,
    Highlighted { name: String, highlighted: bool },
    Picked(Option<String>),
    View(ViewSnapshot),
    Toggled { toggle: DisplayToggle, enabled: bool },
    RenderDistance(f64),
    ViewSaved(usize),
    Measurement(MeasurementToggle),
    MeasurementsCleared,
    Route {
        state: RouteState,
        hops: Vec<String>,
        total_distance: f64,
    },
    Planned {
        index: usize,
        hops: Vec<String>,
        total_distance: f64,
    },
    PlannedRoutesCleared,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Selected { name, changed: true } => write!(f, "selected {name}"),
            Outcome::Selected { name, changed: false } => write!(f, "{name} is already selected"),
            Outcome::Deselected { name, changed: true } => write!(f, "deselected {name}"),
            Outcome::Deselected { name, changed: false } => write!(f, "{name} was not selected"),
            Outcome::SelectionCleared => f.write_str("selection cleared"),
            Outcome::Highlighted { name, highlighted } => {
                let state = if *highlighted { "on" } else { "off" };
                write!(f, "highlight {state} for {name}")
            }
            Outcome::Picked(Some(name)) => write!(f, "picked {name}"),
            Outcome::Picked(None) => f.write_str("no star under cursor"),
            Outcome::View(snapshot) => {
                let camera = &snapshot.camera;
                let center = match &camera.center_star {
                    Some(name) => name.clone(),
                    None => format!(
                        "({:.2}, {:.2}, {:.2})",
                        camera.center.x, camera.center.y, camera.center.z
                    ),
                };
                write!(
                    f,
                    "view: zoom {:.1}, center {center}, render distance {:.1} ly",
                    camera.zoom, snapshot.render_distance
                )
            }
            Outcome::Toggled { toggle, enabled } => {
                let state = if *enabled { "on" } else { "off" };
                write!(f, "{toggle} {state}")
            }
            Outcome::RenderDistance(distance) => {
                write!(f, "render distance {distance:.1} ly")
            }
            Outcome::ViewSaved(index) => write!(f, "saved view {index}"),
            Outcome::Measurement(MeasurementToggle::Pinned(line)) => write!(
                f,
                "pinned {} - {}: {}",
                line.from,
                line.to,
                format_distance(line.distance)
            ),
            Outcome::Measurement(MeasurementToggle::Unpinned(line)) => {
                write!(f, "unpinned {} - {}", line.from, line.to)
            }
            Outcome::MeasurementsCleared => f.write_str("measurements cleared"),
            Outcome::Route {
                state,
                hops,
                total_distance,
            } => {
                if hops.is_empty() {
                    return write!(f, "route ({state})");
                }
                write!(
                    f,
                    "route ({state}): {}, {}",
                    hops.join(" -> "),
                    format_distance(*total_distance)
                )
            }
            Outcome::Planned {
                index,
                hops,
                total_distance,
            } => write!(
                f,
                "planned route {index}: {}, {}",
                hops.join(" -> "),
                format_distance(*total_distance)
            ),
            Outcome::PlannedRoutesCleared => f.write_str("planned routes cleared"),
        }
    }
}

/// Everything a saved view brings back on restore.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedView {
    pub view: ViewSnapshot,
    pub selection: SelectionManager,
    pub measurements: Measurements,
    pub route: RouteBuilder,
    pub planned_routes: Vec<RouteBuilder>,
}

/// Interactive state for one user.
pub struct Session {
    catalog: Arc<StarCatalog>,
    index: SpatialIndex,
    view: ViewState,
    selection: SelectionManager,
    measurements: Measurements,
    route: RouteBuilder,
    planned: Vec<RouteBuilder>,
    saved: Vec<SavedView>,
    planner: HopPlannerConfig,
}

impl Session {
    pub fn new(catalog: Arc<StarCatalog>) -> Self {
        Self::with_max_distance(catalog, DEFAULT_MAX_DISTANCE)
    }

    /// Create a session whose render distance may not exceed `max_distance`.
    pub fn with_max_distance(catalog: Arc<StarCatalog>, max_distance: f64) -> Self {
        let index = SpatialIndex::build(&catalog);
        Self {
            catalog,
            index,
            view: ViewState::new(max_distance),
            selection: SelectionManager::new(),
            measurements: Measurements::new(),
            route: RouteBuilder::new(),
            planned: Vec::new(),
            saved: Vec::new(),
            planner: HopPlannerConfig::default(),
        }
    }

    /// Replace the planner settings used by [`Command::PlanRoute`] and
    /// [`Command::PlanFromCenter`].
    pub fn with_planner(mut self, planner: HopPlannerConfig) -> Self {
        self.planner = planner;
        self
    }

    /// Apply a command. On error nothing in the session has changed.
    pub fn apply(&mut self, command: Command) -> Result<Outcome> {
        debug!(?command, "applying session command");
        let result = self.dispatch(command);
        if let Err(err) = &result {
            warn!(error = %err, "session command failed");
        }
        result
    }

    fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Select(name) => {
                self.catalog.require(&name)?;
                let changed = self.selection.select(&name);
                Ok(Outcome::Selected { name, changed })
            }
            Command::Deselect(name) => {
                self.catalog.require(&name)?;
                let changed = self.selection.deselect(&name);
                Ok(Outcome::Deselected { name, changed })
            }
            Command::ClearSelection => {
                self.selection.clear();
                Ok(Outcome::SelectionCleared)
            }
            Command::ToggleHighlight(name) => {
                self.catalog.require(&name)?;
                let highlighted = self.selection.toggle_highlight(&name);
                Ok(Outcome::Highlighted { name, highlighted })
            }
            Command::Pick { x, y, center } => {
                let Some(star) = pick_star(&self.view, &self.catalog, x, y) else {
                    return Ok(Outcome::Picked(None));
                };
                self.selection.select(&star.name);
                if center {
                    self.view.center_on(star);
                }
                Ok(Outcome::Picked(Some(star.name.clone())))
            }
            Command::UpdateView(delta) => {
                self.view.update(delta);
                Ok(self.view_outcome())
            }
            Command::CenterOn(name) => {
                let star = self.catalog.require(&name)?;
                self.view.center_on(star);
                Ok(self.view_outcome())
            }
            Command::CenterOnFocus => {
                let name = self.selection.focus().ok_or(Error::NoFocus)?;
                let star = self.catalog.require(name)?;
                self.view.center_on(star);
                Ok(self.view_outcome())
            }
            Command::ResetView => {
                self.view.reset();
                Ok(self.view_outcome())
            }
            Command::Toggle(toggle) => {
                let enabled = self.view.toggle(toggle);
                Ok(Outcome::Toggled { toggle, enabled })
            }
            Command::AdjustRenderDistance(delta) => Ok(Outcome::RenderDistance(
                self.view.adjust_render_distance(delta),
            )),
            Command::SaveView => Ok(Outcome::ViewSaved(self.save_view())),
            Command::RestoreView(index) => {
                let saved = self
                    .saved
                    .get(index)
                    .cloned()
                    .ok_or(Error::InvalidIndex {
                        index,
                        len: self.saved.len(),
                    })?;
                self.view.restore(index)?;
                self.selection = saved.selection;
                self.measurements = saved.measurements;
                self.route = saved.route;
                self.planned = saved.planned_routes;
                Ok(self.view_outcome())
            }
            Command::Measure { from, to } => {
                let toggled = self.measurements.toggle(&self.catalog, &from, &to)?;
                Ok(Outcome::Measurement(toggled))
            }
            Command::MeasureFocus(to) => {
                let from = self
                    .selection
                    .focus()
                    .ok_or(Error::NoFocus)?
                    .to_string();
                let toggled = self.measurements.toggle(&self.catalog, &from, &to)?;
                Ok(Outcome::Measurement(toggled))
            }
            Command::MeasureFromCenter => {
                let to = self.selection.focus().ok_or(Error::NoFocus)?.to_string();
                let from = self.center_star()?.name.clone();
                let toggled = self.measurements.toggle(&self.catalog, &from, &to)?;
                Ok(Outcome::Measurement(toggled))
            }
            Command::ClearMeasurements => {
                self.measurements.clear();
                Ok(Outcome::MeasurementsCleared)
            }
            Command::AppendHop(name) => {
                self.route.append_hop(&self.catalog, &name)?;
                self.route_outcome()
            }
            Command::RemoveHop(index) => {
                self.route.remove_hop(index)?;
                self.route_outcome()
            }
            Command::ResetRoute => {
                self.route.reset();
                self.route_outcome()
            }
            Command::PlanRoute { from, to } => self.plan(&from, &to),
            Command::PlanFromCenter => {
                let to = self.selection.focus().ok_or(Error::NoFocus)?.to_string();
                let from = self.center_star()?.name.clone();
                self.plan(&from, &to)
            }
            Command::ClearPlannedRoutes => {
                self.planned.clear();
                Ok(Outcome::PlannedRoutesCleared)
            }
        }
    }

    fn save_view(&mut self) -> usize {
        let index = self.view.snapshot();
        if self.saved.len() == MAX_SAVED_VIEWS {
            self.saved.remove(0);
        }
        self.saved.push(SavedView {
            view: self.view.current(),
            selection: self.selection.clone(),
            measurements: self.measurements.clone(),
            route: self.route.clone(),
            planned_routes: self.planned.clone(),
        });
        index
    }

    /// Planned routes only consider stars inside the current render distance.
    fn plan(&mut self, from: &str, to: &str) -> Result<Outcome> {
        let config = HopPlannerConfig {
            max_distance: Some(self.view.render_distance),
            ..self.planner.clone()
        };
        let route = plan_star_hops(&self.catalog, &self.index, from, to, &config)?;
        let total_distance = route.total_distance(&self.catalog)?;
        let hops = route.hops().to_vec();
        self.planned.push(route);
        Ok(Outcome::Planned {
            index: self.planned.len() - 1,
            hops,
            total_distance,
        })
    }

    fn view_outcome(&self) -> Outcome {
        Outcome::View(self.view.current())
    }

    fn route_outcome(&self) -> Result<Outcome> {
        Ok(Outcome::Route {
            state: self.route.state(),
            hops: self.route.hops().to_vec(),
            total_distance: self.route.total_distance(&self.catalog)?,
        })
    }

    pub fn catalog(&self) -> &StarCatalog {
        &self.catalog
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    pub fn route(&self) -> &RouteBuilder {
        &self.route
    }

    /// Star-hop routes planned so far, oldest first.
    pub fn planned_routes(&self) -> &[RouteBuilder] {
        &self.planned
    }

    pub fn saved_views(&self) -> &[SavedView] {
        &self.saved
    }

    /// Star the view currently rotates around.
    ///
    /// Without an explicit center star this is whichever star sits at the
    /// rotation center, so a freshly reset view resolves to the Sun.
    pub fn center_star(&self) -> Result<&Star> {
        let camera = &self.view.camera;
        if let Some(name) = &camera.center_star {
            return self.catalog.require(name);
        }
        self.catalog
            .iter()
            .find(|star| star.position.distance_to(&camera.center) < CENTER_TOLERANCE)
            .ok_or(Error::NoRotationCenter)
    }

    /// Stars inside the current render distance.
    pub fn visible_stars(&self) -> impl Iterator<Item = &Star> {
        self.catalog
            .iter()
            .filter(move |star| self.view.is_visible(star))
    }

    /// Distances between every pair of selected stars.
    pub fn selection_distances(&self) -> Result<Vec<Measurement>> {
        measure::pairwise(&self.catalog, &self.selection)
    }

    /// Structured summary of the current route.
    pub fn route_summary(&self) -> Result<RouteSummary> {
        RouteSummary::from_route(RouteOutputKind::Route, &self.catalog, &self.route)
    }

    /// Summaries of every planned route, oldest first.
    pub fn planned_summaries(&self) -> Result<Vec<RouteSummary>> {
        self.planned
            .iter()
            .map(|route| RouteSummary::from_route(RouteOutputKind::Hop, &self.catalog, route))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SpectralClass, StarPosition};

    fn session() -> Session {
        let catalog = StarCatalog::from_stars([
            Star::new("Sun", StarPosition::ORIGIN, 4.83, SpectralClass::G),
            Star::new("Alpha", StarPosition::new(4.37, 0.0, 0.0), 4.38, SpectralClass::G),
            Star::new("Barnard", StarPosition::new(0.0, 6.0, 0.0), 13.2, SpectralClass::M),
        ])
        .expect("unique names");
        Session::new(Arc::new(catalog))
    }

    #[test]
    fn unknown_names_are_rejected_before_state_changes() {
        let mut session = session();
        assert!(session.apply(Command::Select("Vega".into())).is_err());
        assert!(session.apply(Command::ToggleHighlight("Vega".into())).is_err());
        assert!(session.selection().is_empty());
        assert!(session.selection().highlighted().is_empty());
    }

    #[test]
    fn focus_commands_require_a_selection() {
        let mut session = session();
        assert!(matches!(
            session.apply(Command::CenterOnFocus),
            Err(Error::NoFocus)
        ));
        session.apply(Command::Select("Alpha".into())).unwrap();
        session.apply(Command::CenterOnFocus).unwrap();
        assert_eq!(session.view().camera.center_star.as_deref(), Some("Alpha"));

        let outcome = session.apply(Command::MeasureFocus("Sun".into())).unwrap();
        assert_eq!(outcome.to_string(), "pinned Alpha - Sun: 4.37 ly");
    }

    #[test]
    fn failed_route_edit_keeps_route() {
        let mut session = session();
        for name in ["Sun", "Alpha", "Sun"] {
            session.apply(Command::AppendHop(name.into())).unwrap();
        }
        let err = session.apply(Command::RemoveHop(1)).expect_err("merge");
        assert!(matches!(err, Error::AmbiguousMerge { index: 1, .. }));
        assert_eq!(session.route().hops(), ["Sun", "Alpha", "Sun"]);
    }

    #[test]
    fn pick_selects_and_optionally_centers() {
        let mut session = session();
        let outcome = session
            .apply(Command::Pick {
                x: 512.0 + 4.37 * 40.0,
                y: 384.0,
                center: true,
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Picked(Some("Alpha".into())));
        assert!(session.selection().is_selected("Alpha"));
        assert_eq!(session.view().camera.center_star.as_deref(), Some("Alpha"));
    }

    #[test]
    fn center_star_falls_back_to_star_at_center() {
        let mut session = session();
        assert_eq!(session.center_star().unwrap().name, "Sun");

        session.apply(Command::CenterOn("Barnard".into())).unwrap();
        assert_eq!(session.center_star().unwrap().name, "Barnard");

        session.view.camera.center_star = None;
        session.view.camera.center = StarPosition::new(1.0, 1.0, 1.0);
        assert!(matches!(session.center_star(), Err(Error::NoRotationCenter)));
        session.apply(Command::Select("Alpha".into())).unwrap();
        assert!(matches!(
            session.apply(Command::PlanFromCenter),
            Err(Error::NoRotationCenter)
        ));
        assert!(session.planned_routes().is_empty());
    }

    #[test]
    fn planning_does_not_touch_hand_built_route() {
        let mut session = session();
        session.apply(Command::AppendHop("Barnard".into())).unwrap();
        let outcome = session
            .apply(Command::PlanRoute {
                from: "Sun".into(),
                to: "Alpha".into(),
            })
            .unwrap();
        assert_eq!(outcome.to_string(), "planned route 0: Sun -> Alpha, 4.37 ly");
        assert_eq!(session.route().hops(), ["Barnard"]);
        assert_eq!(session.planned_routes().len(), 1);
    }

    #[test]
    fn route_outcome_reports_total() {
        let mut session = session();
        session.apply(Command::AppendHop("Sun".into())).unwrap();
        session.apply(Command::AppendHop("Alpha".into())).unwrap();
        let outcome = session.apply(Command::AppendHop("Barnard".into())).unwrap();
        assert_eq!(
            outcome.to_string(),
            "route (multi-hop): Sun -> Alpha -> Barnard, 11.79 ly"
        );
        let summary = session.route_summary().unwrap();
        assert_eq!(summary.hops, 2);
    }
}
