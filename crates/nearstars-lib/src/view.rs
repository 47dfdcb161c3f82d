//! Camera and display state for the viewport.
//!
//! [`ViewState`] owns the camera (pan, rotation, zoom, rotation center), the
//! display toggles and the render distance, plus an in-memory stack of saved
//! [`ViewSnapshot`]s. All mutation goes through relative updates so input
//! handlers never need to know absolute camera values.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Star, StarPosition, DEFAULT_MAX_DISTANCE};
use crate::error::{Error, Result};

/// Pixels per light-year at startup.
pub const DEFAULT_ZOOM: f64 = 40.0;
pub const MIN_ZOOM: f64 = 5.0;
pub const MAX_ZOOM: f64 = 400.0;
/// Multiplicative zoom applied per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;
/// Render distance can never shrink below this many light-years.
pub const MIN_RENDER_DISTANCE: f64 = 3.0;
/// Saved views kept at once; saving another drops the oldest.
pub const MAX_SAVED_VIEWS: usize = 5;
/// Depth cue applied per light-year along the view axis.
const DEPTH_SCALE_PER_LY: f64 = 0.1;

/// Rotation angles in radians, applied X then Y then Z.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Camera parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    /// Screen-space offset in pixels.
    pub pan: [f64; 2],
    pub rotation: Rotation,
    /// Pixels per light-year.
    pub zoom: f64,
    /// World position the view rotates around.
    pub center: StarPosition,
    /// Star the rotation center was taken from, if any.
    pub center_star: Option<String>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: [0.0, 0.0],
            rotation: Rotation::default(),
            zoom: DEFAULT_ZOOM,
            center: StarPosition::ORIGIN,
            center_star: None,
        }
    }
}

/// Boolean display flags consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayToggles {
    pub star_names: bool,
    pub coordinate_grid: bool,
    pub projections: bool,
    pub galactic_plane: bool,
    pub system_inset: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            star_names: false,
            coordinate_grid: false,
            projections: false,
            galactic_plane: false,
            system_inset: true,
        }
    }
}

/// Individual display flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayToggle {
    StarNames,
    CoordinateGrid,
    Projections,
    GalacticPlane,
    SystemInset,
}

impl DisplayToggle {
    pub fn label(self) -> &'static str {
        match self {
            DisplayToggle::StarNames => "names",
            DisplayToggle::CoordinateGrid => "grid",
            DisplayToggle::Projections => "projections",
            DisplayToggle::GalacticPlane => "plane",
            DisplayToggle::SystemInset => "inset",
        }
    }
}

impl fmt::Display for DisplayToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisplayToggle {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "names" | "star_names" => Ok(DisplayToggle::StarNames),
            "grid" | "coordinate_grid" => Ok(DisplayToggle::CoordinateGrid),
            "projections" => Ok(DisplayToggle::Projections),
            "plane" | "galactic_plane" => Ok(DisplayToggle::GalacticPlane),
            "inset" | "system_inset" => Ok(DisplayToggle::SystemInset),
            other => Err(format!(
                "unknown display toggle '{other}' \
                 (expected names, grid, projections, plane or inset)"
            )),
        }
    }
}

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

/// Relative camera transform produced by a single input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewDelta {
    pub pan: [f64; 2],
    pub rotation: Rotation,
    /// Multiplicative zoom; `1.0` leaves zoom unchanged.
    pub zoom_factor: f64,
}

impl Default for ViewDelta {
    fn default() -> Self {
        Self {
            pan: [0.0, 0.0],
            rotation: Rotation::default(),
            zoom_factor: 1.0,
        }
    }
}

impl ViewDelta {
    pub fn pan(dx: f64, dy: f64) -> Self {
        Self {
            pan: [dx, dy],
            ..Self::default()
        }
    }

    pub fn rotate(x: f64, y: f64, z: f64) -> Self {
        Self {
            rotation: Rotation::new(x, y, z),
            ..Self::default()
        }
    }

    pub fn zoom(factor: f64) -> Self {
        Self {
            zoom_factor: factor,
            ..Self::default()
        }
    }

    pub fn zoom_in() -> Self {
        Self::zoom(ZOOM_STEP)
    }

    pub fn zoom_out() -> Self {
        Self::zoom(1.0 / ZOOM_STEP)
    }
}

/// Saved copy of the restorable parts of a [`ViewState`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub camera: Camera,
    pub toggles: DisplayToggles,
    pub render_distance: f64,
}

/// A world position mapped onto the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    /// Size multiplier: stars in front of the rotation center draw larger.
    pub depth_scale: f64,
}

/// Camera, display toggles and saved views for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub camera: Camera,
    pub toggles: DisplayToggles,
    pub render_distance: f64,
    pub viewport: Viewport,
    max_render_distance: f64,
    saved: Vec<ViewSnapshot>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISTANCE)
    }
}

impl ViewState {
    /// Create a view whose render distance starts at, and may not exceed, `max_render_distance`.
    pub fn new(max_render_distance: f64) -> Self {
        let max_render_distance = max_render_distance.max(MIN_RENDER_DISTANCE);
        Self {
            camera: Camera::default(),
            toggles: DisplayToggles::default(),
            render_distance: max_render_distance,
            viewport: Viewport::default(),
            max_render_distance,
            saved: Vec::new(),
        }
    }

    /// Apply a relative pan/rotate/zoom and return the updated state.
    ///
    /// Zoom is clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`]; non-positive zoom
    /// factors are ignored. A pan or rotation with any non-finite component
    /// is ignored as a whole, as is a non-finite zoom factor.
    pub fn update(&mut self, delta: ViewDelta) -> &Self {
        let camera = &mut self.camera;
        if delta.pan.iter().all(|value| value.is_finite()) {
            camera.pan[0] += delta.pan[0];
            camera.pan[1] += delta.pan[1];
        }
        let rotation = delta.rotation;
        if [rotation.x, rotation.y, rotation.z]
            .iter()
            .all(|value| value.is_finite())
        {
            camera.rotation.x += rotation.x;
            camera.rotation.y += rotation.y;
            camera.rotation.z += rotation.z;
        }
        if delta.zoom_factor.is_finite() && delta.zoom_factor > 0.0 {
            camera.zoom = (camera.zoom * delta.zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        }
        self
    }

    /// Capture the current view onto the save stack, returning its index.
    ///
    /// The stack holds at most [`MAX_SAVED_VIEWS`] entries; when it is full the
    /// oldest snapshot is dropped and later indices shift down by one.
    pub fn snapshot(&mut self) -> usize {
        if self.saved.len() == MAX_SAVED_VIEWS {
            self.saved.remove(0);
        }
        self.saved.push(self.current());
        let index = self.saved.len() - 1;
        debug!(index, "saved view snapshot");
        index
    }

    /// Apply a previously saved snapshot. The stack itself is left intact.
    pub fn restore(&mut self, index: usize) -> Result<&Self> {
        let snapshot = self
            .saved
            .get(index)
            .cloned()
            .ok_or(Error::InvalidIndex {
                index,
                len: self.saved.len(),
            })?;
        self.camera = snapshot.camera;
        self.toggles = snapshot.toggles;
        self.render_distance = snapshot.render_distance;
        debug!(index, "restored view snapshot");
        Ok(self)
    }

    /// Saved snapshots, oldest first.
    pub fn saved(&self) -> &[ViewSnapshot] {
        &self.saved
    }

    /// Copy of the restorable state.
    pub fn current(&self) -> ViewSnapshot {
        ViewSnapshot {
            camera: self.camera.clone(),
            toggles: self.toggles,
            render_distance: self.render_distance,
        }
    }

    /// Rotate around `star` from now on and drop any pan offset.
    pub fn center_on(&mut self, star: &Star) {
        self.camera.center = star.position;
        self.camera.center_star = Some(star.name.clone());
        self.camera.pan = [0.0, 0.0];
    }

    /// Return the camera to its startup position. Toggles are kept.
    pub fn reset(&mut self) {
        self.camera = Camera::default();
    }

    /// Flip a display flag, returning its new value.
    pub fn toggle(&mut self, toggle: DisplayToggle) -> bool {
        let flag = match toggle {
            DisplayToggle::StarNames => &mut self.toggles.star_names,
            DisplayToggle::CoordinateGrid => &mut self.toggles.coordinate_grid,
            DisplayToggle::Projections => &mut self.toggles.projections,
            DisplayToggle::GalacticPlane => &mut self.toggles.galactic_plane,
            DisplayToggle::SystemInset => &mut self.toggles.system_inset,
        };
        *flag = !*flag;
        *flag
    }

    /// Grow or shrink the render distance within its bounds, returning the new value.
    ///
    /// A non-finite `delta` leaves the render distance unchanged.
    pub fn adjust_render_distance(&mut self, delta: f64) -> f64 {
        if delta.is_finite() {
            self.render_distance = (self.render_distance + delta)
                .clamp(MIN_RENDER_DISTANCE, self.max_render_distance);
        }
        self.render_distance
    }

    pub fn max_render_distance(&self) -> f64 {
        self.max_render_distance
    }

    /// Whether `star` lies inside the render distance.
    pub fn is_visible(&self, star: &Star) -> bool {
        star.distance_ly() <= self.render_distance
    }

    /// Map a world position to viewport coordinates.
    pub fn project(&self, position: StarPosition) -> ScreenPoint {
        let center = self.camera.center;
        let (mut x, mut y, mut z) = (
            position.x - center.x,
            position.y - center.y,
            position.z - center.z,
        );
        let rotation = self.camera.rotation;

        let (sin, cos) = rotation.x.sin_cos();
        (y, z) = (y * cos - z * sin, y * sin + z * cos);

        let (sin, cos) = rotation.y.sin_cos();
        (x, z) = (x * cos + z * sin, -x * sin + z * cos);

        let (sin, cos) = rotation.z.sin_cos();
        (x, y) = (x * cos - y * sin, x * sin + y * cos);

        let zoom = self.camera.zoom;
        let [pan_x, pan_y] = self.camera.pan;
        ScreenPoint {
            x: f64::from(self.viewport.width) * 0.5 + x * zoom + pan_x,
            // Screen Y grows downwards.
            y: f64::from(self.viewport.height) * 0.5 - y * zoom + pan_y,
            depth_scale: 1.0 + z * DEPTH_SCALE_PER_LY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SpectralClass;

    #[test]
    fn zoom_is_clamped() {
        let mut view = ViewState::default();
        view.update(ViewDelta::zoom(1_000.0));
        assert_eq!(view.camera.zoom, MAX_ZOOM);
        view.update(ViewDelta::zoom(1e-6));
        assert_eq!(view.camera.zoom, MIN_ZOOM);
        view.update(ViewDelta::zoom(-2.0));
        assert_eq!(view.camera.zoom, MIN_ZOOM);
    }

    #[test]
    fn render_distance_stays_in_bounds() {
        let mut view = ViewState::new(12.0);
        assert_eq!(view.adjust_render_distance(5.0), 12.0);
        assert_eq!(view.adjust_render_distance(-100.0), MIN_RENDER_DISTANCE);
        assert_eq!(view.adjust_render_distance(1.0), MIN_RENDER_DISTANCE + 1.0);
    }

    #[test]
    fn restore_out_of_range_is_rejected() {
        let mut view = ViewState::default();
        view.snapshot();
        let before = view.clone();
        match view.restore(1) {
            Err(Error::InvalidIndex { index, len }) => {
                assert_eq!((index, len), (1, 1));
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
        assert_eq!(view, before);
    }

    #[test]
    fn center_projects_to_viewport_middle() {
        let mut view = ViewState::default();
        let star = Star::new("Pivot", StarPosition::new(2.0, -1.0, 4.0), 5.0, SpectralClass::G);
        view.center_on(&star);
        view.update(ViewDelta::rotate(0.3, 1.2, -0.7));
        let point = view.project(star.position);
        assert!((point.x - 512.0).abs() < 1e-9);
        assert!((point.y - 384.0).abs() < 1e-9);
        assert!((point.depth_scale - 1.0).abs() < 1e-9);
    }

    #[test]
    fn quarter_turn_about_z_swaps_axes() {
        let mut view = ViewState::default();
        view.update(ViewDelta::rotate(0.0, 0.0, std::f64::consts::FRAC_PI_2));
        let point = view.project(StarPosition::new(1.0, 0.0, 0.0));
        assert!((point.x - 512.0).abs() < 1e-9);
        assert!((point.y - (384.0 - DEFAULT_ZOOM)).abs() < 1e-9);
    }

    #[test]
    fn non_finite_deltas_are_ignored() {
        let mut view = ViewState::new(12.0);
        view.update(ViewDelta::pan(15.0, -5.0));
        view.update(ViewDelta::pan(f64::NAN, 3.0));
        view.update(ViewDelta::rotate(0.2, f64::INFINITY, 0.0));
        view.update(ViewDelta::zoom(f64::NAN));
        assert_eq!(view.camera.pan, [15.0, -5.0]);
        assert_eq!(view.camera.rotation, Rotation::default());
        assert_eq!(view.camera.zoom, DEFAULT_ZOOM);

        assert_eq!(view.adjust_render_distance(f64::NAN), 12.0);
        assert_eq!(view.adjust_render_distance(f64::NEG_INFINITY), 12.0);
        assert_eq!(view.adjust_render_distance(-2.0), 10.0);
    }

    #[test]
    fn save_stack_keeps_the_newest_views() {
        let mut view = ViewState::default();
        for step in 0..=MAX_SAVED_VIEWS {
            view.update(ViewDelta::pan(step as f64, 0.0));
            assert_eq!(view.snapshot(), step.min(MAX_SAVED_VIEWS - 1));
        }
        assert_eq!(view.saved().len(), MAX_SAVED_VIEWS);
        // Pans accumulate 0, 1, 3, 6, 10, 15; the first one was dropped.
        assert_eq!(view.saved()[0].camera.pan, [1.0, 0.0]);
        assert_eq!(view.saved()[MAX_SAVED_VIEWS - 1].camera.pan, [15.0, 0.0]);

        let latest = view.clone();
        view.update(ViewDelta::zoom_in());
        view.restore(MAX_SAVED_VIEWS - 1).unwrap();
        assert_eq!(view, latest);
    }

    #[test]
    fn toggles_flip_and_report() {
        let mut view = ViewState::default();
        assert!(view.toggle(DisplayToggle::StarNames));
        assert!(!view.toggle(DisplayToggle::SystemInset));
        assert!(view.toggles.star_names);
        assert!(!view.toggles.system_inset);
        assert_eq!("grid".parse::<DisplayToggle>(), Ok(DisplayToggle::CoordinateGrid));
    }
}
