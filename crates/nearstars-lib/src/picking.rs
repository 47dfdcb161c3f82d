//! Screen-space picking.

use crate::catalog::{Star, StarCatalog};
use crate::view::ViewState;

/// Hit areas are enlarged by the glow drawn around each star.
const GLOW_FACTOR: f64 = 1.8;
/// Smallest clickable radius in pixels.
const MIN_HIT_RADIUS: f64 = 5.0;

/// Drawn size in pixels for a star of the given absolute magnitude.
///
/// Linear from 15px at magnitude -5 down to 2px at magnitude 15.
pub fn star_size(abs_magnitude: f64) -> f64 {
    15.0 - (abs_magnitude + 5.0) * (13.0 / 20.0)
}

/// Clickable radius around a star, in pixels.
pub fn hit_radius(star: &Star) -> f64 {
    (star_size(star.abs_magnitude) * GLOW_FACTOR).max(MIN_HIT_RADIUS)
}

/// Find the visible star closest to a screen point whose hit area contains it.
pub fn pick_star<'a>(
    view: &ViewState,
    catalog: &'a StarCatalog,
    screen_x: f64,
    screen_y: f64,
) -> Option<&'a Star> {
    catalog
        .iter()
        .filter(|star| view.is_visible(star))
        .filter_map(|star| {
            let point = view.project(star.position);
            let distance = (screen_x - point.x).hypot(screen_y - point.y);
            (distance < hit_radius(star)).then_some((star, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(star, _)| star)
}
