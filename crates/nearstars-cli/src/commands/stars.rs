//! Stars command handler for listing the neighbourhood of a star.

use anyhow::Result;

use nearstars_cli::output::{render_stars, StarRow};
use nearstars_cli::terminal::ColorPalette;
use nearstars_lib::{SpatialIndex, SUN};

use super::load_catalog;
use crate::GlobalOptions;

/// List stars by distance from `near` (the Sun by default).
///
/// With a radius the spatial index limits the listing to the neighbourhood;
/// otherwise every loaded star is listed.
pub fn handle_stars(
    global: &GlobalOptions,
    near: Option<&str>,
    radius: Option<f64>,
    limit: Option<usize>,
) -> Result<()> {
    let catalog = load_catalog(global)?;
    let reference = catalog.require(near.unwrap_or(SUN))?;

    let mut rows: Vec<StarRow> = match radius {
        Some(radius) => {
            let index = SpatialIndex::build(&catalog);
            index
                .within_radius(reference.position, radius)
                .into_iter()
                .filter_map(|(name, _)| catalog.get(name))
                .map(|star| StarRow::new(star, reference.position.distance_to(&star.position)))
                .collect()
        }
        None => catalog
            .iter()
            .map(|star| StarRow::new(star, reference.position.distance_to(&star.position)))
            .collect(),
    };
    rows.retain(|row| row.name != reference.name);
    rows.sort_by(|a, b| a.distance.total_cmp(&b.distance).then_with(|| a.name.cmp(&b.name)));
    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    print!(
        "{}",
        render_stars(&reference.name, &rows, global.format, &ColorPalette::detect())?
    );
    Ok(())
}
