//! Distance command handler.

use anyhow::Result;

use nearstars_cli::output::render_distance;
use nearstars_cli::terminal::ColorPalette;
use nearstars_lib::distance;

use super::load_catalog;
use crate::GlobalOptions;

/// Print the distance between two stars.
pub fn handle_distance(global: &GlobalOptions, from: &str, to: &str) -> Result<()> {
    let catalog = load_catalog(global)?;
    let ly = distance(&catalog, from, to)?;
    print!(
        "{}",
        render_distance(from, to, ly, global.format, &ColorPalette::detect())?
    );
    Ok(())
}
