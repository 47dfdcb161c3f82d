// Subcommand handlers. main.rs parses arguments and dispatches here.

pub mod config;
pub mod distance;
pub mod route;
pub mod session;
pub mod stars;

use anyhow::{Context, Result};

use nearstars_lib::{load_stars, resolve_catalog_path, StarCatalog};

use crate::GlobalOptions;

/// Resolve and load the star catalog named by the global options.
pub fn load_catalog(global: &GlobalOptions) -> Result<StarCatalog> {
    let path = resolve_catalog_path(global.catalog.as_deref())
        .context("failed to locate the star catalog")?;
    load_stars(&path, global.max_distance)
        .with_context(|| format!("failed to load star catalog from {}", path.display()))
}
