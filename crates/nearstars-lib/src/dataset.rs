use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::{Error, Result};

/// Default filename for the star catalog.
pub const CATALOG_FILENAME: &str = "stars.csv";

/// Environment variable overriding the catalog location.
pub const CATALOG_ENV_VAR: &str = "NEARSTARS_CATALOG";

/// Resolve the default catalog location using platform-specific project directories.
pub fn default_catalog_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "nearstars", "nearstars")
        .ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(CATALOG_FILENAME))
}

/// Work out which catalog file to load.
///
/// Resolution order: an explicit `target`, then the `NEARSTARS_CATALOG`
/// environment variable, then the platform data directory. Fails with
/// [`Error::DatasetNotFound`] when the resolved file does not exist.
pub fn resolve_catalog_path(target: Option<&Path>) -> Result<PathBuf> {
    let path = match target {
        Some(path) => path.to_path_buf(),
        None => match env::var_os(CATALOG_ENV_VAR) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => default_catalog_path()?,
        },
    };

    if !path.is_file() {
        return Err(Error::DatasetNotFound { path });
    }
    debug!(path = %path.display(), "resolved star catalog path");
    Ok(path)
}
