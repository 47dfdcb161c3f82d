//! Shared fixtures for integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use nearstars_lib::{load_stars, Session, SpectralClass, Star, StarCatalog, StarPosition};

/// Path to the fixtures directory shared with the CLI tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the fixture star catalog.
pub fn fixture_catalog_path() -> PathBuf {
    fixtures_dir().join("stars.csv")
}

/// Load the fixture catalog with the default 20 ly limit.
#[allow(dead_code)]
pub fn fixture_catalog() -> StarCatalog {
    load_stars(&fixture_catalog_path(), 20.0).expect("fixture catalog loads")
}

/// Sun, Alpha at (4.37, 0, 0) and Barnard at (0, 6, 0).
#[allow(dead_code)]
pub fn triangle_catalog() -> StarCatalog {
    StarCatalog::from_stars([
        Star::new("Sun", StarPosition::ORIGIN, 4.83, SpectralClass::G),
        Star::new("Alpha", StarPosition::new(4.37, 0.0, 0.0), 4.38, SpectralClass::G),
        Star::new("Barnard", StarPosition::new(0.0, 6.0, 0.0), 13.21, SpectralClass::M),
    ])
    .expect("unique names")
}

/// Session over the fixture catalog.
#[allow(dead_code)]
pub fn fixture_session() -> Session {
    Session::new(Arc::new(fixture_catalog()))
}
