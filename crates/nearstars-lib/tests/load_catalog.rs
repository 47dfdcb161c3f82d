mod common;

use std::io::Write;

use common::{fixture_catalog, fixture_catalog_path};
use nearstars_lib::catalog::DEFAULT_ABS_MAGNITUDE;
use nearstars_lib::{load_stars, Error, SpectralClass, StarPosition, SUN};

#[test]
fn loads_fixture_within_default_radius() {
    let catalog = fixture_catalog();
    assert_eq!(catalog.len(), 14);
    assert!(catalog.contains("Sirius A"));
    assert!(!catalog.contains("Vega"), "Vega lies beyond 20 ly");
    assert_eq!(catalog.source_path(), Some(fixture_catalog_path().as_path()));
}

#[test]
fn larger_radius_includes_distant_stars() {
    let catalog = load_stars(&fixture_catalog_path(), 30.0).expect("fixture loads");
    assert_eq!(catalog.len(), 15);
    let vega = catalog.get("Vega").expect("Vega present");
    assert!((vega.distance_ly() - 25.04).abs() < 0.01);
}

#[test]
fn sun_sits_at_origin() {
    let catalog = fixture_catalog();
    let sun = catalog.get(SUN).expect("Sun present");
    assert_eq!(sun.position, StarPosition::ORIGIN);
    assert_eq!(sun.spectral_class, SpectralClass::G);
}

#[test]
fn missing_magnitude_uses_default() {
    let catalog = fixture_catalog();
    let luyten = catalog.get("Luyten 726-8 A").expect("present");
    assert_eq!(luyten.abs_magnitude, DEFAULT_ABS_MAGNITUDE);
}

#[test]
fn white_dwarfs_and_systems_are_recognised() {
    let catalog = fixture_catalog();
    let sirius_b = catalog.get("Sirius B").expect("present");
    assert_eq!(sirius_b.spectral_class, SpectralClass::WhiteDwarf);
    assert_eq!(sirius_b.color, SpectralClass::WhiteDwarf.default_color());

    let companions: Vec<&str> = catalog
        .companions("Alpha Centauri A")
        .into_iter()
        .map(|star| star.name.as_str())
        .collect();
    assert_eq!(companions, vec!["Alpha Centauri B", "Proxima Centauri"]);
}

#[test]
fn missing_file_reports_dataset_not_found() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.csv");
    let err = load_stars(&path, 20.0).expect_err("missing file");
    assert!(matches!(err, Error::DatasetNotFound { .. }));
}

#[test]
fn duplicate_names_are_rejected() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "name,x,y,z\nSun,0,0,0\nWolf 359,1,1,1\nWolf 359,2,2,2").expect("write");
    let err = load_stars(file.path(), 20.0).expect_err("duplicate");
    match err {
        Error::DuplicateStarName { name } => assert_eq!(name, "Wolf 359"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_coordinates_name_the_row() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "name,x,y,z\nSun,0,0,0\nBroken,1,abc,1").expect("write");
    let err = load_stars(file.path(), 20.0).expect_err("invalid");
    let message = err.to_string();
    assert!(message.contains("invalid y"), "{message}");
    assert!(message.contains("row 3"), "{message}");
}

#[test]
fn missing_position_columns_are_reported() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "name,abs_mag\nSun,4.83").expect("write");
    let err = load_stars(file.path(), 20.0).expect_err("no positions");
    assert!(matches!(err, Error::CatalogValidation { .. }));
}

#[test]
fn unknown_names_suggest_close_matches() {
    let catalog = fixture_catalog();
    match catalog.require("Sirius") {
        Err(Error::UnknownStar { suggestions, .. }) => {
            assert!(suggestions.contains(&"Sirius A".to_string()));
            assert!(suggestions.len() <= 3);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
