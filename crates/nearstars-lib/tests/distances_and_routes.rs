mod common;

use common::{fixture_catalog, triangle_catalog};
use nearstars_lib::{
    distance, plan_star_hops, Error, HopPlannerConfig, RouteBuilder, RouteOutputKind,
    RouteRenderMode, RouteState, RouteSummary, SpatialIndex,
};

const EPSILON: f64 = 1e-9;

#[test]
fn distance_is_symmetric_and_zero_on_self() {
    let catalog = fixture_catalog();
    let names: Vec<&str> = catalog.iter().map(|star| star.name.as_str()).collect();
    for a in &names {
        assert_eq!(distance(&catalog, a, a).unwrap(), 0.0);
        for b in &names {
            let ab = distance(&catalog, a, b).unwrap();
            let ba = distance(&catalog, b, a).unwrap();
            assert!((ab - ba).abs() < EPSILON, "{a} <-> {b}");
        }
    }
}

#[test]
fn triangle_scenario_distances() {
    let catalog = triangle_catalog();
    assert!((distance(&catalog, "Sun", "Alpha").unwrap() - 4.37).abs() < EPSILON);

    let route = RouteBuilder::from_hops(&catalog, ["Sun", "Alpha", "Barnard"]).unwrap();
    let expected = 4.37 + (4.37_f64.powi(2) + 36.0).sqrt();
    let total = route.total_distance(&catalog).unwrap();
    assert!((total - expected).abs() < EPSILON);
    assert!((total - 11.793).abs() < 1e-3);
}

#[test]
fn reversed_route_has_same_total() {
    let catalog = fixture_catalog();
    let route = RouteBuilder::from_hops(
        &catalog,
        ["Sun", "Sirius A", "Procyon A", "Wolf 359", "Barnard's Star"],
    )
    .unwrap();
    let forward = route.total_distance(&catalog).unwrap();
    let backward = route.reversed().total_distance(&catalog).unwrap();
    assert!((forward - backward).abs() < EPSILON);
    assert_eq!(route.reversed().hops().first().map(String::as_str), Some("Barnard's Star"));
}

#[test]
fn short_routes_total_zero() {
    let catalog = triangle_catalog();
    assert_eq!(RouteBuilder::new().total_distance(&catalog).unwrap(), 0.0);
    let single = RouteBuilder::from_hops(&catalog, ["Alpha"]).unwrap();
    assert_eq!(single.total_distance(&catalog).unwrap(), 0.0);
}

#[test]
fn duplicate_consecutive_hop_leaves_route_unchanged() {
    let catalog = triangle_catalog();
    let mut route = RouteBuilder::new();
    route.append_hop(&catalog, "Alpha").unwrap();
    let err = route.append_hop(&catalog, "Alpha").expect_err("duplicate");
    assert!(matches!(err, Error::DuplicateConsecutiveHop { .. }));
    assert_eq!(route.hops(), ["Alpha"]);
    assert_eq!(route.state(), RouteState::SinglePoint);
}

#[test]
fn removal_creating_adjacent_duplicates_is_ambiguous() {
    let catalog = triangle_catalog();
    let mut route = RouteBuilder::from_hops(&catalog, ["Sun", "Alpha", "Sun", "Barnard"]).unwrap();
    let before = route.clone();
    match route.remove_hop(1) {
        Err(Error::AmbiguousMerge { index, name }) => {
            assert_eq!(index, 1);
            assert_eq!(name, "Sun");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(route, before);

    assert_eq!(route.remove_hop(3).unwrap(), "Barnard");
    assert_eq!(route.hops(), ["Sun", "Alpha", "Sun"]);
}

#[test]
fn planned_route_connects_endpoints_without_repeats() {
    let catalog = fixture_catalog();
    let index = SpatialIndex::build(&catalog);
    let config = HopPlannerConfig::default();
    let route = plan_star_hops(&catalog, &index, "Sun", "Procyon A", &config).expect("plans");

    let hops = route.hops();
    assert_eq!(hops.first().map(String::as_str), Some("Sun"));
    assert_eq!(hops.last().map(String::as_str), Some("Procyon A"));
    assert!(hops.windows(2).all(|pair| pair[0] != pair[1]));
    assert!(route.hop_count() <= config.max_hops + 1);

    let direct = distance(&catalog, "Sun", "Procyon A").unwrap();
    let max_hop = direct * config.max_hop_fraction;
    for pair in hops[..hops.len() - 1].windows(2) {
        let hop = distance(&catalog, &pair[0], &pair[1]).unwrap();
        assert!(hop <= max_hop + 1e-9, "{} -> {} is {hop}", pair[0], pair[1]);
    }
}

#[test]
fn companions_are_joined_directly() {
    let catalog = fixture_catalog();
    let index = SpatialIndex::build(&catalog);
    let route = plan_star_hops(
        &catalog,
        &index,
        "Alpha Centauri A",
        "Proxima Centauri",
        &HopPlannerConfig::default(),
    )
    .unwrap();
    assert_eq!(route.hops(), ["Alpha Centauri A", "Proxima Centauri"]);
}

#[test]
fn summary_json_lists_every_step() {
    let catalog = triangle_catalog();
    let route = RouteBuilder::from_hops(&catalog, ["Sun", "Alpha", "Barnard"]).unwrap();
    let summary = RouteSummary::from_route(RouteOutputKind::Route, &catalog, &route).unwrap();
    let json = serde_json::to_value(&summary).expect("serialises");
    assert_eq!(json["kind"], "route");
    assert_eq!(json["hops"], 2);
    assert_eq!(json["steps"].as_array().map(Vec::len), Some(3));
    assert!(json["steps"][0].get("distance").is_none());
    assert!(summary.render(RouteRenderMode::PlainText).contains("Barnard"));
}
