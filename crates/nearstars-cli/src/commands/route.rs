//! Route and hop command handlers.

use anyhow::{Context, Result};

use nearstars_cli::output::render_route;
use nearstars_cli::terminal::ColorPalette;
use nearstars_lib::{
    plan_star_hops, HopPlannerConfig, RouteBuilder, RouteOutputKind, RouteSummary, SpatialIndex,
};

use super::load_catalog;
use crate::GlobalOptions;

/// Sum up a route through `stars` in the given order.
pub fn handle_route(global: &GlobalOptions, stars: &[String]) -> Result<()> {
    let catalog = load_catalog(global)?;
    let route = RouteBuilder::from_hops(&catalog, stars).context("invalid route")?;
    let summary = RouteSummary::from_route(RouteOutputKind::Route, &catalog, &route)?;
    print!(
        "{}",
        render_route(&summary, global.format, &ColorPalette::detect())?
    );
    Ok(())
}

/// Plan and print a star-hopping route.
pub fn handle_hop(
    global: &GlobalOptions,
    from: &str,
    to: &str,
    max_hops: Option<usize>,
) -> Result<()> {
    let catalog = load_catalog(global)?;
    let index = SpatialIndex::build(&catalog);
    let mut config = HopPlannerConfig {
        max_distance: Some(global.max_distance),
        ..HopPlannerConfig::default()
    };
    if let Some(max_hops) = max_hops {
        config.max_hops = max_hops;
    }

    let route = plan_star_hops(&catalog, &index, from, to, &config)?;
    let summary = RouteSummary::from_route(RouteOutputKind::Hop, &catalog, &route)?;
    print!(
        "{}",
        render_route(&summary, global.format, &ColorPalette::detect())?
    );
    Ok(())
}
