use std::collections::HashSet;

use tracing::{debug, info};

use crate::catalog::{Star, StarCatalog};
use crate::error::Result;
use crate::spatial::SpatialIndex;

use super::RouteBuilder;

/// Slack added to radius queries so `f32` rounding in the index never drops
/// a candidate that is exactly at the hop limit.
const QUERY_SLACK: f64 = 1e-3;

/// Tuning knobs for [`plan_star_hops`].
#[derive(Debug, Clone, PartialEq)]
pub struct HopPlannerConfig {
    /// Pairs closer than this are joined directly.
    pub direct_hop_distance: f64,
    /// Maximum number of intermediate stars.
    pub max_hops: usize,
    /// Give up on detours once travelled distance exceeds this multiple of the
    /// direct distance (less what still remains).
    pub max_detour_factor: f64,
    /// Longest single hop as a fraction of the direct distance.
    pub max_hop_fraction: f64,
    /// Shortest hop worth taking; closer companions are skipped.
    pub min_hop_distance: f64,
    /// Jump straight to the goal once the remaining distance falls below this
    /// fraction of the longest hop.
    pub arrival_fraction: f64,
    /// A final hop shorter than this is omitted when the hop budget runs out.
    pub min_final_hop: f64,
    /// Ignore intermediate stars farther than this from the origin.
    pub max_distance: Option<f64>,
}

impl Default for HopPlannerConfig {
    fn default() -> Self {
        Self {
            direct_hop_distance: 2.0,
            max_hops: 10,
            max_detour_factor: 2.0,
            max_hop_fraction: 0.7,
            min_hop_distance: 0.5,
            arrival_fraction: 0.6,
            min_final_hop: 0.05,
            max_distance: None,
        }
    }
}

/// Plan a star-hopping route from `start` to `goal`.
///
/// Each step takes the best-scoring neighbour of the current star. Neighbours
/// that bring the route closer to the goal always beat ones that do not;
/// among those, short hops with large progress win. The returned route starts
/// at `start` and ends at `goal`, except when the hop budget runs out within
/// [`HopPlannerConfig::min_final_hop`] of the goal.
pub fn plan_star_hops(
    catalog: &StarCatalog,
    index: &SpatialIndex,
    start: &str,
    goal: &str,
    config: &HopPlannerConfig,
) -> Result<RouteBuilder> {
    let start_star = catalog.require(start)?;
    let goal_star = catalog.require(goal)?;

    let mut route = RouteBuilder::new();
    route.append_hop(catalog, start)?;
    if start == goal {
        return Ok(route);
    }

    let direct = start_star.position.distance_to(&goal_star.position);
    if direct < config.direct_hop_distance {
        route.append_hop(catalog, goal)?;
        debug!(start, goal, direct, "stars close enough for a direct hop");
        return Ok(route);
    }

    let max_hop = direct * config.max_hop_fraction;
    let mut visited: HashSet<&str> = HashSet::from([start]);
    let mut current = start_star;
    let mut travelled = 0.0;

    for _ in 0..config.max_hops {
        let remaining = current.position.distance_to(&goal_star.position);
        if remaining < max_hop * config.arrival_fraction
            || travelled > direct * config.max_detour_factor - remaining
        {
            route.append_hop(catalog, goal)?;
            return Ok(finish(route, start, goal, travelled + remaining));
        }

        let Some((next, hop)) =
            best_hop(catalog, index, current, goal_star, &visited, max_hop, config)
        else {
            route.append_hop(catalog, goal)?;
            return Ok(finish(route, start, goal, travelled + remaining));
        };

        route.append_hop(catalog, &next.name)?;
        visited.insert(next.name.as_str());
        travelled += hop;
        current = next;
    }

    let remaining = current.position.distance_to(&goal_star.position);
    if remaining >= config.min_final_hop {
        route.append_hop(catalog, goal)?;
        travelled += remaining;
    }
    Ok(finish(route, start, goal, travelled))
}

fn best_hop<'a>(
    catalog: &'a StarCatalog,
    index: &SpatialIndex,
    current: &Star,
    goal: &Star,
    visited: &HashSet<&str>,
    max_hop: f64,
    config: &HopPlannerConfig,
) -> Option<(&'a Star, f64)> {
    let remaining = current.position.distance_to(&goal.position);
    let mut best: Option<(&Star, f64)> = None;
    let mut best_score = f64::INFINITY;
    let mut found_closer = false;

    for (name, _) in index.within_radius(current.position, max_hop + QUERY_SLACK) {
        if name == goal.name || visited.contains(name) {
            continue;
        }
        let Some(candidate) = catalog.get(name) else {
            continue;
        };
        if config
            .max_distance
            .is_some_and(|limit| candidate.distance_ly() > limit)
        {
            continue;
        }

        let hop = current.position.distance_to(&candidate.position);
        if hop < config.min_hop_distance || hop > max_hop {
            continue;
        }

        let to_goal = candidate.position.distance_to(&goal.position);
        let gets_closer = to_goal < remaining;
        if found_closer && !gets_closer {
            continue;
        }
        if gets_closer && !found_closer {
            found_closer = true;
            best = None;
            best_score = f64::INFINITY;
        }

        let score = if gets_closer {
            hop / 2.0 - (remaining - to_goal) / 3.0
        } else {
            hop + (to_goal - remaining) * 2.0
        };
        if score < best_score {
            best_score = score;
            best = Some((candidate, hop));
        }
    }

    best
}

fn finish(route: RouteBuilder, start: &str, goal: &str, travelled: f64) -> RouteBuilder {
    info!(
        start,
        goal,
        hops = route.hop_count(),
        travelled,
        "planned star-hop route"
    );
    route
}
