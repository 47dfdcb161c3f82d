//! Star-hopping routes.
//!
//! This module provides:
//! - [`RouteBuilder`] - an ordered hop list edited one hop at a time
//! - [`RouteState`] - the empty / single-point / multi-hop state of a route
//! - [`RouteLeg`] - per-leg and cumulative distances
//! - [`plan_star_hops`] - greedy automatic route between two stars
//!
//! A route never contains the same star twice in a row. Every edit either
//! succeeds completely or leaves the route untouched.

mod planner;

pub use planner::{plan_star_hops, HopPlannerConfig};

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::catalog::StarCatalog;
use crate::error::{Error, Result};
use crate::measure;

/// Coarse state of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteState {
    Empty,
    SinglePoint,
    MultiHop,
}

impl fmt::Display for RouteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteState::Empty => "empty",
            RouteState::SinglePoint => "single-point",
            RouteState::MultiHop => "multi-hop",
        };
        f.write_str(value)
    }
}

/// One leg of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    pub distance: f64,
    /// Distance travelled from the first hop up to and including this leg.
    pub cumulative: f64,
}

/// Ordered sequence of star names with no consecutive duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteBuilder {
    hops: Vec<String>,
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a route by appending each name in turn.
    pub fn from_hops<I, S>(catalog: &StarCatalog, hops: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut route = Self::new();
        for hop in hops {
            route.append_hop(catalog, hop.as_ref())?;
        }
        Ok(route)
    }

    /// Append a hop.
    ///
    /// Fails with [`Error::UnknownStar`] for names missing from the catalog and
    /// with [`Error::DuplicateConsecutiveHop`] when `name` is already the last hop.
    pub fn append_hop(&mut self, catalog: &StarCatalog, name: &str) -> Result<RouteState> {
        catalog.require(name)?;
        if self.last() == Some(name) {
            return Err(Error::DuplicateConsecutiveHop {
                name: name.to_string(),
            });
        }
        self.hops.push(name.to_string());
        debug!(hop = name, hops = self.hops.len(), "appended route hop");
        Ok(self.state())
    }

    /// Remove the hop at `index`, returning its name.
    ///
    /// Fails with [`Error::InvalidIndex`] when out of range and with
    /// [`Error::AmbiguousMerge`] when the hops on either side are the same star.
    pub fn remove_hop(&mut self, index: usize) -> Result<String> {
        if index >= self.hops.len() {
            return Err(Error::InvalidIndex {
                index,
                len: self.hops.len(),
            });
        }
        if index > 0 && index + 1 < self.hops.len() && self.hops[index - 1] == self.hops[index + 1]
        {
            return Err(Error::AmbiguousMerge {
                index,
                name: self.hops[index - 1].clone(),
            });
        }
        let removed = self.hops.remove(index);
        debug!(hop = %removed, index, hops = self.hops.len(), "removed route hop");
        Ok(removed)
    }

    /// Sum of leg distances; zero for routes with fewer than two hops.
    pub fn total_distance(&self, catalog: &StarCatalog) -> Result<f64> {
        self.hops
            .windows(2)
            .map(|pair| measure::distance(catalog, &pair[0], &pair[1]))
            .sum()
    }

    /// Per-leg distances with running totals.
    pub fn legs(&self, catalog: &StarCatalog) -> Result<Vec<RouteLeg>> {
        let mut cumulative = 0.0;
        self.hops
            .windows(2)
            .map(|pair| {
                let distance = measure::distance(catalog, &pair[0], &pair[1])?;
                cumulative += distance;
                Ok(RouteLeg {
                    from: pair[0].clone(),
                    to: pair[1].clone(),
                    distance,
                    cumulative,
                })
            })
            .collect()
    }

    /// Clear every hop.
    pub fn reset(&mut self) {
        self.hops.clear();
    }

    pub fn state(&self) -> RouteState {
        match self.hops.len() {
            0 => RouteState::Empty,
            1 => RouteState::SinglePoint,
            _ => RouteState::MultiHop,
        }
    }

    /// The same hops travelled in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            hops: self.hops.iter().rev().cloned().collect(),
        }
    }

    pub fn hops(&self) -> &[String] {
        &self.hops
    }

    pub fn last(&self) -> Option<&str> {
        self.hops.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Number of legs travelled.
    pub fn hop_count(&self) -> usize {
        self.hops.len().saturating_sub(1)
    }
}
