use std::fmt::Write;

use serde::Serialize;

use crate::catalog::StarCatalog;
use crate::error::{Error, Result};
use crate::measure::format_distance;
use crate::route::RouteBuilder;

/// Classifies the command that produced a route summary.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RouteOutputKind {
    /// Route entered hop by hop.
    Route,
    /// Route produced by the star-hop planner.
    Hop,
}

impl RouteOutputKind {
    /// Human-readable label shown in textual renderings.
    pub fn label(self) -> &'static str {
        match self {
            RouteOutputKind::Route => "Route",
            RouteOutputKind::Hop => "Star hop",
        }
    }
}

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    /// Compact listing with `+`/`|`/`-` step markers.
    Basic,
}

/// Step taken during traversal of a route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub name: String,
    /// Distance of the leg ending at this step; absent for the first step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub cumulative: f64,
    /// Distance of this star from the Sun.
    pub distance_from_sun: f64,
}

/// Structured representation of a route that consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub kind: RouteOutputKind,
    pub hops: usize,
    pub start: String,
    pub goal: String,
    pub total_distance: f64,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Resolve distances for every step of `route`.
    pub fn from_route(
        kind: RouteOutputKind,
        catalog: &StarCatalog,
        route: &RouteBuilder,
    ) -> Result<Self> {
        let (Some(start), Some(goal)) = (route.hops().first(), route.hops().last()) else {
            return Err(Error::EmptyRoute);
        };

        let mut steps = Vec::with_capacity(route.len());
        let first = catalog.require(start)?;
        steps.push(RouteStep {
            index: 0,
            name: start.clone(),
            distance: None,
            cumulative: 0.0,
            distance_from_sun: first.distance_ly(),
        });
        for (offset, leg) in route.legs(catalog)?.into_iter().enumerate() {
            let star = catalog.require(&leg.to)?;
            steps.push(RouteStep {
                index: offset + 1,
                name: leg.to,
                distance: Some(leg.distance),
                cumulative: leg.cumulative,
                distance_from_sun: star.distance_ly(),
            });
        }

        let total_distance = steps.last().map_or(0.0, |step| step.cumulative);
        Ok(Self {
            kind,
            hops: route.hop_count(),
            start: start.clone(),
            goal: goal.clone(),
            total_distance,
            steps,
        })
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::Basic => self.render_basic(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "{}: {} -> {} ({} hops, {})",
            self.kind.label(),
            self.start,
            self.goal,
            self.hops,
            format_distance(self.total_distance)
        );
        for step in &self.steps {
            match step.distance {
                Some(distance) => {
                    let _ = writeln!(
                        buffer,
                        "{:>3}: {} (+{}, {} total)",
                        step.index,
                        step.name,
                        format_distance(distance),
                        format_distance(step.cumulative)
                    );
                }
                None => {
                    let _ = writeln!(buffer, "{:>3}: {} (start)", step.index, step.name);
                }
            }
        }
        buffer
    }

    fn render_basic(&self) -> String {
        let mut buffer = String::new();
        let last = self.steps.len().saturating_sub(1);
        for step in &self.steps {
            let marker = if step.index == 0 {
                '+'
            } else if step.index == last {
                '-'
            } else {
                '|'
            };
            let _ = writeln!(buffer, "{marker} {}", step.name);
        }
        let _ = writeln!(
            buffer,
            "via {} hops, {}",
            self.hops,
            format_distance(self.total_distance)
        );
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SpectralClass, Star, StarPosition};

    fn catalog() -> StarCatalog {
        StarCatalog::from_stars([
            Star::new("Sun", StarPosition::ORIGIN, 4.83, SpectralClass::G),
            Star::new("Alpha", StarPosition::new(4.37, 0.0, 0.0), 4.38, SpectralClass::G),
            Star::new("Barnard", StarPosition::new(0.0, 6.0, 0.0), 13.2, SpectralClass::M),
        ])
        .expect("unique names")
    }

    #[test]
    fn empty_route_has_no_summary() {
        let result =
            RouteSummary::from_route(RouteOutputKind::Route, &catalog(), &RouteBuilder::new());
        assert!(matches!(result, Err(Error::EmptyRoute)));
    }

    #[test]
    fn renders_plain_and_basic() {
        let catalog = catalog();
        let route = RouteBuilder::from_hops(&catalog, ["Sun", "Alpha", "Barnard"]).unwrap();
        let summary = RouteSummary::from_route(RouteOutputKind::Route, &catalog, &route).unwrap();
        assert_eq!(summary.hops, 2);
        assert_eq!(summary.steps[1].distance, Some(4.37));

        let plain = summary.render(RouteRenderMode::PlainText);
        assert!(plain.starts_with("Route: Sun -> Barnard (2 hops, 11.79 ly)"));
        assert!(plain.contains("  1: Alpha (+4.37 ly, 4.37 ly total)"));

        let basic = summary.render(RouteRenderMode::Basic);
        let lines: Vec<&str> = basic.lines().collect();
        assert_eq!(lines[..3], ["+ Sun", "| Alpha", "- Barnard"]);
    }

    #[test]
    fn single_point_route_has_zero_total() {
        let catalog = catalog();
        let route = RouteBuilder::from_hops(&catalog, ["Alpha"]).unwrap();
        let summary = RouteSummary::from_route(RouteOutputKind::Hop, &catalog, &route).unwrap();
        assert_eq!(summary.total_distance, 0.0);
        assert_eq!(summary.steps.len(), 1);
    }
}
