//! Output formatting for CLI results.
//!
//! Every renderer returns a `String` so command handlers decide where it goes
//! and tests can inspect it without capturing stdout.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use nearstars_lib::measure::format_distance;
use nearstars_lib::{Rgb, RouteRenderMode, RouteSummary, SpectralClass, Star};

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text, colored when the terminal allows it.
    #[default]
    Text,
    /// Compact plain text without decoration.
    Basic,
    /// Pretty-printed JSON.
    Json,
}

/// One row of a star listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StarRow {
    pub name: String,
    /// Distance from the listing's reference star.
    pub distance: f64,
    pub spectral_class: SpectralClass,
    pub abs_magnitude: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip)]
    rgb: Rgb,
}

impl StarRow {
    pub fn new(star: &Star, distance: f64) -> Self {
        Self {
            name: star.name.clone(),
            distance,
            spectral_class: star.spectral_class,
            abs_magnitude: star.abs_magnitude,
            color: star.color.to_string(),
            system: star.system.clone(),
            rgb: star.color,
        }
    }
}

/// Render a list of stars measured from `reference`.
pub fn render_stars(
    reference: &str,
    rows: &[StarRow],
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(rows)? + "\n");
    }

    let mut buffer = String::new();
    if format == OutputFormat::Text {
        let _ = writeln!(buffer, "Stars near {reference} ({}):", rows.len());
    }
    for row in rows {
        match format {
            OutputFormat::Text => {
                let _ = writeln!(
                    buffer,
                    "  {}{:<20}{} {:>9} {gray}{} M={:.2}{reset}",
                    palette.star(row.rgb),
                    row.name,
                    palette.reset,
                    format_distance(row.distance),
                    row.spectral_class,
                    row.abs_magnitude,
                    gray = palette.gray,
                    reset = palette.reset,
                );
            }
            _ => {
                let _ = writeln!(buffer, "{}\t{:.2}", row.name, row.distance);
            }
        }
    }
    Ok(buffer)
}

#[derive(Serialize)]
struct DistanceOutput<'a> {
    from: &'a str,
    to: &'a str,
    distance: f64,
}

/// Render the distance between two stars.
pub fn render_distance(
    from: &str,
    to: &str,
    distance: f64,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&DistanceOutput { from, to, distance })? + "\n"
        }
        OutputFormat::Basic => format!("{distance:.2}\n"),
        OutputFormat::Text => format!(
            "{bold}{from}{reset} to {bold}{to}{reset}: {green}{}{reset}\n",
            format_distance(distance),
            bold = palette.white_bold,
            green = palette.green,
            reset = palette.reset,
        ),
    })
}

/// Render a route summary.
pub fn render_route(
    summary: &RouteSummary,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(summary)? + "\n",
        OutputFormat::Basic => summary.render(RouteRenderMode::Basic),
        OutputFormat::Text => render_route_text(summary, palette),
    })
}

fn render_route_text(summary: &RouteSummary, palette: &ColorPalette) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{} from {} to {} ({} hops):",
        summary.kind.label(),
        summary.start,
        summary.goal,
        summary.hops
    );
    let last = summary.steps.len().saturating_sub(1);
    for step in &summary.steps {
        let (tag, label) = if step.index == 0 {
            (palette.tag_start, "STRT")
        } else if step.index == last {
            (palette.tag_goal, "GOAL")
        } else {
            (palette.tag_hop, "HOP ")
        };
        let leg = step
            .distance
            .map(|distance| {
                format!(
                    " {}+{}{}",
                    palette.green,
                    format_distance(distance),
                    palette.reset
                )
            })
            .unwrap_or_default();
        let _ = writeln!(
            buffer,
            " {tag}{label}{reset} {bold}{}{reset}{leg} {gray}({:.2} ly from Sun){reset}",
            step.name,
            step.distance_from_sun,
            reset = palette.reset,
            bold = palette.white_bold,
            gray = palette.gray,
        );
    }
    let _ = writeln!(
        buffer,
        "\nTotal distance: {}",
        format_distance(summary.total_distance)
    );
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use nearstars_lib::{RouteBuilder, RouteOutputKind, StarCatalog, StarPosition};

    fn catalog() -> StarCatalog {
        StarCatalog::from_stars([
            Star::new("Sun", StarPosition::ORIGIN, 4.83, SpectralClass::G),
            Star::new("Alpha", StarPosition::new(4.37, 0.0, 0.0), 4.38, SpectralClass::G),
            Star::new("Barnard", StarPosition::new(0.0, 6.0, 0.0), 13.2, SpectralClass::M),
        ])
        .expect("unique names")
    }

    fn summary(catalog: &StarCatalog) -> RouteSummary {
        let route = RouteBuilder::from_hops(catalog, ["Sun", "Alpha", "Barnard"]).unwrap();
        RouteSummary::from_route(RouteOutputKind::Route, catalog, &route).unwrap()
    }

    #[test]
    fn plain_text_route_tags_each_stop() {
        let catalog = catalog();
        let text = render_route(&summary(&catalog), OutputFormat::Text, &ColorPalette::plain())
            .unwrap();
        assert!(text.starts_with("Route from Sun to Barnard (2 hops):"));
        assert!(text.contains(" STRT Sun (0.00 ly from Sun)"));
        assert!(text.contains(" HOP  Alpha +4.37 ly"));
        assert!(text.contains(" GOAL Barnard"));
        assert!(text.contains("Total distance: 11.79 ly"));
    }

    #[test]
    fn json_route_is_valid() {
        let catalog = catalog();
        let json = render_route(&summary(&catalog), OutputFormat::Json, &ColorPalette::plain())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["start"], "Sun");
    }

    #[test]
    fn basic_distance_is_bare_number() {
        let out = render_distance("Sun", "Alpha", 4.37, OutputFormat::Basic, &ColorPalette::plain())
            .unwrap();
        assert_eq!(out, "4.37\n");
    }
}
