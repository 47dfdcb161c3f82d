//! Distances between stars and pinned measurement lines.

use serde::Serialize;

use crate::catalog::StarCatalog;
use crate::error::{Error, Result};
use crate::selection::SelectionManager;

/// Euclidean distance in light-years between two catalog stars.
///
/// Fails with [`Error::UnknownStar`] if either name is missing from the catalog.
pub fn distance(catalog: &StarCatalog, a: &str, b: &str) -> Result<f64> {
    let from = catalog.require(a)?;
    let to = catalog.require(b)?;
    Ok(from.position.distance_to(&to.position))
}

/// Human-readable distance label.
pub fn format_distance(distance: f64) -> String {
    if distance < 0.01 {
        "<0.01 ly".to_string()
    } else {
        format!("{distance:.2} ly")
    }
}

/// A distance between two named stars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub from: String,
    pub to: String,
    pub distance: f64,
}

impl Measurement {
    /// Measure between two catalog stars.
    pub fn between(catalog: &StarCatalog, from: &str, to: &str) -> Result<Self> {
        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            distance: distance(catalog, from, to)?,
        })
    }

    fn joins(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// Distances for every unordered pair of selected stars, ordered by name.
pub fn pairwise(catalog: &StarCatalog, selection: &SelectionManager) -> Result<Vec<Measurement>> {
    let names = selection.sorted();
    let mut measurements = Vec::with_capacity(names.len() * names.len().saturating_sub(1) / 2);
    for (i, from) in names.iter().enumerate() {
        for to in &names[i + 1..] {
            measurements.push(Measurement::between(catalog, from, to)?);
        }
    }
    Ok(measurements)
}

/// Outcome of [`Measurements::toggle`].
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementToggle {
    Pinned(Measurement),
    Unpinned(Measurement),
}

/// Measurement lines pinned by the user, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    lines: Vec<Measurement>,
}

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the line between `from` and `to`, or unpin it if it is already shown.
    ///
    /// A line is the same regardless of direction. Both names are looked up
    /// before anything else, so an unknown star is reported even when `from`
    /// and `to` are equal.
    pub fn toggle(
        &mut self,
        catalog: &StarCatalog,
        from: &str,
        to: &str,
    ) -> Result<MeasurementToggle> {
        let measurement = Measurement::between(catalog, from, to)?;
        if from == to {
            return Err(Error::SelfMeasurement {
                name: from.to_string(),
            });
        }
        if let Some(position) = self.lines.iter().position(|line| line.joins(from, to)) {
            return Ok(MeasurementToggle::Unpinned(self.lines.remove(position)));
        }
        self.lines.push(measurement.clone());
        Ok(MeasurementToggle::Pinned(measurement))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[Measurement] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
