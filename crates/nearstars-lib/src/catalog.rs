//! Star catalog loading and lookup.
//!
//! The catalog is read once from a CSV file and is immutable afterwards.
//! Column headers are matched through a table of synonyms so both the tidy
//! `name,x,y,z,...` layout and the spreadsheet-style export
//! (`Common Name, Distance (ly), Galactic Coordinates (l°), ...`) load.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Name of the star pinned to the origin of the coordinate system.
pub const SUN: &str = "Sun";

/// Default catalog radius in light-years.
pub const DEFAULT_MAX_DISTANCE: f64 = 20.0;

/// Absolute magnitude assumed when the dataset omits one.
pub const DEFAULT_ABS_MAGNITUDE: f64 = 10.0;

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Cartesian coordinates of a star, in light-years from the Sun.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StarPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl StarPosition {
    pub const ORIGIN: StarPosition = StarPosition {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert galactic longitude/latitude (degrees) and a distance into Cartesian coordinates.
    pub fn from_galactic(distance: f64, l_deg: f64, b_deg: f64) -> Self {
        let l = l_deg.to_radians();
        let b = b_deg.to_radians();
        Self {
            x: distance * b.cos() * l.cos(),
            y: distance * b.cos() * l.sin(),
            z: distance * b.sin(),
        }
    }

    /// Calculate the Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance from the Sun.
    pub fn distance_from_origin(&self) -> f64 {
        self.distance_to(&Self::ORIGIN)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Display color of a star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional) or one of the dataset's color words.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let named = match trimmed.to_ascii_lowercase().as_str() {
            "red" => Some("#ff5555"),
            "darkred" => Some("#aa0000"),
            "orange" => Some("#ff9955"),
            "yellow" => Some("#ffff55"),
            "lyellow" => Some("#ffffaa"),
            "white" => Some("#ffffff"),
            "grey" | "gray" => Some("#aaaaaa"),
            _ => None,
        };
        let hex = named.unwrap_or(trimmed).trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Coarse stellar classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpectralClass {
    O,
    B,
    A,
    F,
    G,
    K,
    M,
    L,
    T,
    Y,
    WhiteDwarf,
    #[default]
    Unknown,
}

impl SpectralClass {
    /// Fallback display color used when the dataset carries no color of its own.
    pub fn default_color(self) -> Rgb {
        match self {
            SpectralClass::O | SpectralClass::B => Rgb::new(170, 190, 255),
            SpectralClass::A => Rgb::new(200, 200, 255),
            SpectralClass::F => Rgb::new(255, 255, 200),
            SpectralClass::G => Rgb::new(255, 255, 100),
            SpectralClass::K => Rgb::new(255, 180, 100),
            SpectralClass::M => Rgb::new(255, 100, 100),
            SpectralClass::L | SpectralClass::T | SpectralClass::Y => Rgb::new(200, 20, 5),
            SpectralClass::WhiteDwarf => Rgb::new(180, 200, 255),
            SpectralClass::Unknown => Rgb::new(255, 255, 200),
        }
    }
}

impl FromStr for SpectralClass {
    type Err = std::convert::Infallible;

    /// Classify a spectral type string such as `G2V`, `M5.5Ve`, `DA2` or `sdM1`.
    ///
    /// Never fails: anything unrecognised maps to [`SpectralClass::Unknown`].
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let upper = value.trim().to_ascii_uppercase();
        if upper.contains("WD") {
            return Ok(SpectralClass::WhiteDwarf);
        }
        let body = upper.strip_prefix("SD").unwrap_or(&upper);
        let class = match body.chars().next() {
            Some('D') => SpectralClass::WhiteDwarf,
            Some('O') => SpectralClass::O,
            Some('B') => SpectralClass::B,
            Some('A') => SpectralClass::A,
            Some('F') => SpectralClass::F,
            Some('G') => SpectralClass::G,
            Some('K') => SpectralClass::K,
            Some('M') => SpectralClass::M,
            Some('L') => SpectralClass::L,
            Some('T') => SpectralClass::T,
            Some('Y') => SpectralClass::Y,
            _ => SpectralClass::Unknown,
        };
        Ok(class)
    }
}

impl fmt::Display for SpectralClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SpectralClass::O => "O",
            SpectralClass::B => "B",
            SpectralClass::A => "A",
            SpectralClass::F => "F",
            SpectralClass::G => "G",
            SpectralClass::K => "K",
            SpectralClass::M => "M",
            SpectralClass::L => "L",
            SpectralClass::T => "T",
            SpectralClass::Y => "Y",
            SpectralClass::WhiteDwarf => "D",
            SpectralClass::Unknown => "?",
        };
        f.write_str(value)
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Star {
    pub name: String,
    pub position: StarPosition,
    pub abs_magnitude: f64,
    pub color: Rgb,
    pub spectral_class: SpectralClass,
    /// Name of the multiple-star system this star belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl Star {
    /// Build a star whose color is derived from its spectral class.
    pub fn new(
        name: impl Into<String>,
        position: StarPosition,
        abs_magnitude: f64,
        spectral_class: SpectralClass,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            abs_magnitude,
            color: spectral_class.default_color(),
            spectral_class,
            system: None,
        }
    }

    /// Distance from the Sun in light-years.
    pub fn distance_ly(&self) -> f64 {
        self.position.distance_from_origin()
    }
}

/// Options applied while loading a catalog.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Stars farther than this from the Sun are left out.
    pub max_distance: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

/// Immutable collection of stars with name lookup.
#[derive(Debug, Clone, Default)]
pub struct StarCatalog {
    stars: Vec<Star>,
    by_name: HashMap<String, usize>,
    source: Option<PathBuf>,
}

impl StarCatalog {
    /// Build a catalog from already-validated records, rejecting duplicate names.
    pub fn from_stars(stars: impl IntoIterator<Item = Star>) -> Result<Self> {
        let mut catalog = Self::default();
        for star in stars {
            catalog.insert(star)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a CSV file.
    pub fn from_path(path: &Path, options: &LoadOptions) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file, options)?;
        catalog.source = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            stars = catalog.len(),
            max_distance = options.max_distance,
            "loaded star catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog from any reader producing CSV.
    pub fn from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);
        let headers = csv_reader
            .headers()
            .map_err(|err| Error::CatalogValidation {
                message: format!("failed to read catalog headers: {err}"),
            })?
            .clone();
        let columns = ColumnMap::resolve(&headers)?;

        let mut catalog = Self::default();
        let mut filtered = 0usize;
        for (offset, result) in csv_reader.records().enumerate() {
            // Header occupies line 1.
            let row = offset + 2;
            let record = result?;
            let star = columns.parse_record(&record, row)?;
            if star.distance_ly() > options.max_distance {
                filtered += 1;
                continue;
            }
            catalog.insert(star)?;
        }

        debug!(
            stars = catalog.len(),
            filtered,
            max_distance = options.max_distance,
            "parsed star catalog"
        );
        Ok(catalog)
    }

    fn insert(&mut self, star: Star) -> Result<()> {
        if self.by_name.contains_key(&star.name) {
            return Err(Error::DuplicateStarName { name: star.name });
        }
        self.by_name.insert(star.name.clone(), self.stars.len());
        self.stars.push(star);
        Ok(())
    }

    /// Lookup a star by its case-sensitive name.
    pub fn get(&self, name: &str) -> Option<&Star> {
        self.by_name.get(name).map(|&index| &self.stars[index])
    }

    /// Lookup a star, failing with [`Error::UnknownStar`] and suggestions when absent.
    pub fn require(&self, name: &str) -> Result<&Star> {
        self.get(name).ok_or_else(|| Error::UnknownStar {
            name: name.to_string(),
            suggestions: self.fuzzy_star_matches(name, 3),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Iterate over stars in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Star> {
        self.stars.iter()
    }

    /// Stars within `max_distance` light-years of the Sun.
    pub fn within_distance(&self, max_distance: f64) -> impl Iterator<Item = &Star> {
        self.stars
            .iter()
            .filter(move |star| star.distance_ly() <= max_distance)
    }

    /// Other members of the multiple-star system `name` belongs to.
    pub fn companions(&self, name: &str) -> Vec<&Star> {
        let Some(system) = self.get(name).and_then(|star| star.system.as_deref()) else {
            return Vec::new();
        };
        self.stars
            .iter()
            .filter(|star| star.name != name && star.system.as_deref() == Some(system))
            .collect()
    }

    /// Names similar to `name`, best match first, at most `limit` entries.
    pub fn fuzzy_star_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .stars
            .iter()
            .map(|star| {
                let score = strsim::jaro_winkler(&needle, &star.name.to_lowercase());
                (score, star.name.as_str())
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Get the source path if the catalog was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Load every star within `max_distance` light-years from a CSV file.
pub fn load_stars(path: &Path, max_distance: f64) -> Result<StarCatalog> {
    StarCatalog::from_path(path, &LoadOptions { max_distance })
}

/// Where the position of a record comes from.
#[derive(Debug, Clone, Copy)]
enum PositionSource {
    Cartesian { x: usize, y: usize, z: usize },
    Galactic { distance: usize, l: usize, b: usize },
}

/// Resolved column indices for a catalog file.
#[derive(Debug, Clone)]
struct ColumnMap {
    name: usize,
    position: PositionSource,
    abs_magnitude: Option<usize>,
    spectral_class: Option<usize>,
    color: Option<usize>,
    system: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

        let synonyms: &[(&str, &[&str])] = &[
            ("name", &["name", "common_name", "star", "star_name"]),
            ("x", &["x", "x_ly"]),
            ("y", &["y", "y_ly"]),
            ("z", &["z", "z_ly"]),
            ("distance", &["distance_ly", "distance", "dist_ly"]),
            (
                "galactic_l",
                &["galactic_l", "gal_l", "galactic_coordinates_l", "l"],
            ),
            (
                "galactic_b",
                &["galactic_b", "gal_b", "galactic_coordinates_b", "b"],
            ),
            (
                "abs_magnitude",
                &["abs_magnitude", "abs_mag", "absmag", "absolute_magnitude"],
            ),
            (
                "spectral_class",
                &["spectral_class", "class", "spectral_type", "spectrum"],
            ),
            ("color", &["color", "colour", "color_hex"]),
            ("system", &["system", "system_name"]),
        ];

        let mut index_map: BTreeMap<&str, usize> = BTreeMap::new();
        for (canon, alts) in synonyms {
            if let Some(index) = alts
                .iter()
                .find_map(|alt| normalized.iter().position(|h| h == alt))
            {
                index_map.insert(*canon, index);
            }
        }

        let available = || headers.iter().collect::<Vec<_>>().join(", ");

        let name = *index_map
            .get("name")
            .ok_or_else(|| Error::CatalogValidation {
                message: format!("missing required column: name. Available: {}", available()),
            })?;

        let position = match (
            index_map.get("x"),
            index_map.get("y"),
            index_map.get("z"),
            index_map.get("distance"),
            index_map.get("galactic_l"),
            index_map.get("galactic_b"),
        ) {
            (Some(&x), Some(&y), Some(&z), ..) => PositionSource::Cartesian { x, y, z },
            (_, _, _, Some(&distance), Some(&l), Some(&b)) => {
                PositionSource::Galactic { distance, l, b }
            }
            _ => {
                return Err(Error::CatalogValidation {
                    message: format!(
                        "missing position columns: expected x, y, z or distance_ly, galactic_l, galactic_b. Available: {}",
                        available()
                    ),
                })
            }
        };

        Ok(Self {
            name,
            position,
            abs_magnitude: index_map.get("abs_magnitude").copied(),
            spectral_class: index_map.get("spectral_class").copied(),
            color: index_map.get("color").copied(),
            system: index_map.get("system").copied(),
        })
    }

    fn parse_record(&self, record: &StringRecord, row: usize) -> Result<Star> {
        let cell = |index: usize| -> Option<&str> {
            record
                .get(index)
                .map(str::trim)
                .filter(|value| !value.is_empty() && *value != "--")
        };
        let optional = |index: Option<usize>| index.and_then(cell);

        let name = cell(self.name)
            .ok_or_else(|| Error::CatalogValidation {
                message: format!("missing star name at row {row}"),
            })?
            .to_string();

        let number = |field: &str, index: usize| -> Result<f64> {
            let raw = cell(index).ok_or_else(|| Error::CatalogValidation {
                message: format!("missing {field} for star '{name}' at row {row}"),
            })?;
            parse_number(raw).ok_or_else(|| Error::CatalogValidation {
                message: format!("invalid {field} for star '{name}' at row {row}: {raw:?}"),
            })
        };

        let position = if name == SUN {
            StarPosition::ORIGIN
        } else {
            match self.position {
                PositionSource::Cartesian { x, y, z } => {
                    StarPosition::new(number("x", x)?, number("y", y)?, number("z", z)?)
                }
                PositionSource::Galactic { distance, l, b } => StarPosition::from_galactic(
                    number("distance_ly", distance)?,
                    number("galactic_l", l)?,
                    number("galactic_b", b)?,
                ),
            }
        };

        let abs_magnitude = match self.abs_magnitude {
            Some(index) if cell(index).is_some() => number("abs_magnitude", index)?,
            _ => DEFAULT_ABS_MAGNITUDE,
        };

        let spectral_class: SpectralClass = optional(self.spectral_class)
            .map(|value| value.parse().unwrap_or_default())
            .unwrap_or_default();

        let color = match optional(self.color) {
            Some(raw) => Rgb::parse(raw).ok_or_else(|| Error::CatalogValidation {
                message: format!("invalid color for star '{name}' at row {row}: {raw:?}"),
            })?,
            None => spectral_class.default_color(),
        };

        Ok(Star {
            name,
            position,
            abs_magnitude,
            color,
            spectral_class,
            system: optional(self.system).map(str::to_string),
        })
    }
}

/// Lowercase a header and fold punctuation so `Abs Mag` matches `abs_mag`.
fn normalize_header(header: &str) -> String {
    let mut normalized = String::with_capacity(header.len());
    for c in header.trim().chars() {
        if c.is_ascii_alphanumeric() {
            normalized.push(c.to_ascii_lowercase());
        } else if (c == ' ' || c == '_' || c == '-') && !normalized.ends_with('_') {
            normalized.push('_');
        }
    }
    normalized.trim_matches('_').to_string()
}

/// Parse a numeric cell, tolerating a trailing unit such as `4.37 ly`.
fn parse_number(raw: &str) -> Option<f64> {
    let value = raw.split_whitespace().next()?;
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn spreadsheet_headers_normalize_to_canonical_names() {
        assert_eq!(normalize_header("Common Name"), "common_name");
        assert_eq!(normalize_header("Abs Mag"), "abs_mag");
        assert_eq!(normalize_header("Distance (ly)"), "distance_ly");
        assert_eq!(
            normalize_header("Galactic Coordinates (l°)"),
            "galactic_coordinates_l"
        );
    }

    #[test]
    fn spectral_strings_classify() {
        let parse = |s: &str| s.parse::<SpectralClass>().unwrap();
        assert_eq!(parse("G2V"), SpectralClass::G);
        assert_eq!(parse("M5.5Ve"), SpectralClass::M);
        assert_eq!(parse("DA2"), SpectralClass::WhiteDwarf);
        assert_eq!(parse("sdM1"), SpectralClass::M);
        assert_eq!(parse(""), SpectralClass::Unknown);
        assert_eq!(parse("??"), SpectralClass::Unknown);
    }

    #[test]
    fn named_and_hex_colors_parse() {
        assert_eq!(Rgb::parse("red"), Some(Rgb::new(0xff, 0x55, 0x55)));
        assert_eq!(Rgb::parse("#1E64FF"), Some(Rgb::new(30, 100, 255)));
        assert_eq!(Rgb::parse("teal"), None);
        assert_eq!(Rgb::new(30, 100, 255).to_string(), "#1e64ff");
    }

    #[test]
    fn galactic_columns_are_converted_to_cartesian() {
        let csv = "Common Name,Distance (ly),Galactic Coordinates (l°),Galactic Coordinates (b°),Class\n\
                   Beacon,10,90,0,K1\n";
        let catalog =
            StarCatalog::from_reader(Cursor::new(csv), &LoadOptions::default()).expect("loads");
        let star = catalog.get("Beacon").expect("present");
        assert!(star.position.x.abs() < 1e-9);
        assert!((star.position.y - 10.0).abs() < 1e-9);
        assert_eq!(star.spectral_class, SpectralClass::K);
        assert_eq!(star.abs_magnitude, DEFAULT_ABS_MAGNITUDE);
    }

    #[test]
    fn sun_is_pinned_to_origin() {
        let csv = "name,x,y,z\nSun,1,2,3\n";
        let catalog =
            StarCatalog::from_reader(Cursor::new(csv), &LoadOptions::default()).expect("loads");
        assert_eq!(catalog.get(SUN).unwrap().position, StarPosition::ORIGIN);
    }
}
