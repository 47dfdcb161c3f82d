use std::path::PathBuf;

use serde::Serialize;

use crate::catalog::DEFAULT_MAX_DISTANCE;

/// Default port for a renderer host.
pub const DEFAULT_PORT: u16 = 8050;

/// Settings handed to whatever hosts the interactive viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchOptions {
    pub catalog: Option<PathBuf>,
    /// Stars farther than this from the Sun are not loaded.
    pub max_distance: f64,
    pub port: u16,
    pub fullscreen: bool,
    /// Draw the planets of the solar system around the Sun.
    pub show_solar_system: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            catalog: None,
            max_distance: DEFAULT_MAX_DISTANCE,
            port: DEFAULT_PORT,
            fullscreen: false,
            show_solar_system: true,
        }
    }
}
