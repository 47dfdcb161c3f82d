//! nearstars library entry points.
//!
//! This crate loads a catalog of nearby stars, indexes it spatially, and
//! models the state of an interactive 3D star viewer: camera and display
//! toggles, selection, pinned measurements, and star-hopping routes. Rendering
//! front-ends (CLI, GUI hosts) should drive everything through [`Session`]
//! and the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod measure;
pub mod output;
pub mod picking;
pub mod route;
pub mod selection;
pub mod session;
pub mod spatial;
pub mod view;

pub use catalog::{
    load_stars, LoadOptions, Rgb, SpectralClass, Star, StarCatalog, StarPosition, SUN,
};
pub use config::LaunchOptions;
pub use dataset::{default_catalog_path, resolve_catalog_path};
pub use error::{Error, Result};
pub use measure::{distance, pairwise, Measurement, MeasurementToggle, Measurements};
pub use output::{RouteOutputKind, RouteRenderMode, RouteSummary};
pub use picking::pick_star;
pub use route::{plan_star_hops, HopPlannerConfig, RouteBuilder, RouteLeg, RouteState};
pub use selection::SelectionManager;
pub use session::{Command, Outcome, SavedView, Session};
pub use spatial::SpatialIndex;
pub use view::{DisplayToggle, ViewDelta, ViewSnapshot, ViewState};
