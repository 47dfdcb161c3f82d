use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the nearstars library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Every variant is recoverable from the point of view of an interactive
/// session: the failed operation leaves session state untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a star name could not be found in the catalog.
    #[error("unknown star name: {name}{}", format_suggestions(.suggestions))]
    UnknownStar {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a snapshot or route index is out of range.
    #[error("index {index} is out of range (length {len})")]
    InvalidIndex { index: usize, len: usize },

    /// Raised when appending a hop equal to the current last hop.
    #[error("route already ends at {name}; consecutive hops must differ")]
    DuplicateConsecutiveHop { name: String },

    /// Raised when removing a hop would make its two neighbours adjacent duplicates.
    #[error("removing hop {index} would place {name} next to itself")]
    AmbiguousMerge { index: usize, name: String },

    /// Raised when measuring a star against itself.
    #[error("cannot measure {name} against itself")]
    SelfMeasurement { name: String },

    /// Raised when a command needs a focused star but nothing is selected.
    #[error("no star is focused; select a star first")]
    NoFocus,

    /// Raised when the rotation center does not sit on a catalog star.
    #[error("the view is not centered on a star; center on a star first")]
    NoRotationCenter,

    /// Raised when a route summary is requested for a route without hops.
    #[error("route is empty")]
    EmptyRoute,

    /// Raised when a catalog record fails validation.
    #[error("invalid star catalog: {message}")]
    CatalogValidation { message: String },

    /// Raised when the same star name appears twice in a catalog.
    #[error("duplicate star name encountered: {name}")]
    DuplicateStarName { name: String },

    /// Catalog file could not be located at the resolved path.
    #[error("star catalog not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the star catalog")]
    ProjectDirsUnavailable,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV reader errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
