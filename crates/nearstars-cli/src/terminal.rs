//! Terminal styling and color detection.
//!
//! Escape sequences are resolved once into a [`ColorPalette`]; when color is
//! disabled every entry is an empty string so formatting code never branches.

use nearstars_lib::Rgb;

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    /// Bold reverse green for the first stop of a route.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    /// Bold reverse cyan for intermediate stops.
    pub const TAG_HOP: &str = "\x1b[1;7;36m";
    /// Bold reverse magenta for the last stop.
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";

    /// Bright bold white for star names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary elements.
    pub const GRAY: &str = "\x1b[90m";
    /// Green for distances.
    pub const GREEN: &str = "\x1b[32m";
    /// Red for failed session commands.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, either ANSI sequences or empty strings.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_hop: &'static str,
    pub tag_goal: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub red: &'static str,
    /// Whether star colors are emitted as 24-bit escapes.
    pub true_color: bool,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_hop: colors::TAG_HOP,
            tag_goal: colors::TAG_GOAL,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            red: colors::RED,
            true_color: true,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_hop: "",
            tag_goal: "",
            white_bold: "",
            gray: "",
            green: "",
            red: "",
            true_color: false,
        }
    }

    /// Pick `colored()` or `plain()` from terminal capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Foreground escape drawing text in a star's own color.
    pub fn star(&self, color: Rgb) -> String {
        if self.true_color {
            format!("\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
        } else {
            String::new()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Honors `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}
