//! nearstars CLI library.
//!
//! Output formatting, terminal styling and the `session` command language,
//! kept here so they can be unit tested apart from the binary.

pub mod output;
pub mod script;
pub mod terminal;
