//! CLI subcommand handlers.
//!
//! Each handler prints progress through the shared [`ColorScheme`] and exits
//! non-zero on failure; the library modules stay free of terminal output.
//!
//! [`ColorScheme`]: crate::color::ColorScheme

pub mod completions;
pub mod convert;
pub mod ls;
pub mod migrate;
pub mod version;
