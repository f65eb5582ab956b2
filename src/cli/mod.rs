//! Command-line interface for catalogscrape.

mod commands;
pub mod icons;

pub use commands::{is_verbose, run};
