//! Utility functions shared across the CLI.

mod discovery;
pub mod ui;

pub use discovery::{discover_catalogs, get_all_languages};
