//! CLI command implementations.

mod run;

pub use run::{CatalogArgs, DEFAULT_PROJECT, DEFAULT_PROJECT_DIR, RunSettings, run_catalog};
