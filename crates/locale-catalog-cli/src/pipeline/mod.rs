//! The catalog maintenance pipeline.
//!
//! Order of a run: [`prepare_locale`], then [`initialize_language`] when a
//! language was requested, then [`run_pipeline`] (extract, merge, compile).

mod init;
mod invocation;
mod stages;

pub use init::{ensure_new_language, initialize_language, prepare_locale};
pub use invocation::{Invocation, Runner};
pub use stages::{compile, extract, merge, run_pipeline};

use crate::core::ModuleLayout;
use crate::toolchain::Toolchain;

/// Everything a stage needs, resolved once per run.
#[derive(Clone, Copy, Debug)]
pub struct PipelineContext<'a> {
    pub layout: &'a ModuleLayout,
    pub toolchain: &'a Toolchain,
    pub runner: Runner,
}

impl<'a> PipelineContext<'a> {
    pub fn new(layout: &'a ModuleLayout, toolchain: &'a Toolchain, dry_run: bool) -> Self {
        Self {
            layout,
            toolchain,
            runner: Runner::new(dry_run),
        }
    }
}
