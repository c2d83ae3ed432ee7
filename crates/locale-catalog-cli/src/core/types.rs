use crate::core::ToolFailure;
use std::fmt;
use std::path::PathBuf;

/// A step of a run that invokes an external tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Seeding a new catalog from the template (msginit).
    Init,
    /// Regenerating the template from the catalogs (xgettext).
    Extract,
    /// Updating catalogs against the template (msgmerge).
    Merge,
    /// Compiling catalogs to binary form (msgfmt).
    Compile,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "initialization",
            Stage::Extract => "extraction",
            Stage::Merge => "merge",
            Stage::Compile => "compilation",
        };
        f.write_str(name)
    }
}

/// A `.po` file found under `<locale>/<lang>/LC_MESSAGES/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogFile {
    /// The language directory name.
    pub language: String,
    /// Full path to the `.po` file.
    pub path: PathBuf,
}

impl CatalogFile {
    /// Path of the compiled catalog next to this one.
    pub fn compiled_path(&self) -> PathBuf {
        self.path.with_extension("mo")
    }
}

/// What the extract/merge/compile pipeline did.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    /// Catalogs fed to extraction.
    pub extracted: usize,
    /// Catalogs merged successfully.
    pub merged: usize,
    /// Catalogs compiled successfully.
    pub compiled: usize,
    /// Failed invocations, in execution order.
    pub failures: Vec<ToolFailure>,
}

impl PipelineOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
