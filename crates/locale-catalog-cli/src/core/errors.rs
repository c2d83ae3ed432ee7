//! CLI error types using miette for rustc-style diagnostics.
//!
//! Every fatal condition of a run maps to one struct here, aggregated in
//! [`CliError`]. Failures of individual tool invocations inside the pipeline
//! are collected into a [`PipelineReport`] instead of aborting the run.

// Fields in these structs are read by miette's Diagnostic derive macro
#![allow(unused)]

use crate::core::Stage;
use locale_catalog_toml::CatalogConfigError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Error when a language code does not look like `fr` or `en_GB`.
#[derive(Debug, Diagnostic, Error)]
#[error("invalid language code: '{code}'")]
#[diagnostic(
    code(locale_catalog::args::invalid_language),
    help(
        "Use two lowercase letters, optionally followed by an underscore and two uppercase \
         letters (e.g. 'fr', 'en_GB')"
    )
)]
pub struct InvalidLanguageError {
    /// The rejected code.
    pub code: String,
}

/// Error when the configuration file cannot be loaded.
#[derive(Debug, Diagnostic, Error)]
#[error("failed to load configuration")]
#[diagnostic(code(locale_catalog::config::load))]
pub struct ConfigLoadError {
    #[source]
    pub source: CatalogConfigError,

    #[help]
    pub help: Option<String>,
}

impl From<CatalogConfigError> for ConfigLoadError {
    fn from(source: CatalogConfigError) -> Self {
        let help = match &source {
            CatalogConfigError::NotFound(path) => Some(format!(
                "Create {} or drop the --config flag",
                path.display()
            )),
            _ => None,
        };
        Self { source, help }
    }
}

/// Error when a required gettext executable cannot be located.
#[derive(Debug, Diagnostic, Error)]
#[error("required executable '{tool}' not found in {searched}")]
#[diagnostic(
    code(locale_catalog::tools::not_found),
    help(
        "Install the gettext utilities (msginit, msgmerge, msgfmt, xgettext) or point to \
         them in the [tools] section of catalog.toml"
    )
)]
pub struct ToolNotFoundError {
    /// Executable name.
    pub tool: String,
    /// Where the lookup happened.
    pub searched: String,
}

/// Error when the package manager is present but does not have the package.
#[derive(Debug, Diagnostic, Error)]
#[error("{manager} is installed but package '{package}' is not")]
#[diagnostic(
    code(locale_catalog::tools::package_missing),
    help("Run `{manager} install {package}`")
)]
pub struct PackageNotInstalledError {
    /// Package manager name.
    pub manager: String,
    /// Package expected to provide the tools.
    pub package: String,
}

/// Error when the module directory does not exist.
#[derive(Debug, Diagnostic, Error)]
#[error("module directory not found: {}", .path.display())]
#[diagnostic(
    code(locale_catalog::layout::module_not_found),
    help("Check --module and --project-dir")
)]
pub struct ModuleNotFoundError {
    /// The expected directory.
    pub path: PathBuf,
}

/// Error when the module's package directory does not exist.
#[derive(Debug, Diagnostic, Error)]
#[error("search path not found: {}", .path.display())]
#[diagnostic(
    code(locale_catalog::layout::search_path_not_found),
    help("The module name '{module}' must map to nested directories inside the module directory")
)]
pub struct SearchPathNotFoundError {
    /// The expected directory.
    pub path: PathBuf,
    /// Module name the path was derived from.
    pub module: String,
}

/// Error when a language is initialized twice.
#[derive(Debug, Diagnostic, Error)]
#[error("cannot initialize language '{language}', it exists already")]
#[diagnostic(
    code(locale_catalog::init::exists),
    help("Run without --lang to update the existing catalog")
)]
pub struct LanguageExistsError {
    /// The language code.
    pub language: String,
    /// The existing catalog directory.
    pub path: PathBuf,
}

/// Error when msginit fails to seed a new catalog.
#[derive(Debug, Diagnostic, Error)]
#[error("failed to initialize catalog for '{language}'")]
#[diagnostic(code(locale_catalog::init::failed))]
pub struct CatalogInitError {
    /// The language code.
    pub language: String,

    /// Tool output.
    #[help]
    pub help: String,
}

/// A single failed tool invocation inside the pipeline.
#[derive(Debug, Diagnostic, Error)]
#[error("{stage} failed for {}", .file.display())]
#[diagnostic(code(locale_catalog::pipeline::tool_failed), severity(Error))]
pub struct ToolFailure {
    /// Stage the invocation belonged to.
    pub stage: Stage,

    /// File the invocation operated on.
    pub file: PathBuf,

    /// Exit status and captured stderr.
    #[help]
    pub help: String,
}

/// Aggregated pipeline failures.
#[derive(Debug, Diagnostic, Error)]
#[error("pipeline finished with {failure_count} failed tool invocation(s)")]
#[diagnostic(code(locale_catalog::pipeline::report))]
pub struct PipelineReport {
    /// Number of failed invocations.
    pub failure_count: usize,

    #[related]
    pub failures: Vec<ToolFailure>,
}

#[derive(Debug, Diagnostic, Error)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidLanguage(#[from] InvalidLanguageError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigLoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ToolNotFound(#[from] ToolNotFoundError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    PackageNotInstalled(#[from] PackageNotInstalledError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ModuleNotFound(#[from] ModuleNotFoundError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    SearchPathNotFound(#[from] SearchPathNotFoundError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    LanguageExists(#[from] LanguageExistsError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    CatalogInit(#[from] CatalogInitError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pipeline(#[from] PipelineReport),

    #[error("IO error: {0}")]
    #[diagnostic(code(locale_catalog::io))]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(locale_catalog::other))]
    Other(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(format!("{:#}", err))
    }
}

impl From<CatalogConfigError> for CliError {
    fn from(err: CatalogConfigError) -> Self {
        CliError::Config(err.into())
    }
}
