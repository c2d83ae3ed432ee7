//! The catalog maintenance run: resolve, initialize, extract, merge, compile.

use crate::core::{CliError, ModuleLayout, PipelineReport, parse_optional_language};
use crate::pipeline::{
    PipelineContext, ensure_new_language, initialize_language, prepare_locale, run_pipeline,
};
use crate::toolchain::{PathResolver, Toolchain, select_resolver};
use crate::utils::ui;
use clap::Args;
use locale_catalog_toml::CatalogConfig;
use std::path::PathBuf;

pub const DEFAULT_PROJECT: &str = "generic";
pub const DEFAULT_PROJECT_DIR: &str = "./src";

/// Arguments for a catalog maintenance run.
#[derive(Debug, Clone, Default, Args)]
pub struct CatalogArgs {
    /// Module to maintain; dots map to nested package directories.
    #[arg(short, long, value_name = "MODULE_NAME")]
    pub module: Option<String>,

    /// Initialize a new language first (e.g. 'fr' or 'en_GB').
    #[arg(short, long, value_name = "LANGUAGE_CODE")]
    pub lang: Option<String>,

    /// Project name, shown in the output [default: generic].
    #[arg(short, long, value_name = "PROJECT_NAME")]
    pub project: Option<String>,

    /// Directory holding the module source trees [default: ./src].
    #[arg(short = 'd', long, value_name = "DIR_PATH")]
    pub project_dir: Option<PathBuf>,

    /// Configuration file [default: ./catalog.toml when present].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show what would run without invoking any tool or touching files.
    #[arg(long)]
    pub dry_run: bool,
}

/// Settings after merging flags, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub project: String,
    pub project_dir: PathBuf,
}

impl RunSettings {
    /// Flags win over the config file, which wins over the built-in defaults.
    pub fn merge(args: &CatalogArgs, config: &CatalogConfig) -> Self {
        let project = args
            .project
            .clone()
            .or_else(|| config.project.clone())
            .unwrap_or_else(|| DEFAULT_PROJECT.to_string());
        let project_dir = args
            .project_dir
            .clone()
            .or_else(|| config.project_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_DIR));

        Self {
            project,
            project_dir,
        }
    }
}

fn load_config(args: &CatalogArgs) -> Result<CatalogConfig, CliError> {
    let config = match &args.config {
        Some(path) => CatalogConfig::read_from_path(path)?,
        None => CatalogConfig::discover_in(&std::env::current_dir()?)?.unwrap_or_default(),
    };
    Ok(config)
}

/// Run the catalog maintenance for `module`.
///
/// Tools are resolved before anything is written, so a missing executable
/// leaves the tree untouched.
pub fn run_catalog(module: &str, args: &CatalogArgs) -> Result<(), CliError> {
    let language = parse_optional_language(args.lang.as_deref())?;
    let config = load_config(args)?;
    let settings = RunSettings::merge(args, &config);

    let layout = ModuleLayout::derive(&settings.project_dir, module);
    tracing::debug!(?layout, "derived module layout");
    ui::print_header(&settings.project, &layout);

    let resolver = select_resolver(config.tools, PathResolver::from_env())?;
    let toolchain = Toolchain::resolve(resolver.as_ref())?;
    ui::print_toolchain(&toolchain);

    layout.verify()?;
    if let Some(language) = &language {
        ensure_new_language(&layout, language)?;
    }

    let ctx = PipelineContext::new(&layout, &toolchain, args.dry_run);
    prepare_locale(&ctx)?;

    if let Some(language) = &language {
        initialize_language(&ctx, language)?;
    }

    let outcome = run_pipeline(&ctx)?;
    ui::print_summary(&outcome);

    if outcome.has_failures() {
        return Err(PipelineReport {
            failure_count: outcome.failures.len(),
            failures: outcome.failures,
        }
        .into());
    }

    Ok(())
}
