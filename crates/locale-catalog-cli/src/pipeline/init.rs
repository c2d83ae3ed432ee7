use super::{Invocation, PipelineContext};
use crate::core::{CatalogInitError, CliError, LanguageCode, LanguageExistsError, ModuleLayout};
use crate::toolchain::Tool;
use crate::utils::ui;
use anyhow::Context as _;
use fs_err as fs;
use std::path::PathBuf;

/// Create the locale directory and an empty template when they are missing.
pub fn prepare_locale(ctx: &PipelineContext<'_>) -> Result<(), CliError> {
    let layout = ctx.layout;

    if !layout.locale_dir.is_dir() {
        if ctx.runner.is_dry_run() {
            ui::print_would_create(&layout.locale_dir);
        } else {
            fs::create_dir_all(&layout.locale_dir)?;
            tracing::info!(path = %layout.locale_dir.display(), "created locale directory");
            ui::print_created(&layout.locale_dir);
        }
    }

    if !layout.template.exists() {
        if ctx.runner.is_dry_run() {
            ui::print_would_create(&layout.template);
        } else {
            fs::File::create(&layout.template)?;
            tracing::info!(path = %layout.template.display(), "created empty template");
            ui::print_created(&layout.template);
        }
    }

    Ok(())
}

/// Fails when `language` already has a catalog directory.
pub fn ensure_new_language(
    layout: &ModuleLayout,
    language: &LanguageCode,
) -> Result<(), CliError> {
    let catalog_dir = layout.catalog_dir(language);
    if catalog_dir.exists() {
        return Err(LanguageExistsError {
            language: language.to_string(),
            path: catalog_dir,
        }
        .into());
    }
    Ok(())
}

/// Seed `<locale>/<lang>/LC_MESSAGES/<domain>.po` from the template.
///
/// Refuses to touch a language whose catalog directory already exists.
/// Returns the new catalog path.
pub fn initialize_language(
    ctx: &PipelineContext<'_>,
    language: &LanguageCode,
) -> Result<PathBuf, CliError> {
    let layout = ctx.layout;
    ensure_new_language(layout, language)?;

    let catalog_dir = layout.catalog_dir(language);

    let catalog = layout.catalog_path(language);
    let invocation = Invocation::new(ctx.toolchain, Tool::MsgInit)
        .arg("--no-translator")
        .path_flag("--input", &layout.template)
        .path_flag("--output-file", &catalog)
        .arg(format!("--locale={}", language));

    if ctx.runner.is_dry_run() {
        ui::print_would_create(&catalog_dir);
        return ctx.runner.execute(&invocation).map(|()| catalog).map_err(Into::into);
    }

    fs::create_dir_all(&catalog_dir)
        .with_context(|| format!("Failed to create {}", catalog_dir.display()))?;
    tracing::info!(%language, path = %catalog_dir.display(), "created catalog directory");

    ctx.runner
        .execute(&invocation)
        .map_err(|err| CatalogInitError {
            language: language.to_string(),
            help: format!("{:#}", err),
        })?;

    ui::print_initialized(language.as_str(), &catalog);
    Ok(catalog)
}
