use super::{Invocation, PipelineContext};
use crate::core::{CatalogFile, CliError, PipelineOutcome, Stage, ToolFailure};
use crate::toolchain::Tool;
use crate::utils::{discover_catalogs, ui};
use anyhow::{Result, bail};
use std::path::Path;

/// Run extraction, merge and compilation in order.
///
/// A failing tool call is recorded in the outcome and the run moves on, so
/// one broken catalog does not stop the others from being compiled. Only
/// errors while scanning the locale directory abort the pipeline.
pub fn run_pipeline(ctx: &PipelineContext<'_>) -> Result<PipelineOutcome, CliError> {
    let layout = ctx.layout;
    let mut outcome = PipelineOutcome::default();

    let domain_catalogs =
        discover_catalogs(&layout.locale_dir, Some(&layout.catalog_file_name()))?;
    extract(ctx, &domain_catalogs, &mut outcome);
    merge(ctx, &domain_catalogs, &mut outcome);

    let all_catalogs = discover_catalogs(&layout.locale_dir, None)?;
    compile(ctx, &all_catalogs, &mut outcome);

    Ok(outcome)
}

/// Regenerate the template from every catalog of the module's domain.
///
/// All catalogs go into a single xgettext call so the template ends up as
/// the union of their messages.
pub fn extract(
    ctx: &PipelineContext<'_>,
    catalogs: &[CatalogFile],
    outcome: &mut PipelineOutcome,
) {
    let stage = Stage::Extract;
    if catalogs.is_empty() {
        ui::print_stage_skipped(stage);
        return;
    }

    ui::print_stage_start(stage, catalogs.len());
    tracing::info!(catalogs = catalogs.len(), "extraction started");

    let invocation = catalogs.iter().fold(
        Invocation::new(ctx.toolchain, Tool::XGettext)
            .arg("--force-po")
            .path_flag("--output", &ctx.layout.template),
        |invocation, catalog| invocation.arg(&catalog.path),
    );

    let failed = match ctx.runner.execute(&invocation) {
        Ok(()) => {
            outcome.extracted = catalogs.len();
            0
        },
        Err(err) => {
            record_failure(stage, &ctx.layout.template, err, outcome);
            1
        },
    };

    ui::print_stage_done(stage, outcome.extracted, failed);
    tracing::info!(failed, "extraction finished");
}

/// Update each catalog in place against the template.
///
/// Location comments and fuzzy matching are turned off so merges stay stable.
pub fn merge(
    ctx: &PipelineContext<'_>,
    catalogs: &[CatalogFile],
    outcome: &mut PipelineOutcome,
) {
    for_each_catalog(Stage::Merge, catalogs, outcome, |catalog| {
        let invocation = Invocation::new(ctx.toolchain, Tool::MsgMerge)
            .arg("--update")
            .arg("--backup=off")
            .arg("--no-location")
            .arg("--no-fuzzy-matching")
            .arg(&catalog.path)
            .arg(&ctx.layout.template);
        ctx.runner.execute(&invocation)
    });
}

/// Compile every catalog to a `.mo` file next to it.
///
/// msgfmt exits successfully on a catalog without messages but writes
/// nothing, so a missing output file counts as a failure.
pub fn compile(
    ctx: &PipelineContext<'_>,
    catalogs: &[CatalogFile],
    outcome: &mut PipelineOutcome,
) {
    for_each_catalog(Stage::Compile, catalogs, outcome, |catalog| {
        let compiled = catalog.compiled_path();
        let invocation = Invocation::new(ctx.toolchain, Tool::MsgFmt)
            .path_flag("--output-file", &compiled)
            .arg(&catalog.path);
        ctx.runner.execute(&invocation)?;

        if !ctx.runner.is_dry_run() && !compiled.is_file() {
            bail!(
                "{} produced no compiled catalog at {}",
                invocation.tool(),
                compiled.display()
            );
        }
        Ok(())
    });
}

fn for_each_catalog(
    stage: Stage,
    catalogs: &[CatalogFile],
    outcome: &mut PipelineOutcome,
    run: impl Fn(&CatalogFile) -> Result<()>,
) {
    if catalogs.is_empty() {
        ui::print_stage_skipped(stage);
        return;
    }

    ui::print_stage_start(stage, catalogs.len());
    tracing::info!(%stage, catalogs = catalogs.len(), "stage started");

    let pb = ui::create_progress_bar(catalogs.len() as u64, &format!("Running {}", stage));
    let mut succeeded = 0;
    let mut failed = 0;

    for catalog in catalogs {
        pb.set_message(format!("{} {}", stage, catalog.language));

        match run(catalog) {
            Ok(()) => succeeded += 1,
            Err(err) => {
                failed += 1;
                pb.suspend(|| record_failure(stage, &catalog.path, err, outcome));
            },
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    match stage {
        Stage::Merge => outcome.merged += succeeded,
        Stage::Compile => outcome.compiled += succeeded,
        Stage::Init | Stage::Extract => {},
    }

    ui::print_stage_done(stage, succeeded, failed);
    tracing::info!(%stage, succeeded, failed, "stage finished");
}

fn record_failure(stage: Stage, file: &Path, err: anyhow::Error, outcome: &mut PipelineOutcome) {
    let message = format!("{:#}", err);
    tracing::warn!(%stage, file = %file.display(), error = %message, "tool invocation failed");
    ui::print_tool_failure(stage, file, &message);
    outcome.failures.push(ToolFailure {
        stage,
        file: file.to_path_buf(),
        help: message,
    });
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::{LanguageCode, ModuleLayout};
    use crate::pipeline::test_support::{FAILS, fake_toolchain, write_tool};
    use crate::pipeline::{initialize_language, prepare_locale};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        bin: TempDir,
        layout: ModuleLayout,
    }

    impl Fixture {
        fn new() -> Self {
            let root = TempDir::new().unwrap();
            let bin = TempDir::new().unwrap();
            let layout = ModuleLayout::derive(&root.path().join("src"), "app.i18n");
            fs::create_dir_all(&layout.search_path).unwrap();
            Self {
                _root: root,
                bin,
                layout,
            }
        }

        fn add_catalog(&self, language: &str, file_name: &str) {
            let dir = self.layout.locale_dir.join(language).join("LC_MESSAGES");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(file_name), "msgid \"\"\nmsgstr \"\"\n").unwrap();
        }
    }

    #[test]
    fn test_no_catalogs_runs_nothing() {
        let fx = Fixture::new();
        let toolchain = fake_toolchain(fx.bin.path());
        for tool in [Tool::XGettext, Tool::MsgMerge, Tool::MsgFmt] {
            write_tool(fx.bin.path(), tool, FAILS);
        }
        let ctx = PipelineContext::new(&fx.layout, &toolchain, false);
        prepare_locale(&ctx).unwrap();

        let outcome = run_pipeline(&ctx).unwrap();

        assert!(!outcome.has_failures());
        assert_eq!(outcome.extracted, 0);
        assert_eq!(outcome.merged, 0);
        assert_eq!(outcome.compiled, 0);
    }

    #[test]
    fn test_compiles_every_catalog() {
        let fx = Fixture::new();
        let toolchain = fake_toolchain(fx.bin.path());
        let ctx = PipelineContext::new(&fx.layout, &toolchain, false);
        prepare_locale(&ctx).unwrap();
        fx.add_catalog("de", "app_i18n.po");
        fx.add_catalog("fr", "app_i18n.po");
        fx.add_catalog("fr", "other.po");

        let outcome = run_pipeline(&ctx).unwrap();

        assert!(!outcome.has_failures());
        assert_eq!(outcome.extracted, 2);
        assert_eq!(outcome.merged, 2);
        assert_eq!(outcome.compiled, 3);
        for mo in [
            "de/LC_MESSAGES/app_i18n.mo",
            "fr/LC_MESSAGES/app_i18n.mo",
            "fr/LC_MESSAGES/other.mo",
        ] {
            assert!(fx.layout.locale_dir.join(mo).is_file(), "missing {mo}");
        }
    }

    #[test]
    fn test_failures_are_collected_and_run_continues() {
        let fx = Fixture::new();
        let toolchain = fake_toolchain(fx.bin.path());
        write_tool(fx.bin.path(), Tool::MsgMerge, FAILS);
        let ctx = PipelineContext::new(&fx.layout, &toolchain, false);
        prepare_locale(&ctx).unwrap();
        fx.add_catalog("de", "app_i18n.po");
        fx.add_catalog("fr", "app_i18n.po");

        let outcome = run_pipeline(&ctx).unwrap();

        assert_eq!(outcome.failures.len(), 2);
        assert!(outcome.failures.iter().all(|f| f.stage == Stage::Merge));
        assert!(outcome.failures[0].help.contains("simulated failure"));
        // Compilation still ran for both catalogs
        assert_eq!(outcome.compiled, 2);
    }

    #[test]
    fn test_compile_without_output_is_a_failure() {
        let fx = Fixture::new();
        let toolchain = fake_toolchain(fx.bin.path());
        write_tool(fx.bin.path(), Tool::MsgFmt, "#!/bin/sh\nexit 0\n");
        let ctx = PipelineContext::new(&fx.layout, &toolchain, false);
        prepare_locale(&ctx).unwrap();
        fx.add_catalog("fr", "app_i18n.po");

        let outcome = run_pipeline(&ctx).unwrap();

        assert_eq!(outcome.compiled, 0);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].stage, Stage::Compile);
        assert!(outcome.failures[0].help.contains("produced no compiled catalog"));
    }

    #[test]
    fn test_extraction_failure_is_recorded_against_template() {
        let fx = Fixture::new();
        let toolchain = fake_toolchain(fx.bin.path());
        write_tool(fx.bin.path(), Tool::XGettext, FAILS);
        let ctx = PipelineContext::new(&fx.layout, &toolchain, false);
        prepare_locale(&ctx).unwrap();
        fx.add_catalog("de", "app_i18n.po");

        let outcome = run_pipeline(&ctx).unwrap();

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].stage, Stage::Extract);
        assert_eq!(outcome.failures[0].file, fx.layout.template);
        assert_eq!(outcome.extracted, 0);
        assert_eq!(outcome.merged, 1);
    }

    #[test]
    fn test_initialized_language_is_compiled() {
        let fx = Fixture::new();
        let toolchain = fake_toolchain(fx.bin.path());
        let ctx = PipelineContext::new(&fx.layout, &toolchain, false);
        prepare_locale(&ctx).unwrap();

        let lang: LanguageCode = "en_GB".parse().unwrap();
        let catalog = initialize_language(&ctx, &lang).unwrap();
        let outcome = run_pipeline(&ctx).unwrap();

        assert_eq!(outcome.compiled, 1);
        assert!(catalog.with_extension("mo").is_file());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let fx = Fixture::new();
        let toolchain = fake_toolchain(fx.bin.path());
        fx.add_catalog("de", "app_i18n.po");
        let ctx = PipelineContext::new(&fx.layout, &toolchain, true);

        let outcome = run_pipeline(&ctx).unwrap();

        assert_eq!(outcome.compiled, 1);
        assert!(!fx.layout.template.exists());
        assert!(!fx.layout.locale_dir.join("de/LC_MESSAGES/app_i18n.mo").exists());
    }
}
