use clap::{ArgAction, CommandFactory as _, Parser};
use locale_catalog_cli::commands::{CatalogArgs, run_catalog};
use miette::Result as MietteResult;

/// Maintain gettext catalogs for a module.
///
/// Locates <project-dir>/<module>/<package path>/locale, creates the
/// <domain>.pot template when missing, optionally seeds a catalog for a new
/// language with msginit, then regenerates the template with xgettext,
/// merges it into every <lang>/LC_MESSAGES/<domain>.po with msgmerge and
/// compiles every catalog to .mo with msgfmt.
///
/// The domain is the module name with hyphens and dots replaced by
/// underscores. Settings can also come from catalog.toml (project,
/// project_dir and a [tools] table with explicit executable paths).
#[derive(Parser)]
#[command(name = "locale-catalog")]
#[command(version)]
#[command(
    after_help = "Example: locale-catalog --module=app.i18n --lang=fr --project-dir=./src"
)]
struct Cli {
    #[command(flatten)]
    args: CatalogArgs,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

fn main() -> MietteResult<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    locale_catalog_cli::utils::ui::init_logging(cli.verbose);

    let Some(module) = cli.args.module.as_deref().filter(|m| !m.is_empty()) else {
        // Nothing to operate on without a module: show the documentation instead.
        Cli::command().print_long_help().map_err(miette::Report::msg)?;
        return Ok(());
    };

    run_catalog(module, &cli.args).map_err(miette::Report::new)
}
