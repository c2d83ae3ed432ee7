// CLI output formatting with consistent styling using indicatif and colored.
// Progress lines go to stdout, failures to stderr. Diagnostic logging goes through tracing.

use crate::core::{ModuleLayout, PipelineOutcome, Stage};
use crate::toolchain::Toolchain;
use colored::Colorize as _;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal as _;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const PD_TICK: Duration = Duration::from_millis(100);

/// Install the tracing subscriber. Logs go to stderr.
///
/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

pub fn create_progress_bar(len: u64, msg: &str) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(PD_TICK);
    pb
}

pub fn print_header(project: &str, layout: &ModuleLayout) {
    println!(
        "{} {} {}",
        "Catalog maintenance for".dimmed(),
        layout.module.green(),
        format!("({})", project).dimmed()
    );
    println!("{} {}", "Locale directory:".dimmed(), layout.locale_dir.display());
}

pub fn print_toolchain(toolchain: &Toolchain) {
    for (tool, path) in toolchain.iter() {
        println!("  {} {}", format!("{:<8}", tool.name()).dimmed(), path.display());
    }
}

pub fn print_created(path: &Path) {
    println!("{} {}", "Created".green(), path.display());
}

pub fn print_would_create(path: &Path) {
    println!("{} {}", "Would create:".yellow(), path.display());
}

pub fn print_would_run(command_line: &str) {
    println!("{} {}", "Would run:".yellow(), command_line);
}

pub fn print_initialized(language: &str, catalog: &Path) {
    println!(
        "{} {} {}",
        "Initialized".green(),
        language.cyan(),
        catalog.display()
    );
}

pub fn print_stage_start(stage: Stage, count: usize) {
    println!(
        "{} {} {}",
        "Starting".dimmed(),
        stage.to_string().green(),
        format!("({} catalog(s))", count).dimmed()
    );
}

pub fn print_stage_done(stage: Stage, succeeded: usize, failed: usize) {
    if failed == 0 {
        println!(
            "{} {} {}",
            "Finished".dimmed(),
            stage.to_string().green(),
            format!("({} ok)", succeeded).dimmed()
        );
    } else {
        println!(
            "{} {} ({} ok, {})",
            "Finished".dimmed(),
            stage.to_string().yellow(),
            succeeded,
            format!("{} failed", failed).red()
        );
    }
}

pub fn print_stage_skipped(stage: Stage) {
    println!(
        "{} {} {}",
        "Skipping".dimmed(),
        stage.to_string().yellow(),
        "(no catalogs found)".dimmed()
    );
}

pub fn print_tool_failure(stage: Stage, file: &Path, error: &str) {
    eprintln!(
        "{} {}: {}",
        format!("{} failed for", stage).red(),
        file.display().to_string().white().bold(),
        error
    );
}

pub fn print_summary(outcome: &PipelineOutcome) {
    let line = format!("{} merged, {} compiled", outcome.merged, outcome.compiled);
    if outcome.has_failures() {
        println!(
            "{} {}, {}",
            "Done with errors:".red(),
            line,
            format!("{} failure(s)", outcome.failures.len()).red()
        );
    } else {
        println!("{} {}", "Done:".green(), line);
    }
}
