//! portal-check - configuration validator for the RHCI portal
//!
//! Loads the portal settings, runs the secret key, debug, allowed hosts and
//! database checks in order, prints a report and exits non-zero when any
//! check did not pass.

mod checks;
mod cli;
mod config;
mod database;
mod error;
mod logging;
mod output;
mod runner;

use std::io;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::checks::standard_checks;
use crate::cli::{Cli, Commands, ConfigSubcommand, OutputFormat};
use crate::config::Settings;
use crate::database::SqlxProbe;
use crate::error::Result;
use crate::output::{JsonReporter, Reporter, TextReporter};
use crate::runner::CheckRunner;

fn main() {
    let cli = Cli::parse();

    let code = match cli.command_or_default() {
        Commands::Check { format } => run_checks(&cli, format),
        Commands::Config { subcommand } => handle_config_command(&cli, subcommand),
    };

    match code {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprint!("{}", e.format_for_terminal());
            std::process::exit(e.exit_code());
        }
    }
}

/// Load settings, run every check and report; returns the exit code
fn run_checks(cli: &Cli, format: OutputFormat) -> Result<i32> {
    let settings = Settings::load(cli.settings.as_deref())?;
    let log_guards = logging::init_logging(&settings.logging, cli.verbose, cli.quiet)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        databases = settings.databases.len(),
        "Running configuration checks"
    );

    let probe = SqlxProbe::new(Duration::from_secs(settings.checks.connect_timeout_secs));
    let runner = CheckRunner::new(standard_checks(Box::new(probe)));

    let stdout = io::stdout();
    let mut reporter: Box<dyn Reporter> = match format {
        OutputFormat::Text => Box::new(TextReporter::new(stdout.lock(), settings.app.name.as_deref())),
        OutputFormat::Json => Box::new(JsonReporter::new(stdout.lock())),
    };

    let report = runner.run(&settings, reporter.as_mut())?;
    let summary = report.summary();
    info!(
        passed = summary.passed,
        warnings = summary.warnings,
        errors = summary.errors,
        duration_ms = report.total_duration_ms,
        "Checks complete"
    );

    drop(reporter);
    drop(log_guards);
    Ok(report.exit_code())
}

/// Handle settings subcommands
fn handle_config_command(cli: &Cli, subcommand: ConfigSubcommand) -> Result<i32> {
    logging::init_simple(if cli.quiet {
        tracing::Level::ERROR
    } else if cli.verbose > 0 {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    })?;

    match subcommand {
        ConfigSubcommand::Show => {
            let settings = Settings::load(cli.settings.as_deref())?;
            print!("{}", toml::to_string_pretty(&settings.masked())?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Settings file created: {}", written.display());
        }
        ConfigSubcommand::Validate => {
            Settings::load(cli.settings.as_deref())?;
            println!("Configuration is valid.");
        }
    }

    Ok(0)
}
