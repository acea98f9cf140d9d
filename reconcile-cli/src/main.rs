//! user-reconcile: keep workspace accounts in line with a directory group.
//!
//! # Usage
//!
//! ```text
//! user-reconcile [run] [--dry-run] [--json]
//! user-reconcile plan [--all] [--json]
//! user-reconcile check-config
//!
//! global: --config <path> (or $CONFIG_FILE)  --log-format text|json
//! ```
//!
//! Exit status is 0 when the run completes (including when the workspace
//! listing failed and nothing was processed) and 1 on any fatal condition.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{plan::PlanArgs, run::RunArgs};
use logging::LogFormat;
use reconcile_core::config::DEFAULT_CONFIG_PATH;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "user-reconcile",
    version,
    about = "Deactivate and reactivate workspace accounts from directory group membership",
    long_about = None,
)]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, env = "CONFIG_FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Defaults to `run`.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile the workspace against the permit group.
    Run(RunArgs),

    /// Show what a run would do, without changing anything.
    Plan(PlanArgs),

    /// Validate the configuration file and certificate paths.
    CheckConfig,
}

impl Commands {
    /// Commands whose stdout is JSON keep log lines off stdout.
    fn reserves_stdout(&self) -> bool {
        match self {
            Commands::Run(args) => args.json,
            Commands::Plan(args) => args.json,
            Commands::CheckConfig => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default()));
    logging::init(cli.log_format, command.reserves_stdout());

    // Error level so the tag survives any RUST_LOG filter.
    let span = tracing::error_span!("user-reconcile");
    let _entered = span.enter();

    match dispatch(command, &cli.config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Commands, config: &std::path::Path) -> Result<()> {
    match command {
        Commands::Run(args) => args.run(config),
        Commands::Plan(args) => args.run(config),
        Commands::CheckConfig => commands::check_config::run(config),
    }
}
