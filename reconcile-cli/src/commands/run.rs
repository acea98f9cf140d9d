//! `user-reconcile run`: the reconciliation itself.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use reconcile_sync::{
    pipeline::{self, RunOptions},
    Listing, RunReport,
};

use super::{clients, load_config};

/// Arguments for `user-reconcile run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Fetch and decide, but make no deactivate, reactivate or post calls.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn run(self, config_path: &Path) -> Result<()> {
        let config = load_config(config_path)?;
        let (directory, workspace) = clients(&config)?;
        let options = RunOptions::from_config(&config, self.dry_run);

        let report = pipeline::run(&directory, &workspace, &options)?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize run report")?
            );
        } else {
            print_summary(&report);
        }
        Ok(())
    }
}

fn print_summary(report: &RunReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    match &report.listing {
        Listing::Failed { error } => {
            println!("{prefix}✗ workspace listing failed ({error}); nothing processed");
        }
        Listing::Processed { users } => {
            let actions = &report.actions;
            println!(
                "{prefix}✓ {users} accounts checked against {} permitted ({} deactivated, {} reactivated, {} escalated, {} failed)",
                report.permitted,
                actions.deactivated.len(),
                actions.reactivated.len(),
                actions.escalated.len(),
                actions.failures.len(),
            );
            for name in &actions.deactivated {
                println!("  -  {name}");
            }
            for name in &actions.reactivated {
                println!("  +  {name}");
            }
            for name in &actions.escalated {
                println!("  !  {name}");
            }
            for failure in &actions.failures {
                println!("  ✗  {} ({}: {})", failure.name, failure.decision, failure.error);
            }
        }
    }
}
