//! `user-reconcile plan`: per-account decisions without side effects.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use reconcile_core::{Decision, PlannedAction, UserId, WorkspaceUser};
use reconcile_sync::{
    pipeline::{self, RunOptions},
    Listing, Preview,
};

use super::{clients, load_config};

/// Arguments for `user-reconcile plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Include accounts that would be left untouched.
    #[arg(long)]
    pub all: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    pub fn run(self, config_path: &Path) -> Result<()> {
        let config = load_config(config_path)?;
        let (directory, workspace) = clients(&config)?;
        let options = RunOptions::from_config(&config, true);

        let preview = pipeline::preview(&directory, &workspace, &options)?;
        if self.json {
            print_json(preview, self.all)?;
        } else {
            print_table(preview, self.all);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct PlanJson {
    generated_at: DateTime<Utc>,
    permitted: usize,
    listing: Listing,
    accounts: Vec<AccountJson>,
}

#[derive(Serialize)]
struct AccountJson {
    id: UserId,
    name: String,
    #[serde(flatten)]
    decision: Decision,
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "account")]
    name: String,
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "flags")]
    flags: String,
    #[tabled(rename = "decision")]
    decision: String,
}

fn selected(plan: Vec<PlannedAction>, all: bool) -> Vec<PlannedAction> {
    plan.into_iter()
        .filter(|p| all || p.decision.is_action())
        .collect()
}

fn print_json(preview: Preview, all: bool) -> Result<()> {
    let payload = PlanJson {
        generated_at: Utc::now(),
        permitted: preview.permitted,
        listing: preview.listing,
        accounts: selected(preview.plan, all)
            .into_iter()
            .map(|p| AccountJson {
                id: p.user.id,
                name: p.user.name,
                decision: p.decision,
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize plan JSON")?
    );
    Ok(())
}

fn print_table(preview: Preview, all: bool) {
    let users = match preview.listing {
        Listing::Failed { error } => {
            println!("✗ workspace listing failed ({error}); nothing to plan");
            return;
        }
        Listing::Processed { users } => users,
    };

    let plan = selected(preview.plan, all);
    println!(
        "{} accounts | {} permitted | {} actions",
        users,
        preview.permitted,
        plan.iter().filter(|p| p.decision.is_action()).count(),
    );
    if plan.is_empty() {
        println!("Nothing to do.");
        return;
    }

    let rows: Vec<PlanRow> = plan
        .into_iter()
        .map(|p| PlanRow {
            decision: decision_label(&p.decision),
            flags: flag_summary(&p.user),
            name: p.user.name,
            id: p.user.id.0,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn decision_label(decision: &Decision) -> String {
    let text = decision.to_string();
    match decision {
        Decision::Deactivate => text.red().bold().to_string(),
        Decision::Reactivate => text.green().bold().to_string(),
        Decision::Escalate => text.yellow().bold().to_string(),
        Decision::Skip(_) => text.bright_black().to_string(),
    }
}

fn flag_summary(user: &WorkspaceUser) -> String {
    let flags: Vec<&str> = [
        (user.deleted, "deleted"),
        (user.is_bot, "bot"),
        (user.is_app_user, "app"),
        (user.is_admin, "admin"),
        (user.is_owner, "owner"),
        (user.is_primary_owner, "primary-owner"),
    ]
    .into_iter()
    .filter_map(|(set, label)| set.then_some(label))
    .collect();
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(", ")
    }
}
