//! One reconciliation run, strictly in order:
//!
//! 1. fetch the permitted set (fatal on failure)
//! 2. failsafe gate (fatal when the set is too small)
//! 3. list workspace accounts (a failure ends the run quietly)
//! 4. decide and act on each account, in listing order
//! 5. post the summary messages
//!
//! In `dry_run` mode steps 1 and 3 still hit the network (they are
//! read-only) but nothing in steps 4 and 5 is sent.

use chrono::{DateTime, Utc};
use reconcile_core::{
    decision::{self, Decision, PlannedAction},
    report::escalation_message,
    ActionLog, Config, FailedAction, GroupId,
};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::directory::{check_failsafe, fetch_permitted_members, DirectorySource};
use crate::workspace::WorkspaceApi;
use crate::SyncError;

/// Inputs for a run, taken from [`Config`] plus the CLI's `--dry-run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub group: GroupId,
    pub member_type: String,
    pub failsafe_count: usize,
    pub post_channel: String,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn from_config(config: &Config, dry_run: bool) -> Self {
        Self {
            group: config.permit_group.clone(),
            member_type: config.gws.member_type.clone(),
            failsafe_count: config.failsafe_count,
            post_channel: config.slack.post_channel.clone(),
            dry_run,
        }
    }
}

/// Whether the workspace listing could be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Listing {
    Processed { users: usize },
    /// Listing failed; no account was examined.
    Failed { error: String },
}

/// Outcome of a run that was not aborted.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub group: GroupId,
    pub dry_run: bool,
    pub permitted: usize,
    pub listing: Listing,
    /// Every listed account and its decision, in listing order.
    #[serde(skip)]
    pub plan: Vec<PlannedAction>,
    pub actions: ActionLog,
}

/// Decisions for every listed account, before anything is applied.
#[derive(Debug, Clone)]
pub struct Preview {
    pub permitted: usize,
    pub listing: Listing,
    /// Empty when the listing failed.
    pub plan: Vec<PlannedAction>,
}

/// Steps 1 to 3 plus the decisions. Only read-only calls are made.
pub fn preview(
    directory: &impl DirectorySource,
    workspace: &impl WorkspaceApi,
    options: &RunOptions,
) -> Result<Preview, SyncError> {
    let permitted = fetch_permitted_members(directory, &options.group, &options.member_type)?;
    check_failsafe(&permitted, options.failsafe_count)?;

    let preview = match workspace.list_users() {
        Ok(users) => Preview {
            permitted: permitted.len(),
            listing: Listing::Processed { users: users.len() },
            plan: decision::plan(&permitted, users),
        },
        Err(err) => {
            error!(error = %err, "workspace listing failed; skipping reconciliation");
            Preview {
                permitted: permitted.len(),
                listing: Listing::Failed {
                    error: err.to_string(),
                },
                plan: Vec::new(),
            }
        }
    };
    Ok(preview)
}

/// Execute a full run. `Err` means the run was aborted before any
/// workspace call; per-account failures are reported in
/// [`RunReport::actions`] instead.
pub fn run(
    directory: &impl DirectorySource,
    workspace: &impl WorkspaceApi,
    options: &RunOptions,
) -> Result<RunReport, SyncError> {
    let started_at = Utc::now();
    info!(group = %options.group, dry_run = options.dry_run, "running");

    let Preview {
        permitted,
        listing,
        plan,
    } = preview(directory, workspace, options)?;

    let mut actions = ActionLog::default();
    for planned in &plan {
        apply(workspace, options, planned, &mut actions);
    }
    post_summary(workspace, options, &actions);

    Ok(RunReport {
        started_at,
        group: options.group.clone(),
        dry_run: options.dry_run,
        permitted,
        listing,
        plan,
        actions,
    })
}

fn apply(
    workspace: &impl WorkspaceApi,
    options: &RunOptions,
    planned: &PlannedAction,
    log: &mut ActionLog,
) {
    let user = &planned.user;
    let result = match planned.decision {
        Decision::Skip(reason) => {
            debug!(user = %user.name, %reason, "skipping");
            return;
        }
        decision if options.dry_run => {
            info!(user = %user.name, action = %decision, "[dry-run] would apply");
            Ok(())
        }
        Decision::Reactivate => workspace.reactivate(&user.id),
        Decision::Deactivate => workspace.deactivate(&user.id),
        Decision::Escalate => {
            workspace.post_message(&options.post_channel, &escalation_message(&user.name))
        }
    };

    match result {
        Ok(()) => {
            let (verb, names) = match planned.decision {
                Decision::Reactivate => ("Reactivated", &mut log.reactivated),
                Decision::Deactivate => ("Deactivated", &mut log.deactivated),
                _ => ("Escalated", &mut log.escalated),
            };
            if !options.dry_run {
                info!(user = %user.name, "{verb} {}", user.name);
            }
            names.push(user.name.clone());
        }
        Err(err) => {
            error!(user = %user.name, action = %planned.decision, error = %err, "action failed");
            log.failures.push(FailedAction {
                name: user.name.clone(),
                decision: planned.decision,
                error: err.to_string(),
            });
        }
    }
}

fn post_summary(workspace: &impl WorkspaceApi, options: &RunOptions, log: &ActionLog) {
    for message in log.summary_messages() {
        if options.dry_run {
            debug!("[dry-run] would post summary");
            continue;
        }
        if let Err(err) = workspace.post_message(&options.post_channel, &message) {
            error!(error = %err, "summary post failed");
        }
    }

    let prefix = if options.dry_run { "[dry-run] " } else { "" };
    if !log.deactivated.is_empty() {
        info!(
            count = log.deactivated.len(),
            "{prefix}Deactivated users {}",
            log.deactivated.join(", ")
        );
    }
    if !log.reactivated.is_empty() {
        info!(
            count = log.reactivated.len(),
            "{prefix}Reactivated users {}",
            log.reactivated.join(", ")
        );
    }
}
