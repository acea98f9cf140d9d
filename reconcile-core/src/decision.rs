//! The reconciliation decision table.
//!
//! [`decide`] is pure: it looks only at the permitted set and the flags
//! captured when the user was listed. [`plan`] applies it to a whole listing,
//! preserving listing order.
//!
//! Membership is tested on the user's display `name`, not on the account
//! `id`. Directory identifiers and workspace handles are expected to share a
//! namespace; this join key must not be changed to the account id.

use std::fmt;

use serde::Serialize;

use crate::types::{PermittedSet, WorkspaceUser};

/// Account id of the platform's built-in bot. Never acted on.
pub const SYSTEM_BOT_ID: &str = "USLACKBOT";

/// What to do with a single workspace account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    /// Deleted account whose name is permitted again.
    Reactivate,
    /// Active account whose name is no longer permitted.
    Deactivate,
    /// Privileged account that lost permission; a human must review it.
    Escalate,
    Skip(SkipReason),
}

/// Why an account is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    SystemBot,
    /// Deleted and still not permitted.
    RemainsDeactivated,
    /// Active and permitted.
    AlreadyActive,
    /// Bot or app integration.
    ServiceAccount,
}

impl Decision {
    /// `true` for every decision that results in an API call.
    pub fn is_action(&self) -> bool {
        !matches!(self, Decision::Skip(_))
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Reactivate => write!(f, "reactivate"),
            Decision::Deactivate => write!(f, "deactivate"),
            Decision::Escalate => write!(f, "escalate"),
            Decision::Skip(reason) => write!(f, "skip ({reason})"),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::SystemBot => write!(f, "system bot"),
            SkipReason::RemainsDeactivated => write!(f, "remains deactivated"),
            SkipReason::AlreadyActive => write!(f, "already active"),
            SkipReason::ServiceAccount => write!(f, "service account"),
        }
    }
}

/// Classify one account against the permitted set.
pub fn decide(permitted: &PermittedSet, user: &WorkspaceUser) -> Decision {
    if user.id.0 == SYSTEM_BOT_ID {
        return Decision::Skip(SkipReason::SystemBot);
    }

    let permitted = permitted.contains(&user.name);
    if user.deleted {
        return if permitted {
            Decision::Reactivate
        } else {
            Decision::Skip(SkipReason::RemainsDeactivated)
        };
    }

    if permitted {
        Decision::Skip(SkipReason::AlreadyActive)
    } else if user.is_service_account() {
        Decision::Skip(SkipReason::ServiceAccount)
    } else if user.is_privileged() {
        Decision::Escalate
    } else {
        Decision::Deactivate
    }
}

/// One listed account paired with its decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAction {
    pub user: WorkspaceUser,
    pub decision: Decision,
}

/// Decide every account, in listing order.
pub fn plan(permitted: &PermittedSet, users: Vec<WorkspaceUser>) -> Vec<PlannedAction> {
    users
        .into_iter()
        .map(|user| PlannedAction {
            decision: decide(permitted, &user),
            user,
        })
        .collect()
}
