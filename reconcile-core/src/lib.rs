//! reconcile-core: domain types, configuration, and the decision table.
//!
//! - [`types`]: newtypes, directory members, workspace users, permitted set
//! - [`config`]: load / validate the run configuration
//! - [`decision`]: per-user reconciliation decisions
//! - [`report`]: action log and posted messages
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod decision;
pub mod error;
pub mod report;
pub mod types;

pub use config::Config;
pub use decision::{decide, plan, Decision, PlannedAction, SkipReason, SYSTEM_BOT_ID};
pub use error::ConfigError;
pub use report::{ActionLog, FailedAction};
pub use types::{DirectoryMember, GroupId, PermittedSet, UserId, WorkspaceUser};
