//! Per-run action log and the messages posted back to the workspace.

use serde::Serialize;

use crate::decision::Decision;

/// What happened during one run. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionLog {
    /// Display names, in the order they were reactivated.
    pub reactivated: Vec<String>,
    /// Display names, in the order they were deactivated.
    pub deactivated: Vec<String>,
    /// Privileged accounts handed to a human.
    pub escalated: Vec<String>,
    pub failures: Vec<FailedAction>,
}

/// A per-user action that the workspace rejected or that never reached it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAction {
    pub name: String,
    pub decision: Decision,
    pub error: String,
}

impl ActionLog {
    pub fn is_empty(&self) -> bool {
        self.reactivated.is_empty()
            && self.deactivated.is_empty()
            && self.escalated.is_empty()
            && self.failures.is_empty()
    }

    /// Summary posts for this run: deactivations first, then reactivations.
    /// Empty categories produce no message.
    pub fn summary_messages(&self) -> Vec<String> {
        let mut messages = Vec::with_capacity(2);
        if !self.deactivated.is_empty() {
            messages.push(format!("*Deactivated users*\n{}", self.deactivated.join(", ")));
        }
        if !self.reactivated.is_empty() {
            messages.push(format!("*Reactivated users*\n{}", self.reactivated.join(", ")));
        }
        messages
    }
}

/// Alert posted for an admin or owner who is no longer permitted.
pub fn escalation_message(name: &str) -> String {
    format!(
        ":exclamation: *Attention Human* :exclamation:\nUser {name} is no longer eligible for Slack but is an owner or admin. Please manually process this one if its real."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_actions_no_messages() {
        assert!(ActionLog::default().summary_messages().is_empty());
    }

    #[test]
    fn deactivations_are_reported_before_reactivations() {
        let log = ActionLog {
            reactivated: vec!["dave".into()],
            deactivated: vec!["carol".into(), "erin".into()],
            ..ActionLog::default()
        };
        assert_eq!(
            log.summary_messages(),
            [
                "*Deactivated users*\ncarol, erin".to_string(),
                "*Reactivated users*\ndave".to_string(),
            ]
        );
    }

    #[test]
    fn escalations_alone_produce_no_summary() {
        let log = ActionLog {
            escalated: vec!["root".into()],
            ..ActionLog::default()
        };
        assert!(!log.is_empty());
        assert!(log.summary_messages().is_empty());
    }

    #[test]
    fn escalation_message_names_user() {
        let msg = escalation_message("frank");
        assert!(msg.starts_with(":exclamation: *Attention Human*"));
        assert!(msg.contains("User frank is no longer eligible"));
    }
}
