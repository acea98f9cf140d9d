//! Domain types shared by the directory side and the workspace side.
//!
//! Wire payloads deserialize straight into these types via serde; flags the
//! workspace API omits default to `false`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Identifier of a group in the membership directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for GroupId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Workspace account identifier (e.g. `U024BE7LH`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Directory side
// ---------------------------------------------------------------------------

/// One entry of a directory group's effective membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMember {
    /// Principal type, e.g. `uwnetid` for people or `group` for nested groups.
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// Identifiers allowed into the workspace. Built once per run, then read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermittedSet {
    members: HashSet<String>,
}

impl PermittedSet {
    /// Keep only members whose principal type equals `member_type`.
    pub fn from_members<'a, I>(members: I, member_type: &str) -> Self
    where
        I: IntoIterator<Item = &'a DirectoryMember>,
    {
        let members = members
            .into_iter()
            .filter(|m| m.kind == member_type)
            .map(|m| m.id.clone())
            .collect();
        Self { members }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PermittedSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            members: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Workspace side
// ---------------------------------------------------------------------------

/// A workspace account as listed by `users.list`, snapshotted for the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceUser {
    pub id: UserId,
    /// Display handle. This is the key tested against the permitted set.
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_app_user: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub is_primary_owner: bool,
}

impl WorkspaceUser {
    /// Bots and app integrations.
    pub fn is_service_account(&self) -> bool {
        self.is_bot || self.is_app_user
    }

    /// Admins, owners and the primary owner.
    pub fn is_privileged(&self) -> bool {
        self.is_admin || self.is_owner || self.is_primary_owner
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
