//! Group directory client: who is permitted into the workspace.

use reconcile_core::{Config, DirectoryMember, GroupId, PermittedSet};
use serde::Deserialize;
use tracing::{debug, info};
use ureq::Agent;
use url::Url;

use crate::endpoint::Endpoint;
use crate::error::{ApiError, SyncError};
use crate::transport::{classify, decode, mutual_tls_agent};

const EFFECTIVE_MEMBER: &str = "effective_member";

/// Source of a group's effective (transitively expanded) membership.
pub trait DirectorySource {
    fn effective_members(&self, group: &GroupId) -> Result<Vec<DirectoryMember>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct EffectiveMemberResponse {
    data: Vec<DirectoryMember>,
}

/// Blocking client for `GET {base}/group/{group}/effective_member`.
#[derive(Debug)]
pub struct DirectoryClient {
    agent: Agent,
    base: Endpoint,
}

impl DirectoryClient {
    pub fn new(base_url: &Url, agent: Agent) -> Result<Self, SyncError> {
        Ok(Self {
            agent,
            base: Endpoint::base(base_url)?,
        })
    }

    /// Client authenticated with the configured certificate, key and CA.
    pub fn from_config(config: &Config) -> Result<Self, SyncError> {
        let agent = mutual_tls_agent(&config.gws.tls)?;
        Self::new(&config.gws.url, agent)
    }
}

impl DirectorySource for DirectoryClient {
    fn effective_members(&self, group: &GroupId) -> Result<Vec<DirectoryMember>, ApiError> {
        let url = self
            .base
            .clone()
            .segment("group")
            .segment(&group.0)
            .segment("effective_member")
            .build();
        debug!(%group, "fetching effective membership");

        let response = classify(
            EFFECTIVE_MEMBER,
            self.agent
                .request_url("GET", &url)
                .set("Accept", "application/json")
                .call(),
        )?;
        let body: EffectiveMemberResponse = decode(EFFECTIVE_MEMBER, response)?;
        Ok(body.data)
    }
}

/// Fetch `group` and keep only principals of `member_type`.
///
/// Any failure is fatal for the run: without the directory there is no
/// basis for deciding anything.
pub fn fetch_permitted_members(
    source: &impl DirectorySource,
    group: &GroupId,
    member_type: &str,
) -> Result<PermittedSet, SyncError> {
    let members = source
        .effective_members(group)
        .map_err(SyncError::Directory)?;
    let permitted = PermittedSet::from_members(&members, member_type);
    info!(
        %group,
        entries = members.len(),
        permitted = permitted.len(),
        "loaded permit group membership"
    );
    Ok(permitted)
}

/// Refuse to continue when the permitted set is below `minimum`.
pub fn check_failsafe(permitted: &PermittedSet, minimum: usize) -> Result<(), SyncError> {
    if permitted.len() < minimum {
        return Err(SyncError::FailsafeTriggered {
            found: permitted.len(),
            minimum,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<DirectoryMember>);

    impl DirectorySource for Fixed {
        fn effective_members(&self, _group: &GroupId) -> Result<Vec<DirectoryMember>, ApiError> {
            Ok(self.0.clone())
        }
    }

    struct Down;

    impl DirectorySource for Down {
        fn effective_members(&self, _group: &GroupId) -> Result<Vec<DirectoryMember>, ApiError> {
            Err(ApiError::Status {
                endpoint: EFFECTIVE_MEMBER,
                status: 503,
            })
        }
    }

    fn member(kind: &str, id: &str) -> DirectoryMember {
        DirectoryMember {
            kind: kind.into(),
            id: id.into(),
        }
    }

    #[test]
    fn nested_groups_are_filtered_out() {
        let source = Fixed(vec![
            member("uwnetid", "alice"),
            member("group", "u_other"),
            member("dns", "host.example.edu"),
        ]);
        let set = fetch_permitted_members(&source, &GroupId::from("g"), "uwnetid").expect("fetch");
        assert_eq!(set.len(), 1);
        assert!(set.contains("alice"));
    }

    #[test]
    fn http_failure_is_fatal() {
        let err = fetch_permitted_members(&Down, &GroupId::from("g"), "uwnetid").unwrap_err();
        assert!(matches!(
            err,
            SyncError::Directory(ApiError::Status { status: 503, .. })
        ));
        assert!(err.to_string().contains("directory fetch failed"));
    }

    #[test]
    fn failsafe_boundary() {
        let two: PermittedSet = ["a", "b"].into_iter().collect();
        assert!(check_failsafe(&two, 2).is_ok());
        assert!(check_failsafe(&two, 0).is_ok());
        let err = check_failsafe(&two, 3).unwrap_err();
        assert!(matches!(
            err,
            SyncError::FailsafeTriggered {
                found: 2,
                minimum: 3
            }
        ));
    }

    #[test]
    fn empty_set_trips_failsafe_of_one() {
        let err = check_failsafe(&PermittedSet::default(), 1).unwrap_err();
        assert!(err.to_string().contains("membership of permit group (0) is too small"));
    }
}
