//! Decision table coverage for `reconcile_core::decide`.
//!
//! Each `#[case]` is one row of the table; flags not named in a case are false.

use reconcile_core::{decide, plan, Decision, PermittedSet, SkipReason, UserId, WorkspaceUser};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Default, Clone, Copy)]
struct Flags {
    deleted: bool,
    bot: bool,
    app: bool,
    admin: bool,
    owner: bool,
    primary_owner: bool,
}

fn user(id: &str, name: &str, f: Flags) -> WorkspaceUser {
    WorkspaceUser {
        id: UserId::from(id),
        name: name.to_string(),
        deleted: f.deleted,
        is_bot: f.bot,
        is_app_user: f.app,
        is_admin: f.admin,
        is_owner: f.owner,
        is_primary_owner: f.primary_owner,
    }
}

fn permitted() -> PermittedSet {
    ["alice", "bob", "dave"].into_iter().collect()
}

const NONE: Flags = Flags {
    deleted: false,
    bot: false,
    app: false,
    admin: false,
    owner: false,
    primary_owner: false,
};

// ---------------------------------------------------------------------------
// Parameterised decision table
// ---------------------------------------------------------------------------

#[rstest]
#[case("deleted_and_permitted", "dave", Flags { deleted: true, ..NONE }, Decision::Reactivate)]
#[case("deleted_not_permitted", "erin", Flags { deleted: true, ..NONE }, Decision::Skip(SkipReason::RemainsDeactivated))]
#[case("deleted_admin_not_permitted", "erin", Flags { deleted: true, admin: true, ..NONE }, Decision::Skip(SkipReason::RemainsDeactivated))]
#[case("active_and_permitted", "alice", NONE, Decision::Skip(SkipReason::AlreadyActive))]
#[case("active_permitted_admin", "alice", Flags { admin: true, ..NONE }, Decision::Skip(SkipReason::AlreadyActive))]
#[case("bot_not_permitted", "deploybot", Flags { bot: true, ..NONE }, Decision::Skip(SkipReason::ServiceAccount))]
#[case("app_user_not_permitted", "jira", Flags { app: true, ..NONE }, Decision::Skip(SkipReason::ServiceAccount))]
#[case("bot_that_is_also_admin", "opsbot", Flags { bot: true, admin: true, ..NONE }, Decision::Skip(SkipReason::ServiceAccount))]
#[case("admin_not_permitted", "frank", Flags { admin: true, ..NONE }, Decision::Escalate)]
#[case("owner_not_permitted", "grace", Flags { owner: true, ..NONE }, Decision::Escalate)]
#[case("primary_owner_not_permitted", "heidi", Flags { primary_owner: true, ..NONE }, Decision::Escalate)]
#[case("plain_user_not_permitted", "carol", NONE, Decision::Deactivate)]
fn decision_table(
    #[case] label: &str,
    #[case] name: &str,
    #[case] flags: Flags,
    #[case] expected: Decision,
) {
    let got = decide(&permitted(), &user("U0TEST", name, flags));
    assert_eq!(got, expected, "[{label}]");
}

// ---------------------------------------------------------------------------
// System bot short-circuit
// ---------------------------------------------------------------------------

#[rstest]
#[case(NONE)]
#[case(Flags { deleted: true, ..NONE })]
#[case(Flags { admin: true, owner: true, primary_owner: true, ..NONE })]
fn system_bot_is_always_skipped(#[case] flags: Flags) {
    // Even a name that would otherwise be reactivated.
    let bot = user("USLACKBOT", "dave", flags);
    assert_eq!(
        decide(&permitted(), &bot),
        Decision::Skip(SkipReason::SystemBot)
    );

    let stranger = user("USLACKBOT", "slackbot", flags);
    assert_eq!(
        decide(&permitted(), &stranger),
        Decision::Skip(SkipReason::SystemBot)
    );
}

// ---------------------------------------------------------------------------
// Join key fidelity
// ---------------------------------------------------------------------------

/// The permitted set is matched against the display name only. An account
/// whose *id* happens to equal a permitted identifier is still deactivated
/// when its name is not permitted.
#[test]
fn membership_is_matched_on_display_name_not_account_id() {
    let set: PermittedSet = ["alice"].into_iter().collect();

    let id_matches_only = user("alice", "a.smith", NONE);
    assert_eq!(decide(&set, &id_matches_only), Decision::Deactivate);

    let name_matches = user("U999", "alice", NONE);
    assert_eq!(
        decide(&set, &name_matches),
        Decision::Skip(SkipReason::AlreadyActive)
    );
}

#[test]
fn membership_is_case_sensitive() {
    let set: PermittedSet = ["alice"].into_iter().collect();
    assert_eq!(decide(&set, &user("U1", "Alice", NONE)), Decision::Deactivate);
}

// ---------------------------------------------------------------------------
// Whole-listing plan
// ---------------------------------------------------------------------------

#[test]
fn worked_example_deactivates_only_carol() {
    let set: PermittedSet = ["alice", "bob"].into_iter().collect();
    let users = vec![
        user("U1", "alice", NONE),
        user("U2", "carol", NONE),
        user("U3", "dave", Flags { deleted: true, ..NONE }),
    ];

    let actions: Vec<_> = plan(&set, users)
        .into_iter()
        .filter(|p| p.decision.is_action())
        .map(|p| (p.user.name, p.decision))
        .collect();
    assert_eq!(actions, [("carol".to_string(), Decision::Deactivate)]);
}

#[test]
fn planning_twice_yields_identical_decisions() {
    let users = vec![
        user("U1", "alice", NONE),
        user("U2", "carol", NONE),
        user("U3", "dave", Flags { deleted: true, ..NONE }),
        user("U4", "frank", Flags { admin: true, ..NONE }),
    ];
    let first = plan(&permitted(), users.clone());
    let second = plan(&permitted(), users);
    assert_eq!(first, second);
}
