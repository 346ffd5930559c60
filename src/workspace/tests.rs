//! Unit tests for workspace scalar types and the membership directory.

use crate::workspace::{
    adapters::memory::InMemoryMembershipDirectory,
    domain::{ClientId, ParseRoleError, Role, UserId, WorkspaceId},
    ports::MembershipDirectory,
};
use rstest::rstest;

#[rstest]
#[case("advisor", Role::Advisor)]
#[case("staff", Role::Staff)]
#[case("client", Role::Client)]
#[case("  ADVISOR  ", Role::Advisor)]
fn role_parses_known_values(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(Role::try_from(raw), Ok(expected));
}

#[rstest]
fn role_rejects_unknown_value() {
    assert_eq!(
        Role::try_from("underwriter"),
        Err(ParseRoleError("underwriter".to_owned()))
    );
}

#[rstest]
#[case(Role::Advisor, true)]
#[case(Role::Staff, true)]
#[case(Role::Client, false)]
fn workflow_management_is_restricted_to_advisor_and_staff(
    #[case] role: Role,
    #[case] expected: bool,
) {
    assert_eq!(role.can_manage_workflows(), expected);
}

#[rstest]
fn role_round_trips_through_storage_representation(
    #[values(Role::Advisor, Role::Staff, Role::Client)] role: Role,
) {
    assert_eq!(Role::try_from(role.as_str()), Ok(role));
}

#[rstest]
fn client_id_converts_to_matching_user_id() {
    let client_id = ClientId::new();
    assert_eq!(
        client_id.into_user_id().into_inner(),
        client_id.into_inner()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn directory_returns_granted_role() {
    let directory = InMemoryMembershipDirectory::new();
    let workspace_id = WorkspaceId::new();
    let user_id = UserId::new();
    directory
        .grant(workspace_id, user_id, Role::Staff)
        .expect("grant should succeed");

    let role = directory
        .role_of(workspace_id, user_id)
        .await
        .expect("lookup should succeed");
    assert_eq!(role, Some(Role::Staff));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn directory_returns_none_for_non_member() {
    let directory = InMemoryMembershipDirectory::new();
    let role = directory
        .role_of(WorkspaceId::new(), UserId::new())
        .await
        .expect("lookup should succeed");
    assert_eq!(role, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn directory_scopes_grants_per_workspace() {
    let directory = InMemoryMembershipDirectory::new();
    let user_id = UserId::new();
    directory
        .grant(WorkspaceId::new(), user_id, Role::Advisor)
        .expect("grant should succeed");

    let role = directory
        .role_of(WorkspaceId::new(), user_id)
        .await
        .expect("lookup should succeed");
    assert_eq!(role, None);
}
