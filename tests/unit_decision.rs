//! Decision-engine behavior over a live (in-memory) store: the 2x2 matrix
//! of role status x permission membership, plus the unassigned-claim case.

use uuid::Uuid;

use hallpass::access::catalog::{Action, Permission, Resource};
use hallpass::access::decision::{AccessDecision, DenyReason, authorize};
use hallpass::access::store::{MemoryRoleStore, RoleStatus, RoleStore};

const CHECKED: Permission = Permission {
    resource: Resource::Students,
    action: Action::Read,
};

async fn store_with(
    status: RoleStatus,
    permission_held: bool,
) -> (MemoryRoleStore, Uuid, Uuid) {
    let store = MemoryRoleStore::new();
    let user = Uuid::new_v4();

    let role = store.create_role("subject").await.unwrap();
    if permission_held {
        store.grant_permission(role.id, CHECKED).await.unwrap();
    }
    store.set_role_status(role.id, status).await.unwrap();
    store.assign_role(user, role.id).await.unwrap();

    (store, user, role.id)
}

#[tokio::test]
async fn allow_requires_active_status_and_membership() {
    let cases = [
        (RoleStatus::Active, true, AccessDecision::Allow),
        (
            RoleStatus::Active,
            false,
            AccessDecision::deny(DenyReason::PermissionMissing),
        ),
        (
            RoleStatus::Inactive,
            true,
            AccessDecision::deny(DenyReason::RoleInactive),
        ),
        (
            RoleStatus::Inactive,
            false,
            AccessDecision::deny(DenyReason::RoleInactive),
        ),
    ];

    for (status, held, expected) in cases {
        let (store, user, role_id) = store_with(status, held).await;
        let decision = authorize(&store, user, role_id, CHECKED).await.unwrap();
        assert_eq!(decision, expected, "status={status} permission_held={held}");
    }
}

#[tokio::test]
async fn unassigned_claims_deny_identically_whether_the_role_exists() {
    let (store, user, _) = store_with(RoleStatus::Active, true).await;

    // An existing role the user never held.
    let foreign = store.create_role("foreign").await.unwrap();
    store
        .set_role_status(foreign.id, RoleStatus::Active)
        .await
        .unwrap();
    let decision = authorize(&store, user, foreign.id, CHECKED).await.unwrap();
    assert_eq!(decision, AccessDecision::deny(DenyReason::RoleNotAssigned));

    // A role id that resolves to nothing at all.
    let decision = authorize(&store, user, Uuid::new_v4(), CHECKED)
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::deny(DenyReason::RoleNotAssigned));
}

#[tokio::test]
async fn activation_flips_a_denial_into_an_allow() {
    let (store, user, role_id) = store_with(RoleStatus::Inactive, true).await;

    let decision = authorize(&store, user, role_id, CHECKED).await.unwrap();
    assert_eq!(decision, AccessDecision::deny(DenyReason::RoleInactive));

    store
        .set_role_status(role_id, RoleStatus::Active)
        .await
        .unwrap();

    let decision = authorize(&store, user, role_id, CHECKED).await.unwrap();
    assert_eq!(decision, AccessDecision::Allow);
}

#[tokio::test]
async fn authority_is_exactly_the_explicit_permission_set() {
    let (store, user, role_id) = store_with(RoleStatus::Active, true).await;

    // Holding students:read implies nothing about other pairs.
    for permission in Permission::all().filter(|p| *p != CHECKED) {
        let decision = authorize(&store, user, role_id, permission).await.unwrap();
        assert_eq!(
            decision,
            AccessDecision::deny(DenyReason::PermissionMissing),
            "{permission}"
        );
    }
}
