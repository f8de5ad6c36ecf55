mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use common::{authed_request, response_json, seed_active_role, setup_test_app};
use hallpass::access::catalog::{Action, Resource};
use hallpass::access::store::{MemoryRoleStore, RoleStatus, RoleStore};

/// An administrator able to exercise the whole roles surface.
async fn admin(store: &MemoryRoleStore) -> (Uuid, Uuid) {
    let user = Uuid::new_v4();
    let role = seed_active_role(
        store,
        "admin",
        user,
        &[
            (Resource::Roles, Action::Create),
            (Resource::Roles, Action::Read),
            (Resource::Roles, Action::Update),
        ],
    )
    .await;
    (user, role.id)
}

#[tokio::test]
async fn created_roles_start_inactive_with_no_permissions() {
    let store = Arc::new(MemoryRoleStore::new());
    let (user, role_id) = admin(&store).await;
    let app = setup_test_app(Arc::clone(&store));

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/roles",
            user,
            role_id,
            Some(json!({"name": "editor"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = response_json(response).await;
    assert_eq!(created["name"], "editor");
    assert_eq!(created["status"], "inactive");

    let editor_id = created["id"].as_str().unwrap().to_string();
    let response = app
        .oneshot(authed_request(
            "GET",
            &format!("/api/roles/{}/permissions", editor_id),
            user,
            role_id,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!([]));
}

#[tokio::test]
async fn duplicate_role_names_conflict_case_insensitively() {
    let store = Arc::new(MemoryRoleStore::new());
    let (user, role_id) = admin(&store).await;
    let app = setup_test_app(store);

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/roles",
            user,
            role_id,
            Some(json!({"name": "Editor"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/roles",
            user,
            role_id,
            Some(json!({"name": "EDITOR"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn granting_a_permission_twice_is_a_no_op() {
    let store = Arc::new(MemoryRoleStore::new());
    let (user, role_id) = admin(&store).await;
    let app = setup_test_app(Arc::clone(&store));

    let editor = store.create_role("editor").await.unwrap();
    let grant = json!({"resource": "students", "action": "read"});

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(authed_request(
                "POST",
                &format!("/api/roles/{}/permissions", editor.id),
                user,
                role_id,
                Some(grant.clone()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(authed_request(
            "GET",
            &format!("/api/roles/{}/permissions", editor.id),
            user,
            role_id,
            None,
        ))
        .await
        .unwrap();
    let permissions = response_json(response).await;
    assert_eq!(
        permissions,
        json!([{"resource": "students", "action": "read"}])
    );
}

#[tokio::test]
async fn granting_a_pair_outside_the_catalog_is_not_found() {
    let store = Arc::new(MemoryRoleStore::new());
    let (user, role_id) = admin(&store).await;
    let app = setup_test_app(Arc::clone(&store));

    let editor = store.create_role("editor").await.unwrap();
    let response = app
        .oneshot(authed_request(
            "POST",
            &format!("/api/roles/{}/permissions", editor.id),
            user,
            role_id,
            Some(json!({"resource": "students", "action": "enroll"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_role_ids_are_not_found() {
    let store = Arc::new(MemoryRoleStore::new());
    let (user, role_id) = admin(&store).await;
    let app = setup_test_app(store);

    let missing = Uuid::new_v4();
    for (method, uri) in [
        ("GET", format!("/api/roles/{}", missing)),
        ("GET", format!("/api/roles/{}/permissions", missing)),
        ("GET", format!("/api/roles/{}/users", missing)),
    ] {
        let response = app
            .clone()
            .oneshot(authed_request(method, &uri, user, role_id, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
    }

    let response = app
        .oneshot(authed_request(
            "POST",
            &format!("/api/roles/{}/status", missing),
            user,
            role_id,
            Some(json!({"status": "active"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_roles_filters_by_status() {
    let store = Arc::new(MemoryRoleStore::new());
    let (user, admin_role) = admin(&store).await;
    let app = setup_test_app(Arc::clone(&store));

    store.create_role("editor").await.unwrap();

    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            "/api/roles?status=inactive",
            user,
            admin_role,
            None,
        ))
        .await
        .unwrap();
    let inactive = response_json(response).await;
    assert_eq!(inactive.as_array().unwrap().len(), 1);
    assert_eq!(inactive[0]["name"], "editor");

    let response = app
        .oneshot(authed_request("GET", "/api/roles", user, admin_role, None))
        .await
        .unwrap();
    let all = response_json(response).await;
    // Creation order: the seeded admin role first.
    assert_eq!(all[0]["name"], "admin");
    assert_eq!(all[1]["name"], "editor");
}

#[tokio::test]
async fn inactive_role_grants_take_effect_once_activated() {
    // Scenario: permission granted while the role is inactive denies with
    // role_inactive; the same check allows after activation.
    let store = Arc::new(MemoryRoleStore::new());
    let (admin_user, admin_role) = admin(&store).await;
    let app = setup_test_app(Arc::clone(&store));

    let editor = store.create_role("editor").await.unwrap();
    store
        .grant_permission(
            editor.id,
            hallpass::access::catalog::Permission::new(Resource::Roles, Action::Read),
        )
        .await
        .unwrap();

    let reader = Uuid::new_v4();
    store.assign_role(reader, editor.id).await.unwrap();

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/roles", reader, editor.id, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response_json(response).await["reason"], "role_inactive");

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            &format!("/api/roles/{}/status", editor.id),
            admin_user,
            admin_role,
            Some(json!({"status": "active"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(authed_request("GET", "/api/roles", reader, editor.id, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_role_users_includes_inactive_assignments() {
    let store = Arc::new(MemoryRoleStore::new());
    let (user, admin_role) = admin(&store).await;
    let app = setup_test_app(Arc::clone(&store));

    let editor = store.create_role("editor").await.unwrap();
    let holder = Uuid::new_v4();
    store.assign_role(holder, editor.id).await.unwrap();

    let response = app
        .oneshot(authed_request(
            "GET",
            &format!("/api/roles/{}/users", editor.id),
            user,
            admin_role,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["users"], json!([holder.to_string()]));
}

// ============ Role Switch ============

#[tokio::test]
async fn switching_returns_the_new_active_role_summary() {
    let store = Arc::new(MemoryRoleStore::new());
    let user = Uuid::new_v4();
    seed_active_role(&store, "teacher", user, &[(Resource::Students, Action::Read)]).await;

    let counselor = store.create_role("counselor").await.unwrap();
    store
        .set_role_status(counselor.id, RoleStatus::Active)
        .await
        .unwrap();
    store.assign_role(user, counselor.id).await.unwrap();

    let app = setup_test_app(Arc::clone(&store));
    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/roles/switch",
            user,
            counselor.id,
            Some(json!({"role_id": counselor.id})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["id"], counselor.id.to_string());
    assert_eq!(body["name"], "counselor");
    assert_eq!(body["permissions"], json!([]));

    assert_eq!(store.active_role_id(user).await.unwrap(), Some(counselor.id));
}

#[tokio::test]
async fn switching_back_and_forth_keeps_one_active_assignment() {
    let store = Arc::new(MemoryRoleStore::new());
    let user = Uuid::new_v4();
    let teacher =
        seed_active_role(&store, "teacher", user, &[(Resource::Students, Action::Read)]).await;

    let counselor = store.create_role("counselor").await.unwrap();
    store
        .set_role_status(counselor.id, RoleStatus::Active)
        .await
        .unwrap();
    store.assign_role(user, counselor.id).await.unwrap();

    let app = setup_test_app(Arc::clone(&store));
    for target in [counselor.id, teacher.id] {
        let response = app
            .clone()
            .oneshot(authed_request(
                "POST",
                "/api/roles/switch",
                user,
                target,
                Some(json!({"role_id": target})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.active_role_id(user).await.unwrap(), Some(target));
    }
}

#[tokio::test]
async fn switching_to_an_unassigned_role_is_forbidden_and_mutates_nothing() {
    let store = Arc::new(MemoryRoleStore::new());
    let user = Uuid::new_v4();
    let teacher =
        seed_active_role(&store, "teacher", user, &[(Resource::Students, Action::Read)]).await;

    let other = store.create_role("registrar").await.unwrap();
    store
        .set_role_status(other.id, RoleStatus::Active)
        .await
        .unwrap();

    let app = setup_test_app(Arc::clone(&store));
    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/roles/switch",
            user,
            teacher.id,
            Some(json!({"role_id": other.id})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    // The active assignment is untouched.
    assert_eq!(store.active_role_id(user).await.unwrap(), Some(teacher.id));
    assert!(!store.holds_assignment(user, other.id).await.unwrap());
}

#[tokio::test]
async fn switching_to_an_inactive_role_is_forbidden() {
    let store = Arc::new(MemoryRoleStore::new());
    let user = Uuid::new_v4();
    let teacher =
        seed_active_role(&store, "teacher", user, &[(Resource::Students, Action::Read)]).await;

    let dormant = store.create_role("dormant").await.unwrap();
    store.assign_role(user, dormant.id).await.unwrap();

    let app = setup_test_app(Arc::clone(&store));
    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/roles/switch",
            user,
            teacher.id,
            Some(json!({"role_id": dormant.id})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.active_role_id(user).await.unwrap(), Some(teacher.id));
}

#[tokio::test]
async fn switch_requires_identity_but_no_permission() {
    let store = Arc::new(MemoryRoleStore::new());
    let user = Uuid::new_v4();
    // Role with an empty permission set; the gate would deny everything.
    let bare = seed_active_role(&store, "bare", user, &[]).await;

    let app = setup_test_app(store);
    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/roles/switch",
            user,
            bare.id,
            Some(json!({"role_id": bare.id})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
