mod common;

use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use common::{authed_request, response_json, seed_active_role, setup_test_app, setup_test_app_with};
use hallpass::access::catalog::{Action, Permission, Resource};
use hallpass::access::store::{
    MemoryRoleStore, Role, RoleStatus, RoleStore, RoleWithPermissions,
};
use hallpass::config::gate::GateConfig;
use hallpass::utils::errors::AppError;

#[tokio::test]
async fn allows_a_request_whose_active_role_holds_the_permission() {
    let store = Arc::new(MemoryRoleStore::new());
    let user = Uuid::new_v4();
    let role = seed_active_role(&store, "auditor", user, &[(Resource::Roles, Action::Read)]).await;

    let app = setup_test_app(store);
    let response = app
        .oneshot(authed_request("GET", "/api/roles", user, role.id, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn denies_with_permission_missing_when_the_set_lacks_the_pair() {
    let store = Arc::new(MemoryRoleStore::new());
    let user = Uuid::new_v4();
    // Holds roles:read but the request needs students:read.
    let role = seed_active_role(&store, "auditor", user, &[(Resource::Roles, Action::Read)]).await;

    let app = setup_test_app(store);
    let response = app
        .oneshot(authed_request("GET", "/api/students", user, role.id, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response_json(response).await;
    assert_eq!(body["reason"], "permission_missing");
}

#[tokio::test]
async fn denies_with_role_inactive_after_deactivation() {
    let store = Arc::new(MemoryRoleStore::new());
    let user = Uuid::new_v4();
    let role = seed_active_role(&store, "auditor", user, &[(Resource::Roles, Action::Read)]).await;

    store
        .set_role_status(role.id, RoleStatus::Inactive)
        .await
        .unwrap();

    let app = setup_test_app(store);
    let response = app
        .oneshot(authed_request("GET", "/api/roles", user, role.id, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response_json(response).await;
    assert_eq!(body["reason"], "role_inactive");
}

#[tokio::test]
async fn denies_with_role_not_assigned_for_a_forged_claim() {
    let store = Arc::new(MemoryRoleStore::new());
    let user = Uuid::new_v4();
    seed_active_role(&store, "auditor", user, &[(Resource::Roles, Action::Read)]).await;

    // A real role the user was never assigned, and a role id that does not
    // exist at all: the response is identical for both.
    let other = store.create_role("registrar").await.unwrap();
    store
        .set_role_status(other.id, RoleStatus::Active)
        .await
        .unwrap();

    let app = setup_test_app(Arc::clone(&store));
    for claimed in [other.id, Uuid::new_v4()] {
        let response = app
            .clone()
            .oneshot(authed_request("GET", "/api/roles", user, claimed, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = response_json(response).await;
        assert_eq!(body["reason"], "role_not_assigned");
        assert!(body.get("role").is_none());
    }
}

#[tokio::test]
async fn missing_identity_headers_are_unauthorized() {
    let store = Arc::new(MemoryRoleStore::new());
    let app = setup_test_app(store);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/roles")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbled_identity_header_is_unauthorized() {
    let store = Arc::new(MemoryRoleStore::new());
    let app = setup_test_app(store);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/roles")
                .header("x-user-id", "not-a-uuid")
                .header("x-active-role", Uuid::new_v4().to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_active_role_claim_is_unauthorized_on_gated_routes() {
    let store = Arc::new(MemoryRoleStore::new());
    let user = Uuid::new_v4();
    seed_active_role(&store, "auditor", user, &[(Resource::Roles, Action::Read)]).await;

    let app = setup_test_app(store);
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/roles")
                .header("x-user-id", user.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn permission_grant_is_visible_on_the_next_request() {
    let store = Arc::new(MemoryRoleStore::new());
    let user = Uuid::new_v4();
    let role = seed_active_role(&store, "auditor", user, &[]).await;

    let app = setup_test_app(Arc::clone(&store));

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/roles", user, role.id, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    store
        .grant_permission(
            role.id,
            hallpass::access::catalog::Permission::new(Resource::Roles, Action::Read),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(authed_request("GET", "/api/roles", user, role.id, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// Store whose authorization reads either fail outright or outlive the
/// gate's deadline. Only the reads `authorize` makes are reachable through
/// the gate; everything else fails loudly if touched.
enum Fault {
    Error,
    Stall,
}

struct BrokenRoleStore {
    fault: Fault,
}

impl BrokenRoleStore {
    fn fail<T>(&self) -> Result<T, AppError> {
        Err(AppError::internal(anyhow!("connection reset by peer")))
    }
}

#[async_trait]
impl RoleStore for BrokenRoleStore {
    async fn holds_assignment(&self, _user_id: Uuid, _role_id: Uuid) -> Result<bool, AppError> {
        match self.fault {
            Fault::Error => self.fail(),
            Fault::Stall => {
                tokio::time::sleep(Duration::from_millis(250)).await;
                Ok(true)
            }
        }
    }

    async fn get_role(&self, _role_id: Uuid) -> Result<Option<Role>, AppError> {
        match self.fault {
            Fault::Error => self.fail(),
            Fault::Stall => {
                tokio::time::sleep(Duration::from_millis(250)).await;
                Ok(None)
            }
        }
    }

    async fn has_permission(
        &self,
        _role_id: Uuid,
        _permission: Permission,
    ) -> Result<bool, AppError> {
        match self.fault {
            Fault::Error => self.fail(),
            Fault::Stall => {
                tokio::time::sleep(Duration::from_millis(250)).await;
                Ok(false)
            }
        }
    }

    async fn create_role(&self, _name: &str) -> Result<Role, AppError> {
        self.fail()
    }

    async fn rename_role(&self, _role_id: Uuid, _name: &str) -> Result<Role, AppError> {
        self.fail()
    }

    async fn list_roles(&self, _status: Option<RoleStatus>) -> Result<Vec<Role>, AppError> {
        self.fail()
    }

    async fn set_role_status(
        &self,
        _role_id: Uuid,
        _status: RoleStatus,
    ) -> Result<Role, AppError> {
        self.fail()
    }

    async fn grant_permission(
        &self,
        _role_id: Uuid,
        _permission: Permission,
    ) -> Result<RoleWithPermissions, AppError> {
        self.fail()
    }

    async fn list_permissions(&self, _role_id: Uuid) -> Result<Option<Vec<Permission>>, AppError> {
        self.fail()
    }

    async fn list_users_for_role(&self, _role_id: Uuid) -> Result<Option<Vec<Uuid>>, AppError> {
        self.fail()
    }

    async fn assign_role(&self, _user_id: Uuid, _role_id: Uuid) -> Result<(), AppError> {
        self.fail()
    }

    async fn active_role_id(&self, _user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        self.fail()
    }

    async fn switch_active_role(
        &self,
        _user_id: Uuid,
        _target_role_id: Uuid,
    ) -> Result<RoleWithPermissions, AppError> {
        self.fail()
    }
}

#[tokio::test]
async fn store_fault_denies_closed_without_a_reason_or_detail() {
    let app = setup_test_app_with(
        Arc::new(BrokenRoleStore {
            fault: Fault::Error,
        }),
        GateConfig::default(),
    );

    let response = app
        .oneshot(authed_request(
            "GET",
            "/api/roles",
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
        ))
        .await
        .unwrap();

    // Never a silent allow, never a 500, and the store's error stays out
    // of the body.
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Access denied");
    assert!(body.get("reason").is_none());
}

#[tokio::test]
async fn check_outliving_its_deadline_denies_closed() {
    let app = setup_test_app_with(
        Arc::new(BrokenRoleStore {
            fault: Fault::Stall,
        }),
        GateConfig {
            authorize_timeout_ms: 50,
        },
    );

    let response = app
        .oneshot(authed_request(
            "GET",
            "/api/roles",
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Access denied");
    assert!(body.get("reason").is_none());
}
