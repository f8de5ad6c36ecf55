use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_role, get_role, grant_role_permission, list_role_permissions, list_role_users,
    list_roles, rename_role, set_role_status, switch_role,
};

/// Role administration endpoints. Mounted behind the access gate; every
/// route here requires a permission on the `roles` resource.
pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_role).get(list_roles))
        .route("/{id}", get(get_role).put(rename_role))
        .route("/{id}/status", post(set_role_status))
        .route(
            "/{id}/permissions",
            get(list_role_permissions).post(grant_role_permission),
        )
        .route("/{id}/users", get(list_role_users))
}

/// The switch endpoint is authenticated but not permission-gated: a user
/// whose active role has no permissions must still be able to switch.
pub fn init_role_switch_router() -> Router<AppState> {
    Router::new().route("/roles/switch", post(switch_role))
}
