//! Access gate for protected routes.
//!
//! Runs as `route_layer` middleware over the protected subtree: it reads
//! the caller's identity, looks up the permission the matched route
//! requires, asks the decision engine, and either forwards the request or
//! rejects it. Requests never reach a handler without an allow.
//!
//! The gate fails closed. A route with no table entry, a store fault, or a
//! check that outlives its deadline all deny with a plain 403; only a
//! completed deny decision carries a machine-readable reason.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::time::timeout;
use tracing::{error, warn};

use crate::access::catalog::{Action, Permission, Resource};
use crate::access::decision::{AccessDecision, authorize};
use crate::metrics::{track_authorization_check, track_gate_failure};
use crate::middleware::identity::AuthContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// The permission a protected route requires, keyed by method and matched
/// route pattern (path parameters unexpanded, e.g. `/api/roles/{id}`).
///
/// Adding an endpoint under the gate means adding a row here; a missing
/// row denies every request to that route.
pub fn route_permission(method: &Method, path: &str) -> Option<Permission> {
    use Action::*;
    use Resource::*;

    let (resource, action) = match (method.as_str(), path) {
        ("GET", "/api/roles") => (Roles, Read),
        ("POST", "/api/roles") => (Roles, Create),
        ("GET", "/api/roles/{id}") => (Roles, Read),
        ("PUT", "/api/roles/{id}") => (Roles, Update),
        ("POST", "/api/roles/{id}/status") => (Roles, Update),
        ("GET", "/api/roles/{id}/permissions") => (Roles, Read),
        ("POST", "/api/roles/{id}/permissions") => (Roles, Update),
        ("GET", "/api/roles/{id}/users") => (Roles, Read),

        ("GET", "/api/students") => (Students, Read),
        ("POST", "/api/students") => (Students, Create),
        ("GET", "/api/students/{id}") => (Students, Read),
        ("PUT", "/api/students/{id}") => (Students, Update),
        ("POST", "/api/students/{id}/status") => (Students, Update),

        ("GET", "/api/staff") => (Staff, Read),
        ("POST", "/api/staff") => (Staff, Create),
        ("GET", "/api/staff/{id}") => (Staff, Read),
        ("PUT", "/api/staff/{id}") => (Staff, Update),
        ("POST", "/api/staff/{id}/status") => (Staff, Update),

        ("GET", "/api/departments") => (Departments, Read),
        ("POST", "/api/departments") => (Departments, Create),
        ("GET", "/api/departments/{id}") => (Departments, Read),
        ("PUT", "/api/departments/{id}") => (Departments, Update),
        ("DELETE", "/api/departments/{id}") => (Departments, Delete),

        ("GET", "/api/sections") => (Sections, Read),
        ("POST", "/api/sections") => (Sections, Create),
        ("GET", "/api/sections/{id}") => (Sections, Read),
        ("PUT", "/api/sections/{id}") => (Sections, Update),
        ("DELETE", "/api/sections/{id}") => (Sections, Delete),

        _ => return None,
    };

    Some(Permission::new(resource, action))
}

/// Gate middleware for `middleware::from_fn_with_state`.
pub async fn access_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match check_access(state, req, next).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn check_access(state: AppState, req: Request, next: Next) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let ctx = AuthContext::from_request_parts(&mut parts, &state).await?;
    let active_role_id = ctx.active_role_id()?;

    let path = parts
        .extensions
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| parts.uri.path().to_owned());

    let Some(permission) = route_permission(&parts.method, &path) else {
        warn!(method = %parts.method, path = %path, "No permission mapped for protected route");
        track_gate_failure("unmapped_route");
        return Err(AppError::forbidden(anyhow!("Access denied")));
    };

    let deadline = state.gate_config.authorize_timeout();
    let checked = timeout(
        deadline,
        authorize(
            state.store.as_ref(),
            ctx.user_id,
            active_role_id,
            permission,
        ),
    )
    .await;

    let decision = match checked {
        Ok(Ok(decision)) => decision,
        Ok(Err(err)) => {
            error!(error = ?err.error, "Authorization check failed");
            track_gate_failure("store_error");
            return Err(AppError::forbidden(anyhow!("Access denied")));
        }
        Err(_) => {
            warn!(
                timeout_ms = state.gate_config.authorize_timeout_ms,
                "Authorization check timed out"
            );
            track_gate_failure("timeout");
            return Err(AppError::forbidden(anyhow!("Access denied")));
        }
    };

    let denial = match decision {
        AccessDecision::Allow => None,
        AccessDecision::Deny { reason } => Some(reason),
    };
    track_authorization_check(
        denial.is_none(),
        denial.map(|r| r.as_str()),
        permission.resource.as_str(),
        permission.action.as_str(),
    );

    if let Some(reason) = denial {
        return Err(AppError::access_denied(reason.as_str()));
    }

    // Handlers behind the gate see the identity and decision that admitted
    // the request.
    parts.extensions.insert(ctx);
    parts.extensions.insert(decision);

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_collection_and_item_routes() {
        assert_eq!(
            route_permission(&Method::POST, "/api/roles"),
            Some(Permission::new(Resource::Roles, Action::Create))
        );
        assert_eq!(
            route_permission(&Method::GET, "/api/students/{id}"),
            Some(Permission::new(Resource::Students, Action::Read))
        );
        assert_eq!(
            route_permission(&Method::POST, "/api/staff/{id}/status"),
            Some(Permission::new(Resource::Staff, Action::Update))
        );
        assert_eq!(
            route_permission(&Method::DELETE, "/api/sections/{id}"),
            Some(Permission::new(Resource::Sections, Action::Delete))
        );
    }

    #[test]
    fn unmapped_routes_get_no_permission() {
        assert!(route_permission(&Method::GET, "/api/unknown").is_none());
        // Student and staff records are reviewed, never deleted.
        assert!(route_permission(&Method::DELETE, "/api/students/{id}").is_none());
        // Switching roles is authenticated but not permission-gated.
        assert!(route_permission(&Method::POST, "/api/roles/switch").is_none());
    }
}
