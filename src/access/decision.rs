//! Access decision engine.
//!
//! One check answers: may this user, acting under this active role, perform
//! this (resource, action)? The answer depends only on role store state at
//! the moment of the check, so deactivating a role is picked up by the
//! caller's next request without any session bookkeeping.

use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::access::catalog::Permission;
use crate::access::store::{RoleStatus, RoleStore};
use crate::utils::errors::AppError;

/// Outcome of a single authorization check. Ephemeral: attached to request
/// extensions for downstream logging, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    Deny { reason: DenyReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    RoleInactive,
    PermissionMissing,
    RoleNotAssigned,
}

impl AccessDecision {
    pub fn deny(reason: DenyReason) -> Self {
        AccessDecision::Deny { reason }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::RoleInactive => "role_inactive",
            DenyReason::PermissionMissing => "permission_missing",
            DenyReason::RoleNotAssigned => "role_not_assigned",
        }
    }
}

/// Pure decision core over facts already read from the store.
/// `role_status` is `None` when the claimed role does not resolve.
///
/// The checks apply in a fixed order, so when several facts would each
/// deny, the earliest wins: assignment, then role status, then permission
/// membership. A role's authority is exactly its explicit permission set;
/// there is no hierarchy, wildcard, or admin bypass.
pub fn decide(
    assigned: bool,
    role_status: Option<RoleStatus>,
    permission_held: bool,
) -> AccessDecision {
    if !assigned {
        return AccessDecision::deny(DenyReason::RoleNotAssigned);
    }

    match role_status {
        // An assignment to a role the store no longer resolves is treated
        // exactly like a missing assignment, so the response reveals
        // nothing about whether the role exists.
        None => AccessDecision::deny(DenyReason::RoleNotAssigned),
        Some(status) if status != RoleStatus::Active => {
            AccessDecision::deny(DenyReason::RoleInactive)
        }
        Some(_) => {
            if permission_held {
                AccessDecision::Allow
            } else {
                AccessDecision::deny(DenyReason::PermissionMissing)
            }
        }
    }
}

/// Decides whether `user_id`, acting under `active_role_id`, may perform
/// `permission`, reading store state at the moment of the check.
#[instrument(skip(store))]
pub async fn authorize(
    store: &dyn RoleStore,
    user_id: Uuid,
    active_role_id: Uuid,
    permission: Permission,
) -> Result<AccessDecision, AppError> {
    let assigned = store.holds_assignment(user_id, active_role_id).await?;
    let role_status = store
        .get_role(active_role_id)
        .await?
        .map(|role| role.status);
    let permission_held = store.has_permission(active_role_id, permission).await?;

    Ok(decide(assigned, role_status, permission_held))
}
