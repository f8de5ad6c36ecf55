//! Role store: ownership of role records, their permission sets, and the
//! role assignments that link users to them.
//!
//! [`RoleStore`] is the seam between the access-control core and
//! persistence. [`PgRoleStore`] backs the running service;
//! [`MemoryRoleStore`] backs tests and embedded use.

pub mod memory;
pub mod postgres;

pub use memory::MemoryRoleStore;
pub use postgres::PgRoleStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::access::catalog::Permission;
use crate::utils::errors::AppError;

/// Role lifecycle status. Roles are deactivated, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleStatus {
    Active,
    Inactive,
}

impl RoleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleStatus::Active => "active",
            RoleStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for RoleStatus {
    type Err = UnknownRoleStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(RoleStatus::Active),
            "inactive" => Ok(RoleStatus::Inactive),
            other => Err(UnknownRoleStatus(other.to_string())),
        }
    }
}

impl fmt::Display for RoleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoleStatus(pub String);

impl fmt::Display for UnknownRoleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a role status", self.0)
    }
}

impl std::error::Error for UnknownRoleStatus {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub status: RoleStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// Storage contract for roles, permission grants, and role assignments.
///
/// Reads that can miss return `Ok(None)`; mutations fail with the typed
/// error the operation defines (404 for unknown roles, 409 for duplicate
/// names, 403 for ineligible switches). Store faults surface as 500s and
/// are never retried here.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Creates a role named `name`, starting inactive with no permissions.
    /// Names are unique case-insensitively.
    async fn create_role(&self, name: &str) -> Result<Role, AppError>;

    /// Renames a role, keeping the case-insensitive uniqueness rule.
    async fn rename_role(&self, role_id: Uuid, name: &str) -> Result<Role, AppError>;

    /// All roles in creation order, optionally filtered by status.
    async fn list_roles(&self, status: Option<RoleStatus>) -> Result<Vec<Role>, AppError>;

    async fn get_role(&self, role_id: Uuid) -> Result<Option<Role>, AppError>;

    /// Flips a role active or inactive. Takes effect on the next
    /// authorization check; in-flight requests are not revisited.
    async fn set_role_status(&self, role_id: Uuid, status: RoleStatus) -> Result<Role, AppError>;

    /// Grants a catalog permission to a role. Granting a permission the
    /// role already holds is a no-op. Returns the role with its updated
    /// permission set.
    async fn grant_permission(
        &self,
        role_id: Uuid,
        permission: Permission,
    ) -> Result<RoleWithPermissions, AppError>;

    /// The role's permission set, or `None` if the role is unknown.
    async fn list_permissions(&self, role_id: Uuid) -> Result<Option<Vec<Permission>>, AppError>;

    /// Users holding any assignment (active or not) to the role, or `None`
    /// if the role is unknown.
    async fn list_users_for_role(&self, role_id: Uuid) -> Result<Option<Vec<Uuid>>, AppError>;

    /// Links a user to a role with an inactive assignment. Idempotent per
    /// (user, role). This is the identity collaborator's entry point; it
    /// has no HTTP surface.
    async fn assign_role(&self, user_id: Uuid, role_id: Uuid) -> Result<(), AppError>;

    /// Whether the user holds any assignment (active or not) to the role.
    async fn holds_assignment(&self, user_id: Uuid, role_id: Uuid) -> Result<bool, AppError>;

    /// The role the user is currently acting under, or `None` when no
    /// assignment is active.
    async fn active_role_id(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError>;

    /// Whether the role's permission set contains `permission`.
    async fn has_permission(&self, role_id: Uuid, permission: Permission)
    -> Result<bool, AppError>;

    /// Makes `target_role_id` the user's single active assignment.
    ///
    /// Fails with a 403 if the user holds no assignment to the target or
    /// the target role is inactive. The clear-then-set is atomic: at no
    /// point can a user end up with two active assignments, including
    /// under concurrent switches for the same user.
    async fn switch_active_role(
        &self,
        user_id: Uuid,
        target_role_id: Uuid,
    ) -> Result<RoleWithPermissions, AppError>;
}

/// Deterministic ordering for permission sets returned to callers.
pub(crate) fn sort_permissions(permissions: &mut [Permission]) {
    permissions.sort_by_key(|p| (p.resource.as_str(), p.action.as_str()));
}
