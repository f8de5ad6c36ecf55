//! In-memory [`RoleStore`] used by tests and embedded setups.
//!
//! Semantics mirror the Postgres store. Every operation runs under a single
//! lock, so the one-active-assignment invariant holds without row locking.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use anyhow::anyhow;

use crate::access::catalog::Permission;
use crate::utils::errors::AppError;

use super::{Role, RoleStatus, RoleStore, RoleWithPermissions, sort_permissions};

#[derive(Default)]
struct StoreInner {
    // Creation order; list_roles depends on it.
    roles: Vec<StoredRole>,
    // Assignment order; list_users_for_role depends on it.
    assignments: Vec<StoredAssignment>,
}

struct StoredRole {
    role: Role,
    permissions: HashSet<Permission>,
}

struct StoredAssignment {
    user_id: Uuid,
    role_id: Uuid,
    active: bool,
}

impl StoreInner {
    fn role(&self, role_id: Uuid) -> Option<&StoredRole> {
        self.roles.iter().find(|r| r.role.id == role_id)
    }

    fn role_mut(&mut self, role_id: Uuid) -> Option<&mut StoredRole> {
        self.roles.iter_mut().find(|r| r.role.id == role_id)
    }

    fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> bool {
        let lowered = name.to_lowercase();
        self.roles.iter().any(|r| {
            Some(r.role.id) != exclude && r.role.name.to_lowercase() == lowered
        })
    }

    fn with_permissions(&self, stored: &StoredRole) -> RoleWithPermissions {
        let mut permissions: Vec<Permission> = stored.permissions.iter().copied().collect();
        sort_permissions(&mut permissions);
        RoleWithPermissions {
            role: stored.role.clone(),
            permissions,
        }
    }
}

#[derive(Default)]
pub struct MemoryRoleStore {
    inner: RwLock<StoreInner>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>, AppError> {
        self.inner
            .read()
            .map_err(|_| AppError::internal(anyhow!("role store lock poisoned")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>, AppError> {
        self.inner
            .write()
            .map_err(|_| AppError::internal(anyhow!("role store lock poisoned")))
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn create_role(&self, name: &str) -> Result<Role, AppError> {
        let mut inner = self.write()?;

        if inner.name_taken(name, None) {
            return Err(AppError::conflict(anyhow!(
                "A role named '{}' already exists",
                name
            )));
        }

        let now = Utc::now();
        let role = Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            status: RoleStatus::Inactive,
            created_at: now,
            updated_at: now,
        };
        inner.roles.push(StoredRole {
            role: role.clone(),
            permissions: HashSet::new(),
        });

        Ok(role)
    }

    async fn rename_role(&self, role_id: Uuid, name: &str) -> Result<Role, AppError> {
        let mut inner = self.write()?;

        // Existence before conflict, matching the Postgres store.
        if inner.role(role_id).is_none() {
            return Err(AppError::not_found(anyhow!("Role not found")));
        }

        if inner.name_taken(name, Some(role_id)) {
            return Err(AppError::conflict(anyhow!(
                "A role named '{}' already exists",
                name
            )));
        }

        let stored = inner
            .role_mut(role_id)
            .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;
        stored.role.name = name.to_string();
        stored.role.updated_at = Utc::now();

        Ok(stored.role.clone())
    }

    async fn list_roles(&self, status: Option<RoleStatus>) -> Result<Vec<Role>, AppError> {
        let inner = self.read()?;

        Ok(inner
            .roles
            .iter()
            .filter(|r| status.is_none_or(|s| r.role.status == s))
            .map(|r| r.role.clone())
            .collect())
    }

    async fn get_role(&self, role_id: Uuid) -> Result<Option<Role>, AppError> {
        let inner = self.read()?;

        Ok(inner.role(role_id).map(|r| r.role.clone()))
    }

    async fn set_role_status(&self, role_id: Uuid, status: RoleStatus) -> Result<Role, AppError> {
        let mut inner = self.write()?;

        let stored = inner
            .role_mut(role_id)
            .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;
        stored.role.status = status;
        stored.role.updated_at = Utc::now();

        Ok(stored.role.clone())
    }

    async fn grant_permission(
        &self,
        role_id: Uuid,
        permission: Permission,
    ) -> Result<RoleWithPermissions, AppError> {
        let mut inner = self.write()?;

        let stored = inner
            .role_mut(role_id)
            .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;
        stored.permissions.insert(permission);

        let stored = inner
            .role(role_id)
            .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;
        Ok(inner.with_permissions(stored))
    }

    async fn list_permissions(&self, role_id: Uuid) -> Result<Option<Vec<Permission>>, AppError> {
        let inner = self.read()?;

        Ok(inner.role(role_id).map(|stored| {
            let mut permissions: Vec<Permission> = stored.permissions.iter().copied().collect();
            sort_permissions(&mut permissions);
            permissions
        }))
    }

    async fn list_users_for_role(&self, role_id: Uuid) -> Result<Option<Vec<Uuid>>, AppError> {
        let inner = self.read()?;

        if inner.role(role_id).is_none() {
            return Ok(None);
        }

        Ok(Some(
            inner
                .assignments
                .iter()
                .filter(|a| a.role_id == role_id)
                .map(|a| a.user_id)
                .collect(),
        ))
    }

    async fn assign_role(&self, user_id: Uuid, role_id: Uuid) -> Result<(), AppError> {
        let mut inner = self.write()?;

        if inner.role(role_id).is_none() {
            return Err(AppError::not_found(anyhow!("Role not found")));
        }

        let already_assigned = inner
            .assignments
            .iter()
            .any(|a| a.user_id == user_id && a.role_id == role_id);
        if !already_assigned {
            inner.assignments.push(StoredAssignment {
                user_id,
                role_id,
                active: false,
            });
        }

        Ok(())
    }

    async fn holds_assignment(&self, user_id: Uuid, role_id: Uuid) -> Result<bool, AppError> {
        let inner = self.read()?;

        Ok(inner
            .assignments
            .iter()
            .any(|a| a.user_id == user_id && a.role_id == role_id))
    }

    async fn active_role_id(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let inner = self.read()?;

        Ok(inner
            .assignments
            .iter()
            .find(|a| a.user_id == user_id && a.active)
            .map(|a| a.role_id))
    }

    async fn has_permission(
        &self,
        role_id: Uuid,
        permission: Permission,
    ) -> Result<bool, AppError> {
        let inner = self.read()?;

        Ok(inner
            .role(role_id)
            .is_some_and(|r| r.permissions.contains(&permission)))
    }

    async fn switch_active_role(
        &self,
        user_id: Uuid,
        target_role_id: Uuid,
    ) -> Result<RoleWithPermissions, AppError> {
        let mut inner = self.write()?;

        let holds_target = inner
            .assignments
            .iter()
            .any(|a| a.user_id == user_id && a.role_id == target_role_id);
        if !holds_target {
            return Err(AppError::forbidden(anyhow!(
                "You do not hold this role"
            )));
        }

        match inner.role(target_role_id) {
            Some(stored) if stored.role.status == RoleStatus::Active => {}
            _ => {
                return Err(AppError::forbidden(anyhow!(
                    "This role is not currently active"
                )));
            }
        }

        // Clear-then-set under the write lock; no interleaving can observe
        // two active assignments for the user.
        for assignment in inner
            .assignments
            .iter_mut()
            .filter(|a| a.user_id == user_id)
        {
            assignment.active = assignment.role_id == target_role_id;
        }

        let stored = inner
            .role(target_role_id)
            .ok_or_else(|| AppError::internal(anyhow!("role vanished during switch")))?;
        Ok(inner.with_permissions(stored))
    }
}

#[cfg(test)]
impl MemoryRoleStore {
    fn active_assignment_count(&self, user_id: Uuid) -> usize {
        self.inner
            .read()
            .unwrap()
            .assignments
            .iter()
            .filter(|a| a.user_id == user_id && a.active)
            .count()
    }
}
