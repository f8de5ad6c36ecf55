//! PostgreSQL [`RoleStore`].
//!
//! Queries are checked at runtime so the crate builds without a database.
//! The switch transaction locks the user's assignment rows up front, which
//! serializes switches per user; a partial unique index on
//! `role_assignments (user_id) WHERE active` backs the one-active invariant
//! at the schema level.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::access::catalog::Permission;
use crate::utils::errors::AppError;

use super::{Role, RoleStatus, RoleStore, RoleWithPermissions};

#[derive(Clone)]
pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_permissions(&self, role_id: Uuid) -> Result<Vec<Permission>, AppError> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"SELECT resource, action FROM role_permissions
            WHERE role_id = $1
            ORDER BY resource, action"#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PermissionRow::into_domain).collect()
    }
}

#[derive(FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl RoleRow {
    fn into_domain(self) -> Result<Role, AppError> {
        let status = self
            .status
            .parse::<RoleStatus>()
            .map_err(|_| AppError::internal(anyhow!("unexpected role status '{}' in store", self.status)))?;

        Ok(Role {
            id: self.id,
            name: self.name,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct PermissionRow {
    resource: String,
    action: String,
}

impl PermissionRow {
    fn into_domain(self) -> Result<Permission, AppError> {
        let resource = self
            .resource
            .parse()
            .map_err(|_| AppError::internal(anyhow!("unexpected resource '{}' in store", self.resource)))?;
        let action = self
            .action
            .parse()
            .map_err(|_| AppError::internal(anyhow!("unexpected action '{}' in store", self.action)))?;

        Ok(Permission { resource, action })
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn create_role(&self, name: &str) -> Result<Role, AppError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"INSERT INTO roles (name, status)
            VALUES ($1, 'inactive')
            RETURNING id, name, status, created_at, updated_at"#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow!("A role named '{}' already exists", name));
                }
            }
            AppError::from(e)
        })?;

        row.into_domain()
    }

    async fn rename_role(&self, role_id: Uuid, name: &str) -> Result<Role, AppError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"UPDATE roles SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, status, created_at, updated_at"#,
        )
        .bind(role_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow!("A role named '{}' already exists", name));
                }
            }
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;

        row.into_domain()
    }

    async fn list_roles(&self, status: Option<RoleStatus>) -> Result<Vec<Role>, AppError> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, RoleRow>(
                    r#"SELECT id, name, status, created_at, updated_at FROM roles
                    WHERE status = $1
                    ORDER BY created_at, id"#,
                )
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, RoleRow>(
                    r#"SELECT id, name, status, created_at, updated_at FROM roles
                    ORDER BY created_at, id"#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(RoleRow::into_domain).collect()
    }

    async fn get_role(&self, role_id: Uuid) -> Result<Option<Role>, AppError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"SELECT id, name, status, created_at, updated_at FROM roles WHERE id = $1"#,
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RoleRow::into_domain).transpose()
    }

    async fn set_role_status(&self, role_id: Uuid, status: RoleStatus) -> Result<Role, AppError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"UPDATE roles SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, status, created_at, updated_at"#,
        )
        .bind(role_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;

        row.into_domain()
    }

    async fn grant_permission(
        &self,
        role_id: Uuid,
        permission: Permission,
    ) -> Result<RoleWithPermissions, AppError> {
        let role = self
            .get_role(role_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;

        sqlx::query(
            r#"INSERT INTO role_permissions (role_id, resource, action)
            VALUES ($1, $2, $3)
            ON CONFLICT (role_id, resource, action) DO NOTHING"#,
        )
        .bind(role_id)
        .bind(permission.resource.as_str())
        .bind(permission.action.as_str())
        .execute(&self.pool)
        .await?;

        let permissions = self.fetch_permissions(role_id).await?;

        Ok(RoleWithPermissions { role, permissions })
    }

    async fn list_permissions(&self, role_id: Uuid) -> Result<Option<Vec<Permission>>, AppError> {
        if self.get_role(role_id).await?.is_none() {
            return Ok(None);
        }

        Ok(Some(self.fetch_permissions(role_id).await?))
    }

    async fn list_users_for_role(&self, role_id: Uuid) -> Result<Option<Vec<Uuid>>, AppError> {
        if self.get_role(role_id).await?.is_none() {
            return Ok(None);
        }

        let user_ids = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT user_id FROM role_assignments
            WHERE role_id = $1
            ORDER BY assigned_at, user_id"#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(user_ids))
    }

    async fn assign_role(&self, user_id: Uuid, role_id: Uuid) -> Result<(), AppError> {
        if self.get_role(role_id).await?.is_none() {
            return Err(AppError::not_found(anyhow!("Role not found")));
        }

        sqlx::query(
            r#"INSERT INTO role_assignments (user_id, role_id, active)
            VALUES ($1, $2, FALSE)
            ON CONFLICT (user_id, role_id) DO NOTHING"#,
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn holds_assignment(&self, user_id: Uuid, role_id: Uuid) -> Result<bool, AppError> {
        let held = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                SELECT 1 FROM role_assignments WHERE user_id = $1 AND role_id = $2
            )"#,
        )
        .bind(user_id)
        .bind(role_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(held)
    }

    async fn active_role_id(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let role_id = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT role_id FROM role_assignments WHERE user_id = $1 AND active"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role_id)
    }

    async fn has_permission(
        &self,
        role_id: Uuid,
        permission: Permission,
    ) -> Result<bool, AppError> {
        let held = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                SELECT 1 FROM role_permissions
                WHERE role_id = $1 AND resource = $2 AND action = $3
            )"#,
        )
        .bind(role_id)
        .bind(permission.resource.as_str())
        .bind(permission.action.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(held)
    }

    async fn switch_active_role(
        &self,
        user_id: Uuid,
        target_role_id: Uuid,
    ) -> Result<RoleWithPermissions, AppError> {
        let mut tx = self.pool.begin().await?;

        // Locks every assignment row of this user for the duration of the
        // transaction; a concurrent switch for the same user queues here.
        // Dropping the transaction on any early return rolls back.
        let held_roles = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT role_id FROM role_assignments WHERE user_id = $1 FOR UPDATE"#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        if !held_roles.contains(&target_role_id) {
            return Err(AppError::forbidden(anyhow!("You do not hold this role")));
        }

        let role = sqlx::query_as::<_, RoleRow>(
            r#"SELECT id, name, status, created_at, updated_at FROM roles WHERE id = $1"#,
        )
        .bind(target_role_id)
        .fetch_optional(&mut *tx)
        .await?
        .map(RoleRow::into_domain)
        .transpose()?;

        let role = match role {
            Some(role) if role.status == RoleStatus::Active => role,
            _ => {
                return Err(AppError::forbidden(anyhow!(
                    "This role is not currently active"
                )));
            }
        };

        sqlx::query(r#"UPDATE role_assignments SET active = FALSE WHERE user_id = $1 AND active"#)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"UPDATE role_assignments SET active = TRUE WHERE user_id = $1 AND role_id = $2"#,
        )
        .bind(user_id)
        .bind(target_role_id)
        .execute(&mut *tx)
        .await?;

        let permission_rows = sqlx::query_as::<_, PermissionRow>(
            r#"SELECT resource, action FROM role_permissions
            WHERE role_id = $1
            ORDER BY resource, action"#,
        )
        .bind(target_role_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let permissions = permission_rows
            .into_iter()
            .map(PermissionRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RoleWithPermissions { role, permissions })
    }
}
