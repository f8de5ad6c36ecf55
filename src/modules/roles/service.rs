use anyhow::anyhow;
use tracing::instrument;
use uuid::Uuid;

use crate::access::catalog::{Action, Permission, Resource};
use crate::access::store::{Role, RoleStatus, RoleStore, RoleWithPermissions};
use crate::metrics::{track_role_created, track_role_switch};
use crate::utils::errors::AppError;

use super::model::{
    CreateRoleDto, GrantPermissionDto, RenameRoleDto, RoleUsersResponse, SetRoleStatusDto,
};

// ============ Role Administration ============

#[instrument(skip(store, dto))]
pub async fn create_role(store: &dyn RoleStore, dto: CreateRoleDto) -> Result<Role, AppError> {
    let role = store.create_role(&dto.name).await?;
    track_role_created();
    Ok(role)
}

#[instrument(skip(store))]
pub async fn list_roles(
    store: &dyn RoleStore,
    status: Option<RoleStatus>,
) -> Result<Vec<Role>, AppError> {
    store.list_roles(status).await
}

#[instrument(skip(store))]
pub async fn get_role(store: &dyn RoleStore, role_id: Uuid) -> Result<Role, AppError> {
    store
        .get_role(role_id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))
}

#[instrument(skip(store, dto))]
pub async fn rename_role(
    store: &dyn RoleStore,
    role_id: Uuid,
    dto: RenameRoleDto,
) -> Result<Role, AppError> {
    store.rename_role(role_id, &dto.name).await
}

#[instrument(skip(store, dto))]
pub async fn set_role_status(
    store: &dyn RoleStore,
    role_id: Uuid,
    dto: SetRoleStatusDto,
) -> Result<Role, AppError> {
    store.set_role_status(role_id, dto.status).await
}

#[instrument(skip(store, dto))]
pub async fn grant_permission(
    store: &dyn RoleStore,
    role_id: Uuid,
    dto: GrantPermissionDto,
) -> Result<RoleWithPermissions, AppError> {
    let permission = parse_permission(&dto.resource, &dto.action)?;
    store.grant_permission(role_id, permission).await
}

#[instrument(skip(store))]
pub async fn list_permissions(
    store: &dyn RoleStore,
    role_id: Uuid,
) -> Result<Vec<Permission>, AppError> {
    store
        .list_permissions(role_id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))
}

#[instrument(skip(store))]
pub async fn list_users_for_role(
    store: &dyn RoleStore,
    role_id: Uuid,
) -> Result<RoleUsersResponse, AppError> {
    let users = store
        .list_users_for_role(role_id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;

    Ok(RoleUsersResponse { role_id, users })
}

/// Resolves a (resource, action) string pair against the catalog. A pair
/// the catalog does not know does not exist, so the caller gets the same
/// 404 as for an unknown role id.
fn parse_permission(resource: &str, action: &str) -> Result<Permission, AppError> {
    let not_in_catalog =
        || AppError::not_found(anyhow!("No permission '{}' on '{}'", action, resource));

    let resource = resource.parse::<Resource>().map_err(|_| not_in_catalog())?;
    let action = action.parse::<Action>().map_err(|_| not_in_catalog())?;

    Ok(Permission::new(resource, action))
}

// ============ Role Switch ============

#[instrument(skip(store))]
pub async fn switch_active_role(
    store: &dyn RoleStore,
    user_id: Uuid,
    target_role_id: Uuid,
) -> Result<RoleWithPermissions, AppError> {
    let result = store.switch_active_role(user_id, target_role_id).await;
    track_role_switch(result.is_ok());
    result
}
