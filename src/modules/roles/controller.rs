use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::access::catalog::Permission;
use crate::access::store::{Role, RoleWithPermissions};
use crate::middleware::identity::AuthContext;
use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorResponse};
use crate::validator::ValidatedJson;

use super::model::{
    CreateRoleDto, GrantPermissionDto, RenameRoleDto, RoleFilterParams, RoleUsersResponse,
    SetRoleStatusDto, SwitchRoleDto,
};
use super::service;

// ============ Role Administration ============

#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRoleDto,
    responses(
        (status = 200, description = "Role created, inactive with no permissions", body = Role),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 409, description = "Role name already taken", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Roles"
)]
#[instrument]
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateRoleDto>,
) -> Result<Json<Role>, AppError> {
    let role = service::create_role(state.store.as_ref(), dto).await?;
    Ok(Json(role))
}

#[utoipa::path(
    get,
    path = "/api/roles",
    params(RoleFilterParams),
    responses(
        (status = 200, description = "All roles in creation order", body = Vec<Role>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Roles"
)]
#[instrument]
pub async fn list_roles(
    State(state): State<AppState>,
    Query(params): Query<RoleFilterParams>,
) -> Result<Json<Vec<Role>>, AppError> {
    let roles = service::list_roles(state.store.as_ref(), params.status).await?;
    Ok(Json(roles))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role details", body = Role),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Roles"
)]
#[instrument]
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Role>, AppError> {
    let role = service::get_role(state.store.as_ref(), id).await?;
    Ok(Json(role))
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    request_body = RenameRoleDto,
    responses(
        (status = 200, description = "Role renamed", body = Role),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 409, description = "Role name already taken", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Roles"
)]
#[instrument]
pub async fn rename_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<RenameRoleDto>,
) -> Result<Json<Role>, AppError> {
    let role = service::rename_role(state.store.as_ref(), id, dto).await?;
    Ok(Json(role))
}

#[utoipa::path(
    post,
    path = "/api/roles/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    request_body = SetRoleStatusDto,
    responses(
        (status = 200, description = "Role status updated", body = Role),
        (status = 400, description = "Invalid status value", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Roles"
)]
#[instrument]
pub async fn set_role_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<SetRoleStatusDto>,
) -> Result<Json<Role>, AppError> {
    let role = service::set_role_status(state.store.as_ref(), id, dto).await?;
    Ok(Json(role))
}

#[utoipa::path(
    post,
    path = "/api/roles/{id}/permissions",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    request_body = GrantPermissionDto,
    responses(
        (status = 200, description = "Permission granted (no-op if already held)", body = RoleWithPermissions),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Role or permission not found", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Roles"
)]
#[instrument]
pub async fn grant_role_permission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<GrantPermissionDto>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role = service::grant_permission(state.store.as_ref(), id, dto).await?;
    Ok(Json(role))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}/permissions",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "The role's permission set", body = Vec<Permission>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Roles"
)]
#[instrument]
pub async fn list_role_permissions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Permission>>, AppError> {
    let permissions = service::list_permissions(state.store.as_ref(), id).await?;
    Ok(Json(permissions))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}/users",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Users holding any assignment to the role", body = RoleUsersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Roles"
)]
#[instrument]
pub async fn list_role_users(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoleUsersResponse>, AppError> {
    let users = service::list_users_for_role(state.store.as_ref(), id).await?;
    Ok(Json(users))
}

// ============ Role Switch ============

#[utoipa::path(
    post,
    path = "/api/roles/switch",
    request_body = SwitchRoleDto,
    responses(
        (status = 200, description = "Active role switched", body = RoleWithPermissions),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Role not held or not active", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [])
    ),
    tag = "Roles"
)]
#[instrument]
pub async fn switch_role(
    State(state): State<AppState>,
    ctx: AuthContext,
    ValidatedJson(dto): ValidatedJson<SwitchRoleDto>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let switched =
        service::switch_active_role(state.store.as_ref(), ctx.user_id, dto.role_id).await?;
    Ok(Json(switched))
}
