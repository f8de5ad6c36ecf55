use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorResponse};
use crate::utils::pagination::PaginationParams;
use crate::validator::ValidatedJson;

use super::model::{
    CreateStaffDto, PaginatedStaffResponse, ReviewStaffStatusDto, StaffMember, UpdateStaffDto,
};
use super::service::StaffService;

#[utoipa::path(
    post,
    path = "/api/staff",
    request_body = CreateStaffDto,
    responses(
        (status = 200, description = "Staff member created", body = StaffMember),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Staff"
)]
#[instrument]
pub async fn create_staff(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStaffDto>,
) -> Result<Json<StaffMember>, AppError> {
    let staff = StaffService::create_staff(&state.db, dto).await?;
    Ok(Json(staff))
}

#[utoipa::path(
    get,
    path = "/api/staff",
    params(PaginationParams),
    responses(
        (status = 200, description = "Staff ordered by name", body = PaginatedStaffResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Staff"
)]
#[instrument]
pub async fn get_staff_members(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedStaffResponse>, AppError> {
    let (data, total) = StaffService::get_staff_members(&state.db, &params).await?;
    Ok(Json(PaginatedStaffResponse {
        data,
        meta: params.meta(total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    params(
        ("id" = Uuid, Path, description = "Staff member ID")
    ),
    responses(
        (status = 200, description = "Staff member details", body = StaffMember),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Staff member not found", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Staff"
)]
#[instrument]
pub async fn get_staff_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StaffMember>, AppError> {
    let staff = StaffService::get_staff_member(&state.db, id).await?;
    Ok(Json(staff))
}

#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    params(
        ("id" = Uuid, Path, description = "Staff member ID")
    ),
    request_body = UpdateStaffDto,
    responses(
        (status = 200, description = "Staff member updated", body = StaffMember),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Staff member not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Staff"
)]
#[instrument]
pub async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStaffDto>,
) -> Result<Json<StaffMember>, AppError> {
    let staff = StaffService::update_staff(&state.db, id, dto).await?;
    Ok(Json(staff))
}

#[utoipa::path(
    post,
    path = "/api/staff/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Staff member ID")
    ),
    request_body = ReviewStaffStatusDto,
    responses(
        (status = 200, description = "Employment status reviewed", body = StaffMember),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Staff member not found", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Staff"
)]
#[instrument]
pub async fn review_staff_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ReviewStaffStatusDto>,
) -> Result<Json<StaffMember>, AppError> {
    let staff = StaffService::review_status(&state.db, id, dto).await?;
    Ok(Json(staff))
}
