use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::MessageResponse;
use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorResponse};
use crate::validator::ValidatedJson;

use super::model::{CreateSectionDto, Section, UpdateSectionDto};
use super::service::SectionService;

#[utoipa::path(
    post,
    path = "/api/sections",
    request_body = CreateSectionDto,
    responses(
        (status = 200, description = "Section created", body = Section),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 409, description = "Section name already taken", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Sections"
)]
#[instrument]
pub async fn create_section(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateSectionDto>,
) -> Result<Json<Section>, AppError> {
    let section = SectionService::create_section(&state.db, dto).await?;
    Ok(Json(section))
}

#[utoipa::path(
    get,
    path = "/api/sections",
    responses(
        (status = 200, description = "Sections ordered by name", body = Vec<Section>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Sections"
)]
#[instrument]
pub async fn get_sections(State(state): State<AppState>) -> Result<Json<Vec<Section>>, AppError> {
    let sections = SectionService::get_sections(&state.db).await?;
    Ok(Json(sections))
}

#[utoipa::path(
    get,
    path = "/api/sections/{id}",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    responses(
        (status = 200, description = "Section details", body = Section),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Section not found", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Sections"
)]
#[instrument]
pub async fn get_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Section>, AppError> {
    let section = SectionService::get_section(&state.db, id).await?;
    Ok(Json(section))
}

#[utoipa::path(
    put,
    path = "/api/sections/{id}",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    request_body = UpdateSectionDto,
    responses(
        (status = 200, description = "Section updated", body = Section),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Section not found", body = ErrorResponse),
        (status = 409, description = "Section name already taken", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Sections"
)]
#[instrument]
pub async fn update_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateSectionDto>,
) -> Result<Json<Section>, AppError> {
    let section = SectionService::update_section(&state.db, id, dto).await?;
    Ok(Json(section))
}

#[utoipa::path(
    delete,
    path = "/api/sections/{id}",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    responses(
        (status = 200, description = "Section deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Section not found", body = ErrorResponse)
    ),
    security(
        ("user_id_header" = [], "active_role_header" = [])
    ),
    tag = "Sections"
)]
#[instrument]
pub async fn delete_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    SectionService::delete_section(&state.db, id).await?;
    Ok(Json(MessageResponse {
        message: "Section deleted".to_string(),
    }))
}
