use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationParams;

use super::model::{CreateStaffDto, ReviewStaffStatusDto, StaffMember, UpdateStaffDto};

pub struct StaffService;

impl StaffService {
    #[instrument(skip(db, dto))]
    pub async fn create_staff(db: &PgPool, dto: CreateStaffDto) -> Result<StaffMember, AppError> {
        let staff = sqlx::query_as::<_, StaffMember>(
            r#"INSERT INTO staff (name, email, title)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, title, employed, reviewed_by, created_at, updated_at"#,
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(dto.title.as_deref())
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow!(
                        "A staff member with email {} already exists",
                        dto.email
                    ));
                }
            }
            AppError::database(e)
        })?;

        Ok(staff)
    }

    #[instrument(skip(db))]
    pub async fn get_staff_members(
        db: &PgPool,
        params: &PaginationParams,
    ) -> Result<(Vec<StaffMember>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM staff"#)
            .fetch_one(db)
            .await?;

        let staff = sqlx::query_as::<_, StaffMember>(
            r#"SELECT id, name, email, title, employed, reviewed_by, created_at, updated_at
            FROM staff
            ORDER BY name, id
            LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Ok((staff, total))
    }

    #[instrument(skip(db))]
    pub async fn get_staff_member(db: &PgPool, id: Uuid) -> Result<StaffMember, AppError> {
        sqlx::query_as::<_, StaffMember>(
            r#"SELECT id, name, email, title, employed, reviewed_by, created_at, updated_at
            FROM staff WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Staff member not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_staff(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStaffDto,
    ) -> Result<StaffMember, AppError> {
        let staff = sqlx::query_as::<_, StaffMember>(
            r#"UPDATE staff
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                title = COALESCE($4, title),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, title, employed, reviewed_by, created_at, updated_at"#,
        )
        .bind(id)
        .bind(dto.name.as_deref())
        .bind(dto.email.as_deref())
        .bind(dto.title.as_deref())
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow!("That email is already in use"));
                }
            }
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow!("Staff member not found")))?;

        Ok(staff)
    }

    #[instrument(skip(db, dto))]
    pub async fn review_status(
        db: &PgPool,
        id: Uuid,
        dto: ReviewStaffStatusDto,
    ) -> Result<StaffMember, AppError> {
        sqlx::query_as::<_, StaffMember>(
            r#"UPDATE staff
            SET employed = $2, reviewed_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, title, employed, reviewed_by, created_at, updated_at"#,
        )
        .bind(id)
        .bind(dto.employed)
        .bind(dto.reviewer_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Staff member not found")))
    }
}
