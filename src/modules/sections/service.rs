use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{CreateSectionDto, Section, UpdateSectionDto};

pub struct SectionService;

impl SectionService {
    #[instrument(skip(db, dto))]
    pub async fn create_section(db: &PgPool, dto: CreateSectionDto) -> Result<Section, AppError> {
        let section = sqlx::query_as::<_, Section>(
            r#"INSERT INTO sections (name, capacity)
            VALUES ($1, $2)
            RETURNING id, name, capacity, created_at, updated_at"#,
        )
        .bind(&dto.name)
        .bind(dto.capacity)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow!(
                        "A section named '{}' already exists",
                        dto.name
                    ));
                }
            }
            AppError::database(e)
        })?;

        Ok(section)
    }

    #[instrument(skip(db))]
    pub async fn get_sections(db: &PgPool) -> Result<Vec<Section>, AppError> {
        let sections = sqlx::query_as::<_, Section>(
            r#"SELECT id, name, capacity, created_at, updated_at
            FROM sections
            ORDER BY name, id"#,
        )
        .fetch_all(db)
        .await?;

        Ok(sections)
    }

    #[instrument(skip(db))]
    pub async fn get_section(db: &PgPool, id: Uuid) -> Result<Section, AppError> {
        sqlx::query_as::<_, Section>(
            r#"SELECT id, name, capacity, created_at, updated_at
            FROM sections WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Section not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_section(
        db: &PgPool,
        id: Uuid,
        dto: UpdateSectionDto,
    ) -> Result<Section, AppError> {
        let section = sqlx::query_as::<_, Section>(
            r#"UPDATE sections
            SET name = COALESCE($2, name),
                capacity = COALESCE($3, capacity),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, capacity, created_at, updated_at"#,
        )
        .bind(id)
        .bind(dto.name.as_deref())
        .bind(dto.capacity)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow!("That section name is already taken"));
                }
            }
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow!("Section not found")))?;

        Ok(section)
    }

    #[instrument(skip(db))]
    pub async fn delete_section(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM sections WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Section not found")));
        }

        Ok(())
    }
}
