use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(db, dto))]
    pub async fn create_department(
        db: &PgPool,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(
            r#"INSERT INTO departments (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at"#,
        )
        .bind(&dto.name)
        .bind(dto.description.as_deref())
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow!(
                        "A department named '{}' already exists",
                        dto.name
                    ));
                }
            }
            AppError::database(e)
        })?;

        Ok(department)
    }

    #[instrument(skip(db))]
    pub async fn get_departments(db: &PgPool) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>(
            r#"SELECT id, name, description, created_at, updated_at
            FROM departments
            ORDER BY name, id"#,
        )
        .fetch_all(db)
        .await?;

        Ok(departments)
    }

    #[instrument(skip(db))]
    pub async fn get_department(db: &PgPool, id: Uuid) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            r#"SELECT id, name, description, created_at, updated_at
            FROM departments WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Department not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_department(
        db: &PgPool,
        id: Uuid,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(
            r#"UPDATE departments
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at"#,
        )
        .bind(id)
        .bind(dto.name.as_deref())
        .bind(dto.description.as_deref())
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow!("That department name is already taken"));
                }
            }
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow!("Department not found")))?;

        Ok(department)
    }

    #[instrument(skip(db))]
    pub async fn delete_department(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM departments WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Department not found")));
        }

        Ok(())
    }
}
