use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationParams;

use super::model::{CreateStudentDto, ReviewStudentStatusDto, Student, UpdateStudentDto};

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"INSERT INTO students (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email, enrolled, reviewed_by, created_at, updated_at"#,
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow!(
                        "A student with email {} already exists",
                        dto.email
                    ));
                }
            }
            AppError::database(e)
        })?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        params: &PaginationParams,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM students"#)
            .fetch_one(db)
            .await?;

        let students = sqlx::query_as::<_, Student>(
            r#"SELECT id, name, email, enrolled, reviewed_by, created_at, updated_at
            FROM students
            ORDER BY name, id
            LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Ok((students, total))
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            r#"SELECT id, name, email, enrolled, reviewed_by, created_at, updated_at
            FROM students WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"UPDATE students
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, enrolled, reviewed_by, created_at, updated_at"#,
        )
        .bind(id)
        .bind(dto.name.as_deref())
        .bind(dto.email.as_deref())
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
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        Ok(student)
    }

    /// Records a review decision: the new enrollment status and who made
    /// the call. Students are reviewed out of enrollment, never deleted.
    #[instrument(skip(db, dto))]
    pub async fn review_status(
        db: &PgPool,
        id: Uuid,
        dto: ReviewStudentStatusDto,
    ) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            r#"UPDATE students
            SET enrolled = $2, reviewed_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, enrolled, reviewed_by, created_at, updated_at"#,
        )
        .bind(id)
        .bind(dto.enrolled)
        .bind(dto.reviewer_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }
}
