pub mod handlers;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::models::version::JobVersionRow;

/// Loads a job version together with its resume, enforcing ownership.
/// A version owned by someone else is indistinguishable from a missing one.
pub async fn find_owned_version(
    pool: &PgPool,
    version_id: Uuid,
    user_id: Uuid,
) -> Result<(JobVersionRow, ResumeRow), AppError> {
    let version: JobVersionRow =
        sqlx::query_as("SELECT * FROM resume_versions WHERE id = $1")
            .bind(version_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Version not found".to_string()))?;

    let resume: ResumeRow =
        sqlx::query_as("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(version.resume_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Version not found".to_string()))?;

    Ok((version, resume))
}

/// Loads a resume by id, enforcing ownership.
pub async fn find_owned_resume(
    pool: &PgPool,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(resume_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
}
