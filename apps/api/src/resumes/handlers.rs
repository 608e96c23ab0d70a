//! Axum route handlers for resume upload and listing.
//!
//! Upload is a thin wrapper: entitlement check, best-effort text extraction,
//! S3 put, metadata insert. The interesting policy lives in `entitlements`.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::fetch_user;
use crate::entitlements::check_upload;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::extract::extract_resume_text;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeRow>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub resume: ResumeRow,
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(params.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ResumeListResponse { resumes }))
}

/// POST /api/v1/resumes
///
/// Multipart form: `user_id` text field + `file` PDF field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut user_id: Option<Uuid> = None;
    let mut file_name: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("user_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid user_id field: {e}")))?;
                user_id = Some(
                    text.parse()
                        .map_err(|_| AppError::Validation("user_id must be a UUID".to_string()))?,
                );
            }
            Some("file") => {
                if field.content_type() != Some("application/pdf") {
                    return Err(AppError::Validation(
                        "Only PDF files are allowed".to_string(),
                    ));
                }
                file_name = Some(
                    field
                        .file_name()
                        .unwrap_or("resume.pdf")
                        .to_string(),
                );
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                if bytes.len() > state.config.max_upload_bytes {
                    return Err(AppError::Validation(format!(
                        "File size must be less than {} bytes",
                        state.config.max_upload_bytes
                    )));
                }
                file_bytes = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let user_id = user_id.ok_or_else(|| AppError::Validation("user_id is required".to_string()))?;
    let file_name =
        file_name.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    let file_bytes =
        file_bytes.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let user = fetch_user(&state.db, user_id).await?;
    check_upload(&state.db, &user).await?;

    // Extraction is best-effort: a failed parse stores placeholder text and
    // the upload still succeeds.
    let resume_text = extract_resume_text(&file_bytes);

    let resume_id = Uuid::new_v4();
    let s3_key = format!("resumes/{user_id}/{resume_id}.pdf");
    let file_size = file_bytes.len() as i64;

    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .content_type("application/pdf")
        .body(file_bytes.into())
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Failed to store resume file: {e}")))?;

    let resume: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes (id, user_id, original_filename, s3_key, file_size, resume_text, uploaded_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        RETURNING *
        "#,
    )
    .bind(resume_id)
    .bind(user_id)
    .bind(&file_name)
    .bind(&s3_key)
    .bind(file_size)
    .bind(&resume_text)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(
        "Stored resume {} for user {} ({} bytes, {} chars extracted)",
        resume_id,
        user_id,
        file_size,
        resume_text.len()
    );

    Ok(Json(UploadResponse { resume }))
}
