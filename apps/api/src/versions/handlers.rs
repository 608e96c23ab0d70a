//! Axum route handlers for job versions and emphasis updates.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use tracing::info;
use uuid::Uuid;

use crate::db::fetch_user;
use crate::emphasis::{validate_emphasis_areas, EmphasisArea};
use crate::entitlements::{
    check_emphasis_usage, check_version_creation, increment_version_counter, VersionQuota,
};
use crate::errors::AppError;
use crate::models::version::JobVersionRow;
use crate::state::AppState;
use crate::versions::{find_owned_resume, find_owned_version};

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct VersionListResponse {
    pub versions: Vec<JobVersionRow>,
}

#[derive(Serialize)]
pub struct VersionResponse {
    pub version: JobVersionRow,
    /// Versions the user may still create today; absent for pro users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_today: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVersionRequest {
    pub user_id: Uuid,
    pub version_name: String,
    pub company_name: String,
    pub job_title: String,
    pub job_description: Option<String>,
    pub custom_requirements: Option<String>,
    #[serde(default)]
    pub emphasis_areas: Vec<EmphasisArea>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmphasisRequest {
    pub user_id: Uuid,
    pub emphasis_areas: Vec<EmphasisArea>,
}

/// GET /api/v1/resumes/:id/versions
pub async fn handle_list_versions(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<VersionListResponse>, AppError> {
    find_owned_resume(&state.db, resume_id, params.user_id).await?;

    let versions = sqlx::query_as::<_, JobVersionRow>(
        "SELECT * FROM resume_versions WHERE resume_id = $1 ORDER BY created_at DESC",
    )
    .bind(resume_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(VersionListResponse { versions }))
}

/// POST /api/v1/resumes/:id/versions
///
/// Gate order matters: validation first, then the emphasis pro-gate, then the
/// daily quota. The counter is consumed only after the row is durably
/// created — a failure between the check and the insert never eats a slot.
pub async fn handle_create_version(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<CreateVersionRequest>,
) -> Result<Json<VersionResponse>, AppError> {
    if request.version_name.trim().is_empty()
        || request.company_name.trim().is_empty()
        || request.job_title.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Version name, company name, and job title are required".to_string(),
        ));
    }
    validate_emphasis_areas(&request.emphasis_areas)?;

    let user = fetch_user(&state.db, request.user_id).await?;
    check_emphasis_usage(&user, request.emphasis_areas.len())?;
    let quota = check_version_creation(&state.db, &user).await?;

    find_owned_resume(&state.db, resume_id, user.id).await?;

    let version: JobVersionRow = sqlx::query_as(
        r#"
        INSERT INTO resume_versions
            (id, resume_id, version_name, company_name, job_title,
             job_description, custom_requirements, emphasis_areas, is_default,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(resume_id)
    .bind(request.version_name.trim())
    .bind(request.company_name.trim())
    .bind(request.job_title.trim())
    .bind(&request.job_description)
    .bind(&request.custom_requirements)
    .bind(SqlJson(&request.emphasis_areas))
    .fetch_one(&state.db)
    .await?;

    // Pro users never consume the counter.
    let remaining_today = match quota {
        VersionQuota::Unlimited => None,
        VersionQuota::Remaining(remaining) => {
            increment_version_counter(&state.db, user.id).await?;
            Some(remaining - 1)
        }
    };

    info!(
        "Created version {} for resume {} (user {})",
        version.id, resume_id, user.id
    );

    Ok(Json(VersionResponse {
        version,
        remaining_today,
    }))
}

/// PATCH /api/v1/versions/:id/emphasis
///
/// Wholesale replacement — individual areas are never patched.
pub async fn handle_update_emphasis(
    State(state): State<AppState>,
    Path(version_id): Path<Uuid>,
    Json(request): Json<UpdateEmphasisRequest>,
) -> Result<Json<VersionResponse>, AppError> {
    validate_emphasis_areas(&request.emphasis_areas)?;

    let user = fetch_user(&state.db, request.user_id).await?;
    check_emphasis_usage(&user, request.emphasis_areas.len())?;

    find_owned_version(&state.db, version_id, user.id).await?;

    let version: JobVersionRow = sqlx::query_as(
        r#"
        UPDATE resume_versions
        SET emphasis_areas = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(SqlJson(&request.emphasis_areas))
    .bind(version_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(VersionResponse {
        version,
        remaining_today: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults_emphasis_to_empty() {
        let request: CreateVersionRequest = serde_json::from_value(json!({
            "user_id": Uuid::new_v4(),
            "version_name": "Backend @ Acme",
            "company_name": "Acme",
            "job_title": "Backend Engineer"
        }))
        .unwrap();
        assert!(request.emphasis_areas.is_empty());
        assert!(request.job_description.is_none());
    }

    #[test]
    fn test_create_request_parses_emphasis_areas() {
        let request: CreateVersionRequest = serde_json::from_value(json!({
            "user_id": Uuid::new_v4(),
            "version_name": "v1",
            "company_name": "Acme",
            "job_title": "SWE",
            "emphasis_areas": [
                {"name": "Kubernetes", "level": 4, "apply_to": ["experience"]}
            ]
        }))
        .unwrap();
        assert_eq!(request.emphasis_areas.len(), 1);
        assert_eq!(request.emphasis_areas[0].name, "Kubernetes");
        assert_eq!(request.emphasis_areas[0].level, 4);
    }
}
