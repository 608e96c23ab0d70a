//! Axum route handlers for the Feedback API.
//!
//! POST runs the whole pipeline: plan sections, filter emphasis areas for the
//! request, generate, reconcile. GET returns stored rows.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::fetch_user;
use crate::errors::AppError;
use crate::feedback::generator::generate_feedback;
use crate::feedback::planner::{active_areas_for_request, plan};
use crate::feedback::prompts::PromptContext;
use crate::feedback::reconciler::{merge_feedback, reconcile};
use crate::models::feedback::FeedbackRow;
use crate::resumes::extract::EXTRACTION_FAILED_PLACEHOLDER;
use crate::state::AppState;
use crate::versions::find_owned_version;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct GenerateFeedbackRequest {
    pub user_id: Uuid,
    /// Absent means regenerate everything (full-generation mode).
    pub sections_to_regenerate: Option<Vec<String>>,
    /// Set after emphasis areas change so keyworded sections are rebuilt
    /// from scratch instead of echoing prior output.
    #[serde(default)]
    pub is_regeneration: bool,
}

#[derive(Serialize)]
pub struct FeedbackResponse {
    pub feedback: Vec<FeedbackRow>,
}

/// GET /api/v1/versions/:id/feedback
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    Path(version_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<FeedbackResponse>, AppError> {
    fetch_user(&state.db, params.user_id).await?;
    find_owned_version(&state.db, version_id, params.user_id).await?;

    let feedback = sqlx::query_as::<_, FeedbackRow>(
        "SELECT * FROM resume_feedback WHERE version_id = $1 ORDER BY generated_at ASC",
    )
    .bind(version_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(FeedbackResponse { feedback }))
}

/// POST /api/v1/versions/:id/feedback
pub async fn handle_generate_feedback(
    State(state): State<AppState>,
    Path(version_id): Path<Uuid>,
    Json(request): Json<GenerateFeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let user = fetch_user(&state.db, request.user_id).await?;
    let (version, resume) = find_owned_version(&state.db, version_id, user.id).await?;

    if resume.resume_text.trim().is_empty()
        || resume.resume_text.contains(EXTRACTION_FAILED_PLACEHOLDER)
    {
        return Err(AppError::Validation(
            "Resume text not available. Please re-upload your resume.".to_string(),
        ));
    }

    let section_plan = plan(request.sections_to_regenerate.as_deref());
    let requested_sections = section_plan.sections();

    let emphasis_areas =
        active_areas_for_request(&version.emphasis_areas.0, &requested_sections);

    info!(
        "Generating feedback for version {} (sections: {:?}, {} active emphasis areas, regeneration: {})",
        version_id,
        requested_sections,
        emphasis_areas.len(),
        request.is_regeneration
    );

    let ctx = PromptContext {
        resume_text: &resume.resume_text,
        job_title: &version.job_title,
        company_name: &version.company_name,
        job_description: version.job_description.as_deref().unwrap_or(""),
        custom_requirements: version.custom_requirements.as_deref(),
    };

    let content = generate_feedback(
        state.llm.as_ref(),
        &ctx,
        &emphasis_areas,
        &section_plan,
        request.is_regeneration,
    )
    .await?;

    if content.is_empty() {
        warn!(
            "Generation produced no content for version {} (sections: {:?})",
            version_id, requested_sections
        );
    }

    // Load what was stored before reconciling so the response can present the
    // version's full feedback collection, not just the regenerated rows.
    let mut feedback = sqlx::query_as::<_, FeedbackRow>(
        "SELECT * FROM resume_feedback WHERE version_id = $1 ORDER BY generated_at ASC",
    )
    .bind(version_id)
    .fetch_all(&state.db)
    .await?;

    let regenerated = section_plan.storable_sections();
    let fresh = reconcile(&state.db, version_id, &regenerated, &content).await?;

    // Regenerated types that produced no content were deleted from storage;
    // drop them from the view, then splice the fresh rows in place.
    feedback.retain(|row| {
        !regenerated.contains(&row.feedback_type)
            || fresh.iter().any(|f| f.feedback_type == row.feedback_type)
    });
    merge_feedback(&mut feedback, &fresh);

    Ok(Json(FeedbackResponse { feedback }))
}
