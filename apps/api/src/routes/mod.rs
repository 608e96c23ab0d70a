pub mod health;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::feedback::handlers as feedback_handlers;
use crate::resumes::handlers as resume_handlers;
use crate::state::AppState;
use crate::versions::handlers as version_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            get(resume_handlers::handle_list_resumes).post(resume_handlers::handle_upload_resume),
        )
        // Version API
        .route(
            "/api/v1/resumes/:id/versions",
            get(version_handlers::handle_list_versions)
                .post(version_handlers::handle_create_version),
        )
        .route(
            "/api/v1/versions/:id/emphasis",
            patch(version_handlers::handle_update_emphasis),
        )
        // Feedback API
        .route(
            "/api/v1/versions/:id/feedback",
            get(feedback_handlers::handle_get_feedback)
                .post(feedback_handlers::handle_generate_feedback),
        )
        .with_state(state)
}
