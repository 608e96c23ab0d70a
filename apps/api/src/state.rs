use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// The generation capability. `LlmClient` in production; tests swap in
    /// canned backends.
    pub llm: Arc<dyn CompletionBackend>,
    pub config: Config,
}
