use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One stored feedback section for a job version.
/// `(version_id, feedback_type)` is unique — regeneration upserts in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedbackRow {
    pub id: Uuid,
    pub version_id: Uuid,
    pub feedback_type: String,
    pub content: String,
    pub generated_at: DateTime<Utc>,
}
