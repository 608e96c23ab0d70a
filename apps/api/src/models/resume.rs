use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An uploaded resume document. The core only reads `resume_text`;
/// the raw PDF lives in S3 under `s3_key`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_filename: String,
    pub s3_key: String,
    pub file_size: i64,
    pub resume_text: String,
    pub uploaded_at: DateTime<Utc>,
}
