use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::emphasis::EmphasisArea;

/// One tailoring target: a company + role saved against a resume.
/// `emphasis_areas` is stored as JSONB and replaced wholesale on every
/// emphasis update — individual areas are never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobVersionRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub version_name: String,
    pub company_name: String,
    pub job_title: String,
    pub job_description: Option<String>,
    pub custom_requirements: Option<String>,
    pub emphasis_areas: Json<Vec<EmphasisArea>>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
