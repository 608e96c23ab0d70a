use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TIER_PRO: &str = "pro";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub subscription_tier: String,
    /// Free-tier rolling counter — versions created since `last_version_reset`.
    pub daily_versions_created: i32,
    pub last_version_reset: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_pro(&self) -> bool {
        self.subscription_tier == TIER_PRO
    }
}
