//! Entitlement Gate — tier and quota checks shared by every entry point.
//!
//! Free tier: one resume total, 3 job versions per UTC calendar day, no
//! emphasis areas. Pro tier: unlimited, counter never consulted.
//!
//! The daily counter is incremented with a single atomic SQL statement and
//! only after the version row is durably created, so a creation that fails
//! validation after the limit check never consumes a slot. Concurrent
//! creations racing the check can exceed the cap by a small margin; that
//! looseness is accepted for this domain.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;

/// Versions a free-tier user may create per UTC day.
pub const FREE_DAILY_VERSION_LIMIT: i32 = 3;

/// Resumes a free-tier user may hold at once.
pub const FREE_RESUME_LIMIT: i64 = 1;

/// Outcome of a successful version-creation check. The caller increments the
/// counter only for `Remaining` — pro users never consume a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionQuota {
    Unlimited,
    Remaining(i32),
}

/// Day-boundary comparison, fixed to UTC calendar dates.
pub fn is_new_day(last_reset: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    last_reset.date_naive() != now.date_naive()
}

/// Pure quota decision for version creation, given an already-reset counter.
pub fn evaluate_version_quota(is_pro: bool, current_count: i32) -> Result<VersionQuota, AppError> {
    if is_pro {
        return Ok(VersionQuota::Unlimited);
    }
    if current_count >= FREE_DAILY_VERSION_LIMIT {
        return Err(AppError::EntitlementDenied(format!(
            "Daily limit of {FREE_DAILY_VERSION_LIMIT} versions reached. \
             Upgrade to Pro for unlimited versions."
        )));
    }
    Ok(VersionQuota::Remaining(
        FREE_DAILY_VERSION_LIMIT - current_count,
    ))
}

/// Emphasis areas are a pro feature. Invoked from both version creation and
/// emphasis update — one predicate, two call sites.
pub fn check_emphasis_usage(user: &User, areas_requested: usize) -> Result<(), AppError> {
    if !user.is_pro() && areas_requested > 0 {
        return Err(AppError::EntitlementDenied(
            "Emphasis areas are a Pro feature".to_string(),
        ));
    }
    Ok(())
}

/// Checks whether the user may upload another resume.
pub async fn check_upload(pool: &PgPool, user: &User) -> Result<(), AppError> {
    if user.is_pro() {
        return Ok(());
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(pool)
        .await?;

    if count >= FREE_RESUME_LIMIT {
        return Err(AppError::EntitlementDenied(
            "Free tier limit reached. Upgrade to Pro for unlimited resumes.".to_string(),
        ));
    }

    Ok(())
}

/// Checks the daily version-creation quota, resetting the counter first when
/// the stored reset timestamp falls on an earlier UTC day.
pub async fn check_version_creation(pool: &PgPool, user: &User) -> Result<VersionQuota, AppError> {
    if user.is_pro() {
        return Ok(VersionQuota::Unlimited);
    }

    let now = Utc::now();
    let mut current_count = user.daily_versions_created;

    if is_new_day(user.last_version_reset, now) {
        sqlx::query(
            "UPDATE users SET daily_versions_created = 0, last_version_reset = $1 WHERE id = $2",
        )
        .bind(now)
        .bind(user.id)
        .execute(pool)
        .await?;

        info!("Reset daily version counter for user {}", user.id);
        current_count = 0;
    }

    evaluate_version_quota(false, current_count)
}

/// Consumes one free-tier version slot. Atomic in the database — never
/// read-then-write in application code.
pub async fn increment_version_counter(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET daily_versions_created = daily_versions_created + 1 WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_user(tier: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            subscription_tier: tier.to_string(),
            daily_versions_created: 0,
            last_version_reset: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_pro_quota_is_unlimited_regardless_of_count() {
        assert_eq!(
            evaluate_version_quota(true, 999).unwrap(),
            VersionQuota::Unlimited
        );
    }

    #[test]
    fn test_free_quota_counts_down_from_three() {
        assert_eq!(
            evaluate_version_quota(false, 0).unwrap(),
            VersionQuota::Remaining(3)
        );
        assert_eq!(
            evaluate_version_quota(false, 2).unwrap(),
            VersionQuota::Remaining(1)
        );
    }

    #[test]
    fn test_free_quota_denied_at_limit() {
        let err = evaluate_version_quota(false, 3).unwrap_err();
        assert!(matches!(err, AppError::EntitlementDenied(_)));
    }

    #[test]
    fn test_is_new_day_same_utc_date() {
        let a = Utc.with_ymd_and_hms(2026, 3, 14, 0, 5, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 0).unwrap();
        assert!(!is_new_day(a, b));
    }

    #[test]
    fn test_is_new_day_across_utc_midnight() {
        let a = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 3, 15, 0, 1, 0).unwrap();
        assert!(is_new_day(a, b));
    }

    #[test]
    fn test_emphasis_denied_for_free_user_with_areas() {
        let user = make_user("free");
        let err = check_emphasis_usage(&user, 1).unwrap_err();
        assert!(matches!(err, AppError::EntitlementDenied(_)));
    }

    #[test]
    fn test_emphasis_allowed_for_free_user_without_areas() {
        let user = make_user("free");
        assert!(check_emphasis_usage(&user, 0).is_ok());
    }

    #[test]
    fn test_emphasis_always_allowed_for_pro() {
        let user = make_user("pro");
        assert!(check_emphasis_usage(&user, 5).is_ok());
    }
}
