//! Feedback Reconciler — persists regenerated sections without disturbing
//! untouched ones.
//!
//! `(version_id, feedback_type)` is unique in storage, so reconciliation is
//! an upsert per regenerated type that produced content, plus a delete for
//! regenerated types that produced none. Types outside the regenerated set
//! are never touched. Re-running with identical content is idempotent.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::generator::FeedbackContent;
use crate::feedback::planner::REGENERABLE_SECTIONS;
use crate::models::feedback::FeedbackRow;

/// Pairs each regenerated storable type with its generated content.
/// Types with no content are returned separately — they get deleted, since a
/// requested section that produced nothing must not leave stale rows behind.
pub fn content_pairs<'a>(
    sections_regenerated: &'a [String],
    content: &'a FeedbackContent,
) -> (Vec<(&'a str, &'a str)>, Vec<&'a str>) {
    let mut present = Vec::new();
    let mut absent = Vec::new();

    for section in sections_regenerated {
        if !REGENERABLE_SECTIONS.contains(&section.as_str()) {
            continue;
        }
        match content.get(section) {
            Some(text) => present.push((section.as_str(), text)),
            None => absent.push(section.as_str()),
        }
    }

    (present, absent)
}

/// Merges freshly persisted rows into a previously loaded feedback collection:
/// a type already present is replaced in place (display order preserved),
/// a new type is appended.
pub fn merge_feedback(existing: &mut Vec<FeedbackRow>, fresh: &[FeedbackRow]) {
    for row in fresh {
        match existing
            .iter_mut()
            .find(|e| e.feedback_type == row.feedback_type)
        {
            Some(slot) => *slot = row.clone(),
            None => existing.push(row.clone()),
        }
    }
}

/// Persists regenerated content for a version and returns the upserted rows.
///
/// Deletes run before upserts so a type that regenerated to nothing cannot
/// survive as a stale row.
pub async fn reconcile(
    pool: &PgPool,
    version_id: Uuid,
    sections_regenerated: &[String],
    content: &FeedbackContent,
) -> Result<Vec<FeedbackRow>, AppError> {
    let (present, absent) = content_pairs(sections_regenerated, content);

    if !absent.is_empty() {
        let stale: Vec<String> = absent.iter().map(|s| s.to_string()).collect();
        sqlx::query(
            "DELETE FROM resume_feedback WHERE version_id = $1 AND feedback_type = ANY($2)",
        )
        .bind(version_id)
        .bind(&stale)
        .execute(pool)
        .await?;
    }

    let mut inserted = Vec::with_capacity(present.len());
    for (feedback_type, text) in &present {
        let row: FeedbackRow = sqlx::query_as(
            r#"
            INSERT INTO resume_feedback (id, version_id, feedback_type, content, generated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (version_id, feedback_type)
            DO UPDATE SET content = EXCLUDED.content, generated_at = EXCLUDED.generated_at
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(version_id)
        .bind(feedback_type)
        .bind(text)
        .fetch_one(pool)
        .await?;

        inserted.push(row);
    }

    info!(
        "Reconciled feedback for version {}: {} upserted, {} cleared",
        version_id,
        inserted.len(),
        absent.len()
    );

    Ok(inserted)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn row(version_id: Uuid, feedback_type: &str, content: &str) -> FeedbackRow {
        FeedbackRow {
            id: Uuid::new_v4(),
            version_id,
            feedback_type: feedback_type.to_string(),
            content: content.to_string(),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_content_pairs_splits_present_and_absent() {
        let content = FeedbackContent {
            project_suggestions: Some("X".to_string()),
            experience_tweaks: None,
            company_matches: None,
        };
        let sections = strings(&["project_suggestions", "experience_tweaks"]);

        let (present, absent) = content_pairs(&sections, &content);
        assert_eq!(present, vec![("project_suggestions", "X")]);
        assert_eq!(absent, vec!["experience_tweaks"]);
    }

    #[test]
    fn test_content_pairs_ignores_unknown_sections() {
        let content = FeedbackContent::default();
        let sections = strings(&["recruiter_letter"]);

        let (present, absent) = content_pairs(&sections, &content);
        assert!(present.is_empty());
        assert!(absent.is_empty());
    }

    #[test]
    fn test_content_pairs_never_touches_unregenerated_types() {
        // Content for a section outside the regenerated set is not persisted.
        let content = FeedbackContent {
            project_suggestions: Some("X".to_string()),
            experience_tweaks: Some("Y".to_string()),
            company_matches: None,
        };
        let sections = strings(&["project_suggestions"]);

        let (present, _) = content_pairs(&sections, &content);
        assert_eq!(present, vec![("project_suggestions", "X")]);
    }

    #[test]
    fn test_merge_replaces_in_place_preserving_order() {
        let version_id = Uuid::new_v4();
        let mut existing = vec![
            row(version_id, "experience_tweaks", "old exp"),
            row(version_id, "project_suggestions", "old proj"),
        ];
        let fresh = vec![row(version_id, "project_suggestions", "new proj")];

        merge_feedback(&mut existing, &fresh);

        assert_eq!(existing.len(), 2);
        assert_eq!(existing[0].feedback_type, "experience_tweaks");
        assert_eq!(existing[1].feedback_type, "project_suggestions");
        assert_eq!(existing[1].content, "new proj");
    }

    #[test]
    fn test_merge_appends_new_types() {
        let version_id = Uuid::new_v4();
        let mut existing = vec![row(version_id, "experience_tweaks", "exp")];
        let fresh = vec![row(version_id, "company_matches", "1. A")];

        merge_feedback(&mut existing, &fresh);

        assert_eq!(existing.len(), 2);
        assert_eq!(existing[1].feedback_type, "company_matches");
    }

    #[test]
    fn test_merge_with_empty_fresh_is_noop() {
        let version_id = Uuid::new_v4();
        let mut existing = vec![row(version_id, "experience_tweaks", "exp")];
        merge_feedback(&mut existing, &[]);
        assert_eq!(existing.len(), 1);
    }
}
