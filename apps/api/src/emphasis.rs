//! Emphasis areas — user-declared keyword/topic weights that steer generation.
//!
//! An area is `{ name, level 0..=5, apply_to: ["projects" | "experience"] }`.
//! Validation happens at the API boundary; areas with `level == 0` or a blank
//! name are never stored, so `resolve_keywords` does not filter on level.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Maximum emphasis areas per job version, enforced at the boundary.
pub const MAX_EMPHASIS_AREAS: usize = 5;

/// Section identifiers allowed in `apply_to`.
pub const SECTION_PROJECTS: &str = "projects";
pub const SECTION_EXPERIENCE: &str = "experience";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmphasisArea {
    pub name: String,
    pub level: u8,
    pub apply_to: Vec<String>,
}

/// Extracts emphasis keywords as a plain list of trimmed, non-empty names.
///
/// With a `section`, only areas whose `apply_to` contains that section are
/// kept. Without one, all areas qualify — company matching is
/// section-agnostic. Order follows the input list. Never returns nulls;
/// an empty input yields an empty vec.
pub fn resolve_keywords(areas: &[EmphasisArea], section: Option<&str>) -> Vec<String> {
    areas
        .iter()
        .filter(|area| match section {
            Some(s) => area.apply_to.iter().any(|a| a == s),
            None => true,
        })
        .map(|area| area.name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Validates a wholesale emphasis-area replacement before storage.
///
/// Stored areas must carry a usable name and a level of 1..=5 — a level-0
/// area is inert and is rejected here rather than silently dropped.
pub fn validate_emphasis_areas(areas: &[EmphasisArea]) -> Result<(), AppError> {
    if areas.len() > MAX_EMPHASIS_AREAS {
        return Err(AppError::Validation(format!(
            "Maximum {MAX_EMPHASIS_AREAS} emphasis areas allowed"
        )));
    }

    for area in areas {
        if area.name.trim().is_empty() {
            return Err(AppError::Validation(
                "Each emphasis area must have a name".to_string(),
            ));
        }
        if area.level < 1 || area.level > 5 {
            return Err(AppError::Validation(
                "Emphasis level must be between 1 and 5".to_string(),
            ));
        }
        for target in &area.apply_to {
            if target != SECTION_PROJECTS && target != SECTION_EXPERIENCE {
                return Err(AppError::Validation(format!(
                    "Unknown emphasis target section '{target}'"
                )));
            }
        }
    }

    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn area(name: &str, level: u8, apply_to: &[&str]) -> EmphasisArea {
        EmphasisArea {
            name: name.to_string(),
            level,
            apply_to: apply_to.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_resolve_without_section_returns_all_names() {
        let areas = vec![
            area("Kubernetes", 4, &["experience"]),
            area("Rust", 2, &["projects"]),
        ];
        assert_eq!(resolve_keywords(&areas, None), vec!["Kubernetes", "Rust"]);
    }

    #[test]
    fn test_resolve_filters_by_section_in_original_order() {
        let areas = vec![
            area("GraphQL", 3, &["projects", "experience"]),
            area("Kafka", 5, &["experience"]),
            area("React", 1, &["projects"]),
        ];
        assert_eq!(
            resolve_keywords(&areas, Some(SECTION_PROJECTS)),
            vec!["GraphQL", "React"]
        );
        assert_eq!(
            resolve_keywords(&areas, Some(SECTION_EXPERIENCE)),
            vec!["GraphQL", "Kafka"]
        );
    }

    #[test]
    fn test_resolve_trims_and_drops_blank_names() {
        let areas = vec![
            area("  Terraform  ", 3, &["projects"]),
            area("   ", 3, &["projects"]),
        ];
        assert_eq!(
            resolve_keywords(&areas, Some(SECTION_PROJECTS)),
            vec!["Terraform"]
        );
    }

    #[test]
    fn test_resolve_ignores_level() {
        // Level filtering is the storage boundary's job, not the resolver's.
        let areas = vec![area("Go", 0, &["experience"])];
        assert_eq!(
            resolve_keywords(&areas, Some(SECTION_EXPERIENCE)),
            vec!["Go"]
        );
    }

    #[test]
    fn test_resolve_empty_input_returns_empty_vec() {
        assert!(resolve_keywords(&[], None).is_empty());
        assert!(resolve_keywords(&[], Some(SECTION_PROJECTS)).is_empty());
    }

    #[test]
    fn test_validate_rejects_more_than_five() {
        let areas: Vec<EmphasisArea> = (0..6)
            .map(|i| area(&format!("kw{i}"), 3, &["projects"]))
            .collect();
        assert!(validate_emphasis_areas(&areas).is_err());
    }

    #[test]
    fn test_validate_rejects_level_zero_and_six() {
        assert!(validate_emphasis_areas(&[area("Rust", 0, &["projects"])]).is_err());
        assert!(validate_emphasis_areas(&[area("Rust", 6, &["projects"])]).is_err());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        assert!(validate_emphasis_areas(&[area("  ", 3, &["projects"])]).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_target() {
        assert!(validate_emphasis_areas(&[area("Rust", 3, &["summary"])]).is_err());
    }

    #[test]
    fn test_validate_accepts_full_valid_set() {
        let areas = vec![
            area("Rust", 5, &["projects", "experience"]),
            area("Kubernetes", 1, &["experience"]),
        ];
        assert!(validate_emphasis_areas(&areas).is_ok());
    }
}
