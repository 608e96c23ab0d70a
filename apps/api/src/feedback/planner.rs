//! Section Planner — maps a feedback request to the canonical sections to
//! generate.
//!
//! Clients may ask in short form ("projects", "experience") or canonical form
//! ("project_suggestions", "experience_tweaks"). Unknown tokens (e.g.
//! "recruiter_letter", which is stored and fetched like any other type but
//! never generated here) pass through unchanged for forward compatibility;
//! the generator ignores what it does not recognize.

use crate::emphasis::{EmphasisArea, SECTION_EXPERIENCE, SECTION_PROJECTS};

pub const FEEDBACK_PROJECT_SUGGESTIONS: &str = "project_suggestions";
pub const FEEDBACK_EXPERIENCE_TWEAKS: &str = "experience_tweaks";
pub const FEEDBACK_COMPANY_MATCHES: &str = "company_matches";

/// The feedback types the generator can (re)produce.
pub const REGENERABLE_SECTIONS: [&str; 3] = [
    FEEDBACK_PROJECT_SUGGESTIONS,
    FEEDBACK_EXPERIENCE_TWEAKS,
    FEEDBACK_COMPANY_MATCHES,
];

/// How this request will be generated: one combined LLM call covering all
/// three regenerable sections, or one call per requested section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionPlan {
    Full,
    Targeted(Vec<String>),
}

impl SectionPlan {
    /// Canonical sections covered by this plan, in generation order.
    pub fn sections(&self) -> Vec<String> {
        match self {
            SectionPlan::Full => REGENERABLE_SECTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            SectionPlan::Targeted(sections) => sections.clone(),
        }
    }

    /// The subset of this plan's sections that can be persisted as feedback.
    pub fn storable_sections(&self) -> Vec<String> {
        self.sections()
            .into_iter()
            .filter(|s| REGENERABLE_SECTIONS.contains(&s.as_str()))
            .collect()
    }
}

/// Normalizes a short alias to its canonical feedback type.
pub fn normalize_section(section: &str) -> String {
    match section {
        "projects" => FEEDBACK_PROJECT_SUGGESTIONS.to_string(),
        "experience" => FEEDBACK_EXPERIENCE_TWEAKS.to_string(),
        other => other.to_string(),
    }
}

/// Plans the canonical section list for one feedback request.
///
/// An absent request, or a request amounting to all three regenerable types,
/// routes to full-generation mode. Anything else becomes a targeted plan:
/// aliases normalized, order preserved, duplicates dropped.
pub fn plan(requested: Option<&[String]>) -> SectionPlan {
    let requested = match requested {
        None => return SectionPlan::Full,
        Some(r) => r,
    };

    let mut canonical: Vec<String> = Vec::new();
    for section in requested {
        let normalized = normalize_section(section);
        if !canonical.contains(&normalized) {
            canonical.push(normalized);
        }
    }

    let covers_all = REGENERABLE_SECTIONS
        .iter()
        .all(|s| canonical.iter().any(|c| c == s));
    let only_regenerable = canonical
        .iter()
        .all(|c| REGENERABLE_SECTIONS.contains(&c.as_str()));

    if covers_all && only_regenerable {
        SectionPlan::Full
    } else {
        SectionPlan::Targeted(canonical)
    }
}

/// Dual-alias predicate: does this emphasis area apply to any section of the
/// request? Areas declare targets in short form but requests may arrive in
/// either form, so both spellings of each section must match.
pub fn applies_to_section(area: &EmphasisArea, requested: &[String]) -> bool {
    let wants = |name: &str| requested.iter().any(|s| s == name);

    let applies_to_projects = area.apply_to.iter().any(|t| t == SECTION_PROJECTS)
        && (wants(SECTION_PROJECTS) || wants(FEEDBACK_PROJECT_SUGGESTIONS));

    let applies_to_experience = area.apply_to.iter().any(|t| t == SECTION_EXPERIENCE)
        && (wants(SECTION_EXPERIENCE) || wants(FEEDBACK_EXPERIENCE_TWEAKS));

    applies_to_projects || applies_to_experience
}

/// Filters a version's stored emphasis areas down to those active for this
/// request: inert areas (level 0 or blank name) are dropped defensively even
/// though validation should have kept them out of storage, then the
/// dual-alias predicate selects areas relevant to the requested sections.
pub fn active_areas_for_request(areas: &[EmphasisArea], requested: &[String]) -> Vec<EmphasisArea> {
    areas
        .iter()
        .filter(|a| a.level > 0 && !a.name.trim().is_empty())
        .filter(|a| applies_to_section(a, requested))
        .cloned()
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn area(name: &str, level: u8, apply_to: &[&str]) -> EmphasisArea {
        EmphasisArea {
            name: name.to_string(),
            level,
            apply_to: apply_to.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_plan_absent_request_is_full() {
        assert_eq!(plan(None), SectionPlan::Full);
    }

    #[test]
    fn test_plan_all_three_canonical_is_full() {
        let requested = strings(&["project_suggestions", "experience_tweaks", "company_matches"]);
        assert_eq!(plan(Some(&requested)), SectionPlan::Full);
    }

    #[test]
    fn test_plan_all_three_via_aliases_is_full() {
        let requested = strings(&["projects", "experience", "company_matches"]);
        assert_eq!(plan(Some(&requested)), SectionPlan::Full);
    }

    #[test]
    fn test_plan_normalizes_aliases_preserving_order() {
        let requested = strings(&["projects", "experience"]);
        assert_eq!(
            plan(Some(&requested)),
            SectionPlan::Targeted(strings(&["project_suggestions", "experience_tweaks"]))
        );
    }

    #[test]
    fn test_plan_dedupes_alias_and_canonical_forms() {
        let requested = strings(&["projects", "project_suggestions"]);
        assert_eq!(
            plan(Some(&requested)),
            SectionPlan::Targeted(strings(&["project_suggestions"]))
        );
    }

    #[test]
    fn test_plan_passes_unknown_tokens_through() {
        let requested = strings(&["recruiter_letter", "projects"]);
        assert_eq!(
            plan(Some(&requested)),
            SectionPlan::Targeted(strings(&["recruiter_letter", "project_suggestions"]))
        );
    }

    #[test]
    fn test_plan_with_unknown_token_never_routes_full() {
        // All three regenerable types plus recruiter_letter is the original
        // client's default body — it must stay targeted.
        let requested = strings(&[
            "recruiter_letter",
            "project_suggestions",
            "experience_tweaks",
            "company_matches",
        ]);
        match plan(Some(&requested)) {
            SectionPlan::Targeted(sections) => assert_eq!(sections.len(), 4),
            SectionPlan::Full => panic!("unknown token must not collapse to full mode"),
        }
    }

    #[test]
    fn test_storable_sections_drop_unknown_tokens() {
        let p = SectionPlan::Targeted(strings(&["recruiter_letter", "project_suggestions"]));
        assert_eq!(p.storable_sections(), strings(&["project_suggestions"]));
    }

    #[test]
    fn test_applies_to_section_matches_both_alias_forms() {
        let a = area("Kubernetes", 4, &["projects"]);
        assert!(applies_to_section(&a, &strings(&["projects"])));
        assert!(applies_to_section(&a, &strings(&["project_suggestions"])));
        assert!(!applies_to_section(&a, &strings(&["experience_tweaks"])));
    }

    #[test]
    fn test_applies_to_section_experience_analog() {
        let a = area("Kafka", 3, &["experience"]);
        assert!(applies_to_section(&a, &strings(&["experience"])));
        assert!(applies_to_section(&a, &strings(&["experience_tweaks"])));
        assert!(!applies_to_section(&a, &strings(&["project_suggestions"])));
    }

    #[test]
    fn test_active_areas_drop_inert_and_unrelated() {
        let areas = vec![
            area("Rust", 4, &["projects"]),
            area("Inert", 0, &["projects"]),
            area("  ", 3, &["projects"]),
            area("Kafka", 3, &["experience"]),
        ];
        let active = active_areas_for_request(&areas, &strings(&["project_suggestions"]));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Rust");
    }
}
