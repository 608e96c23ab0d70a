//! Feedback Generator — turns a section plan into generated content.
//!
//! Full-generation mode issues one combined call for all three regenerable
//! sections; targeted mode issues one call per requested section and merges
//! the results by key. Sections not requested are simply absent from the
//! output — never null placeholders. An unparsable backend response is a hard
//! failure; a missing key in a parsed response is a content gap.

use serde_json::Value;
use tracing::{debug, info};

use crate::emphasis::{resolve_keywords, EmphasisArea, SECTION_EXPERIENCE, SECTION_PROJECTS};
use crate::errors::AppError;
use crate::feedback::planner::{
    SectionPlan, FEEDBACK_COMPANY_MATCHES, FEEDBACK_EXPERIENCE_TWEAKS,
    FEEDBACK_PROJECT_SUGGESTIONS,
};
use crate::feedback::prompts;
use crate::feedback::prompts::PromptContext;
use crate::llm_client::{CompletionBackend, GenerationParams};

// Per-section tuning. List-style output runs cooler than narrative bullets,
// and regeneration variants run slightly hotter to avoid echoing prior output.
const FULL_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_tokens: 4000,
};
const PROJECTS_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_tokens: 4000,
};
const PROJECTS_REGEN_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.75,
    max_tokens: 4000,
};
const EXPERIENCE_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.85,
    max_tokens: 3000,
};
const EXPERIENCE_REGEN_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.9,
    max_tokens: 3000,
};
const COMPANY_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.8,
    max_tokens: 2000,
};

/// Generated content per section. A `None` field means the section was not
/// requested or the backend produced no content for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackContent {
    pub project_suggestions: Option<String>,
    pub experience_tweaks: Option<String>,
    pub company_matches: Option<String>,
}

impl FeedbackContent {
    pub fn is_empty(&self) -> bool {
        self.project_suggestions.is_none()
            && self.experience_tweaks.is_none()
            && self.company_matches.is_none()
    }

    /// Content for a canonical feedback type, if present.
    pub fn get(&self, feedback_type: &str) -> Option<&str> {
        match feedback_type {
            FEEDBACK_PROJECT_SUGGESTIONS => self.project_suggestions.as_deref(),
            FEEDBACK_EXPERIENCE_TWEAKS => self.experience_tweaks.as_deref(),
            FEEDBACK_COMPANY_MATCHES => self.company_matches.as_deref(),
            _ => None,
        }
    }
}

/// Runs generation for the planned sections.
///
/// `is_regeneration` routes project and experience sections to their
/// from-scratch variants when emphasis keywords exist for that section.
pub async fn generate_feedback(
    backend: &dyn CompletionBackend,
    ctx: &PromptContext<'_>,
    emphasis_areas: &[EmphasisArea],
    plan: &SectionPlan,
    is_regeneration: bool,
) -> Result<FeedbackContent, AppError> {
    match plan {
        SectionPlan::Full => generate_full(backend, ctx, emphasis_areas).await,
        SectionPlan::Targeted(sections) => {
            let mut content = FeedbackContent::default();
            for section in sections {
                match section.as_str() {
                    FEEDBACK_PROJECT_SUGGESTIONS => {
                        content.project_suggestions =
                            generate_projects(backend, ctx, emphasis_areas, is_regeneration)
                                .await?;
                    }
                    FEEDBACK_EXPERIENCE_TWEAKS => {
                        content.experience_tweaks =
                            generate_experience(backend, ctx, emphasis_areas, is_regeneration)
                                .await?;
                    }
                    FEEDBACK_COMPANY_MATCHES => {
                        content.company_matches =
                            generate_company_matches(backend, ctx, emphasis_areas).await?;
                    }
                    other => {
                        debug!("Skipping unrecognized feedback section '{other}'");
                    }
                }
            }
            Ok(content)
        }
    }
}

/// One combined call producing all three regenerable sections.
async fn generate_full(
    backend: &dyn CompletionBackend,
    ctx: &PromptContext<'_>,
    emphasis_areas: &[EmphasisArea],
) -> Result<FeedbackContent, AppError> {
    // Section-agnostic keyword check: any active area anywhere switches the
    // whole combined request to the keyword-mandating variant.
    let keywords = resolve_keywords(emphasis_areas, None);

    let (prompt, system) = if keywords.is_empty() {
        (
            prompts::full_feedback_generic_prompt(ctx),
            prompts::FULL_GENERIC_SYSTEM.to_string(),
        )
    } else {
        (
            prompts::full_feedback_prompt(ctx, &keywords),
            prompts::full_feedback_system(&keywords),
        )
    };

    info!(
        "Full feedback generation for {} at {} ({} emphasis keywords)",
        ctx.job_title,
        ctx.company_name,
        keywords.len()
    );

    let value = complete(backend, &prompt, &system, FULL_PARAMS).await?;

    Ok(FeedbackContent {
        project_suggestions: extract_string(&value, FEEDBACK_PROJECT_SUGGESTIONS),
        experience_tweaks: extract_string(&value, FEEDBACK_EXPERIENCE_TWEAKS),
        company_matches: extract_company_matches(&value),
    })
}

async fn generate_projects(
    backend: &dyn CompletionBackend,
    ctx: &PromptContext<'_>,
    emphasis_areas: &[EmphasisArea],
    is_regeneration: bool,
) -> Result<Option<String>, AppError> {
    let keywords = resolve_keywords(emphasis_areas, Some(SECTION_PROJECTS));

    let (prompt, system, params) = if is_regeneration && !keywords.is_empty() {
        (
            prompts::regenerate_projects_prompt(ctx, &keywords),
            prompts::regenerate_projects_system(&keywords),
            PROJECTS_REGEN_PARAMS,
        )
    } else if !keywords.is_empty() {
        (
            prompts::projects_prompt(ctx, &keywords),
            prompts::projects_system(&keywords),
            PROJECTS_PARAMS,
        )
    } else {
        (
            prompts::projects_generic_prompt(ctx),
            prompts::PROJECTS_GENERIC_SYSTEM.to_string(),
            PROJECTS_PARAMS,
        )
    };

    let value = complete(backend, &prompt, &system, params).await?;
    Ok(extract_string(&value, FEEDBACK_PROJECT_SUGGESTIONS))
}

async fn generate_experience(
    backend: &dyn CompletionBackend,
    ctx: &PromptContext<'_>,
    emphasis_areas: &[EmphasisArea],
    is_regeneration: bool,
) -> Result<Option<String>, AppError> {
    let keywords = resolve_keywords(emphasis_areas, Some(SECTION_EXPERIENCE));

    let (prompt, system, params) = if is_regeneration && !keywords.is_empty() {
        (
            prompts::regenerate_experience_prompt(ctx, &keywords),
            prompts::regenerate_experience_system(&keywords),
            EXPERIENCE_REGEN_PARAMS,
        )
    } else if !keywords.is_empty() {
        (
            prompts::experience_prompt(ctx, &keywords),
            prompts::experience_system(&keywords),
            EXPERIENCE_PARAMS,
        )
    } else {
        (
            prompts::experience_generic_prompt(ctx),
            prompts::EXPERIENCE_GENERIC_SYSTEM.to_string(),
            EXPERIENCE_PARAMS,
        )
    };

    let value = complete(backend, &prompt, &system, params).await?;
    Ok(extract_string(&value, FEEDBACK_EXPERIENCE_TWEAKS))
}

async fn generate_company_matches(
    backend: &dyn CompletionBackend,
    ctx: &PromptContext<'_>,
    emphasis_areas: &[EmphasisArea],
) -> Result<Option<String>, AppError> {
    // No section filter: company matching draws on every emphasis area.
    let keywords = resolve_keywords(emphasis_areas, None);
    let prompt = prompts::company_matches_prompt(ctx, &keywords);

    let value = complete(
        backend,
        &prompt,
        prompts::COMPANY_MATCHES_SYSTEM,
        COMPANY_PARAMS,
    )
    .await?;
    Ok(extract_company_matches(&value))
}

async fn complete(
    backend: &dyn CompletionBackend,
    prompt: &str,
    system: &str,
    params: GenerationParams,
) -> Result<Value, AppError> {
    backend
        .complete_json(prompt, system, params)
        .await
        .map_err(|e| AppError::Generation(format!("Feedback generation call failed: {e}")))
}

/// Pulls a non-empty string value out of a parsed response. A missing or
/// empty key is a content gap, not a failure.
fn extract_string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Company matches must always come back as a numbered-list string. Models
/// sometimes return an array of names despite the format instruction; the
/// conversion here is mandatory, not cosmetic.
fn extract_company_matches(value: &Value) -> Option<String> {
    match value.get(FEEDBACK_COMPANY_MATCHES) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Array(items)) if !items.is_empty() => {
            let lines: Vec<String> = items
                .iter()
                .filter_map(Value::as_str)
                .enumerate()
                .map(|(i, name)| format!("{}. {}", i + 1, name))
                .collect();
            if lines.is_empty() {
                None
            } else {
                Some(lines.join("\n"))
            }
        }
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
