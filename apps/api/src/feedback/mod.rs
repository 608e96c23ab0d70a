// Feedback engine: section planning, prompt construction, LLM generation,
// and reconciliation of regenerated sections into stored feedback.
// All LLM calls go through llm_client — no direct API calls here.

pub mod generator;
pub mod handlers;
pub mod planner;
pub mod prompts;
pub mod reconciler;
