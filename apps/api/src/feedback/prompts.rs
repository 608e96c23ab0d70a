//! Prompt construction for feedback generation.
//!
//! Every builder here is a pure function from (job context, keywords, mode)
//! to instruction text, so the steering rules — mandatory keyword inclusion,
//! distribution-across-bullets, regenerate-from-scratch — are unit-testable
//! without a network call. Keyword rules are restated in the system prompt
//! because models drop constraints that appear only once.

/// Job context shared by all prompt builders.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub resume_text: &'a str,
    pub job_title: &'a str,
    pub company_name: &'a str,
    pub job_description: &'a str,
    pub custom_requirements: Option<&'a str>,
}

/// Resume text is truncated for the company-match prompt — list output needs
/// a summary, not the full document.
const COMPANY_RESUME_CHAR_LIMIT: usize = 2000;

fn join(keywords: &[String]) -> String {
    keywords.join(", ")
}

fn requirements_line(ctx: &PromptContext) -> String {
    match ctx.custom_requirements {
        Some(reqs) if !reqs.trim().is_empty() => format!("\n- Additional Requirements: {reqs}"),
        _ => String::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Full-generation mode (one combined call, three sections)
// ────────────────────────────────────────────────────────────────────────────

/// System prompt for combined generation when emphasis keywords exist.
/// Restates the mandatory-keyword rule to reduce omission.
pub fn full_feedback_system(keywords: &[String]) -> String {
    let kw = join(keywords);
    format!(
        "You must incorporate these exact terms in your output: {kw}.\n\n\
         Every bullet point you write must mention at least one of these terms \
         explicitly. Not conceptually - the actual words must appear.\n\n\
         If you write a bullet that doesn't contain these terms, you have failed the task."
    )
}

/// System prompt for combined generation without emphasis keywords.
pub const FULL_GENERIC_SYSTEM: &str =
    "You are an elite resume writer. Be thorough and professional. \
     You MUST respond with valid JSON only.";

/// Combined three-section prompt, emphasis variant. Project titles and every
/// bullet must carry at least one literal keyword.
pub fn full_feedback_prompt(ctx: &PromptContext, keywords: &[String]) -> String {
    let kw = join(keywords);
    let company = ctx.company_name;
    format!(
        r#"You are an elite resume writer. The user wants their resume to focus on these specific areas: {kw}.

RESUME TEXT:
{resume}

TARGET JOB:
- Company: {company}
- Position: {title}
- Job Description: {jd}{reqs}

Generate 3 sections. For EACH section, you MUST use the emphasis areas [{kw}].

SECTION 1 - PROJECT SUGGESTIONS:
For each of the 3 projects:
1. Pick at least 2 emphasis areas from [{kw}]
2. Build a project that DIRECTLY uses/demonstrates those areas
3. The project title must reference at least one emphasis area
4. Every resume bullet must mention specific technologies/frameworks from the emphasis areas

Format each project as:

**Project [number]: [Title that includes emphasis area]**

[2-3 sentences describing the project - must mention emphasis areas]

**Why this matters for {company}:**
[Brief explanation]

**Resume Bullets:**
Write 3-4 bullets (1.5-2 lines each). EACH bullet must:
- Start with action verb
- Explicitly mention at least one emphasis area: {kw}
- Include metrics
- Format: "[Verb] [what you did with EMPHASIS AREA] using [specific tech from emphasis] to [impact + metrics]"

---

SECTION 2 - EXPERIENCE ENHANCEMENT:
Look at their current resume. Rewrite 3-4 bullets to explicitly include the emphasis areas.

INSTRUCTIONS:
1. For EACH bullet, select 1-2 emphasis areas from [{kw}]
2. Transform the original work to showcase those areas
3. Add specific details/technologies related to the emphasis areas
4. Include metrics

You MUST mention at least one of [{kw}] in EACH bullet explicitly.

---

SECTION 3 - ALTERNATIVE COMPANIES:
List 10 companies (NOT big tech: no Google, Meta, Amazon, Apple, Microsoft) that value these emphasis areas: {kw}.

Format:
1. [Company Name]
2. [Company Name]
...
10. [Company Name]

---

Return ONLY valid JSON:
{{
  "project_suggestions": "markdown string with all 3 projects",
  "experience_tweaks": "markdown string with enhanced bullets only",
  "company_matches": "markdown string with numbered list"
}}"#,
        resume = ctx.resume_text,
        title = ctx.job_title,
        jd = ctx.job_description,
        reqs = requirements_line(ctx),
    )
}

/// Combined three-section prompt without keyword constraints. Still requires
/// metrics and specific technologies per bullet, and the 10-company list.
pub fn full_feedback_generic_prompt(ctx: &PromptContext) -> String {
    let company = ctx.company_name;
    format!(
        r#"You are an elite resume writer with 15+ years of experience.

RESUME TEXT:
{resume}

TARGET JOB:
- Company: {company}
- Position: {title}
- Job Description: {jd}{reqs}

Provide feedback in these three sections:

1. PROJECT SUGGESTIONS (project_suggestions):
Generate 3 projects for {company}. For each provide:
- Project title and description (2-3 sentences)
- Why it matters for {company}
- 3-4 dense resume bullets with action verbs, specific technologies, and metrics

2. EXPERIENCE ENHANCEMENT (experience_tweaks):
Rewrite 3-4 bullets from their resume to be more compelling for {company}.
- Add metrics
- Include specific technologies
- Show business impact
Format as bulleted list only.

3. ALTERNATIVE COMPANIES (company_matches):
List 10 companies (NOT big tech: no Google, Meta, Amazon, Apple, Microsoft) as numbered list.

Return ONLY valid JSON:
{{
  "project_suggestions": "markdown formatted string",
  "experience_tweaks": "markdown formatted string",
  "company_matches": "markdown formatted string"
}}"#,
        resume = ctx.resume_text,
        title = ctx.job_title,
        jd = ctx.job_description,
        reqs = requirements_line(ctx),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Project suggestions (targeted mode)
// ────────────────────────────────────────────────────────────────────────────

pub fn projects_system(keywords: &[String]) -> String {
    let kw = join(keywords);
    format!(
        "The user wants these specific terms in every output: {kw}\n\n\
         You MUST use these exact words in your project titles and bullets. \
         Check your work - if these terms don't appear, start over."
    )
}

pub const PROJECTS_GENERIC_SYSTEM: &str =
    "Generate project suggestions. You MUST respond with valid JSON only.";

pub fn projects_prompt(ctx: &PromptContext, keywords: &[String]) -> String {
    let kw = join(keywords);
    format!(
        r#"Generate 3 project suggestions for {title} at {company}.

RESUME: {resume}

JOB DESCRIPTION: {jd}

MANDATORY FOCUS AREAS: {kw}

INSTRUCTIONS:
For each project:
1. Choose 2-3 focus areas from [{kw}]
2. Create a project that directly uses/demonstrates those areas
3. Project title must include at least one focus area
4. All bullets must explicitly mention the focus areas

Format each project:

**Project [number]: [Title - must reference a focus area]**

[Description mentioning focus areas: {kw}]

**Why this matters for {company}:**
[Brief explanation]

**Resume Bullets:**
(3-4 bullets, each MUST contain at least one of: {kw})

- [Action verb] [what you built with FOCUS AREA] using [specific tech] to [impact + metrics]

Return ONLY valid JSON:
{{
  "project_suggestions": "markdown formatted string with all 3 projects"
}}"#,
        title = ctx.job_title,
        company = ctx.company_name,
        resume = ctx.resume_text,
        jd = ctx.job_description,
    )
}

pub fn projects_generic_prompt(ctx: &PromptContext) -> String {
    format!(
        r#"Generate 3 project suggestions for {title} at {company}.

RESUME: {resume}
JOB DESCRIPTION: {jd}

For each project provide title, description, why it matters, and 3-4 resume bullets with metrics.

Return ONLY valid JSON:
{{ "project_suggestions": "markdown formatted string" }}"#,
        title = ctx.job_title,
        company = ctx.company_name,
        resume = ctx.resume_text,
        jd = ctx.job_description,
    )
}

/// Regeneration variant used after emphasis areas change: prior suggestions
/// are explicitly discarded and entirely new projects invented, with the
/// keyword-inclusion rule preserved.
pub fn regenerate_projects_system(keywords: &[String]) -> String {
    let kw = join(keywords);
    format!(
        "Create NEW projects from scratch that prominently feature: {kw}. \
         These terms must appear in titles and bullets."
    )
}

pub fn regenerate_projects_prompt(ctx: &PromptContext, keywords: &[String]) -> String {
    let kw = join(keywords);
    let kw_or = keywords.join(" or ");
    format!(
        r#"REGENERATE project suggestions from scratch focusing on: {kw}.

IGNORE any previous project suggestions. Start fresh.

RESUME: {resume}
TARGET: {title} at {company}
JOB DESCRIPTION: {jd}

REQUIRED FOCUS: {kw}

Create 3 COMPLETELY NEW projects that showcase these focus areas. Each project MUST:
- Have a title that includes one focus area
- Use 2-3 of the focus areas: {kw}
- Have bullets that explicitly mention these terms

Format:

**Project 1: [Title with focus area]**
[Description using: {kw}]

**Why this matters for {company}:**
[Explanation]

**Resume Bullets:**
- [Must contain: {kw_or}] with metrics
- [Must contain: {kw_or}] with metrics
- [Must contain: {kw_or}] with metrics

[Repeat for Projects 2 and 3]

Return ONLY valid JSON:
{{ "project_suggestions": "markdown string" }}"#,
        resume = ctx.resume_text,
        title = ctx.job_title,
        company = ctx.company_name,
        jd = ctx.job_description,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Experience enhancement (targeted mode)
// ────────────────────────────────────────────────────────────────────────────

/// Experience bullets describe different aspects of ONE coherent invented
/// project, with keywords distributed across bullets — per-bullet keyword
/// stuffing reads as unnatural and is instructed against explicitly.
pub fn experience_system(keywords: &[String]) -> String {
    let kw = join(keywords);
    format!(
        "CREATE a cohesive project narrative using: {kw}\n\n\
         Write bullets that describe DIFFERENT ASPECTS of the same project. \
         DO NOT repeat all keywords in every bullet - that's unnatural. \
         Distribute them across bullets naturally.\n\n\
         Think: What would this project actually involve? What are its different components?"
    )
}

pub const EXPERIENCE_GENERIC_SYSTEM: &str =
    "CREATE new impressive resume bullets about ONE cohesive project. \
     Each bullet = different aspect. You MUST respond with valid JSON only.";

pub fn experience_prompt(ctx: &PromptContext, keywords: &[String]) -> String {
    let kw = join(keywords);
    format!(
        r#"CREATE 3-4 brand new experience bullets for {title} at {company}.

CONTEXT (understand their level):
{resume}

JOB DESCRIPTION: {jd}

FOCUS AREAS: {kw}

CRITICAL INSTRUCTION:
Create ONE cohesive project/experience that naturally incorporates the focus areas: {kw}

Then write 3-4 bullets that describe DIFFERENT ASPECTS of that project:
- Bullet 1: Focus on the architecture/design (mention some focus areas)
- Bullet 2: Focus on implementation/optimization (mention different focus areas)
- Bullet 3: Focus on results/impact (weave in remaining focus areas naturally)
- Bullet 4: Focus on collaboration/deployment (if relevant)

DO NOT repeat the same keywords in every bullet. Distribute them naturally across bullets.
DO NOT force all keywords into every bullet - that's repetitive and unnatural.

Example for focus areas "React, Node.js, PostgreSQL, AWS":
GOOD (varied, natural):
- Architected full-stack e-commerce platform using React and Node.js microservices, handling 50K+ concurrent users
- Optimized PostgreSQL database queries and implemented Redis caching, reducing API response time by 65%
- Deployed serverless infrastructure on AWS Lambda and ECS, cutting hosting costs by $15K/month
- Led team of 4 engineers through agile sprints, delivering features 40% faster than previous quarter

BAD (repetitive, keyword stuffing):
- Built React and Node.js platform with PostgreSQL and AWS, handling 50K users
- Developed React frontend with Node.js backend using PostgreSQL database on AWS infrastructure
- Created React components with Node.js APIs connected to PostgreSQL running on AWS

Your turn - create ONE cohesive project using: {kw}

Format:

**Enhanced Experience Bullets:**

- [Bullet 1 - architecture/design aspect]

- [Bullet 2 - implementation/optimization aspect]

- [Bullet 3 - results/impact aspect]

- [Bullet 4 - collaboration/deployment aspect (optional)]

Return ONLY valid JSON:
{{
  "experience_tweaks": "markdown formatted string"
}}"#,
        title = ctx.job_title,
        company = ctx.company_name,
        resume = ctx.resume_text,
        jd = ctx.job_description,
    )
}

pub fn experience_generic_prompt(ctx: &PromptContext) -> String {
    format!(
        r#"CREATE 3-4 new experience bullets for {title} at {company}.

CONTEXT (understand their level):
{resume}

JOB DESCRIPTION: {jd}

INVENT one cohesive project. Write bullets describing different aspects:
- Architecture/design
- Implementation/optimization
- Results/impact
- Collaboration (if relevant)

Include specific technologies and metrics. Make bullets 1.5-2 lines each.

Return ONLY valid JSON:
{{ "experience_tweaks": "markdown formatted string" }}"#,
        title = ctx.job_title,
        company = ctx.company_name,
        resume = ctx.resume_text,
        jd = ctx.job_description,
    )
}

pub fn regenerate_experience_system(keywords: &[String]) -> String {
    let kw = join(keywords);
    format!(
        "Create ONE cohesive project using: {kw}\n\n\
         Each bullet describes a DIFFERENT ASPECT. Don't repeat keywords - \
         distribute them naturally across the narrative."
    )
}

pub fn regenerate_experience_prompt(ctx: &PromptContext, keywords: &[String]) -> String {
    let kw = join(keywords);
    format!(
        r#"CREATE 3-4 experience bullets for ONE cohesive project using: {kw}.

CONTEXT:
{resume}

TARGET: {title} at {company}
JOB DESCRIPTION: {jd}

FOCUS: {kw}

INSTRUCTIONS:
Think of ONE impressive project that naturally uses these technologies: {kw}

Then write 3-4 bullets describing DIFFERENT ASPECTS of that single project:
1. Architecture/system design
2. Core implementation/optimization
3. Results/business impact
4. Team collaboration/deployment

DO NOT stuff all keywords into every bullet. Distribute them naturally.

Example for "C++, CUDA, SLAM":

GOOD (cohesive story, varied):
- Architected real-time SLAM pipeline for autonomous navigation using C++, processing LiDAR point clouds at 30Hz with sub-centimeter accuracy
- Optimized pose estimation algorithms with CUDA, achieving 5x speedup in particle filter computations and enabling real-time mapping
- Deployed system on embedded hardware running proprietary C++ framework, reducing memory footprint by 40% while maintaining performance
- Integrated mapping module with navigation stack, enabling robots to autonomously explore 10,000+ sq ft environments

BAD (repetitive keyword stuffing):
- Built C++ SLAM system with CUDA achieving real-time performance
- Developed CUDA-accelerated SLAM in C++ for robot navigation
- Implemented C++ and CUDA SLAM algorithm for autonomous systems
- Created SLAM pipeline using C++ and CUDA acceleration

Your turn with: {kw}

Format:

**Enhanced Experience Bullets:**

- [Bullet 1 - architecture/design]
- [Bullet 2 - implementation/optimization]
- [Bullet 3 - results/impact]
- [Bullet 4 - collaboration/deployment]

Return ONLY valid JSON:
{{ "experience_tweaks": "markdown string" }}"#,
        resume = ctx.resume_text,
        title = ctx.job_title,
        company = ctx.company_name,
        jd = ctx.job_description,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Company matches (section-agnostic)
// ────────────────────────────────────────────────────────────────────────────

pub const COMPANY_MATCHES_SYSTEM: &str =
    "Generate a numbered list of 10 company names in markdown format. \
     Each line should be: \"1. Company Name\". \
     You MUST respond with valid JSON only.";

pub fn company_matches_prompt(ctx: &PromptContext, keywords: &[String]) -> String {
    let emphasis_clause = if keywords.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nFocus on companies working with: {}",
            join(keywords)
        )
    };

    let resume_summary: String = ctx.resume_text.chars().take(COMPANY_RESUME_CHAR_LIMIT).collect();

    format!(
        r#"Suggest 10 companies (NOT big tech: no Google, Meta, Amazon, Apple, Microsoft) for someone targeting {title} at {company}.

RESUME SUMMARY:
{resume_summary}{emphasis_clause}

Return as a markdown formatted numbered list. Each company on its own line.

Format EXACTLY like this:
1. Company Name One
2. Company Name Two
3. Company Name Three
4. Company Name Four
5. Company Name Five
6. Company Name Six
7. Company Name Seven
8. Company Name Eight
9. Company Name Nine
10. Company Name Ten

Return ONLY valid JSON:
{{
  "company_matches": "1. Company Name\n2. Company Name\n3. Company Name\n..."
}}"#,
        title = ctx.job_title,
        company = ctx.company_name,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PromptContext<'static> {
        PromptContext {
            resume_text: "Senior engineer with 8 years of backend experience.",
            job_title: "Staff Engineer",
            company_name: "Acme",
            job_description: "Build distributed systems.",
            custom_requirements: None,
        }
    }

    fn keywords(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_system_restates_keyword_mandate() {
        let system = full_feedback_system(&keywords(&["Kubernetes", "Rust"]));
        assert!(system.contains("Kubernetes, Rust"));
        assert!(system.contains("must mention at least one"));
    }

    #[test]
    fn test_full_prompt_contains_job_context_and_keywords() {
        let prompt = full_feedback_prompt(&ctx(), &keywords(&["Kubernetes"]));
        assert!(prompt.contains("Kubernetes"));
        assert!(prompt.contains("Staff Engineer"));
        assert!(prompt.contains("Acme"));
        assert!(prompt.contains("project_suggestions"));
        assert!(prompt.contains("company_matches"));
    }

    #[test]
    fn test_full_prompt_includes_custom_requirements_when_present() {
        let mut context = ctx();
        context.custom_requirements = Some("Must know gRPC");
        let prompt = full_feedback_prompt(&context, &keywords(&["Rust"]));
        assert!(prompt.contains("Additional Requirements: Must know gRPC"));

        let without = full_feedback_prompt(&ctx(), &keywords(&["Rust"]));
        assert!(!without.contains("Additional Requirements"));
    }

    #[test]
    fn test_generic_full_prompt_has_no_emphasis_language() {
        let prompt = full_feedback_generic_prompt(&ctx());
        assert!(!prompt.contains("emphasis area"));
        assert!(prompt.contains("metrics"));
        assert!(prompt.contains("10 companies"));
    }

    #[test]
    fn test_regenerate_projects_discards_prior_output() {
        let prompt = regenerate_projects_prompt(&ctx(), &keywords(&["GraphQL"]));
        assert!(prompt.contains("IGNORE any previous project suggestions"));
        assert!(prompt.contains("COMPLETELY NEW"));
        assert!(prompt.contains("GraphQL"));
    }

    #[test]
    fn test_experience_prompt_instructs_distribution_not_stuffing() {
        let prompt = experience_prompt(&ctx(), &keywords(&["Kafka", "Flink"]));
        assert!(prompt.contains("DIFFERENT ASPECTS"));
        assert!(prompt.contains("DO NOT repeat the same keywords in every bullet"));
        assert!(prompt.contains("Kafka, Flink"));
    }

    #[test]
    fn test_regenerate_experience_keeps_distribution_rule() {
        let system = regenerate_experience_system(&keywords(&["CUDA"]));
        assert!(system.contains("DIFFERENT ASPECT"));
        let prompt = regenerate_experience_prompt(&ctx(), &keywords(&["CUDA"]));
        assert!(prompt.contains("DO NOT stuff all keywords"));
    }

    #[test]
    fn test_company_prompt_excludes_big_tech_by_name() {
        let prompt = company_matches_prompt(&ctx(), &[]);
        for name in ["Google", "Meta", "Amazon", "Apple", "Microsoft"] {
            assert!(prompt.contains(name), "missing exclusion for {name}");
        }
        assert!(prompt.contains("10. Company Name Ten"));
    }

    #[test]
    fn test_company_prompt_truncates_resume_text() {
        let long_resume = "x".repeat(5000);
        let context = PromptContext {
            resume_text: &long_resume,
            ..ctx()
        };
        let prompt = company_matches_prompt(&context, &[]);
        let run: String = "x".repeat(COMPANY_RESUME_CHAR_LIMIT);
        assert!(prompt.contains(&run));
        assert!(!prompt.contains(&"x".repeat(COMPANY_RESUME_CHAR_LIMIT + 1)));
    }

    #[test]
    fn test_company_prompt_emphasis_clause_only_with_keywords() {
        let with = company_matches_prompt(&ctx(), &keywords(&["Rust"]));
        assert!(with.contains("Focus on companies working with: Rust"));
        let without = company_matches_prompt(&ctx(), &[]);
        assert!(!without.contains("Focus on companies working with"));
    }
}
