// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// The anti-fabrication rule shared by every research agent: unsourced
/// fields are omitted, never invented. The coordinator also enforces this
/// mechanically after the fact (see `research::tasks::scrub_report`).
pub const ANTI_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Do not fabricate. If a field cannot be found in the sources \
    provided, DO NOT include it in the report. Omit the bullet entirely. \
    If an entire section has no sourced content, omit that section heading \
    and its bullets. A partial report is expected and valid.";

/// Builds the JSON input block the research and guide prompts expect.
pub fn profile_input_json(profile: &crate::models::profile::JobProfile) -> String {
    serde_json::json!({
        "job_title": profile.job_title,
        "job_location": profile.job_location,
        "job_description": profile.job_description,
        "work_schedule": profile.work_schedule,
        "company": profile.company_name,
        "job_expectations_and_responsibilities": profile.expectations_and_responsibilities,
        "job_requirements": profile.requirements,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::JobProfile;

    #[test]
    fn test_profile_input_json_uses_company_key() {
        let profile = JobProfile {
            company_name: "Beanhouse".to_string(),
            ..Default::default()
        };
        let json = profile_input_json(&profile);
        assert!(json.contains(r#""company":"Beanhouse""#));
    }
}
