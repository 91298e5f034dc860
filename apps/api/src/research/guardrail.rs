//! Safety validation of user-supplied job profiles. Runs before the research
//! pipeline: flagged input is rejected with a validation error rather than
//! fed to downstream agents.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::{profile_input_json, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::profile::JobProfile;
use crate::research::prompts::GUARDRAIL_SYSTEM;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyFlags {
    pub contains_any_malicious_content: bool,
    pub contains_significantly_off_topic_content: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailVerdict {
    pub reason: String,
    pub safety_flags: SafetyFlags,
}

impl GuardrailVerdict {
    pub fn is_safe(&self) -> bool {
        !self.safety_flags.contains_any_malicious_content
            && !self.safety_flags.contains_significantly_off_topic_content
    }
}

/// Classifies the profile via the guardrail prompt. The profile text is
/// untrusted data; it is serialized into the prompt as a JSON payload, never
/// interpolated as instructions.
pub async fn validate_profile(
    profile: &JobProfile,
    llm: &LlmClient,
) -> Result<GuardrailVerdict, AppError> {
    let input = profile_input_json(profile);
    let system = format!("{JSON_ONLY_SYSTEM}\n\n{GUARDRAIL_SYSTEM}");
    llm.call_json::<GuardrailVerdict>(&system, &input)
        .await
        .map_err(|e| AppError::Llm(format!("Guardrail classification failed: {e}")))
}
