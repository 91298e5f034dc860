//! Axum route handlers for the Research API.

use std::time::Duration;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::context::InterviewContext;
use crate::models::profile::JobProfile;
use crate::research::guardrail::validate_profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    pub profile: JobProfile,
    /// Skip the guardrail classification (trusted internal callers only).
    #[serde(default)]
    pub skip_guardrail: bool,
}

#[derive(Debug, Serialize)]
pub struct ResearchResponse {
    pub context: InterviewContext,
}

/// POST /api/v1/research
///
/// Validates the profile through the guardrail, then runs the four research
/// agents and returns the merged interview context. Partial research is a
/// success; flagged input is a validation error.
pub async fn handle_research(
    State(state): State<AppState>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>, AppError> {
    let profile = request.profile;
    if profile.company_name.trim().is_empty() && profile.job_title.trim().is_empty() {
        return Err(AppError::Validation(
            "profile must include at least company_name or job_title".to_string(),
        ));
    }

    if !request.skip_guardrail {
        let verdict = validate_profile(&profile, &state.llm).await?;
        if !verdict.is_safe() {
            return Err(AppError::Validation(verdict.reason));
        }
    }

    let context = crate::research::research(
        &profile,
        &state.llm,
        state.search.as_ref(),
        Duration::from_secs(state.config.research_timeout_secs),
    )
    .await;

    Ok(Json(ResearchResponse { context }))
}
