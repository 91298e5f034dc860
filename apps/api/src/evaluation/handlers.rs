//! Axum route handler for the Evaluation API. Aggregation itself is pure;
//! the handler only validates the inputs and shapes the response.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::evaluation::{aggregate, render::render_markdown};
use crate::models::evaluation::{CoachingReport, EvaluationRecord};
use crate::models::profile::JobProfile;
use crate::models::transcript::Transcript;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AggregateRequest {
    pub profile: JobProfile,
    pub transcript: Transcript,
    #[serde(default)]
    pub evaluations: Vec<EvaluationRecord>,
}

#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    pub report: CoachingReport,
    pub markdown: String,
}

/// POST /api/v1/evaluations/aggregate
///
/// Incomplete (cancelled) transcripts are accepted; the report then covers
/// the available turns and says so.
pub async fn handle_aggregate(
    State(_state): State<AppState>,
    Json(request): Json<AggregateRequest>,
) -> Result<Json<AggregateResponse>, AppError> {
    if request.transcript.turns.is_empty() {
        return Err(AppError::Validation(
            "transcript has no turns to evaluate".to_string(),
        ));
    }

    let report = aggregate(&request.profile, &request.transcript, &request.evaluations);
    info!(
        items = report.items.len(),
        evaluations = request.evaluations.len(),
        "aggregated evaluation report"
    );

    let markdown = render_markdown(&report);
    Ok(Json(AggregateResponse { report, markdown }))
}
