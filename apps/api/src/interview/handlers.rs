//! Axum route handlers for the Interview API.
//!
//! Session state travels with the request/response pair; the server holds
//! nothing between turns, so a client can resume, cancel, or evaluate a
//! session at any point with what it already has.

use std::time::Duration;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::{InterviewSession, SessionError};
use crate::models::context::InterviewContext;
use crate::models::transcript::{Transcript, Turn};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    pub context: InterviewContext,
}

#[derive(Debug, Serialize)]
pub struct InterviewTurnResponse {
    pub session: InterviewSession,
    pub turn: Turn,
}

#[derive(Debug, Deserialize)]
pub struct NextTurnRequest {
    pub session: InterviewSession,
    pub candidate_answer: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub session: InterviewSession,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    /// Preserved, marked incomplete, ready for evaluation of available turns.
    pub transcript: Transcript,
}

fn map_session_error(e: SessionError) -> AppError {
    match e {
        SessionError::Terminal => {
            AppError::SessionTerminal("interview already concluded".to_string())
        }
        SessionError::Compliance { attempts } => AppError::Compliance(format!(
            "could not produce a compliant interviewer turn after {attempts} attempts"
        )),
        SessionError::Generation(e) => AppError::Llm(e.to_string()),
        SessionError::Transcript(e) => AppError::Validation(e.to_string()),
    }
}

/// POST /api/v1/interviews
///
/// Starts a session from an InterviewContext and returns the opening turn.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(request): Json<StartInterviewRequest>,
) -> Result<Json<InterviewTurnResponse>, AppError> {
    let mut session = InterviewSession::new(&request.context);
    let turn = session
        .advance(
            None,
            &state.llm,
            &state.denylist,
            state.config.max_regen_attempts,
            Duration::from_secs(state.config.turn_timeout_secs),
        )
        .await
        .map_err(map_session_error)?;

    Ok(Json(InterviewTurnResponse { session, turn }))
}

/// POST /api/v1/interviews/turn
///
/// Records the candidate's answer and returns the next interviewer turn.
pub async fn handle_next_turn(
    State(state): State<AppState>,
    Json(request): Json<NextTurnRequest>,
) -> Result<Json<InterviewTurnResponse>, AppError> {
    if request.candidate_answer.trim().is_empty() {
        return Err(AppError::Validation(
            "candidate_answer cannot be empty".to_string(),
        ));
    }

    let mut session = request.session;
    let turn = session
        .advance(
            Some(&request.candidate_answer),
            &state.llm,
            &state.denylist,
            state.config.max_regen_attempts,
            Duration::from_secs(state.config.turn_timeout_secs),
        )
        .await
        .map_err(map_session_error)?;

    Ok(Json(InterviewTurnResponse { session, turn }))
}

/// POST /api/v1/interviews/cancel
///
/// Cancels mid-interview; the transcript so far is preserved and marked
/// incomplete.
pub async fn handle_cancel(
    State(_state): State<AppState>,
    Json(request): Json<CancelRequest>,
) -> Result<Json<CancelResponse>, AppError> {
    let mut session = request.session;
    session.cancel();
    Ok(Json(CancelResponse {
        transcript: session.transcript,
    }))
}
