pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers as evaluation_handlers;
use crate::interview::handlers as interview_handlers;
use crate::research::handlers as research_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Research API
        .route(
            "/api/v1/research",
            post(research_handlers::handle_research),
        )
        // Interview API
        .route(
            "/api/v1/interviews",
            post(interview_handlers::handle_start),
        )
        .route(
            "/api/v1/interviews/turn",
            post(interview_handlers::handle_next_turn),
        )
        .route(
            "/api/v1/interviews/cancel",
            post(interview_handlers::handle_cancel),
        )
        // Evaluation API
        .route(
            "/api/v1/evaluations/aggregate",
            post(evaluation_handlers::handle_aggregate),
        )
        .with_state(state)
}
