pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::intake::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring preview
        .route("/api/v1/score", post(handlers::handle_score_preview))
        // Applications
        .route(
            "/api/v1/applications",
            get(handlers::handle_list).post(handlers::handle_submit),
        )
        .route("/api/v1/applications/stats", get(handlers::handle_stats))
        .route("/api/v1/applications/:id", get(handlers::handle_get))
        .route(
            "/api/v1/applications/:id/status",
            patch(handlers::handle_review),
        )
        .route(
            "/api/v1/applications/:id/analysis",
            get(handlers::handle_analysis_status)
                .post(handlers::handle_schedule_analysis)
                .delete(handlers::handle_cancel_analysis),
        )
        .with_state(state)
}
