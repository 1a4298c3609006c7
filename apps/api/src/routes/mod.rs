pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Example clauses
        .route(
            "/api/v1/examples/reference",
            get(handlers::handle_reference_examples),
        )
        // Statement of Work
        .route("/api/v1/sow/generate", post(handlers::handle_generate))
        .route("/api/v1/sow/export", post(handlers::handle_export))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
