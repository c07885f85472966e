//! Route configuration.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body = state.config.max_content_length;

    Router::new()
        .route("/", get(handlers::pages::index))
        .route("/upload", post(handlers::upload::upload))
        .route("/results", get(handlers::pages::results))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
