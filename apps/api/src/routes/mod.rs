pub mod health;
pub mod reports;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/reports", post(reports::handle_create_report))
        .with_state(state)
}
