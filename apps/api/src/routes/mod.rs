pub mod health;

use axum::{routing::get, Router};

use crate::readings::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/data",
            get(handlers::handle_get_latest).post(handlers::handle_post_reading),
        )
        .with_state(state)
}
