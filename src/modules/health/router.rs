use crate::modules::health::controller::{api_index, health_check};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_index))
        .route("/health", get(health_check))
}
