use crate::modules::dashboard::controller::dashboard_stats;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_dashboard_router() -> Router<AppState> {
    Router::new().route("/stats", get(dashboard_stats))
}
