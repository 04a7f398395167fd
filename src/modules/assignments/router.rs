use crate::modules::assignments::controller::{
    create_assignment, delete_assignment, get_assignment, get_assignments, update_assignment,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_assignments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assignment).get(get_assignments))
        .route(
            "/{id}",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
}
