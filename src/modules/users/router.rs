use crate::modules::users::controller::{
    convert_to_student, convert_to_teacher, get_user, get_users,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/convert-to-teacher", post(convert_to_teacher))
        .route("/convert-to-student", post(convert_to_student))
        .route("/{id}", get(get_user))
}
