use crate::modules::teachers::controller::{
    create_teacher, delete_teacher, get_teacher, get_teacher_classes, get_teacher_students,
    get_teachers, update_teacher,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_teacher).get(get_teachers))
        .route(
            "/{id}",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        .route("/{id}/classes", get(get_teacher_classes))
        .route("/{id}/students", get(get_teacher_students))
}
