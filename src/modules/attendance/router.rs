use crate::modules::attendance::controller::{
    create_attendance_record, delete_attendance_record, get_attendance_record,
    get_attendance_records, update_attendance_record,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_attendance_record).get(get_attendance_records))
        .route(
            "/{id}",
            get(get_attendance_record)
                .put(update_attendance_record)
                .delete(delete_attendance_record),
        )
}
