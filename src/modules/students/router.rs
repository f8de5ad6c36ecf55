use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_student, get_student, get_students, review_student_status, update_student,
};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(get_students))
        .route("/{id}", get(get_student).put(update_student))
        .route("/{id}/status", post(review_student_status))
}
