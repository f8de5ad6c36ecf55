use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_staff, get_staff_member, get_staff_members, review_staff_status, update_staff,
};

pub fn init_staff_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_staff).get(get_staff_members))
        .route("/{id}", get(get_staff_member).put(update_staff))
        .route("/{id}/status", post(review_staff_status))
}
