//! Route definitions for `/api/bookings`.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /                 -> list_bookings (auth)
/// POST   /                 -> create_booking (auth, multipart)
/// GET    /my-bookings      -> my_bookings (auth)
/// GET    /slots/available  -> available_slots (public)
/// GET    /{id}             -> get_booking (owner or staff)
/// PUT    /{id}/status      -> update_status (auth)
/// DELETE /user/{userId}    -> purge_user_bookings (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/my-bookings", get(bookings::my_bookings))
        .route("/slots/available", get(bookings::available_slots))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/status", put(bookings::update_status))
        .route("/user/{user_id}", delete(bookings::purge_user_bookings))
}
