//! Route definitions for `/api/users`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /               -> list_users (admin)
/// GET    /{id}           -> get_user (admin or self)
/// PUT    /{id}           -> update_user (admin or self)
/// DELETE /{id}           -> delete_user (admin)
/// POST   /{id}/vehicles  -> add_vehicle (admin or self)
/// PUT    /{id}/role      -> update_role (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{id}/vehicles", post(users::add_vehicle))
        .route("/{id}/role", put(users::update_role))
}
