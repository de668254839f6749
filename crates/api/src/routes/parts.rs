//! Route definitions for `/api/parts`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::parts;
use crate::state::AppState;

/// Routes mounted at `/parts`.
///
/// ```text
/// GET    /                  -> list_parts (auth)
/// POST   /                  -> create_part (staff)
/// GET    /{id}              -> get_part (auth)
/// PUT    /{id}              -> update_part (staff)
/// DELETE /{id}              -> delete_part (admin)
/// PATCH  /{id}/stock        -> set_stock (staff)
/// GET    /alerts/low-stock  -> low_stock (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(parts::list_parts).post(parts::create_part))
        .route(
            "/{id}",
            get(parts::get_part)
                .put(parts::update_part)
                .delete(parts::delete_part),
        )
        .route("/{id}/stock", patch(parts::set_stock))
        .route("/alerts/low-stock", get(parts::low_stock))
}
