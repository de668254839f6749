//! Route definitions for `/api/services`.

use axum::routing::get;
use axum::Router;

use crate::handlers::services;
use crate::state::AppState;

/// Routes mounted at `/services`.
///
/// ```text
/// GET    /      -> list_services (public)
/// POST   /      -> create_service (admin)
/// GET    /{id}  -> get_service (public)
/// PUT    /{id}  -> update_service (admin)
/// DELETE /{id}  -> delete_service (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(services::list_services).post(services::create_service),
        )
        .route(
            "/{id}",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
}
