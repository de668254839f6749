//! Route definitions for `/api/notifications`.
//!
//! All endpoints require authentication and are owner-scoped.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /               -> list_notifications
/// GET    /unread-count   -> unread_count
/// PUT    /{id}/read      -> mark_read
/// PUT    /read/all       -> mark_all_read
/// DELETE /{id}           -> delete_notification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/unread-count", get(notifications::unread_count))
        .route("/{id}/read", put(notifications::mark_read))
        .route("/read/all", put(notifications::mark_all_read))
        .route(
            "/{id}",
            axum::routing::delete(notifications::delete_notification),
        )
}
