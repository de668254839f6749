//! Route definitions for `/api/dashboard`.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /                -> dashboard (auth, role-aware)
/// GET /customer-stats  -> customer_stats (auth)
/// GET /revenue         -> revenue (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/customer-stats", get(dashboard::customer_stats))
        .route("/revenue", get(dashboard::revenue))
}
