//! Handlers for `/api/dashboard`: aggregate stats for both dashboards.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use motoshop_core::roles::is_staff;
use motoshop_db::repositories::dashboard_repo::RevenueBucket;
use motoshop_db::repositories::DashboardRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    pub period: Option<String>,
}

/// GET /api/dashboard (auth)
///
/// Customers get their personal stats and recent service history; staff get
/// the shop-wide overview with the latest bookings.
pub async fn dashboard(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    if is_staff(&auth.role) {
        let stats = DashboardRepo::staff_stats(&state.pool).await?;
        let recent = DashboardRepo::recent_bookings(&state.pool).await?;
        Ok(Json(json!({ "stats": stats, "recentBookings": recent })))
    } else {
        let stats = DashboardRepo::customer_stats(&state.pool, auth.user_id).await?;
        let history = DashboardRepo::recent_history(&state.pool, auth.user_id).await?;
        Ok(Json(json!({ "stats": stats, "recentHistory": history })))
    }
}

/// GET /api/dashboard/customer-stats (auth)
///
/// The customer subset, regardless of role (staff previewing the customer
/// view get their own numbers).
pub async fn customer_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let stats = DashboardRepo::customer_stats(&state.pool, auth.user_id).await?;
    let history = DashboardRepo::recent_history(&state.pool, auth.user_id).await?;
    Ok(Json(json!({ "stats": stats, "recentHistory": history })))
}

/// GET /api/dashboard/revenue?period=week|month (staff)
pub async fn revenue(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<RevenueQuery>,
) -> AppResult<Json<Vec<RevenueBucket>>> {
    let by_week = match params.period.as_deref() {
        Some("week") => true,
        Some("month") | None => false,
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "Invalid period '{other}', expected 'week' or 'month'"
            )));
        }
    };
    let buckets = DashboardRepo::revenue(&state.pool, by_week).await?;
    Ok(Json(buckets))
}
