//! Handlers for `/api/notifications`.
//!
//! All endpoints are owner-scoped: a user only ever sees or mutates their
//! own notifications.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use motoshop_core::error::CoreError;
use motoshop_core::types::DbId;
use motoshop_db::models::notification::Notification;
use motoshop_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub is_read: Option<bool>,
}

/// GET /api/notifications (auth)
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications =
        NotificationRepo::list_for_user(&state.pool, auth.user_id, params.is_read).await?;
    Ok(Json(notifications))
}

/// GET /api/notifications/unread-count (auth)
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(json!({ "count": count })))
}

/// PUT /api/notifications/{id}/read (auth)
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let found = NotificationRepo::mark_read(&state.pool, notification_id, auth.user_id).await?;
    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }
    Ok(Json(json!({ "message": "Notification marked as read" })))
}

/// PUT /api/notifications/read/all (auth)
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(Json(json!({ "message": "All notifications marked as read", "count": count })))
}

/// DELETE /api/notifications/{id} (auth)
pub async fn delete_notification(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = NotificationRepo::delete(&state.pool, notification_id, auth.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }
    Ok(Json(json!({ "message": "Notification deleted" })))
}
