//! Handlers for `/api/users`: account administration and profiles.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use motoshop_core::error::CoreError;
use motoshop_core::roles::{ALL_ROLES, ROLE_ADMIN};
use motoshop_core::types::DbId;
use motoshop_db::models::user::{UpdateProfile, UserRow};
use motoshop_db::models::vehicle::{NewVehicle, Vehicle};
use motoshop_db::repositories::{UserRepo, VehicleRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// Admins may act on anyone; everyone else only on themselves.
fn ensure_self_or_admin(auth: &AuthUser, target: DbId) -> Result<(), AppError> {
    if auth.role != ROLE_ADMIN && auth.user_id != target {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not authorized".into(),
        )));
    }
    Ok(())
}

/// GET /api/users (admin)
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListQuery>,
) -> AppResult<Json<Vec<UserRow>>> {
    let users =
        UserRepo::list(&state.pool, params.role.as_deref(), params.search.as_deref()).await?;
    Ok(Json(users))
}

/// GET /api/users/{id} (admin or self) -- profile plus vehicles.
pub async fn get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    ensure_self_or_admin(&auth, user_id)?;

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    let vehicles = VehicleRepo::list_for_user(&state.pool, user_id).await?;

    let mut body = serde_json::to_value(&user)
        .map_err(|e| AppError::InternalError(format!("serialization failed: {e}")))?;
    body["vehicles"] = serde_json::to_value(&vehicles)
        .map_err(|e| AppError::InternalError(format!("serialization failed: {e}")))?;

    Ok(Json(body))
}

/// PUT /api/users/{id} (admin or self) -- partial profile update.
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(update): Json<UpdateProfile>,
) -> AppResult<Json<UserRow>> {
    ensure_self_or_admin(&auth, user_id)?;
    let user = UserRepo::update_profile(&state.pool, user_id, &update).await?;
    Ok(Json(user))
}

/// POST /api/users/{id}/vehicles (admin or self)
pub async fn add_vehicle(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(vehicle): Json<NewVehicle>,
) -> AppResult<Json<Vehicle>> {
    ensure_self_or_admin(&auth, user_id)?;
    if vehicle.brand.trim().is_empty() || vehicle.model.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Brand and model are required".into(),
        )));
    }
    let created = VehicleRepo::create(&state.pool, user_id, &vehicle).await?;
    Ok(Json(created))
}

/// PUT /api/users/{id}/role (admin)
pub async fn update_role(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(req): Json<UpdateRoleRequest>,
) -> AppResult<Json<UserRow>> {
    if !ALL_ROLES.contains(&req.role.as_str()) {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid role".into(),
        )));
    }
    let user = UserRepo::update_role(&state.pool, user_id, &req.role).await?;
    Ok(Json(user))
}

/// DELETE /api/users/{id} (admin)
pub async fn delete_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = UserRepo::delete(&state.pool, user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }));
    }
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
