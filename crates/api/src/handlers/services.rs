//! Handlers for `/api/services`: the service catalog.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use motoshop_core::error::CoreError;
use motoshop_core::types::DbId;
use motoshop_db::models::service::{CreateService, Service, UpdateService};
use motoshop_db::repositories::ServiceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ServiceListQuery {
    pub category: Option<String>,
}

/// GET /api/services (public)
pub async fn list_services(
    State(state): State<AppState>,
    Query(params): Query<ServiceListQuery>,
) -> AppResult<Json<Vec<Service>>> {
    let services = ServiceRepo::list(&state.pool, params.category.as_deref()).await?;
    Ok(Json(services))
}

/// GET /api/services/{id} (public)
pub async fn get_service(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
) -> AppResult<Json<Service>> {
    let service = ServiceRepo::find_by_id(&state.pool, service_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id: service_id,
        }))?;
    Ok(Json(service))
}

/// POST /api/services (admin)
pub async fn create_service(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(service): Json<CreateService>,
) -> AppResult<Json<Service>> {
    if service.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name is required".into(),
        )));
    }
    if service.price < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Price must not be negative".into(),
        )));
    }
    if service.category.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category is required".into(),
        )));
    }
    let created = ServiceRepo::create(&state.pool, &service).await?;
    Ok(Json(created))
}

/// PUT /api/services/{id} (admin) -- partial update.
pub async fn update_service(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
    Json(update): Json<UpdateService>,
) -> AppResult<Json<Service>> {
    if update.price.is_some_and(|p| p < 0.0) {
        return Err(AppError::Core(CoreError::Validation(
            "Price must not be negative".into(),
        )));
    }
    let service = ServiceRepo::update(&state.pool, service_id, &update).await?;
    Ok(Json(service))
}

/// DELETE /api/services/{id} (admin)
pub async fn delete_service(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = ServiceRepo::delete(&state.pool, service_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id: service_id,
        }));
    }
    Ok(Json(json!({ "message": "Service deleted successfully" })))
}
