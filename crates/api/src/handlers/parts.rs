//! Handlers for `/api/parts`: the parts inventory.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use motoshop_core::error::CoreError;
use motoshop_core::types::DbId;
use motoshop_db::models::part::{CreatePart, Part, PartFilter, UpdatePart};
use motoshop_db::repositories::PartRepo;
use motoshop_events::ShopEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartListQuery {
    pub category: Option<String>,
    pub model: Option<String>,
    pub low_stock: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct StockRequest {
    pub quantity: i32,
}

/// Tell connected dashboards that stock levels changed.
fn publish_parts_updated(state: &AppState, actor: DbId, part_ids: &[DbId]) {
    state.event_bus.publish(
        ShopEvent::new("parts.updated")
            .with_actor(actor)
            .with_payload(json!({ "partIds": part_ids })),
    );
}

/// GET /api/parts (auth)
pub async fn list_parts(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PartListQuery>,
) -> AppResult<Json<Vec<Part>>> {
    let filter = PartFilter {
        category: params.category,
        model: params.model,
        low_stock: params.low_stock.unwrap_or(false),
    };
    let parts = PartRepo::list(&state.pool, &filter).await?;
    Ok(Json(parts))
}

/// GET /api/parts/{id} (auth)
pub async fn get_part(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(part_id): Path<DbId>,
) -> AppResult<Json<Part>> {
    let part = PartRepo::find_by_id(&state.pool, part_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Part",
            id: part_id,
        }))?;
    Ok(Json(part))
}

/// POST /api/parts (staff)
pub async fn create_part(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Json(part): Json<CreatePart>,
) -> AppResult<Json<Part>> {
    if part.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name is required".into(),
        )));
    }
    if part.quantity < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Quantity must not be negative".into(),
        )));
    }
    if part.selling_price < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Selling price must not be negative".into(),
        )));
    }

    let created = PartRepo::create(&state.pool, &part).await?;
    publish_parts_updated(&state, staff.user_id, &[created.id]);
    Ok(Json(created))
}

/// PUT /api/parts/{id} (staff) -- partial update.
pub async fn update_part(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(part_id): Path<DbId>,
    Json(update): Json<UpdatePart>,
) -> AppResult<Json<Part>> {
    if update.quantity.is_some_and(|q| q < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "Quantity must not be negative".into(),
        )));
    }
    let part = PartRepo::update(&state.pool, part_id, &update).await?;
    publish_parts_updated(&state, staff.user_id, &[part.id]);
    Ok(Json(part))
}

/// PATCH /api/parts/{id}/stock (staff) -- set the absolute stock level.
pub async fn set_stock(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(part_id): Path<DbId>,
    Json(req): Json<StockRequest>,
) -> AppResult<Json<Part>> {
    if req.quantity < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Quantity must not be negative".into(),
        )));
    }
    let part = PartRepo::set_stock(&state.pool, part_id, req.quantity).await?;
    publish_parts_updated(&state, staff.user_id, &[part.id]);
    Ok(Json(part))
}

/// DELETE /api/parts/{id} (admin)
pub async fn delete_part(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(part_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = PartRepo::delete(&state.pool, part_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Part",
            id: part_id,
        }));
    }
    publish_parts_updated(&state, admin.user_id, &[part_id]);
    Ok(Json(json!({ "message": "Part deleted successfully" })))
}

/// GET /api/parts/alerts/low-stock (staff)
pub async fn low_stock(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Part>>> {
    let parts = PartRepo::list_low_stock(&state.pool).await?;
    Ok(Json(parts))
}
