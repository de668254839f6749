//! Handlers for `/api/bookings`: the heart of the shop.
//!
//! Booking creation arrives as multipart/form-data (the payment slip rides
//! along as a file field) and runs through the atomic creation transaction
//! in `motoshop_db`. Status changes go through the status machine in
//! `motoshop_core` and trigger notifications, realtime events, and the
//! confirmed-booking automation push.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;

use motoshop_core::booking::{plan_transition, BookingStatus, TransitionError};
use motoshop_core::error::CoreError;
use motoshop_core::messages::{self, MSG_SLOT_TAKEN};
use motoshop_core::roles::is_staff;
use motoshop_core::slots::{business_hour_slots, format_slot};
use motoshop_core::types::DbId;
use motoshop_db::models::booking::{
    Booking, BookingDetail, CreateBooking, CreateBookingError, VehicleRef,
};
use motoshop_db::models::vehicle::NewVehicle;
use motoshop_db::repositories::booking_repo::BookingFilter;
use motoshop_db::repositories::BookingRepo;
use motoshop_events::{AutomationClient, ShopEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;
use crate::uploads::{remove_slip, save_slip, SlipError};

// ---------------------------------------------------------------------------
// Response shaping
// ---------------------------------------------------------------------------

/// Flattens a detail row into the wire shape the frontend expects: the
/// selected services and parts merged into one `services` array of line
/// items, with the free-text requested service prepended at price 0.
fn booking_json(detail: &BookingDetail) -> AppResult<serde_json::Value> {
    let mut body = serde_json::to_value(detail)
        .map_err(|e| AppError::InternalError(format!("serialization failed: {e}")))?;

    let mut line_items: Vec<serde_json::Value> = Vec::new();
    if let Some(requested) = &detail.requested_service {
        line_items.push(json!({ "id": -1, "name": requested, "price": 0 }));
    }
    for data in [&detail.services_data, &detail.parts_data] {
        if let Some(serde_json::Value::Array(items)) = data {
            line_items.extend(items.iter().cloned());
        }
    }

    let obj = body
        .as_object_mut()
        .ok_or_else(|| AppError::InternalError("booking did not serialize to an object".into()))?;
    obj.remove("services_data");
    obj.remove("parts_data");
    obj.insert("services".into(), serde_json::Value::Array(line_items));

    Ok(body)
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<String>,
    pub date: Option<NaiveDate>,
}

/// GET /api/bookings (auth) -- staff see every booking, customers their own.
pub async fn list_bookings(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BookingListQuery>,
) -> AppResult<Json<Vec<serde_json::Value>>> {
    let filter = BookingFilter {
        user_id: (!is_staff(&auth.role)).then_some(auth.user_id),
        status: params.status,
        date: params.date,
    };
    let bookings = BookingRepo::list(&state.pool, &filter).await?;
    let bookings = bookings
        .iter()
        .map(booking_json)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(bookings))
}

/// GET /api/bookings/my-bookings (auth)
pub async fn my_bookings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<serde_json::Value>>> {
    let filter = BookingFilter {
        user_id: Some(auth.user_id),
        ..Default::default()
    };
    let bookings = BookingRepo::list(&state.pool, &filter).await?;
    let bookings = bookings
        .iter()
        .map(booking_json)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(bookings))
}

/// GET /api/bookings/{id} (auth) -- owner or staff.
pub async fn get_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let detail = BookingRepo::find_detail(&state.pool, booking_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        }))?;

    if !is_staff(&auth.role) && detail.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not authorized".into(),
        )));
    }

    Ok(Json(booking_json(&detail)?))
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// POST /api/bookings (auth, multipart/form-data)
pub async fn create_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<serde_json::Value>> {
    let mut booking_date: Option<NaiveDate> = None;
    let mut booking_time: Option<NaiveTime> = None;
    let mut service_ids: Vec<DbId> = Vec::new();
    let mut part_ids: Vec<DbId> = Vec::new();
    let mut vehicle: Option<VehicleRef> = None;
    let mut notes: Option<String> = None;
    let mut requested_service: Option<String> = None;
    let mut payment_method: Option<String> = None;
    let mut slip_image: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "slipImage" {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid slip upload: {e}")))?;
            let stored = save_slip(&state.config.uploads_dir, file_name.as_deref(), &bytes)
                .await
                .map_err(|e| match e {
                    SlipError::Io(io) => {
                        AppError::InternalError(format!("slip storage failed: {io}"))
                    }
                    other => AppError::BadRequest(other.to_string()),
                })?;
            slip_image = Some(stored);
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid field '{name}': {e}")))?;
        if value.is_empty() {
            continue;
        }

        match name.as_str() {
            "bookingDate" => {
                booking_date = Some(value.parse().map_err(|_| {
                    AppError::BadRequest("Invalid bookingDate, expected YYYY-MM-DD".into())
                })?);
            }
            "bookingTime" => {
                let parsed = NaiveTime::parse_from_str(&value, "%H:%M")
                    .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M:%S"))
                    .map_err(|_| {
                        AppError::BadRequest("Invalid bookingTime, expected HH:MM".into())
                    })?;
                booking_time = Some(parsed);
            }
            "serviceIds" => {
                service_ids = serde_json::from_str(&value)
                    .map_err(|_| AppError::BadRequest("serviceIds must be a JSON array".into()))?;
            }
            "partIds" => {
                part_ids = serde_json::from_str(&value)
                    .map_err(|_| AppError::BadRequest("partIds must be a JSON array".into()))?;
            }
            "vehicleId" => {
                let id: DbId = value
                    .parse()
                    .map_err(|_| AppError::BadRequest("vehicleId must be an integer".into()))?;
                vehicle = Some(VehicleRef::Existing(id));
            }
            "vehicle" => {
                let new_vehicle: NewVehicle = serde_json::from_str(&value)
                    .map_err(|_| AppError::BadRequest("vehicle must be a JSON object".into()))?;
                // An explicit vehicleId wins over an inline description.
                if !matches!(vehicle, Some(VehicleRef::Existing(_))) {
                    vehicle = Some(VehicleRef::New(new_vehicle));
                }
            }
            "notes" => notes = Some(value),
            "requestedService" => requested_service = Some(value),
            "paymentMethod" => payment_method = Some(value),
            _ => {}
        }
    }

    let booking_date =
        booking_date.ok_or_else(|| AppError::BadRequest("bookingDate is required".into()))?;
    let booking_time =
        booking_time.ok_or_else(|| AppError::BadRequest("bookingTime is required".into()))?;

    let input = CreateBooking {
        vehicle,
        booking_date,
        booking_time,
        service_ids,
        part_ids: part_ids.clone(),
        notes,
        requested_service,
        payment_method,
        slip_image,
    };

    let detail = match BookingRepo::create(&state.pool, auth.user_id, &input).await {
        Ok(detail) => detail,
        Err(e) => {
            // A rejected booking must not leave its slip behind on disk.
            if let Some(stored) = &input.slip_image {
                if let Err(io_err) = remove_slip(&state.config.uploads_dir, stored).await {
                    tracing::warn!(error = %io_err, "failed to remove slip of rejected booking");
                }
            }
            return Err(match e {
                CreateBookingError::SlotTaken => AppError::BadRequest(MSG_SLOT_TAKEN.to_string()),
                CreateBookingError::PartNotFound(id) => {
                    AppError::BadRequest(messages::part_not_found(id))
                }
                CreateBookingError::ServiceNotFound(id) => {
                    AppError::BadRequest(messages::service_not_found(id))
                }
                CreateBookingError::OutOfStock(msg) => AppError::BadRequest(msg),
                CreateBookingError::Db(err) => AppError::Database(err),
            });
        }
    };

    if !part_ids.is_empty() {
        state.event_bus.publish(
            ShopEvent::new("parts.updated")
                .with_booking(detail.id)
                .with_actor(auth.user_id)
                .with_payload(json!({ "partIds": part_ids })),
        );
    }

    Ok(Json(booking_json(&detail)?))
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
    pub cancel_reason: Option<String>,
}

/// PUT /api/bookings/{id}/status (auth)
///
/// Validates the transition through the status machine, applies it with its
/// notifications, and fires the post-commit side effects: a realtime event
/// on completion, and the automation push on confirmation.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<Booking>> {
    let booking = BookingRepo::find_by_id(&state.pool, booking_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        }))?;

    if !is_staff(&auth.role) && booking.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not authorized".into(),
        )));
    }

    let current = BookingStatus::parse(&booking.status).ok_or_else(|| {
        AppError::InternalError(format!("booking {booking_id} has unknown status"))
    })?;
    let requested = BookingStatus::parse(&req.status)
        .ok_or_else(|| AppError::BadRequest("Invalid status value".into()))?;
    let previous = booking
        .previous_status
        .as_deref()
        .and_then(BookingStatus::parse);

    let plan = plan_transition(&auth.role, current, requested, previous).map_err(|e| match e {
        TransitionError::CustomerNotCancelling => {
            AppError::Core(CoreError::Forbidden(e.to_string()))
        }
        other => AppError::BadRequest(other.to_string()),
    })?;

    let updated =
        BookingRepo::apply_transition(&state.pool, &booking, &plan, req.cancel_reason.as_deref())
            .await?;

    match plan.new_status {
        BookingStatus::Completed => {
            state.event_bus.publish(
                ShopEvent::new("booking.completed")
                    .with_booking(booking_id)
                    .with_actor(auth.user_id)
                    .with_payload(json!({ "status": updated.status })),
            );
        }
        BookingStatus::Confirmed => {
            // Fire-and-forget: a dead webhook must never fail the request.
            if state.automation.has_booking_webhook() {
                let pool = state.pool.clone();
                let automation = Arc::clone(&state.automation);
                tokio::spawn(async move {
                    push_confirmed_booking(pool, automation, booking_id).await;
                });
            }
        }
        _ => {}
    }

    Ok(Json(updated))
}

/// Assembles the confirmed-booking document and pushes it to the booking
/// webhook. Failures are logged, never propagated.
async fn push_confirmed_booking(
    pool: motoshop_db::DbPool,
    automation: Arc<AutomationClient>,
    booking_id: DbId,
) {
    let detail = match BookingRepo::find_detail(&pool, booking_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            tracing::warn!(booking_id, "booking vanished before automation push");
            return;
        }
        Err(err) => {
            tracing::error!(booking_id, error = %err, "failed to load booking for automation push");
            return;
        }
    };

    let mut document = match booking_json(&detail) {
        Ok(document) => document,
        Err(err) => {
            tracing::error!(booking_id, error = %err, "failed to shape automation document");
            return;
        }
    };

    // The webhook wants display-ready date/time and always an attachment.
    document["booking_date"] = json!(detail.booking_date.format("%Y-%m-%d").to_string());
    document["booking_time"] = json!(format_slot(detail.booking_time));
    let (slip_base64, slip_filename) = automation.slip_attachment(detail.slip_image.as_deref());
    document["slip_image_base64"] = json!(slip_base64);
    document["slip_filename"] = json!(slip_filename);

    if let Err(err) = automation.push_booking(&document).await {
        tracing::error!(booking_id, error = %err, "booking automation push failed");
    } else {
        tracing::info!(booking_id, "booking pushed to automation webhook");
    }
}

// ---------------------------------------------------------------------------
// Availability + purge
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

/// GET /api/bookings/slots/available?date=YYYY-MM-DD (public)
pub async fn available_slots(
    State(state): State<AppState>,
    Query(params): Query<SlotsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let date = params
        .date
        .ok_or_else(|| AppError::BadRequest("Date is required".into()))?;
    let date: NaiveDate = date
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid date, expected YYYY-MM-DD".into()))?;

    let booked_times: Vec<String> = BookingRepo::booked_times(&state.pool, date)
        .await?
        .into_iter()
        .map(format_slot)
        .collect();

    let available_slots: Vec<String> = business_hour_slots()
        .into_iter()
        .filter(|slot| !booked_times.contains(slot))
        .collect();

    Ok(Json(json!({
        "availableSlots": available_slots,
        "bookedTimes": booked_times,
    })))
}

/// DELETE /api/bookings/user/{userId} (admin)
///
/// Wipes one user's booking history and compacts the id sequence.
pub async fn purge_user_bookings(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let result = BookingRepo::purge_for_user(&state.pool, user_id).await?;
    tracing::info!(
        user_id,
        deleted = result.deleted_bookings,
        "purged booking history"
    );
    Ok(Json(serde_json::to_value(result).map_err(|e| {
        AppError::InternalError(format!("serialization failed: {e}"))
    })?))
}
