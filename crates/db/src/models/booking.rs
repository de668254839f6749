//! Booking entity models and DTOs.

use chrono::{NaiveDate, NaiveTime};
use motoshop_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::vehicle::NewVehicle;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub user_id: DbId,
    pub vehicle_id: Option<DbId>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: String,
    pub total_price: f64,
    pub notes: Option<String>,
    pub requested_service: Option<String>,
    pub cancel_reason: Option<String>,
    pub previous_status: Option<String>,
    pub payment_method: String,
    pub payment_status: String,
    pub slip_image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A booking joined with its customer, vehicle, and line items.
///
/// `services_data` and `parts_data` carry the `json_agg` subquery output:
/// arrays of line-item objects, or NULL when the booking has none.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub vehicle_id: Option<DbId>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: String,
    pub total_price: f64,
    pub notes: Option<String>,
    pub requested_service: Option<String>,
    pub cancel_reason: Option<String>,
    pub previous_status: Option<String>,
    pub payment_method: String,
    pub payment_status: String,
    pub slip_image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub vehicle_brand: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_license_plate: Option<String>,
    pub vehicle_color: Option<String>,
    pub vehicle_year: Option<i32>,
    pub services_data: Option<serde_json::Value>,
    pub parts_data: Option<serde_json::Value>,
}

/// Vehicle reference in a booking request: an existing vehicle id, or an
/// inline description to insert under the customer's account.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VehicleRef {
    Existing(DbId),
    New(NewVehicle),
}

/// DTO for `POST /api/bookings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub vehicle: Option<VehicleRef>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    #[serde(default)]
    pub service_ids: Vec<DbId>,
    #[serde(default)]
    pub part_ids: Vec<DbId>,
    pub notes: Option<String>,
    pub requested_service: Option<String>,
    pub payment_method: Option<String>,
    pub slip_image: Option<String>,
}

/// Failures from the booking-creation transaction. Anything other than
/// `Db` rolls the whole transaction back with stock untouched.
#[derive(Debug, thiserror::Error)]
pub enum CreateBookingError {
    #[error("time slot is already booked")]
    SlotTaken,
    #[error("part {0} not found")]
    PartNotFound(DbId),
    #[error("service {0} not found")]
    ServiceNotFound(DbId),
    #[error("{0}")]
    OutOfStock(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}
