//! Vehicle entity model and DTOs.

use motoshop_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `vehicles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vehicle {
    pub id: DbId,
    pub user_id: DbId,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a vehicle, either from the profile page or inline with
/// a booking request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
}
