//! Parts inventory entity model and DTOs.

use motoshop_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `parts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Part {
    pub id: DbId,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub quantity: i32,
    pub min_stock: i32,
    pub cost_price: Option<f64>,
    pub selling_price: f64,
    pub supplier: Option<String>,
    pub compatible_models: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a part.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePart {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub quantity: i32,
    pub min_stock: Option<i32>,
    pub cost_price: Option<f64>,
    pub selling_price: f64,
    pub supplier: Option<String>,
    pub compatible_models: Option<String>,
}

/// DTO for updating a part. All fields are optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePart {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub quantity: Option<i32>,
    pub min_stock: Option<i32>,
    pub cost_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub supplier: Option<String>,
    pub compatible_models: Option<String>,
}

/// Filters for `GET /api/parts`.
#[derive(Debug, Default)]
pub struct PartFilter {
    pub category: Option<String>,
    /// Matches parts whose `compatible_models` mentions the model, or is
    /// the literal "All".
    pub model: Option<String>,
    /// Only parts at or below their reorder threshold.
    pub low_stock: bool,
}
