//! Vehicle repository.

use sqlx::PgPool;

use motoshop_core::types::DbId;

use crate::models::vehicle::{NewVehicle, Vehicle};

const VEHICLE_COLUMNS: &str =
    "id, user_id, brand, model, year, license_plate, color, created_at";

pub struct VehicleRepo;

impl VehicleRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        vehicle: &NewVehicle,
    ) -> Result<Vehicle, sqlx::Error> {
        let query = format!(
            "INSERT INTO vehicles (user_id, brand, model, year, license_plate, color) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {VEHICLE_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(user_id)
            .bind(&vehicle.brand)
            .bind(&vehicle.model)
            .bind(vehicle.year)
            .bind(&vehicle.license_plate)
            .bind(&vehicle.color)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Vehicle>, sqlx::Error> {
        let query = format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as(&query).bind(user_id).fetch_all(pool).await
    }

    /// Deletes a vehicle, scoped to its owner.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
