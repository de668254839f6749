//! Service catalog repository.

use sqlx::PgPool;

use motoshop_core::types::DbId;

use crate::models::service::{CreateService, Service, UpdateService};

const SERVICE_COLUMNS: &str =
    "id, name, description, price, duration_mins, category, created_at, updated_at";

pub struct ServiceRepo;

impl ServiceRepo {
    pub async fn list(pool: &PgPool, category: Option<&str>) -> Result<Vec<Service>, sqlx::Error> {
        let mut query = format!("SELECT {SERVICE_COLUMNS} FROM services");
        if category.is_some() {
            query.push_str(" WHERE category = $1");
        }
        query.push_str(" ORDER BY category, name");

        let mut q = sqlx::query_as(&query);
        if let Some(category) = category {
            q = q.bind(category.to_string());
        }
        q.fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as(&query).bind(id).fetch_optional(pool).await
    }

    pub async fn create(pool: &PgPool, service: &CreateService) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services (name, description, price, duration_mins, category) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(&service.name)
            .bind(&service.description)
            .bind(service.price)
            .bind(service.duration_mins.unwrap_or(60))
            .bind(&service.category)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        update: &UpdateService,
    ) -> Result<Service, sqlx::Error> {
        let query = format!(
            "UPDATE services SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 price = COALESCE($4, price), \
                 duration_mins = COALESCE($5, duration_mins), \
                 category = COALESCE($6, category), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(id)
            .bind(&update.name)
            .bind(&update.description)
            .bind(update.price)
            .bind(update.duration_mins)
            .bind(&update.category)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
