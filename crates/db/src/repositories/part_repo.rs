//! Parts inventory repository.

use sqlx::PgPool;

use motoshop_core::types::DbId;

use crate::models::part::{CreatePart, Part, PartFilter, UpdatePart};

const PART_COLUMNS: &str = "id, name, category, description, sku, quantity, \
     min_stock, cost_price, selling_price, supplier, compatible_models, \
     created_at, updated_at";

pub struct PartRepo;

impl PartRepo {
    pub async fn list(pool: &PgPool, filter: &PartFilter) -> Result<Vec<Part>, sqlx::Error> {
        let mut query = format!("SELECT {PART_COLUMNS} FROM parts WHERE 1=1");
        let mut bind_idx = 0;

        if filter.category.is_some() {
            bind_idx += 1;
            query.push_str(&format!(" AND category = ${bind_idx}"));
        }
        if filter.model.is_some() {
            bind_idx += 1;
            query.push_str(&format!(
                " AND (compatible_models ILIKE ${bind_idx} OR compatible_models = 'All')"
            ));
        }
        if filter.low_stock {
            query.push_str(" AND quantity <= min_stock");
        }
        query.push_str(" ORDER BY name");

        let mut q = sqlx::query_as(&query);
        if let Some(category) = &filter.category {
            q = q.bind(category.clone());
        }
        if let Some(model) = &filter.model {
            q = q.bind(format!("%{model}%"));
        }
        q.fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Part>, sqlx::Error> {
        let query = format!("SELECT {PART_COLUMNS} FROM parts WHERE id = $1");
        sqlx::query_as(&query).bind(id).fetch_optional(pool).await
    }

    pub async fn create(pool: &PgPool, part: &CreatePart) -> Result<Part, sqlx::Error> {
        let query = format!(
            "INSERT INTO parts (name, category, description, sku, quantity, \
                 min_stock, cost_price, selling_price, supplier, compatible_models) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {PART_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(&part.name)
            .bind(&part.category)
            .bind(&part.description)
            .bind(&part.sku)
            .bind(part.quantity)
            .bind(part.min_stock.unwrap_or(10))
            .bind(part.cost_price)
            .bind(part.selling_price)
            .bind(&part.supplier)
            .bind(&part.compatible_models)
            .fetch_one(pool)
            .await
    }

    pub async fn update(pool: &PgPool, id: DbId, update: &UpdatePart) -> Result<Part, sqlx::Error> {
        let query = format!(
            "UPDATE parts SET \
                 name = COALESCE($2, name), \
                 category = COALESCE($3, category), \
                 description = COALESCE($4, description), \
                 sku = COALESCE($5, sku), \
                 quantity = COALESCE($6, quantity), \
                 min_stock = COALESCE($7, min_stock), \
                 cost_price = COALESCE($8, cost_price), \
                 selling_price = COALESCE($9, selling_price), \
                 supplier = COALESCE($10, supplier), \
                 compatible_models = COALESCE($11, compatible_models), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PART_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(id)
            .bind(&update.name)
            .bind(&update.category)
            .bind(&update.description)
            .bind(&update.sku)
            .bind(update.quantity)
            .bind(update.min_stock)
            .bind(update.cost_price)
            .bind(update.selling_price)
            .bind(&update.supplier)
            .bind(&update.compatible_models)
            .fetch_one(pool)
            .await
    }

    /// Sets the absolute stock level (restock / manual correction).
    pub async fn set_stock(pool: &PgPool, id: DbId, quantity: i32) -> Result<Part, sqlx::Error> {
        let query = format!(
            "UPDATE parts SET quantity = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {PART_COLUMNS}"
        );
        sqlx::query_as(&query).bind(id).bind(quantity).fetch_one(pool).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM parts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Parts at or below their reorder threshold, most depleted first.
    pub async fn list_low_stock(pool: &PgPool) -> Result<Vec<Part>, sqlx::Error> {
        let query = format!(
            "SELECT {PART_COLUMNS} FROM parts \
             WHERE quantity <= min_stock ORDER BY quantity ASC"
        );
        sqlx::query_as(&query).fetch_all(pool).await
    }
}
