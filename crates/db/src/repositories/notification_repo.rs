//! Notification repository.

use sqlx::{PgPool, Postgres, Transaction};

use motoshop_core::types::DbId;

use crate::models::notification::{NewNotification, Notification};

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, title, message, type, related_booking_id, is_read, created_at";

pub struct NotificationRepo;

impl NotificationRepo {
    pub async fn create(
        pool: &PgPool,
        notification: &NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, title, message, type, related_booking_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(notification.user_id)
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(&notification.kind)
            .bind(notification.related_booking_id)
            .fetch_one(pool)
            .await
    }

    /// Insert variant for use inside a larger transaction (booking create,
    /// status change). The notification commits or rolls back with it.
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        notification: &NewNotification,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO notifications (user_id, title, message, type, related_booking_id) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.kind)
        .bind(notification.related_booking_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// A user's notifications, newest first, optionally filtered by read
    /// state.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        is_read: Option<bool>,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let mut query = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = $1");
        if is_read.is_some() {
            query.push_str(" AND is_read = $2");
        }
        query.push_str(" ORDER BY created_at DESC, id DESC");

        let mut q = sqlx::query_as(&query).bind(user_id);
        if let Some(is_read) = is_read {
            q = q.bind(is_read);
        }
        q.fetch_all(pool).await
    }

    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Marks one notification read, scoped to its owner.
    pub async fn mark_read(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
