//! Dashboard aggregation queries.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use motoshop_core::types::{DbId, Timestamp};

pub struct DashboardRepo;

/// Headline numbers for a customer's dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    pub total_bookings: i64,
    /// Future bookings that are still active.
    pub upcoming_services: i64,
    pub completed_services: i64,
    pub total_spent: f64,
}

/// A recent service-history row for the customer dashboard.
#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub id: DbId,
    pub booking_date: NaiveDate,
    pub status: String,
    pub total_price: f64,
    /// Comma-joined names of the booked services, NULL when none.
    pub service_names: Option<String>,
}

/// Headline numbers for the staff dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffStats {
    pub total_bookings: i64,
    pub today_bookings: i64,
    /// Bookings awaiting action (pending or confirmed).
    pub pending_bookings: i64,
    pub total_customers: i64,
    /// Revenue from bookings completed this calendar month.
    pub monthly_revenue: f64,
    pub low_stock_items: i64,
}

/// A recent booking row for the staff dashboard.
#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBookingRow {
    pub id: DbId,
    pub booking_date: NaiveDate,
    pub status: String,
    pub total_price: f64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub service_names: Option<String>,
}

/// One revenue bucket for the staff revenue chart.
#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueBucket {
    pub period: Timestamp,
    pub revenue: f64,
    pub bookings: i64,
}

impl DashboardRepo {
    pub async fn customer_stats(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<CustomerStats, sqlx::Error> {
        let (total, upcoming, completed, spent): (i64, i64, i64, Option<f64>) = sqlx::query_as(
            "SELECT \
                 COUNT(*), \
                 COUNT(*) FILTER (WHERE booking_date >= CURRENT_DATE \
                     AND status NOT IN ('cancelled', 'completed')), \
                 COUNT(*) FILTER (WHERE status = 'completed'), \
                 SUM(total_price) FILTER (WHERE status = 'completed') \
             FROM bookings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(CustomerStats {
            total_bookings: total,
            upcoming_services: upcoming,
            completed_services: completed,
            total_spent: spent.unwrap_or(0.0),
        })
    }

    /// The customer's 5 most recent bookings with service names aggregated.
    pub async fn recent_history(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<HistoryRow>, sqlx::Error> {
        sqlx::query_as(
            "SELECT b.id, b.booking_date, b.status, b.total_price, \
                 (SELECT STRING_AGG(s.name, ', ') \
                    FROM booking_services bs JOIN services s ON s.id = bs.service_id \
                    WHERE bs.booking_id = b.id) AS service_names \
             FROM bookings b \
             WHERE b.user_id = $1 \
             ORDER BY b.booking_date DESC, b.booking_time DESC \
             LIMIT 5",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn staff_stats(pool: &PgPool) -> Result<StaffStats, sqlx::Error> {
        let (total, today, pending, revenue): (i64, i64, i64, Option<f64>) = sqlx::query_as(
            "SELECT \
                 COUNT(*), \
                 COUNT(*) FILTER (WHERE booking_date = CURRENT_DATE), \
                 COUNT(*) FILTER (WHERE status IN ('pending', 'confirmed')), \
                 SUM(total_price) FILTER (WHERE status = 'completed' \
                     AND DATE_TRUNC('month', booking_date) = DATE_TRUNC('month', CURRENT_DATE)) \
             FROM bookings",
        )
        .fetch_one(pool)
        .await?;

        let (customers,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = 'customer'")
                .fetch_one(pool)
                .await?;

        let (low_stock,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM parts WHERE quantity <= min_stock")
                .fetch_one(pool)
                .await?;

        Ok(StaffStats {
            total_bookings: total,
            today_bookings: today,
            pending_bookings: pending,
            total_customers: customers,
            monthly_revenue: revenue.unwrap_or(0.0),
            low_stock_items: low_stock,
        })
    }

    /// The 10 most recently created bookings with customer identity.
    pub async fn recent_bookings(pool: &PgPool) -> Result<Vec<RecentBookingRow>, sqlx::Error> {
        sqlx::query_as(
            "SELECT b.id, b.booking_date, b.status, b.total_price, \
                 u.username, u.first_name, u.last_name, \
                 (SELECT STRING_AGG(s.name, ', ') \
                    FROM booking_services bs JOIN services s ON s.id = bs.service_id \
                    WHERE bs.booking_id = b.id) AS service_names \
             FROM bookings b \
             JOIN users u ON u.id = b.user_id \
             ORDER BY b.created_at DESC \
             LIMIT 10",
        )
        .fetch_all(pool)
        .await
    }

    /// Completed-booking revenue bucketed by week or month, last 12 buckets.
    pub async fn revenue(
        pool: &PgPool,
        by_week: bool,
    ) -> Result<Vec<RevenueBucket>, sqlx::Error> {
        let (unit, span) = if by_week {
            ("week", "12 weeks")
        } else {
            ("month", "12 months")
        };
        let query = format!(
            "SELECT DATE_TRUNC('{unit}', booking_date::timestamptz) AS period, \
                 COALESCE(SUM(total_price), 0) AS revenue, \
                 COUNT(*) AS bookings \
             FROM bookings \
             WHERE status = 'completed' \
               AND booking_date >= CURRENT_DATE - INTERVAL '{span}' \
             GROUP BY period \
             ORDER BY period"
        );
        sqlx::query_as(&query).fetch_all(pool).await
    }
}
