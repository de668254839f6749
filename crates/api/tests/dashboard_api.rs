//! Integration tests for the role-aware dashboard endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth};
use motoshop_core::roles::{ROLE_ADMIN, ROLE_CUSTOMER};
use motoshop_core::types::DbId;
use sqlx::PgPool;

/// Insert a booking row directly with the given status and price.
async fn seed_booking(pool: &PgPool, user_id: DbId, date: &str, time: &str, status: &str, price: f64) {
    sqlx::query(
        "INSERT INTO bookings (user_id, booking_date, booking_time, status, total_price) \
         VALUES ($1, $2::date, $3::time, $4, $5)",
    )
    .bind(user_id)
    .bind(date)
    .bind(time)
    .bind(status)
    .bind(price)
    .execute(pool)
    .await
    .expect("booking insert should succeed");
}

/// Customers get their personal stats and recent history.
#[sqlx::test(migrations = "../db/migrations")]
async fn customer_dashboard_shape(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "dashcustomer", ROLE_CUSTOMER).await;
    seed_booking(&pool, user.id, "2026-01-10", "10:00", "completed", 500.0).await;
    seed_booking(&pool, user.id, "2026-01-11", "10:00", "completed", 300.0).await;
    seed_booking(&pool, user.id, "2099-01-12", "10:00", "confirmed", 200.0).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboard", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let stats = &json["stats"];
    assert_eq!(stats["totalBookings"], 3);
    assert_eq!(stats["completedServices"], 2);
    assert_eq!(stats["upcomingServices"], 1);
    assert_eq!(stats["totalSpent"], 800.0);

    let history = json["recentHistory"].as_array().expect("recentHistory");
    assert_eq!(history.len(), 3);
    assert!(json.get("recentBookings").is_none());
}

/// Another customer's bookings never leak into the stats.
#[sqlx::test(migrations = "../db/migrations")]
async fn customer_stats_are_scoped(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "scoped", ROLE_CUSTOMER).await;
    let (other, _) = common::create_user(&pool, "othercust", ROLE_CUSTOMER).await;
    seed_booking(&pool, user.id, "2026-01-10", "10:00", "completed", 100.0).await;
    seed_booking(&pool, other.id, "2026-01-10", "11:00", "completed", 9999.0).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboard/customer-stats", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["stats"]["totalBookings"], 1);
    assert_eq!(json["stats"]["totalSpent"], 100.0);
}

/// Staff get the shop-wide overview with the latest bookings and customer
/// identity attached.
#[sqlx::test(migrations = "../db/migrations")]
async fn staff_dashboard_shape(pool: PgPool) {
    let (customer, _) = common::create_user(&pool, "shopcustomer", ROLE_CUSTOMER).await;
    let (_admin, admin_token) = common::create_user(&pool, "shopadmin", ROLE_ADMIN).await;
    seed_booking(&pool, customer.id, "2026-02-01", "10:00", "pending", 250.0).await;
    seed_booking(&pool, customer.id, "2026-02-02", "10:00", "confirmed", 400.0).await;
    common::seed_part(&pool, "สายเบรค", 1, 90.0).await; // below min_stock of 5

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboard", &admin_token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let stats = &json["stats"];
    assert_eq!(stats["totalBookings"], 2);
    assert_eq!(stats["pendingBookings"], 2);
    assert_eq!(stats["totalCustomers"], 1);
    assert_eq!(stats["lowStockItems"], 1);

    let recent = json["recentBookings"].as_array().expect("recentBookings");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["username"], "shopcustomer");
    assert!(json.get("recentHistory").is_none());
}

/// Revenue buckets are staff-only.
#[sqlx::test(migrations = "../db/migrations")]
async fn revenue_requires_staff(pool: PgPool) {
    let (_user, token) = common::create_user(&pool, "nosy", ROLE_CUSTOMER).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboard/revenue", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Completed bookings inside the window land in a bucket; the rest do not.
#[sqlx::test(migrations = "../db/migrations")]
async fn revenue_buckets_only_count_completed(pool: PgPool) {
    let (customer, _) = common::create_user(&pool, "payer", ROLE_CUSTOMER).await;
    let (_admin, admin_token) = common::create_user(&pool, "revadmin", ROLE_ADMIN).await;

    // Two completed this month, one pending which must not count.
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    seed_booking(&pool, customer.id, &today, "09:00", "completed", 300.0).await;
    seed_booking(&pool, customer.id, &today, "09:30", "completed", 200.0).await;
    seed_booking(&pool, customer.id, &today, "10:00", "pending", 999.0).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboard/revenue?period=month", &admin_token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let buckets = json.as_array().unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0]["revenue"], 500.0);
    assert_eq!(buckets[0]["bookings"], 2);
}

/// Unknown periods are refused.
#[sqlx::test(migrations = "../db/migrations")]
async fn revenue_rejects_unknown_period(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "strictadmin", ROLE_ADMIN).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboard/revenue?period=year", &admin_token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
