//! Integration tests for the owner-scoped notification endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, put_json_auth};
use motoshop_core::roles::ROLE_CUSTOMER;
use motoshop_core::types::DbId;
use sqlx::PgPool;

/// Insert a notification row directly and return its id.
async fn seed_notification(pool: &PgPool, user_id: DbId, title: &str, is_read: bool) -> DbId {
    let (id,): (DbId,) = sqlx::query_as(
        "INSERT INTO notifications (user_id, title, message, type, is_read) \
         VALUES ($1, $2, 'รายละเอียด', 'booking', $3) RETURNING id",
    )
    .bind(user_id)
    .bind(title)
    .bind(is_read)
    .fetch_one(pool)
    .await
    .expect("notification insert should succeed");
    id
}

/// A user only ever sees their own notifications, newest first.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_owner_scoped(pool: PgPool) {
    let (mine, my_token) = common::create_user(&pool, "mine", ROLE_CUSTOMER).await;
    let (theirs, _) = common::create_user(&pool, "theirs", ROLE_CUSTOMER).await;

    seed_notification(&pool, mine.id, "ของฉัน 1", false).await;
    seed_notification(&pool, mine.id, "ของฉัน 2", true).await;
    seed_notification(&pool, theirs.id, "ของคนอื่น", false).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/notifications", &my_token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "ของฉัน 2");
    assert_eq!(items[0]["type"], "booking");
}

/// The isRead filter narrows the list to unread entries.
#[sqlx::test(migrations = "../db/migrations")]
async fn is_read_filter_narrows_list(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "filtered", ROLE_CUSTOMER).await;
    seed_notification(&pool, user.id, "อ่านแล้ว", true).await;
    seed_notification(&pool, user.id, "ยังไม่อ่าน", false).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/notifications?isRead=false", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "ยังไม่อ่าน");
}

/// The unread count only covers the caller's unread rows.
#[sqlx::test(migrations = "../db/migrations")]
async fn unread_count_is_per_user(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "counter", ROLE_CUSTOMER).await;
    let (other, _) = common::create_user(&pool, "noise", ROLE_CUSTOMER).await;

    seed_notification(&pool, user.id, "a", false).await;
    seed_notification(&pool, user.id, "b", false).await;
    seed_notification(&pool, user.id, "c", true).await;
    seed_notification(&pool, other.id, "d", false).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/notifications/unread-count", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
}

/// Marking one notification read acknowledges and flips the flag.
#[sqlx::test(migrations = "../db/migrations")]
async fn mark_read_flips_flag(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "reader", ROLE_CUSTOMER).await;
    let id = seed_notification(&pool, user.id, "ใหม่", false).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/notifications/{id}/read"),
        serde_json::json!({}),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Notification marked as read");

    let (is_read,): (bool,) = sqlx::query_as("SELECT is_read FROM notifications WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(is_read);
}

/// Another user's notification is invisible: marking it read is a 404, not
/// a 403, so ids cannot be probed.
#[sqlx::test(migrations = "../db/migrations")]
async fn mark_read_on_foreign_notification_returns_404(pool: PgPool) {
    let (owner, _) = common::create_user(&pool, "owner2", ROLE_CUSTOMER).await;
    let (_snoop, snoop_token) = common::create_user(&pool, "snoop", ROLE_CUSTOMER).await;
    let id = seed_notification(&pool, owner.id, "ลับ", false).await;

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/notifications/{id}/read"),
        serde_json::json!({}),
        &snoop_token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Mark-all returns the number of rows it touched.
#[sqlx::test(migrations = "../db/migrations")]
async fn mark_all_read_reports_count(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "bulk", ROLE_CUSTOMER).await;
    seed_notification(&pool, user.id, "a", false).await;
    seed_notification(&pool, user.id, "b", false).await;
    seed_notification(&pool, user.id, "c", true).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/notifications/read/all",
        serde_json::json!({}),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);

    let (unread,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
    )
    .bind(user.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(unread, 0);
}

/// Deleting is owner-scoped the same way.
#[sqlx::test(migrations = "../db/migrations")]
async fn delete_is_owner_scoped(pool: PgPool) {
    let (owner, owner_token) = common::create_user(&pool, "owner3", ROLE_CUSTOMER).await;
    let (_snoop, snoop_token) = common::create_user(&pool, "snoop2", ROLE_CUSTOMER).await;
    let id = seed_notification(&pool, owner.id, "ชั่วคราว", false).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/notifications/{id}"), &snoop_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/notifications/{id}"), &owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Notification deleted");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
