//! Integration tests for the chat automation proxy.
//!
//! The test app never configures a chat webhook, so these cover the input
//! validation and the unconfigured fallback; the reply normalization is
//! unit-tested next to the handler.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use motoshop_core::messages::CHAT_FALLBACK_REPLY;
use sqlx::PgPool;

/// A message is mandatory.
#[sqlx::test(migrations = "../db/migrations")]
async fn missing_message_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/chat", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Message is required");
}

/// Whitespace-only messages count as missing.
#[sqlx::test(migrations = "../db/migrations")]
async fn blank_message_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/chat", serde_json::json!({ "message": "   " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Without a configured webhook the proxy answers with the Thai fallback
/// instead of failing.
#[sqlx::test(migrations = "../db/migrations")]
async fn unconfigured_webhook_returns_fallback_reply(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "message": "ร้านเปิดกี่โมงครับ", "username": "somchai" });
    let response = post_json(app, "/api/chat", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["reply"], CHAT_FALLBACK_REPLY);
}

/// The endpoint is public: no token needed.
#[sqlx::test(migrations = "../db/migrations")]
async fn chat_does_not_require_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "message": "สวัสดีครับ" });
    let response = post_json(app, "/api/chat", body).await;

    assert_eq!(response.status(), StatusCode::OK);
}
