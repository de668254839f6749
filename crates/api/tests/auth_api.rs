//! HTTP-level integration tests for registration, login, and the current
//! user, including the token extraction fallbacks.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get_auth, post_json};
use motoshop_core::roles::ROLE_CUSTOMER;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Successful registration returns a token and the public user fields.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_returns_token_and_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "somchai",
        "email": "somchai@test.com",
        "password": "secret123",
        "profile": { "firstName": "Somchai", "phone": "0812345678" }
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["token"].is_string(), "response must contain a token");
    assert_eq!(json["user"]["username"], "somchai");
    assert_eq!(json["user"]["email"], "somchai@test.com");
    assert_eq!(json["user"]["role"], "customer");
}

/// Registering a taken username or email returns 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_duplicate_user_returns_400(pool: PgPool) {
    common::create_user(&pool, "taken", ROLE_CUSTOMER).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "taken",
        "email": "other@test.com",
        "password": "secret123"
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "User already exists");
}

/// Passwords shorter than the minimum are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_short_password_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "shorty",
        "email": "shorty@test.com",
        "password": "abc"
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Unknown roles are rejected at registration.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_invalid_role_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "roleless",
        "email": "roleless@test.com",
        "password": "secret123",
        "role": "superuser"
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Registration then login with the same credentials succeeds and returns
/// the profile fields.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_after_register_succeeds(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "username": "malee",
        "email": "malee@test.com",
        "password": "secret123",
        "profile": { "firstName": "Malee" }
    });
    let response = post_json(app, "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "malee@test.com", "password": "secret123" });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["username"], "malee");
    assert_eq!(json["user"]["profile"]["firstName"], "Malee");
}

/// Wrong password returns 401 with the same message as an unknown email.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_wrong_password_returns_401(pool: PgPool) {
    common::create_user(&pool, "wrongpw", ROLE_CUSTOMER).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "wrongpw@test.com", "password": "not-the-password" });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid credentials");
}

/// Unknown email returns 401 with the identical message.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_unknown_email_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@test.com", "password": "whatever" });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid credentials");
}

// ---------------------------------------------------------------------------
// Current user
// ---------------------------------------------------------------------------

/// GET /api/auth/me returns the profile plus registered vehicles.
#[sqlx::test(migrations = "../db/migrations")]
async fn me_returns_profile_with_vehicles(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "vehicleowner", ROLE_CUSTOMER).await;
    sqlx::query("INSERT INTO vehicles (user_id, brand, model) VALUES ($1, 'Honda', 'Wave 110i')")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/auth/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "vehicleowner");
    assert!(json.get("password_hash").is_none(), "hash must never leak");
    let vehicles = json["vehicles"].as_array().expect("vehicles array");
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0]["brand"], "Honda");
}

/// Requests without any token are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn me_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/auth/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No token, authorization denied");
}

/// A garbage bearer token is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn me_with_invalid_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/auth/me", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Token is not valid");
}

/// The legacy `x-auth-token` header works as a fallback to `Authorization`.
#[sqlx::test(migrations = "../db/migrations")]
async fn me_accepts_x_auth_token_header(pool: PgPool) {
    let (_user, token) = common::create_user(&pool, "legacyheader", ROLE_CUSTOMER).await;
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/me")
        .header("x-auth-token", &token)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "legacyheader");
}
