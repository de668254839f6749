//! Shared helpers for the HTTP integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so the
//! tests exercise the same middleware stack (CORS, request ID, timeout,
//! tracing, panic recovery) that production uses. Each test binary pulls in
//! only the helpers it needs.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use motoshop_api::auth::jwt::{generate_token, JwtConfig};
use motoshop_api::auth::password::hash_password;
use motoshop_api::config::ServerConfig;
use motoshop_api::routes;
use motoshop_api::state::AppState;
use motoshop_core::types::DbId;
use motoshop_db::models::user::{CreateUser, UserRow};
use motoshop_events::{AutomationClient, EventBus};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout, and the system temp directory for slip
/// uploads.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        uploads_dir: std::env::temp_dir().join("motoshop-test-uploads"),
        jwt: JwtConfig {
            secret: "integration-test-secret-do-not-use-in-prod".to_string(),
            token_expiry_hours: 24,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Webhooks are left unconfigured so no test ever
/// makes an outbound HTTP call.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_uploads(pool, test_config().uploads_dir)
}

/// Same as [`build_test_app`], but slips are stored under the given
/// directory. Tests that assert on stored files use a dedicated tempdir so
/// they do not race with parallel tests sharing the default location.
pub fn build_test_app_with_uploads(pool: PgPool, uploads_dir: PathBuf) -> Router {
    let mut config = test_config();
    config.uploads_dir = uploads_dir;
    let event_bus = Arc::new(EventBus::default());
    let automation = Arc::new(
        AutomationClient::new(None, None, None, config.uploads_dir.clone())
            .expect("automation client should build"),
    );

    std::fs::create_dir_all(&config.uploads_dir).expect("uploads dir should be creatable");

    let state = AppState {
        pool,
        config: Arc::new(config),
        event_bus,
        automation,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-auth-token"),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly and mint a token for them, skipping the login
/// round-trip. Returns the stored row and a valid bearer token.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> (UserRow, String) {
    let hashed = hash_password("test_password_123").expect("hashing should succeed");
    let user = motoshop_db::repositories::UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hashed,
            role: role.to_string(),
            first_name: None,
            last_name: None,
            phone: None,
            address: None,
        },
    )
    .await
    .expect("user creation should succeed");

    let token = generate_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Insert a catalog service and return its id.
pub async fn seed_service(pool: &PgPool, name: &str, price: f64) -> DbId {
    let (id,): (DbId,) = sqlx::query_as(
        "INSERT INTO services (name, price, duration_mins, category) \
         VALUES ($1, $2, 60, 'maintenance') RETURNING id",
    )
    .bind(name)
    .bind(price)
    .fetch_one(pool)
    .await
    .expect("service insert should succeed");
    id
}

/// Insert an inventory part with the given stock level and return its id.
pub async fn seed_part(pool: &PgPool, name: &str, quantity: i32, price: f64) -> DbId {
    let (id,): (DbId,) = sqlx::query_as(
        "INSERT INTO parts (name, quantity, min_stock, selling_price) \
         VALUES ($1, $2, 5, $3) RETURNING id",
    )
    .bind(name)
    .bind(quantity)
    .bind(price)
    .fetch_one(pool)
    .await
    .expect("part insert should succeed");
    id
}

/// Current stock level of a part.
pub async fn part_quantity(pool: &PgPool, part_id: DbId) -> i32 {
    let (quantity,): (i32,) = sqlx::query_as("SELECT quantity FROM parts WHERE id = $1")
        .bind(part_id)
        .fetch_one(pool)
        .await
        .expect("part should exist");
    quantity
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a multipart/form-data request built from text fields (the shape the
/// booking-creation endpoint accepts).
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    token: &str,
) -> Response {
    const BOUNDARY: &str = "----motoshop-test-boundary";

    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a multipart/form-data request carrying text fields plus one file
/// part (the payment-slip upload shape).
pub async fn post_multipart_with_file_auth(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    file: (&str, &str, &str, &[u8]),
    token: &str,
) -> Response {
    const BOUNDARY: &str = "----motoshop-test-boundary";
    let (field_name, file_name, content_type, bytes) = file;

    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; \
             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
