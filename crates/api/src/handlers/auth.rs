//! Handlers for `/api/auth`: registration, login, and the current user.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use motoshop_core::error::CoreError;
use motoshop_core::roles::{ALL_ROLES, ROLE_CUSTOMER};
use motoshop_db::models::user::CreateUser;
use motoshop_db::repositories::{UserRepo, VehicleRepo};

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub profile: Option<RegisterProfile>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register
///
/// Creates a customer (or, for seeding, a staff) account and returns a
/// session token alongside the public user fields.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if req.username.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Username is required".into(),
        )));
    }
    if !req.email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "Valid email is required".into(),
        )));
    }
    validate_password_strength(&req.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = req.role.as_deref().unwrap_or(ROLE_CUSTOMER);
    if !ALL_ROLES.contains(&role) {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid role".into(),
        )));
    }

    if UserRepo::exists(&state.pool, &req.username, &req.email).await? {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {e}")))?;

    let profile = req.profile.unwrap_or(RegisterProfile {
        first_name: None,
        last_name: None,
        phone: None,
        address: None,
    });

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            role: role.to_string(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            phone: profile.phone,
            address: profile.address,
        },
    )
    .await?;

    let token = generate_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("token generation failed: {e}")))?;

    Ok(Json(json!({
        "token": token,
        "user": {
            "id": user.id,
            "username": user.username,
            "email": user.email,
            "role": user.role,
        }
    })))
}

/// POST /api/auth/login
///
/// Verifies the password and returns a fresh token. Unknown email and wrong
/// password are indistinguishable on the wire.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let user = UserRepo::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(invalid)?;

    let matches = verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("password verification failed: {e}")))?;
    if !matches {
        return Err(invalid());
    }

    let token = generate_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("token generation failed: {e}")))?;

    Ok(Json(json!({
        "token": token,
        "user": {
            "id": user.id,
            "username": user.username,
            "email": user.email,
            "role": user.role,
            "profile": {
                "firstName": user.first_name,
                "lastName": user.last_name,
                "phone": user.phone,
                "address": user.address,
            }
        }
    })))
}

/// GET /api/auth/me
///
/// The authenticated user's profile plus their registered vehicles.
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let vehicles = VehicleRepo::list_for_user(&state.pool, auth.user_id).await?;

    let mut body = serde_json::to_value(&user)
        .map_err(|e| AppError::InternalError(format!("serialization failed: {e}")))?;
    body["vehicles"] = serde_json::to_value(&vehicles)
        .map_err(|e| AppError::InternalError(format!("serialization failed: {e}")))?;

    Ok(Json(body))
}
