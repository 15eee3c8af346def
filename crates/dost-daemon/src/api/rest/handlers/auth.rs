//! Account handlers

use crate::api::rest::state::AppState;
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::{ApiError, ApiResult, StorageError};
use crate::model::{Principal, User};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Registration request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Register/login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: Principal,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Principal,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Passwords are taken verbatim; only an empty one counts as missing
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Create an account and sign the caller in
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let Json(request) = payload?;

    let (Some(email), Some(password), Some(display_name)) = (
        present(request.email),
        non_empty(request.password),
        present(request.display_name),
    ) else {
        return Err(ApiError::BadRequest(
            "Please provide email, password, and display name".to_string(),
        ));
    };

    if state.storage.get_user_by_email(&email).await?.is_some() {
        return Err(user_exists());
    }

    let password_hash = hash_password(&password, state.bcrypt_cost).await?;
    let user = User::new(&email, password_hash, display_name.trim(), request.role);
    let principal = user.principal();

    if let Err(StorageError::Conflict(_)) = state.storage.insert_user(user).await {
        return Err(user_exists());
    }

    let token = state.tokens.issue(&principal)?;
    tracing::info!(user_id = %principal.id, role = %principal.role, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: principal,
            token,
        }),
    ))
}

fn user_exists() -> ApiError {
    ApiError::BadRequest("User already exists".to_string())
}

/// Exchange credentials for a token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(request) = payload?;

    let (Some(email), Some(password)) = (present(request.email), non_empty(request.password))
    else {
        return Err(ApiError::BadRequest(
            "Please provide email and password".to_string(),
        ));
    };

    let user = state
        .storage
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::BadRequest("User not found".to_string()))?;

    if !verify_password(&password, &user.password_hash).await? {
        tracing::debug!(user_id = %user.id, "Rejected login");
        return Err(ApiError::BadRequest("Invalid credentials".to_string()));
    }

    let principal = user.principal();
    let token = state.tokens.issue(&principal)?;

    Ok(Json(AuthResponse {
        message: "Logged in".to_string(),
        user: principal,
        token,
    }))
}

/// Tokens are stateless; the client discards its copy
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

/// Current principal
pub async fn me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    Json(MeResponse { user })
}
