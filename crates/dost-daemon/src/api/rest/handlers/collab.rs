//! Collaboration handler

use crate::api::rest::state::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RoomAuthRequest {
    #[serde(default)]
    pub room: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoomAuthResponse {
    pub token: String,
}

/// Issue a Liveblocks token for the caller in `room`
pub async fn liveblocks_auth(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<RoomAuthRequest>, JsonRejection>,
) -> ApiResult<Json<RoomAuthResponse>> {
    let Json(body) = payload?;

    let room = body
        .room
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Room is required".to_string()))?;

    let token = state.collab.authorize(&user, &room).await?;
    tracing::info!(user_id = %user.id, room = %room, "Issued collaboration token");

    Ok(Json(RoomAuthResponse { token }))
}
