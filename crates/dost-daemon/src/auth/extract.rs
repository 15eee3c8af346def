//! Bearer-token extractor for protected routes

use crate::api::rest::state::AppState;
use crate::error::{ApiError, AuthError};
use crate::model::Principal;
use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};

/// The authenticated caller of a protected route
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;

        match state.tokens.verify(token) {
            Ok(principal) => Ok(AuthUser(principal)),
            Err(err) => {
                tracing::debug!(error = %err, "Rejected bearer token");
                Err(err.into())
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
