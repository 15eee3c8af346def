//! Error types for dost-daemon

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dost_judge::JudgeError;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Judge client could not be built
    #[error("Judge error: {0}")]
    Judge(#[from] JudgeError),

    /// Outbound client could not be built
    #[error("Upstream client error: {0}")]
    Upstream(#[from] UpstreamError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Conflict (e.g., already exists)
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Token and password errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token on the request
    #[error("Missing bearer token")]
    MissingToken,

    /// Token failed signature, expiry or shape checks
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token could not be signed
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// bcrypt failure
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Failures talking to the assistant or collaboration backends
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Backend has no credentials configured
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Backend answered with a non-success status
    #[error("{service} error {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Backend answered with an unexpected body
    #[error("invalid {service} response: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },

    /// Request never completed
    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request
    #[error("{0}")]
    BadRequest(String),

    /// Caller is not authenticated
    #[error("Not authenticated")]
    Unauthorized,

    /// Execution exceeded the daemon's deadline
    #[error("Execution timeout - code took too long to execute")]
    ExecutionDeadline(Duration),

    /// Judge error
    #[error(transparent)]
    Judge(#[from] JudgeError),

    /// Assistant or collaboration backend error
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Auth error
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub code: String,
}

impl ApiError {
    /// Status, stable code, and optional detail for the response body
    fn parts(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", None),
            ApiError::ExecutionDeadline(deadline) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EXECUTION_TIMEOUT",
                Some(format!("deadline of {}s exceeded", deadline.as_secs())),
            ),
            ApiError::Judge(err) => judge_parts(err),
            ApiError::Upstream(UpstreamError::NotConfigured(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED", None)
            }
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", None),
            ApiError::Storage(StorageError::Conflict(_)) => {
                (StatusCode::BAD_REQUEST, "CONFLICT", None)
            }
            ApiError::Auth(AuthError::MissingToken | AuthError::InvalidToken(_)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", None)
            }
            ApiError::Auth(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_ERROR", None),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Judge(JudgeError::ExecutionFailed { .. }) => {
                "Code execution failed".to_string()
            }
            ApiError::Auth(AuthError::MissingToken | AuthError::InvalidToken(_)) => {
                ApiError::Unauthorized.to_string()
            }
            other => other.to_string(),
        }
    }
}

fn judge_parts(err: &JudgeError) -> (StatusCode, &'static str, Option<String>) {
    match err {
        JudgeError::UnsupportedLanguage { .. } => {
            (StatusCode::BAD_REQUEST, "UNSUPPORTED_LANGUAGE", None)
        }
        JudgeError::ExecutionFailed { message } => (
            StatusCode::BAD_REQUEST,
            "EXECUTION_FAILED",
            Some(message.clone()),
        ),
        JudgeError::ExecutionTimeout { attempts } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "EXECUTION_TIMEOUT",
            Some(format!("no result after {} polls", attempts)),
        ),
        JudgeError::SubmissionFailed { body, .. } | JudgeError::PollFailed { body, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "JUDGE_UNAVAILABLE",
            Some(body.clone()).filter(|b| !b.is_empty()),
        ),
        JudgeError::InvalidResponse(_)
        | JudgeError::Transport(_)
        | JudgeError::InvalidConfig(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "JUDGE_UNAVAILABLE", None)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        }

        let body = ErrorResponse {
            message: self.message(),
            error,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;
