//! Code execution handler

use crate::api::rest::state::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use dost_judge::ExecutionRequest;
use serde::{Deserialize, Serialize};

/// Execution request body
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Program stdin
    #[serde(default)]
    pub input: Option<String>,
}

/// Successful execution
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub output: String,
}

/// Run code on the judge and return its trimmed stdout
pub async fn execute(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> ApiResult<Json<ExecuteResponse>> {
    let Json(body) = payload?;

    let (Some(code), Some(language)) = (
        body.code.filter(|c| !c.is_empty()),
        body.language.filter(|l| !l.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Code and language are required".to_string(),
        ));
    };

    tracing::info!(
        user_id = %user.id,
        language = %language,
        code_len = code.len(),
        "Received execution request"
    );

    let request = ExecutionRequest::new(code, language).with_stdin(body.input.unwrap_or_default());

    let outcome = tokio::time::timeout(
        state.execution_deadline,
        state.orchestrator.execute(&request),
    )
    .await
    .map_err(|_| ApiError::ExecutionDeadline(state.execution_deadline))??;

    let output = outcome.into_result()?;
    Ok(Json(ExecuteResponse { output }))
}
