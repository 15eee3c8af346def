//! AI assistant handlers

use crate::api::rest::state::AppState;
use crate::assistant::AudioUpload;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::multipart::MultipartRejection,
    extract::rejection::JsonRejection,
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Multipart field carrying the recording
const AUDIO_FIELD: &str = "file";
const DEFAULT_AUDIO_FILE_NAME: &str = "audio.wav";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Forward one prompt to the chat-completion backend
pub async fn chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(body) = payload?;

    let prompt = body
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Prompt is required".to_string()))?;

    tracing::debug!(user_id = %user.id, prompt_len = prompt.len(), "Assistant request");

    let reply = state.assistant.complete(&prompt).await?;
    Ok(Json(ChatResponse { reply }))
}

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

/// Transcribe an uploaded recording (multipart field `file`)
pub async fn transcribe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<TranscriptionResponse>> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .unwrap_or(DEFAULT_AUDIO_FILE_NAME)
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        upload = Some(AudioUpload {
            bytes: bytes.to_vec(),
            file_name,
            content_type,
        });
        break;
    }

    let upload = upload
        .filter(|u| !u.bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Audio file is required".to_string()))?;

    tracing::debug!(user_id = %user.id, audio_len = upload.bytes.len(), "Transcription request");

    let text = state.assistant.transcribe(upload).await?;
    Ok(Json(TranscriptionResponse { text }))
}

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Synthesize speech for `text`; the body is the encoded audio
pub async fn speech(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = payload?;

    let text = body
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Text is required".to_string()))?;

    tracing::debug!(user_id = %user.id, text_len = text.len(), "Speech request");

    let speech = state.assistant.speak(&text).await?;
    Ok(([(header::CONTENT_TYPE, speech.content_type)], speech.bytes).into_response())
}
