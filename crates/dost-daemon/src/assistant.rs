//! OpenAI-compatible client for the AI assistant
//!
//! Three calls back the voice assistant loop: speech-to-text on the
//! recorded question, a chat completion, and text-to-speech on the reply.

use crate::config::AssistantConfig;
use crate::error::UpstreamError;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const SERVICE: &str = "assistant";
const MAX_ERROR_BODY_CHARS: usize = 320;
const DEFAULT_SPEECH_CONTENT_TYPE: &str = "audio/mpeg";

/// Recorded audio to transcribe
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
}

/// Synthesized speech
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Value,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

/// OpenAI-compatible `/chat/completions` client
#[derive(Debug, Clone)]
pub struct AssistantClient {
    client: Client,
    config: AssistantConfig,
}

impl AssistantClient {
    pub fn new(config: AssistantConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Transport {
                service: SERVICE,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// POST to `{endpoint}{path}` with the bearer key
    fn post(&self, path: &str) -> Result<RequestBuilder, UpstreamError> {
        let api_key = self
            .api_key()
            .ok_or(UpstreamError::NotConfigured("AI assistant"))?;

        let url = format!("{}{}", self.config.endpoint.trim_end_matches('/'), path);
        Ok(self.client.post(url).bearer_auth(api_key))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, UpstreamError> {
        let response = request.send().await.map_err(|e| UpstreamError::Transport {
            service: SERVICE,
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, "Assistant backend returned an error");
            return Err(UpstreamError::Status {
                service: SERVICE,
                status,
                body: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        Ok(response)
    }

    /// Single-turn completion of `prompt`; returns the trimmed reply text
    pub async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let payload = json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let request = self.post("/chat/completions")?.json(&payload);
        let response = self.send(request).await?;

        let body: OpenAiResponse = response.json().await.map_err(|e| invalid(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| invalid("response has no choices".to_string()))?;

        let reply = content_to_text(&content)
            .ok_or_else(|| invalid("choice has no text content".to_string()))?;

        Ok(reply.trim().to_string())
    }

    /// Speech-to-text on an uploaded recording
    pub async fn transcribe(&self, audio: AudioUpload) -> Result<String, UpstreamError> {
        let mut part = Part::bytes(audio.bytes).file_name(audio.file_name);
        if let Some(content_type) = audio.content_type.as_deref() {
            part = part.mime_str(content_type).map_err(|e| UpstreamError::Transport {
                service: SERVICE,
                message: format!("invalid audio content type: {}", e),
            })?;
        }
        let form = Form::new()
            .part("file", part)
            .text("model", self.config.transcription_model.clone());

        let request = self.post("/audio/transcriptions")?.multipart(form);
        let response = self.send(request).await?;

        let body: TranscriptionResponse =
            response.json().await.map_err(|e| invalid(e.to_string()))?;
        Ok(body.text)
    }

    /// Text-to-speech; returns the encoded audio and its content type
    pub async fn speak(&self, text: &str) -> Result<SpeechAudio, UpstreamError> {
        let payload = json!({
            "model": self.config.speech_model,
            "voice": self.config.speech_voice,
            "input": text,
        });

        let request = self.post("/audio/speech")?.json(&payload);
        let response = self.send(request).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_SPEECH_CONTENT_TYPE)
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| invalid(format!("speech body: {}", e)))?;

        if bytes.is_empty() {
            return Err(invalid("speech response is empty".to_string()));
        }

        Ok(SpeechAudio {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

fn invalid(message: String) -> UpstreamError {
    UpstreamError::InvalidResponse {
        service: SERVICE,
        message,
    }
}

/// `content` is a string, or an array of `{type: "text", text}` parts
fn content_to_text(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let text: Vec<&str> = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect();
            (!text.is_empty()).then(|| text.join(""))
        }
        _ => None,
    }
}

pub(crate) fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: &str, api_key: Option<&str>) -> AssistantConfig {
        AssistantConfig {
            api_key: api_key.map(str::to_string),
            endpoint: endpoint.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_content_to_text() {
        assert_eq!(content_to_text(&json!("hi")).as_deref(), Some("hi"));
        assert_eq!(
            content_to_text(&json!([{"type": "text", "text": "a"}, {"type": "text", "text": "b"}]))
                .as_deref(),
            Some("ab")
        );
        assert!(content_to_text(&json!(null)).is_none());
    }

    #[tokio::test]
    async fn test_complete_sends_openai_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo",
                "messages": [{ "role": "user", "content": "Explain recursion" }],
                "max_tokens": 1000,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "  A function calling itself.\n" }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AssistantClient::new(config(&server.uri(), Some("sk-test"))).unwrap();
        let reply = client.complete("Explain recursion").await.unwrap();
        assert_eq!(reply, "A function calling itself.");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let client = AssistantClient::new(config("http://127.0.0.1:9", Some("  "))).unwrap();
        assert!(!client.is_configured());
        assert!(matches!(
            client.complete("hi").await,
            Err(UpstreamError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = AssistantClient::new(config(&server.uri(), Some("k"))).unwrap();
        assert!(matches!(
            client.complete("hi").await,
            Err(UpstreamError::InvalidResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_transcribe_uploads_multipart_audio() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "text": "What is a closure?" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = AssistantClient::new(config(&server.uri(), Some("sk-test"))).unwrap();
        let text = client
            .transcribe(AudioUpload {
                bytes: b"RIFF....WAVE".to_vec(),
                file_name: "audio.wav".to_string(),
                content_type: Some("audio/wav".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(text, "What is a closure?");

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0].headers.get("content-type").unwrap();
        assert!(content_type
            .to_str()
            .unwrap()
            .starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"model\""));
        assert!(body.contains("whisper-1"));
        assert!(body.contains("filename=\"audio.wav\""));
        assert!(body.contains("RIFF....WAVE"));
    }

    #[tokio::test]
    async fn test_speak_returns_audio_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "tts-1",
                "voice": "alloy",
                "input": "Hello there",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(b"ID3audio".to_vec(), "audio/mpeg"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = AssistantClient::new(config(&server.uri(), Some("sk-test"))).unwrap();
        let speech = client.speak("Hello there").await.unwrap();
        assert_eq!(speech.bytes, b"ID3audio");
        assert_eq!(speech.content_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_speech_backend_error_is_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = AssistantClient::new(config(&server.uri(), Some("k"))).unwrap();
        match client.speak("hi").await {
            Err(UpstreamError::Status { status, body, .. }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
