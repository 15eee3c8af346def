//! Judge providers
//!
//! Both variants speak the same Judge0 REST dialect; they differ only in base
//! URL and whether RapidAPI credentials are attached.

use crate::config::JudgeConfig;
use crate::error::{JudgeError, JudgeResult};
use crate::language::Language;
use crate::outcome::JudgeStatus;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const RAPIDAPI_HOST_HEADER: &str = "x-rapidapi-host";
const RAPIDAPI_KEY_HEADER: &str = "x-rapidapi-key";
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Body of `POST /submissions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub language_id: u32,
    /// Base64 source
    pub source_code: String,
    /// Base64 stdin
    pub stdin: String,
}

impl Submission {
    pub fn encode(language: Language, code: &str, stdin: &str) -> Self {
        Self {
            language_id: language.judge0_id(),
            source_code: STANDARD.encode(code.as_bytes()),
            stdin: STANDARD.encode(stdin.as_bytes()),
        }
    }
}

/// Opaque reference to one submitted job. Not `Clone`: one handle drives
/// exactly one polling loop.
#[derive(Debug, PartialEq, Eq)]
pub struct SubmissionHandle(String);

impl SubmissionHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `GET /submissions/{token}`; output fields are base64
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionStatus {
    #[serde(default)]
    pub status: Option<JudgeStatus>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    token: String,
}

/// Submit/poll capability pair
#[async_trait]
pub trait JudgeProvider: Send + Sync + fmt::Debug {
    /// Short name for logs
    fn name(&self) -> &'static str;

    fn base_url(&self) -> &str;

    /// Queue a job without waiting for it
    async fn submit(&self, submission: &Submission) -> JudgeResult<SubmissionHandle>;

    /// Fetch the current status of a job
    async fn poll(&self, handle: &SubmissionHandle) -> JudgeResult<SubmissionStatus>;
}

/// Shared Judge0 HTTP plumbing
#[derive(Debug, Clone)]
struct Judge0Http {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl Judge0Http {
    fn new(client: Client, base_url: &str, headers: HeaderMap) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
        }
    }

    fn submit_url(&self) -> String {
        format!(
            "{}/submissions?base64_encoded=true&wait=false",
            self.base_url
        )
    }

    fn status_url(&self, handle: &SubmissionHandle) -> String {
        format!(
            "{}/submissions/{}?base64_encoded=true",
            self.base_url, handle
        )
    }

    async fn submit(&self, submission: &Submission) -> JudgeResult<SubmissionHandle> {
        let response = self
            .client
            .post(self.submit_url())
            .headers(self.headers.clone())
            .json(submission)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::SubmissionFailed {
                status,
                body: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| JudgeError::InvalidResponse(format!("submission response: {}", e)))?;

        if body.token.trim().is_empty() {
            return Err(JudgeError::InvalidResponse(
                "submission response has an empty token".to_string(),
            ));
        }

        Ok(SubmissionHandle::new(body.token))
    }

    async fn poll(&self, handle: &SubmissionHandle) -> JudgeResult<SubmissionStatus> {
        let response = self
            .client
            .get(self.status_url(handle))
            .headers(self.headers.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::PollFailed {
                status,
                body: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        response
            .json()
            .await
            .map_err(|e| JudgeError::InvalidResponse(format!("status response: {}", e)))
    }
}

/// Judge0 CE through RapidAPI, authenticated by key
#[derive(Debug, Clone)]
pub struct RapidApiJudge0 {
    http: Judge0Http,
}

impl RapidApiJudge0 {
    pub fn new(client: Client, base_url: &str, host: &str, api_key: &str) -> JudgeResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            RAPIDAPI_HOST_HEADER,
            header_value(RAPIDAPI_HOST_HEADER, host)?,
        );
        let mut key = header_value(RAPIDAPI_KEY_HEADER, api_key)?;
        key.set_sensitive(true);
        headers.insert(RAPIDAPI_KEY_HEADER, key);

        Ok(Self {
            http: Judge0Http::new(client, base_url, headers),
        })
    }
}

#[async_trait]
impl JudgeProvider for RapidApiJudge0 {
    fn name(&self) -> &'static str {
        "rapidapi"
    }

    fn base_url(&self) -> &str {
        &self.http.base_url
    }

    async fn submit(&self, submission: &Submission) -> JudgeResult<SubmissionHandle> {
        self.http.submit(submission).await
    }

    async fn poll(&self, handle: &SubmissionHandle) -> JudgeResult<SubmissionStatus> {
        self.http.poll(handle).await
    }
}

/// Public, unauthenticated Judge0 CE instance
#[derive(Debug, Clone)]
pub struct PublicJudge0 {
    http: Judge0Http,
}

impl PublicJudge0 {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            http: Judge0Http::new(client, base_url, HeaderMap::new()),
        }
    }
}

#[async_trait]
impl JudgeProvider for PublicJudge0 {
    fn name(&self) -> &'static str {
        "public"
    }

    fn base_url(&self) -> &str {
        &self.http.base_url
    }

    async fn submit(&self, submission: &Submission) -> JudgeResult<SubmissionHandle> {
        self.http.submit(submission).await
    }

    async fn poll(&self, handle: &SubmissionHandle) -> JudgeResult<SubmissionStatus> {
        self.http.poll(handle).await
    }
}

/// Pick the keyed provider when a real key is configured, else the public one
pub fn select_provider(config: &JudgeConfig) -> JudgeResult<Arc<dyn JudgeProvider>> {
    let client = Client::builder()
        .timeout(config.http_timeout())
        .build()
        .map_err(|e| JudgeError::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;

    let provider: Arc<dyn JudgeProvider> = match config.usable_api_key() {
        Some(api_key) => Arc::new(RapidApiJudge0::new(
            client,
            &config.keyed_base_url,
            &config.rapidapi_host,
            api_key,
        )?),
        None => Arc::new(PublicJudge0::new(client, &config.public_base_url)),
    };

    Ok(provider)
}

fn header_value(name: &str, value: &str) -> JudgeResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| JudgeError::InvalidConfig(format!("{} contains invalid characters", name)))
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}
