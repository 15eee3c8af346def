//! Liveblocks room authorization

use crate::assistant::truncate;
use crate::config::CollabConfig;
use crate::error::UpstreamError;
use crate::model::Principal;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const SERVICE: &str = "liveblocks";
const MAX_ERROR_BODY_CHARS: usize = 320;

/// Full read/write access to a room
pub const FULL_ACCESS: &[&str] = &["room:write"];

#[derive(Debug, Deserialize)]
struct AuthorizeResponse {
    token: String,
}

/// Issues room-scoped access tokens for authenticated users
#[derive(Debug, Clone)]
pub struct CollabClient {
    client: Client,
    config: CollabConfig,
}

impl CollabClient {
    pub fn new(config: CollabConfig) -> Result<Self, UpstreamError> {
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
        self.secret_key().is_some()
    }

    fn secret_key(&self) -> Option<&str> {
        self.config
            .secret_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Token granting `user` full access to `room`
    pub async fn authorize(&self, user: &Principal, room: &str) -> Result<String, UpstreamError> {
        let secret = self
            .secret_key()
            .ok_or(UpstreamError::NotConfigured("Collaboration service"))?;

        let url = format!(
            "{}/v2/authorize-user",
            self.config.endpoint.trim_end_matches('/')
        );

        let mut permissions = serde_json::Map::new();
        permissions.insert(room.to_string(), json!(FULL_ACCESS));

        let payload = json!({
            "userId": user.id,
            "userInfo": {
                "name": user.display_name,
                "email": user.email,
            },
            "permissions": permissions,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(secret)
            .json(&payload)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport {
                service: SERVICE,
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, room, "Liveblocks authorization failed");
            return Err(UpstreamError::Status {
                service: SERVICE,
                status,
                body: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let body: AuthorizeResponse =
            response
                .json()
                .await
                .map_err(|e| UpstreamError::InvalidResponse {
                    service: SERVICE,
                    message: e.to_string(),
                })?;

        Ok(body.token)
    }
}
