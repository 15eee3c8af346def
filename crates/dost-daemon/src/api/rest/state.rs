//! Application state for API handlers

use crate::assistant::AssistantClient;
use crate::auth::TokenIssuer;
use crate::collab::CollabClient;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::storage::{InMemoryStorage, Storage};
use dost_judge::Orchestrator;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage backend
    pub storage: Arc<dyn Storage>,

    /// Bearer token signer/verifier
    pub tokens: Arc<TokenIssuer>,

    /// bcrypt work factor for new passwords
    pub bcrypt_cost: u32,

    /// Judge0 execution orchestrator
    pub orchestrator: Arc<Orchestrator>,

    /// Wall-clock ceiling for one execution
    pub execution_deadline: Duration,

    /// AI assistant backend
    pub assistant: Arc<AssistantClient>,

    /// Collaboration backend
    pub collab: Arc<CollabClient>,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Build state from a validated configuration with in-memory storage
    pub fn from_config(config: &DaemonConfig) -> DaemonResult<Self> {
        Self::with_storage(config, Arc::new(InMemoryStorage::new()))
    }

    pub fn with_storage(config: &DaemonConfig, storage: Arc<dyn Storage>) -> DaemonResult<Self> {
        let secret = config
            .auth
            .jwt_secret
            .as_deref()
            .ok_or_else(|| DaemonError::Config("auth.jwt_secret is required".to_string()))?;

        Ok(Self {
            storage,
            tokens: Arc::new(TokenIssuer::new(secret, config.auth.token_ttl_hours)),
            bcrypt_cost: config.auth.bcrypt_cost,
            orchestrator: Arc::new(Orchestrator::from_config(&config.judge)?),
            execution_deadline: config.execution.deadline(),
            assistant: Arc::new(AssistantClient::new(config.assistant.clone())?),
            collab: Arc::new(CollabClient::new(config.collab.clone())?),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        })
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }
}
