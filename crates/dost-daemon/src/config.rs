//! Configuration for dost-daemon

use crate::error::{DaemonError, DaemonResult};
use dost_judge::JudgeConfig;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Main daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Judge0 endpoints and poll budget
    #[serde(default)]
    pub judge: JudgeConfig,

    /// Request-level execution limits
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Token and password settings
    #[serde(default)]
    pub auth: AuthConfig,

    /// Chat-completion backend for the AI assistant
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Realtime collaboration backend
    #[serde(default)]
    pub collab: CollabConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            judge: JudgeConfig::default(),
            execution: ExecutionConfig::default(),
            auth: AuthConfig::default(),
            assistant: AssistantConfig::default(),
            collab: CollabConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
        }
    }
}

/// Execution limits applied by the `/api/execute` handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Wall-clock ceiling for one execution, in seconds
    #[serde(default = "default_deadline")]
    pub deadline_secs: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            deadline_secs: default_deadline(),
        }
    }
}

impl ExecutionConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret; required at startup
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Token lifetime in hours
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,

    /// bcrypt work factor
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: default_token_ttl(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

/// OpenAI-compatible assistant backend (chat, transcription, speech)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Bearer key; the assistant is disabled without one
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base endpoint; `/chat/completions` and `/audio/*` are appended
    #[serde(default = "default_assistant_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_assistant_model")]
    pub model: String,

    /// Speech-to-text model
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    /// Text-to-speech model
    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    #[serde(default = "default_speech_voice")]
    pub speech_voice: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_assistant_timeout")]
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_assistant_endpoint(),
            model: default_assistant_model(),
            transcription_model: default_transcription_model(),
            speech_model: default_speech_model(),
            speech_voice: default_speech_voice(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_assistant_timeout(),
        }
    }
}

/// Liveblocks collaboration backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollabConfig {
    /// Secret key; room authorization is disabled without one
    #[serde(default)]
    pub secret_key: Option<String>,

    #[serde(default = "default_collab_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_collab_timeout")]
    pub timeout_secs: u64,
}

impl Default for CollabConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            endpoint: default_collab_endpoint(),
            timeout_secs: default_collab_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 5000))
}

fn default_deadline() -> u64 {
    45
}

fn default_token_ttl() -> i64 {
    24 * 7
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_assistant_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_assistant_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_speech_voice() -> String {
    "alloy".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_assistant_timeout() -> u64 {
    60
}

fn default_collab_endpoint() -> String {
    "https://api.liveblocks.io".to_string()
}

fn default_collab_timeout() -> u64 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Provider variables honoured on top of the `DOST_*` layers
pub const JUDGE0_API_KEY_VAR: &str = "JUDGE0_API_KEY";
pub const JWT_SECRET_VAR: &str = "JWT_SECRET";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const LIVEBLOCKS_SECRET_KEY_VAR: &str = "LIVEBLOCKS_SECRET_KEY";

impl DaemonConfig {
    /// Load configuration: defaults, then the optional file, then `DOST_*`
    /// environment (`DOST_AUTH__JWT_SECRET`), then the provider variables.
    pub fn load(path: Option<&str>) -> DaemonResult<Self> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(
            config::Config::try_from(&DaemonConfig::default())
                .map_err(|e| DaemonError::Config(e.to_string()))?,
        );

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with DOST_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("DOST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: DaemonConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| DaemonError::Config(e.to_string()))?;

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Overlay the well-known provider variables. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = lookup(JUDGE0_API_KEY_VAR) {
            self.judge.api_key = Some(key);
        }
        if let Some(secret) = lookup(JWT_SECRET_VAR) {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(key) = lookup(OPENAI_API_KEY_VAR) {
            self.assistant.api_key = Some(key);
        }
        if let Some(secret) = lookup(LIVEBLOCKS_SECRET_KEY_VAR) {
            self.collab.secret_key = Some(secret);
        }
    }

    /// Reject configurations the daemon cannot start with
    pub fn validate(&self) -> DaemonResult<()> {
        match self.auth.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => {}
            _ => {
                return Err(DaemonError::Config(format!(
                    "auth.jwt_secret is required (set {} or DOST_AUTH__JWT_SECRET)",
                    JWT_SECRET_VAR
                )))
            }
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(DaemonError::Config(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }

        if self.auth.token_ttl_hours <= 0 {
            return Err(DaemonError::Config(
                "auth.token_ttl_hours must be positive".to_string(),
            ));
        }

        if self.execution.deadline_secs == 0 {
            return Err(DaemonError::Config(
                "execution.deadline_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Create a development configuration with a throwaway secret
    pub fn development() -> Self {
        let mut config = Self::default();
        config.auth.jwt_secret = Some("dost-development-secret".to_string());
        config
    }
}
