//! Judge configuration snapshot

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// RapidAPI-hosted Judge0 CE (requires a key)
pub const DEFAULT_KEYED_BASE_URL: &str = "https://judge0-ce.p.rapidapi.com";

/// Public Judge0 CE instance (no key)
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://ce.judge0.com";

/// Value of `X-RapidAPI-Host` for the keyed endpoint
pub const DEFAULT_RAPIDAPI_HOST: &str = "judge0-ce.p.rapidapi.com";

/// Key shipped in sample env files; treated as "no key"
pub const PLACEHOLDER_API_KEY: &str = "your-rapidapi-key-here";

/// Read-only judge configuration, captured once and handed to the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// RapidAPI key; absent, blank or placeholder selects the public instance
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL used when a real key is configured
    #[serde(default = "default_keyed_base_url")]
    pub keyed_base_url: String,

    /// Base URL used without a key
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// `X-RapidAPI-Host` header value
    #[serde(default = "default_rapidapi_host")]
    pub rapidapi_host: String,

    /// Maximum number of status polls per execution
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Delay before each status poll, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            keyed_base_url: default_keyed_base_url(),
            public_base_url: default_public_base_url(),
            rapidapi_host: default_rapidapi_host(),
            max_poll_attempts: default_max_poll_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

impl JudgeConfig {
    /// Configuration with the given key and default endpoints
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// The key to use, if it is a real one
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    /// Whether the keyed endpoint will be selected
    pub fn uses_keyed_provider(&self) -> bool {
        self.usable_api_key().is_some()
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            max_attempts: self.max_poll_attempts,
            interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Poll budget: at most `max_attempts` polls, `interval` apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_poll_attempts(),
            interval: Duration::from_millis(default_poll_interval_ms()),
        }
    }
}

impl PollPolicy {
    /// Upper bound on time spent sleeping between polls
    pub fn ceiling(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

// Default value helpers
fn default_keyed_base_url() -> String {
    DEFAULT_KEYED_BASE_URL.to_string()
}

fn default_public_base_url() -> String {
    DEFAULT_PUBLIC_BASE_URL.to_string()
}

fn default_rapidapi_host() -> String {
    DEFAULT_RAPIDAPI_HOST.to_string()
}

fn default_max_poll_attempts() -> u32 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_http_timeout() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JudgeConfig::default();
        assert!(config.api_key.is_none());
        assert!(!config.uses_keyed_provider());
        assert_eq!(config.public_base_url, "https://ce.judge0.com");
        assert_eq!(config.keyed_base_url, "https://judge0-ce.p.rapidapi.com");
    }

    #[test]
    fn test_placeholder_key_is_ignored() {
        assert!(!JudgeConfig::with_api_key(PLACEHOLDER_API_KEY).uses_keyed_provider());
        assert!(!JudgeConfig::with_api_key("   ").uses_keyed_provider());
        assert!(JudgeConfig::with_api_key("abc").uses_keyed_provider());
    }

    #[test]
    fn test_poll_policy_defaults() {
        let policy = JudgeConfig::default().poll_policy();
        assert_eq!(policy.max_attempts, 30);
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert_eq!(policy.ceiling(), Duration::from_secs(30));
    }
}
