//! Error types for the execution orchestrator

use thiserror::Error;

/// Orchestrator errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JudgeError {
    /// Language key is not in the registry; nothing was sent upstream
    #[error("Unsupported language: {language}. Supported languages: {}", .supported.join(", "))]
    UnsupportedLanguage {
        language: String,
        supported: Vec<&'static str>,
    },

    /// Judge rejected the initial submission
    #[error("Judge0 submission failed: {status} - {body}")]
    SubmissionFailed { status: u16, body: String },

    /// Judge rejected a status check
    #[error("Judge0 result fetch failed: {status}")]
    PollFailed { status: u16, body: String },

    /// Attempt budget exhausted without a terminal status
    #[error("Execution timeout - code took too long to execute")]
    ExecutionTimeout { attempts: u32 },

    /// Judge finished with a non-accepted status
    #[error("Code execution failed: {message}")]
    ExecutionFailed { message: String },

    /// Upstream body did not have the expected shape
    #[error("Invalid Judge0 response: {0}")]
    InvalidResponse(String),

    /// Network-level failure talking to the judge
    #[error("Judge0 transport error: {0}")]
    Transport(String),

    /// Provider could not be built from the configuration
    #[error("Invalid judge configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for JudgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            JudgeError::InvalidResponse(err.to_string())
        } else {
            JudgeError::Transport(err.to_string())
        }
    }
}

/// Result type alias for orchestrator operations
pub type JudgeResult<T> = Result<T, JudgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_language_lists_keys() {
        let err = JudgeError::UnsupportedLanguage {
            language: "cobol".to_string(),
            supported: vec!["javascript", "python"],
        };
        assert_eq!(
            err.to_string(),
            "Unsupported language: cobol. Supported languages: javascript, python"
        );
    }

    #[test]
    fn timeout_message_does_not_leak_attempts() {
        let err = JudgeError::ExecutionTimeout { attempts: 30 };
        assert_eq!(
            err.to_string(),
            "Execution timeout - code took too long to execute"
        );
    }

    #[test]
    fn submission_failure_carries_status_and_body() {
        let err = JudgeError::SubmissionFailed {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Judge0 submission failed: 429 - quota exceeded"
        );
    }
}
