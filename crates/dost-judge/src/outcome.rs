//! Terminal result decoding and classification

use crate::error::{JudgeError, JudgeResult};
use crate::provider::SubmissionStatus;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Judge0 status ids 1 and 2 ("In Queue", "Processing")
const LAST_PENDING_STATUS: u32 = 2;

/// Judge0 status id 3 ("Accepted")
const ACCEPTED_STATUS: u32 = 3;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Status reported by the judge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeStatus {
    pub id: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl JudgeStatus {
    pub fn new(id: u32, description: impl Into<String>) -> Self {
        Self {
            id,
            description: Some(description.into()),
        }
    }

    /// Queued or still running
    pub fn is_pending(&self) -> bool {
        self.id <= LAST_PENDING_STATUS
    }

    pub fn is_accepted(&self) -> bool {
        self.id == ACCEPTED_STATUS
    }
}

/// Decoded terminal result of one execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    pub status: JudgeStatus,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub compile_output: String,
}

impl ExecutionOutcome {
    /// Decode a terminal status payload.
    ///
    /// Missing or null output fields decode to empty strings.
    pub fn from_terminal(status: &SubmissionStatus) -> JudgeResult<Self> {
        let judge_status = status
            .status
            .clone()
            .ok_or_else(|| JudgeError::InvalidResponse("missing status".to_string()))?;

        Ok(Self {
            success: judge_status.is_accepted(),
            status: judge_status,
            stdout: decode_field("stdout", status.stdout.as_deref())?,
            stderr: decode_field("stderr", status.stderr.as_deref())?,
            compile_output: decode_field("compile_output", status.compile_output.as_deref())?,
        })
    }

    /// Trimmed program output
    pub fn output(&self) -> &str {
        self.stdout.trim()
    }

    /// Failure message: stderr, then compile output, then the status
    /// description, then a generic fallback. `None` on success.
    pub fn error_message(&self) -> Option<String> {
        if self.success {
            return None;
        }

        let message = [
            Some(self.stderr.as_str()),
            Some(self.compile_output.as_str()),
            self.status.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(UNKNOWN_ERROR);

        Some(message.to_string())
    }

    /// Successful output, or `ExecutionFailed` with the classified message
    pub fn into_result(self) -> JudgeResult<String> {
        match self.error_message() {
            None => Ok(self.output().to_string()),
            Some(message) => Err(JudgeError::ExecutionFailed { message }),
        }
    }
}

/// Base64-decode one output field. Judge0 wraps long base64 values with
/// newlines, so ASCII whitespace is stripped first.
fn decode_field(name: &str, value: Option<&str>) -> JudgeResult<String> {
    let Some(value) = value else {
        return Ok(String::new());
    };

    let compact: String = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| JudgeError::InvalidResponse(format!("{} is not base64: {}", name, e)))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(id: u32, description: &str) -> SubmissionStatus {
        SubmissionStatus {
            status: Some(JudgeStatus::new(id, description)),
            stdout: None,
            stderr: None,
            compile_output: None,
        }
    }

    #[test]
    fn test_pending_classification() {
        assert!(JudgeStatus::new(1, "In Queue").is_pending());
        assert!(JudgeStatus::new(2, "Processing").is_pending());
        assert!(!JudgeStatus::new(3, "Accepted").is_pending());
        assert!(!JudgeStatus::new(11, "Runtime Error (NZEC)").is_pending());
    }

    #[test]
    fn test_accepted_output_is_trimmed() {
        let mut status = terminal(3, "Accepted");
        status.stdout = Some("IDUKCg==".to_string()); // " 5\n\n"

        let outcome = ExecutionOutcome::from_terminal(&status).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.output(), "5");
        assert_eq!(outcome.error_message(), None);
        assert_eq!(outcome.into_result().unwrap(), "5");
    }

    #[test]
    fn test_stderr_wins() {
        let mut status = terminal(11, "Runtime Error (NZEC)");
        status.stderr = Some("RXJyb3I=".to_string());
        status.compile_output = Some("d2FybmluZw==".to_string());

        let outcome = ExecutionOutcome::from_terminal(&status).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error_message().as_deref(), Some("Error"));
    }

    #[test]
    fn test_compile_output_then_description() {
        let mut status = terminal(6, "Compilation Error");
        status.compile_output = Some("c3ludGF4IGVycm9y".to_string());
        let outcome = ExecutionOutcome::from_terminal(&status).unwrap();
        assert_eq!(outcome.error_message().as_deref(), Some("syntax error"));

        let outcome = ExecutionOutcome::from_terminal(&terminal(5, "Time Limit Exceeded")).unwrap();
        assert_eq!(
            outcome.error_message().as_deref(),
            Some("Time Limit Exceeded")
        );
    }

    #[test]
    fn test_unknown_error_fallback() {
        let status = SubmissionStatus {
            status: Some(JudgeStatus {
                id: 13,
                description: None,
            }),
            stdout: None,
            stderr: Some(String::new()),
            compile_output: None,
        };

        let err = ExecutionOutcome::from_terminal(&status)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(
            err,
            JudgeError::ExecutionFailed {
                message: "Unknown error".to_string()
            }
        );
    }

    #[test]
    fn test_wrapped_base64_is_accepted() {
        let mut status = terminal(3, "Accepted");
        status.stdout = Some("aGVs\nbG8=\n".to_string());
        let outcome = ExecutionOutcome::from_terminal(&status).unwrap();
        assert_eq!(outcome.output(), "hello");
    }

    #[test]
    fn test_missing_status_is_invalid() {
        let status = SubmissionStatus {
            status: None,
            stdout: None,
            stderr: None,
            compile_output: None,
        };
        assert!(matches!(
            ExecutionOutcome::from_terminal(&status),
            Err(JudgeError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_bad_base64_is_invalid() {
        let mut status = terminal(3, "Accepted");
        status.stdout = Some("%%%".to_string());
        assert!(matches!(
            ExecutionOutcome::from_terminal(&status),
            Err(JudgeError::InvalidResponse(_))
        ));
    }
}
