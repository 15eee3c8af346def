//! Execution orchestrator
//!
//! Resolves the language, submits the job through the selected provider and
//! hands the returned handle to a [`PollDriver`]. Each call is independent;
//! the only shared state is the read-only provider, timer and policy.
//!
//! Dropping the returned future stops polling at the next await point; the
//! remote job itself is not cancelled.

use crate::config::{JudgeConfig, PollPolicy};
use crate::error::JudgeResult;
use crate::language::Language;
use crate::outcome::ExecutionOutcome;
use crate::poll::{PollDriver, Timer, TokioTimer};
use crate::provider::{select_provider, JudgeProvider, Submission};
use serde::Deserialize;
use std::sync::Arc;

/// One caller-submitted run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecutionRequest {
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub stdin: String,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            stdin: String::new(),
        }
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }
}

/// Submit-then-poll orchestrator
#[derive(Debug, Clone)]
pub struct Orchestrator {
    provider: Arc<dyn JudgeProvider>,
    timer: Arc<dyn Timer>,
    policy: PollPolicy,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn JudgeProvider>,
        timer: Arc<dyn Timer>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            provider,
            timer,
            policy,
        }
    }

    /// Build from a configuration snapshot with the real tokio timer
    pub fn from_config(config: &JudgeConfig) -> JudgeResult<Self> {
        Ok(Self::new(
            select_provider(config)?,
            Arc::new(TokioTimer),
            config.poll_policy(),
        ))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn base_url(&self) -> &str {
        self.provider.base_url()
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Run `request` to completion.
    ///
    /// `Ok` carries both accepted and failed executions; `Err` is reserved
    /// for unsupported languages, upstream rejections, timeouts and malformed
    /// responses.
    pub async fn execute(&self, request: &ExecutionRequest) -> JudgeResult<ExecutionOutcome> {
        let language: Language = request.language.parse()?;

        let submission = Submission::encode(language, &request.code, &request.stdin);
        let handle = self.provider.submit(&submission).await?;

        tracing::info!(
            provider = self.provider.name(),
            language = %language,
            code_len = request.code.len(),
            token = %handle,
            "Submitted code for execution"
        );

        let driver = PollDriver::new(
            self.provider.as_ref(),
            self.timer.as_ref(),
            self.policy,
            handle,
        );

        match driver.run().await {
            Ok(outcome) => {
                tracing::info!(
                    language = %language,
                    status_id = outcome.status.id,
                    success = outcome.success,
                    "Execution finished"
                );
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(language = %language, error = %err, "Execution aborted");
                Err(err)
            }
        }
    }
}
