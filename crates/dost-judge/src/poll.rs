//! Poll loop as an explicit state machine
//!
//! ```text
//! Submitted ──> Polling{0} ──sleep+poll──> Polling{n+1} ──...──> TimedOut
//!                   │                           │
//!                   └──── terminal status ──────┴──> Terminal(outcome)
//! ```
//!
//! The driver owns the submission handle, so polls for one job are strictly
//! sequential and the first terminal status ends the loop.

use crate::config::PollPolicy;
use crate::error::{JudgeError, JudgeResult};
use crate::outcome::ExecutionOutcome;
use crate::provider::{JudgeProvider, SubmissionHandle};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Suspends the poll loop between attempts
#[async_trait]
pub trait Timer: Send + Sync + fmt::Debug {
    async fn sleep(&self, duration: Duration);
}

/// Timer backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Poll loop states
#[derive(Debug, PartialEq)]
pub enum PollState {
    /// Job accepted by the judge, no poll issued yet
    Submitted,
    /// `attempt` polls have returned a pending status so far
    Polling { attempt: u32 },
    /// Judge reported a terminal status
    Terminal(ExecutionOutcome),
    /// Attempt budget exhausted
    TimedOut { attempts: u32 },
}

impl PollState {
    pub fn is_finished(&self) -> bool {
        matches!(self, PollState::Terminal(_) | PollState::TimedOut { .. })
    }
}

/// Drives one submission from `Submitted` to a final state
pub struct PollDriver<'a> {
    provider: &'a dyn JudgeProvider,
    timer: &'a dyn Timer,
    policy: PollPolicy,
    handle: SubmissionHandle,
    state: PollState,
}

impl<'a> PollDriver<'a> {
    pub fn new(
        provider: &'a dyn JudgeProvider,
        timer: &'a dyn Timer,
        policy: PollPolicy,
        handle: SubmissionHandle,
    ) -> Self {
        Self {
            provider,
            timer,
            policy,
            handle,
            state: PollState::Submitted,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Advance by one transition. Upstream errors abort the loop immediately.
    pub async fn step(&mut self) -> JudgeResult<&PollState> {
        let next = match &self.state {
            PollState::Submitted => PollState::Polling { attempt: 0 },
            PollState::Polling { attempt } if *attempt >= self.policy.max_attempts => {
                PollState::TimedOut { attempts: *attempt }
            }
            PollState::Polling { attempt } => {
                let attempt = *attempt;
                self.timer.sleep(self.policy.interval).await;

                let status = self.provider.poll(&self.handle).await?;
                let judge_status = status.status.as_ref().ok_or_else(|| {
                    JudgeError::InvalidResponse("status response has no status".to_string())
                })?;

                tracing::debug!(
                    token = %self.handle,
                    attempt = attempt + 1,
                    status_id = judge_status.id,
                    "Polled submission"
                );

                if judge_status.is_pending() {
                    PollState::Polling {
                        attempt: attempt + 1,
                    }
                } else {
                    PollState::Terminal(ExecutionOutcome::from_terminal(&status)?)
                }
            }
            PollState::Terminal(_) | PollState::TimedOut { .. } => return Ok(&self.state),
        };

        self.state = next;
        Ok(&self.state)
    }

    /// Run until `Terminal` or `TimedOut`
    pub async fn run(mut self) -> JudgeResult<ExecutionOutcome> {
        while !self.state.is_finished() {
            self.step().await?;
        }

        match self.state {
            PollState::Terminal(outcome) => Ok(outcome),
            PollState::TimedOut { attempts } => Err(JudgeError::ExecutionTimeout { attempts }),
            state => unreachable!("poll loop exited in {:?}", state),
        }
    }
}
