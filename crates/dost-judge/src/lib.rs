//! Dost Judge - remote code execution against a Judge0 sandbox
//!
//! The orchestrator accepts a (source, language, stdin) triple, resolves the
//! language to a Judge0 id, submits an asynchronous job and polls it until the
//! judge reports a terminal status or the attempt budget runs out.
//!
//! ## Key Concepts
//!
//! - **Language**: one of the 13 supported keys, each bound to a fixed Judge0 id
//! - **JudgeProvider**: submit/poll capability pair, keyed (RapidAPI) or public
//! - **PollDriver**: explicit state machine advanced by a [`Timer`]
//! - **ExecutionOutcome**: decoded, classified terminal result

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod error;
pub mod language;
pub mod orchestrator;
pub mod outcome;
pub mod poll;
pub mod provider;

pub use config::{JudgeConfig, PollPolicy, PLACEHOLDER_API_KEY};
pub use error::{JudgeError, JudgeResult};
pub use language::Language;
pub use orchestrator::{ExecutionRequest, Orchestrator};
pub use outcome::{ExecutionOutcome, JudgeStatus};
pub use poll::{PollDriver, PollState, Timer, TokioTimer};
pub use provider::{
    select_provider, JudgeProvider, PublicJudge0, RapidApiJudge0, Submission, SubmissionHandle,
    SubmissionStatus,
};
