pub mod bench;
pub mod core;
pub mod engine;
pub mod list_cmd;
pub mod process;
pub mod report;
pub mod run_cmd;
pub mod storage;
pub mod timing;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub use process::ExecutionOutcome;
pub use storage::JsonlWriter;

/// Process exit codes, one per failure class.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const BUILD_FAILURE: i32 = 1;
    pub const RUN_FAILURE: i32 = 2;
    pub const PARSE_FAILURE: i32 = 3;
    pub const PRODUCER_FAILURE: i32 = 4;
    pub const VERIFICATION_FAILURE: i32 = 5;
    /// Configuration, I/O, spawn, timeout and export errors.
    pub const HARNESS_ERROR: i32 = 6;
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("build failed for {program} ({})", .outcome.status_label())]
    BuildFailure {
        program: String,
        command: String,
        outcome: ExecutionOutcome,
    },
    #[error("run failed for {program} input={input} ({})", .outcome.status_label())]
    RunFailure {
        program: String,
        input: u32,
        outcome: ExecutionOutcome,
    },
    #[error("could not parse execution time from output for {program} input={input}")]
    ParseFailure {
        program: String,
        input: u32,
        outcome: ExecutionOutcome,
    },
    #[error("verification producer {program} failed for input={input} ({})", .outcome.status_label())]
    ProducerFailure {
        program: String,
        input: u32,
        outcome: ExecutionOutcome,
    },
    #[error(
        "verification failed: consumer {program} rejected input={input}{} ({})",
        .repetition.map(|r| format!(" run={r}")).unwrap_or_default(),
        .outcome.status_label()
    )]
    VerificationFailure {
        program: String,
        input: u32,
        repetition: Option<usize>,
        outcome: ExecutionOutcome,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` timed out after {}s", .timeout.as_secs_f64())]
    Timeout { command: String, timeout: Duration },
    #[error("{context} ({}): {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type BenchResult<T> = Result<T, BenchError>;

impl BenchError {
    /// Exit code for the failure class of this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BenchError::BuildFailure { .. } => exit_code::BUILD_FAILURE,
            BenchError::RunFailure { .. } => exit_code::RUN_FAILURE,
            BenchError::ParseFailure { .. } => exit_code::PARSE_FAILURE,
            BenchError::ProducerFailure { .. } => exit_code::PRODUCER_FAILURE,
            BenchError::VerificationFailure { .. } => exit_code::VERIFICATION_FAILURE,
            _ => exit_code::HARNESS_ERROR,
        }
    }

    /// Captured output of the invocation that caused the failure, if any.
    pub fn outcome(&self) -> Option<&ExecutionOutcome> {
        match self {
            BenchError::BuildFailure { outcome, .. }
            | BenchError::RunFailure { outcome, .. }
            | BenchError::ParseFailure { outcome, .. }
            | BenchError::ProducerFailure { outcome, .. }
            | BenchError::VerificationFailure { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Command line of the failed build, if this is a build failure.
    pub fn command(&self) -> Option<&str> {
        match self {
            BenchError::BuildFailure { command, .. } => Some(command),
            _ => None,
        }
    }

    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

/// RFC 3339 timestamp for records and reports.
pub fn now_string() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
