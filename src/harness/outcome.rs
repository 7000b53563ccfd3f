//! Per-sample result types.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::locator::SampleRecord;

/// Verdict for one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ExecutionResult {
    Passed,
    Failed(String),
    Skipped(String),
}

impl ExecutionResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, ExecutionResult::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExecutionResult::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ExecutionResult::Skipped(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ExecutionResult::Passed => None,
            ExecutionResult::Failed(reason) | ExecutionResult::Skipped(reason) => Some(reason),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExecutionResult::Passed => "PASSED",
            ExecutionResult::Failed(_) => "FAILED",
            ExecutionResult::Skipped(_) => "SKIPPED",
        }
    }
}

/// How a sample process went wrong, before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Exited with a non-zero status code.
    Exit(i32),
    /// Terminated by a signal (number when the platform reports one).
    Signal(Option<i32>),
    /// Exceeded the configured time limit and was killed.
    Timeout,
    /// Could not be started at all.
    Spawn,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Exit(code) => write!(f, "exit code {code}"),
            FailureKind::Signal(Some(sig)) => write!(f, "terminated by signal {sig}"),
            FailureKind::Signal(None) => write!(f, "terminated by signal"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Spawn => write!(f, "failed to start"),
        }
    }
}

/// Unclassified failure handed to the [`ResourceGuard`](super::ResourceGuard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFailure {
    pub kind: FailureKind,
    /// Text searched for resource-unavailability signatures (captured stderr and stdout).
    pub message: String,
    /// Reason reported if the failure stays a failure.
    pub reason: String,
}

impl RawFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            reason: reason.into(),
        }
    }
}

/// A sample's verdict together with what was observed while running it.
#[derive(Debug, Clone)]
pub struct SampleOutcome {
    pub record: SampleRecord,
    pub result: ExecutionResult,
    pub duration: Duration,
    pub stdout: String,
    pub stderr: String,
}

impl SampleOutcome {
    pub fn new(record: SampleRecord, result: ExecutionResult, duration: Duration) -> Self {
        Self {
            record,
            result,
            duration,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn with_output(mut self, stdout: String, stderr: String) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }
}
