//! Harness error types
//!
//! Only harness-level problems are errors. A sample that crashes, times out or cannot find its GPU is an
//! [`ExecutionResult`](super::ExecutionResult), never a `HarnessError`, so it cannot abort a run.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that abort a harness run.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("cannot discover samples under '{}': {reason}", root.display())]
    #[diagnostic(
        code(sample_harness::discovery),
        help("pass the directory holding the example scripts as ROOT")
    )]
    Discovery { root: PathBuf, reason: String },

    #[error("invalid sample pattern '{0}'")]
    #[diagnostic(
        code(sample_harness::pattern),
        help("use `*`, `?` and `**` segments, e.g. `**/*.py`")
    )]
    Pattern(String),

    #[error("failed to start the async runtime: {0}")]
    #[diagnostic(code(sample_harness::runtime))]
    Runtime(#[source] std::io::Error),

    #[error("`{entry}` blocks and cannot be called from inside a tokio runtime")]
    #[diagnostic(
        code(sample_harness::nested_runtime),
        help("from async code, await `{alternative}` instead")
    )]
    NestedRuntime {
        entry: &'static str,
        alternative: &'static str,
    },
}

impl HarnessError {
    /// Fail with [`HarnessError::NestedRuntime`] when called on a tokio worker, where `block_on` would panic.
    pub(crate) fn ensure_blocking_allowed(entry: &'static str, alternative: &'static str) -> HarnessResult<()> {
        match tokio::runtime::Handle::try_current() {
            Ok(_) => Err(HarnessError::NestedRuntime { entry, alternative }),
            Err(_) => Ok(()),
        }
    }

    pub(crate) fn discovery(root: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        HarnessError::Discovery {
            root: root.into(),
            reason: reason.into(),
        }
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;

/// Outcome of [`run_sample`](super::run_sample) when the sample did not pass.
///
/// Callers wiring this into a test framework should treat `ResourceUnavailable` as a skip.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("{0}")]
    Failed(String),

    #[error("skipped: {0}")]
    ResourceUnavailable(String),

    #[error(transparent)]
    Harness(#[from] HarnessError),
}

impl SampleError {
    pub fn is_skip(&self) -> bool {
        matches!(self, SampleError::ResourceUnavailable(_))
    }
}
