//! Harness configuration

use std::time::Duration;

use harness_core::Signature;
use harness_core::signatures::default_signatures;

use super::errors::HarnessResult;
use super::pattern::SamplePattern;

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Glob selecting sample files under the root
    pub pattern: String,
    /// Only run samples whose relative name contains this keyword
    pub filter: Option<String>,
    /// Per-sample time limit (`None` waits forever)
    pub timeout: Option<Duration>,
    /// Maximum number of samples running at once
    pub jobs: usize,
    /// Cancel outstanding samples after the first failure
    pub stop_on_fail: bool,
    /// Program used to run every sample, overriding the extension lookup
    pub interpreter: Option<String>,
    /// Resource-unavailability signatures that turn failures into skips
    pub signatures: Vec<Signature>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            pattern: "**/*.py".to_string(),
            filter: None,
            timeout: None,
            jobs: 1,
            stop_on_fail: false,
            interpreter: None,
            signatures: default_signatures(),
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_filter(mut self, keyword: impl Into<String>) -> Self {
        self.filter = Some(keyword.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the parallelism; `0` is treated as `1`.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_stop_on_fail(mut self, stop: bool) -> Self {
        self.stop_on_fail = stop;
        self
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = Some(interpreter.into());
        self
    }

    /// Add a user signature on top of the current table.
    pub fn with_skip_signature(mut self, needle: impl Into<String>) -> Self {
        self.signatures.push(Signature::custom(needle));
        self
    }

    /// Drop the built-in signatures (user signatures added afterwards are kept).
    pub fn without_default_signatures(mut self) -> Self {
        self.signatures.clear();
        self
    }

    /// Parse the configured glob.
    pub fn sample_pattern(&self) -> HarnessResult<SamplePattern> {
        SamplePattern::new(&self.pattern)
    }
}
