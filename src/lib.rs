#![forbid(unsafe_code)]
//! Sample harness
//!
//! Discovers example scripts under a samples directory, runs each one as an isolated child process, and reports a
//! pass/fail/skip summary. Failures caused by the machine rather than the sample (no GPU, driver too old, missing
//! native library, device out of memory) are recognised by their diagnostic text and reported as skips, so a CI
//! run on accelerator-less hardware stays green while genuine regressions still fail.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sample_harness::{Harness, HarnessConfig, NullSink};
//!
//! let harness = Harness::new(HarnessConfig::new().with_jobs(4));
//! let summary = harness.run(Path::new("samples"), &mut NullSink)?;
//! assert!(!summary.has_failures());
//! # Ok::<(), sample_harness::HarnessError>(())
//! ```

pub mod cli;
pub mod harness;
pub mod version;

pub use harness::{
    ExecutionResult, Harness, HarnessConfig, HarnessError, NullSink, ReportSink, Reporter, ResourceGuard,
    SampleError, SampleOutcome, SamplePattern, SampleRecord, SampleRunner, Summary, discover, run_sample,
    run_sample_async, run_sample_with,
};
