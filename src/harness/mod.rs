//! Sample harness
//!
//! Every discovered sample flows through one linear pipeline:
//!
//! ```text
//! discover -> filter -> run (child process) -> classify (ResourceGuard) -> record (Reporter) -> render (ReportSink)
//! ```
//!
//! ## Modules
//!
//! - `locator` / `pattern` - recursive discovery and glob matching
//! - `runner` - isolated execution with optional timeout
//! - `guard` - resource-unavailability reclassification
//! - `reporter` - thread-safe result accumulation
//! - `sink` - console and JSON rendering
//!
//! ## Concurrency
//!
//! Samples run on a tokio runtime, at most `jobs` at a time. Workers record into a shared [`Reporter`]; the
//! orchestrating task alone talks to the [`ReportSink`], so sinks need not be thread-safe.

pub mod config;
pub mod errors;
pub mod guard;
pub mod locator;
pub mod outcome;
pub mod pattern;
pub mod reporter;
pub mod runner;
pub mod sink;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinSet};

pub use config::HarnessConfig;
pub use errors::{HarnessError, HarnessResult, SampleError};
pub use guard::ResourceGuard;
pub use locator::{SampleRecord, discover};
pub use outcome::{ExecutionResult, FailureKind, RawFailure, SampleOutcome};
pub use pattern::SamplePattern;
pub use reporter::{Reporter, Summary, SummaryEntry};
pub use runner::SampleRunner;
pub use sink::{ConsoleSink, JsonSink, NullSink, ReportSink};

/// Discovery, execution and reporting for one sample tree.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Discover samples under `root` and apply the keyword filter.
    pub fn collect(&self, root: &Path) -> HarnessResult<Vec<SampleRecord>> {
        let pattern = self.config.sample_pattern()?;
        let mut records = discover(root, &pattern)?;
        if let Some(keyword) = self.config.filter.as_deref() {
            records.retain(|r| r.name.contains(keyword));
        }
        Ok(records)
    }

    /// Run every sample under `root`, blocking until done.
    ///
    /// From async code use [`Harness::collect`] followed by [`Harness::run_records`].
    ///
    /// ## Errors
    ///
    /// Only discovery and runtime start-up fail the call; sample failures are reported in the [`Summary`].
    /// Calling this on a tokio runtime returns [`HarnessError::NestedRuntime`].
    pub fn run(&self, root: &Path, sink: &mut dyn ReportSink) -> HarnessResult<Summary> {
        HarnessError::ensure_blocking_allowed("Harness::run", "Harness::run_records")?;
        let records = self.collect(root)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.jobs.clamp(1, 64))
            .enable_all()
            .build()
            .map_err(HarnessError::Runtime)?;
        Ok(runtime.block_on(self.run_records(root, records, sink)))
    }

    /// Run already-collected samples on the current tokio runtime.
    #[tracing::instrument(skip_all, fields(samples = records.len(), jobs = self.config.jobs))]
    pub async fn run_records(
        &self,
        root: &Path,
        records: Vec<SampleRecord>,
        sink: &mut dyn ReportSink,
    ) -> Summary {
        sink.on_collection_complete(records.len());

        let runner = Arc::new(SampleRunner::new(root, &self.config));
        let reporter = Arc::new(Reporter::new());
        let jobs = self.config.jobs.max(1);

        let mut pending = records.into_iter();
        let mut running = JoinSet::new();
        let mut in_flight = HashMap::new();

        loop {
            while running.len() < jobs {
                let Some(record) = pending.next() else {
                    break;
                };
                sink.on_sample_start(&record);
                let runner = Arc::clone(&runner);
                let reporter = Arc::clone(&reporter);
                let task_record = record.clone();
                let handle = running.spawn(async move {
                    let outcome = runner.run(&task_record).await;
                    reporter.record(&outcome);
                    outcome
                });
                in_flight.insert(handle.id(), record);
            }

            let Some(joined) = running.join_next_with_id().await else {
                break;
            };
            let outcome = match joined {
                Ok((id, outcome)) => {
                    in_flight.remove(&id);
                    outcome
                }
                Err(e) => {
                    let Some(record) = in_flight.remove(&e.id()) else {
                        continue;
                    };
                    tracing::error!(sample = %record.name, "sample task did not complete: {e}");
                    let outcome = incomplete_outcome(record, &e);
                    reporter.record(&outcome);
                    outcome
                }
            };
            sink.on_sample_complete(&outcome);

            if self.config.stop_on_fail && outcome.result.is_failed() {
                tracing::info!(sample = %outcome.record.name, "stopping after first failure");
                running.abort_all();
                // Drain so every cancelled child is dropped (and killed) before returning.
                while let Some(joined) = running.join_next().await {
                    if let Ok(outcome) = joined {
                        sink.on_sample_complete(&outcome);
                    }
                }
                break;
            }
        }

        let summary = reporter.finalize();
        sink.on_run_complete(&summary);
        summary
    }
}

/// A sample whose task panicked still counts, as a failure.
fn incomplete_outcome(record: SampleRecord, err: &JoinError) -> SampleOutcome {
    let reason = format!("sample task did not complete: {err}");
    SampleOutcome::new(record, ExecutionResult::Failed(reason), Duration::ZERO)
}

/// Run a single sample with the default configuration.
///
/// Intended for use inside a `#[test]`: `Ok(())` means the sample passed, [`SampleError::ResourceUnavailable`]
/// means the machine cannot host it (treat as skipped), [`SampleError::Failed`] is a genuine failure.
/// Relative `sample` paths are resolved against `root`.
///
/// This blocks on a private runtime. Inside `#[tokio::test]` or any other async context, await
/// [`run_sample_async`] instead; calling this there returns [`HarnessError::NestedRuntime`].
pub fn run_sample(root: impl AsRef<Path>, sample: impl AsRef<Path>) -> Result<(), SampleError> {
    run_sample_with(root, sample, &HarnessConfig::default())
}

/// [`run_sample`] with an explicit configuration.
pub fn run_sample_with(
    root: impl AsRef<Path>,
    sample: impl AsRef<Path>,
    config: &HarnessConfig,
) -> Result<(), SampleError> {
    HarnessError::ensure_blocking_allowed("run_sample", "run_sample_async")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(HarnessError::Runtime)?;
    runtime.block_on(run_sample_async(root, sample, config))
}

/// Async form of [`run_sample_with`], for callers already on a tokio runtime.
pub async fn run_sample_async(
    root: impl AsRef<Path>,
    sample: impl AsRef<Path>,
    config: &HarnessConfig,
) -> Result<(), SampleError> {
    let root = root.as_ref();
    let record = SampleRecord::from_path(root, sample.as_ref())?;
    let outcome = SampleRunner::new(root, config).run(&record).await;

    match outcome.result {
        ExecutionResult::Passed => Ok(()),
        ExecutionResult::Failed(reason) => Err(SampleError::Failed(reason)),
        ExecutionResult::Skipped(reason) => Err(SampleError::ResourceUnavailable(reason)),
    }
}
