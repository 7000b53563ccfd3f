//! Result accumulation
//!
//! [`Reporter`] is the single piece of state shared by concurrent sample tasks. `record` takes an internal lock, so
//! results may arrive from any worker in any order; the summary counts are order-independent.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::outcome::{ExecutionResult, SampleOutcome};

/// A sample that did not pass, with its reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub name: String,
    pub result: ExecutionResult,
}

/// Final tally of a run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Failed and skipped samples in arrival order.
    pub not_passed: Vec<SummaryEntry>,
    pub duration: Duration,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// True iff at least one sample failed. Skips never count.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &SummaryEntry> {
        self.not_passed.iter().filter(|e| e.result.is_failed())
    }

    pub fn skips(&self) -> impl Iterator<Item = &SummaryEntry> {
        self.not_passed.iter().filter(|e| e.result.is_skipped())
    }
}

#[derive(Debug)]
struct State {
    summary: Summary,
    finalized: bool,
}

/// Thread-safe accumulator of sample outcomes.
#[derive(Debug)]
pub struct Reporter {
    started: Instant,
    state: Mutex<State>,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            state: Mutex::new(State {
                summary: Summary::default(),
                finalized: false,
            }),
        }
    }

    /// Add one outcome. Outcomes recorded after [`finalize`](Self::finalize) are ignored.
    pub fn record(&self, outcome: &SampleOutcome) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.finalized {
            tracing::warn!(sample = %outcome.record.name, "result arrived after the run was finalized; ignored");
            return;
        }

        let summary = &mut state.summary;
        match &outcome.result {
            ExecutionResult::Passed => {
                summary.passed += 1;
                return;
            }
            ExecutionResult::Failed(_) => summary.failed += 1,
            ExecutionResult::Skipped(_) => summary.skipped += 1,
        }
        summary.not_passed.push(SummaryEntry {
            name: outcome.record.name.clone(),
            result: outcome.result.clone(),
        });
    }

    /// Freeze and return the summary. Later calls return the same summary.
    pub fn finalize(&self) -> Summary {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.finalized {
            state.summary.duration = self.started.elapsed();
            state.finalized = true;
        }
        state.summary.clone()
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::locator::SampleRecord;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn outcome(name: &str, result: ExecutionResult) -> SampleOutcome {
        let record = SampleRecord {
            name: name.to_string(),
            path: PathBuf::from("/samples").join(name),
        };
        SampleOutcome::new(record, result, Duration::from_millis(5))
    }

    #[test]
    fn test_counts_and_entries() {
        let reporter = Reporter::new();
        reporter.record(&outcome("a.py", ExecutionResult::Passed));
        reporter.record(&outcome("b.py", ExecutionResult::Failed("boom".into())));
        reporter.record(&outcome("c.py", ExecutionResult::Skipped("no gpu".into())));

        let summary = reporter.finalize();
        assert_eq!((summary.passed, summary.failed, summary.skipped), (1, 1, 1));
        assert_eq!(summary.total(), 3);
        assert!(summary.has_failures());
        assert_eq!(summary.failures().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["b.py"]);
        assert_eq!(summary.skips().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["c.py"]);
    }

    #[test]
    fn test_failed_count_increments_by_one() {
        let reporter = Reporter::new();
        reporter.record(&outcome("a.py", ExecutionResult::Passed));
        reporter.record(&outcome("b.py", ExecutionResult::Skipped("no gpu".into())));
        reporter.record(&outcome("c.py", ExecutionResult::Failed("RuntimeError: boom".into())));
        let summary = reporter.finalize();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures().next().map(|e| e.name.as_str()), Some("c.py"));
    }

    #[test]
    fn test_skips_do_not_fail_run() {
        let reporter = Reporter::new();
        reporter.record(&outcome("a.py", ExecutionResult::Skipped("no gpu".into())));
        assert!(!reporter.finalize().has_failures());
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let reporter = Reporter::new();
        reporter.record(&outcome("a.py", ExecutionResult::Failed("boom".into())));
        let first = reporter.finalize();
        std::thread::sleep(Duration::from_millis(2));
        reporter.record(&outcome("late.py", ExecutionResult::Failed("late".into())));
        let second = reporter.finalize();
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_records() {
        let reporter = Arc::new(Reporter::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let reporter = Arc::clone(&reporter);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        let result = if (i + j) % 2 == 0 {
                            ExecutionResult::Passed
                        } else {
                            ExecutionResult::Skipped("no gpu".into())
                        };
                        reporter.record(&outcome(&format!("{i}_{j}.py"), result));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let summary = reporter.finalize();
        assert_eq!(summary.total(), 200);
        assert_eq!(summary.passed, 100);
        assert_eq!(summary.skipped, 100);
        assert_eq!(summary.not_passed.len(), 100);
    }
}
