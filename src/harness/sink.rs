//! Report sinks
//!
//! The harness uses a `ReportSink` trait to separate rendering from execution. Two sinks ship:
//!
//! - [`ConsoleSink`]: pytest-style session output for humans
//! - [`JsonSink`]: one JSON object per line for CI tooling
//!
//! Write errors are ignored: a closed stdout must not turn a green run red.

use std::io::{self, Write};

use serde_json::json;

use super::locator::SampleRecord;
use super::outcome::{ExecutionResult, SampleOutcome};
use super::reporter::Summary;

/// Receives progress events from the harness.
pub trait ReportSink {
    /// Called once discovery and filtering are done.
    fn on_collection_complete(&mut self, _count: usize) {}

    /// Called when a sample is handed to the runner.
    fn on_sample_start(&mut self, _record: &SampleRecord) {}

    /// Called when a sample finishes (completion order, which differs from start order when running in parallel).
    fn on_sample_complete(&mut self, outcome: &SampleOutcome);

    /// Called once with the finalized summary.
    fn on_run_complete(&mut self, summary: &Summary);
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn on_sample_complete(&mut self, _outcome: &SampleOutcome) {}
    fn on_run_complete(&mut self, _summary: &Summary) {}
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const BOLD_RED: &str = "\x1b[1;31m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

/// Console reporter (pytest-style)
pub struct ConsoleSink<W: Write = io::Stdout> {
    out: W,
    verbose: bool,
    color: bool,
    /// Failed outcomes kept for the FAILURES section, with captured output.
    failures: Vec<SampleOutcome>,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        use std::io::IsTerminal;
        let color = io::stdout().is_terminal();
        Self::new(io::stdout(), verbose, color)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, verbose: bool, color: bool) -> Self {
        Self {
            out,
            verbose,
            color,
            failures: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn status(&self, outcome: &SampleOutcome) -> String {
        let label = outcome.result.label();
        let color = match outcome.result {
            ExecutionResult::Passed => GREEN,
            ExecutionResult::Failed(_) => RED,
            ExecutionResult::Skipped(_) => YELLOW,
        };
        let mut status = self.paint(color, label);
        if let ExecutionResult::Skipped(reason) = &outcome.result {
            status.push_str(&format!(" ({reason})"));
        } else if self.verbose {
            status.push_str(&format!(" ({}ms)", outcome.duration.as_millis()));
        }
        status
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn on_collection_complete(&mut self, count: usize) {
        let banner = self.paint(BOLD, "=================== sample session starts ===================");
        let _ = writeln!(self.out, "{banner}");
        let _ = writeln!(self.out, "collected {count} sample(s)");
        let _ = writeln!(self.out);
    }

    fn on_sample_start(&mut self, record: &SampleRecord) {
        tracing::trace!(sample = %record.name, "sample started");
    }

    fn on_sample_complete(&mut self, outcome: &SampleOutcome) {
        let status = self.status(outcome);
        let _ = writeln!(self.out, "{} {}", outcome.record.name, status);
        if outcome.result.is_failed() {
            self.failures.push(outcome.clone());
        }
    }

    fn on_run_complete(&mut self, summary: &Summary) {
        if !self.failures.is_empty() {
            let _ = writeln!(self.out);
            let header = self.paint(BOLD_RED, "=================== FAILURES ===================");
            let _ = writeln!(self.out, "{header}");
            for outcome in std::mem::take(&mut self.failures) {
                let title = self.paint(BOLD, &format!("___________ {} ___________", outcome.record.name));
                let _ = writeln!(self.out);
                let _ = writeln!(self.out, "{title}");
                if let Some(reason) = outcome.result.reason() {
                    let _ = writeln!(self.out);
                    for line in reason.lines() {
                        let _ = writeln!(self.out, "    {line}");
                    }
                }
                if self.verbose && !outcome.stdout.trim().is_empty() {
                    let _ = writeln!(self.out, "\n    ----- captured stdout -----");
                    for line in outcome.stdout.lines() {
                        let _ = writeln!(self.out, "    {line}");
                    }
                }
                let _ = writeln!(self.out);
                let _ = writeln!(self.out, "    {}", outcome.record.path.display());
            }
        }

        let skips: Vec<_> = summary.skips().collect();
        if !skips.is_empty() {
            let _ = writeln!(self.out);
            let header = self.paint(YELLOW, "=================== SKIPPED ===================");
            let _ = writeln!(self.out, "{header}");
            for entry in skips {
                let _ = writeln!(self.out, "{}: {}", entry.name, entry.result.reason().unwrap_or_default());
            }
        }

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if summary.skipped > 0 {
            parts.push(format!("{} skipped", summary.skipped));
        }
        if parts.is_empty() {
            parts.push("no samples ran".to_string());
        }

        let color = if summary.has_failures() { BOLD_RED } else { BOLD_GREEN };
        let line = format!(
            "=================== {} in {:.2}s ===================",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "{}", self.paint(color, &line));
        let _ = self.out.flush();
    }
}

/// JSON-lines reporter: one object per sample, then one summary object.
pub struct JsonSink<W: Write = io::Stdout> {
    out: W,
}

impl JsonSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, value: serde_json::Value) {
        let _ = writeln!(self.out, "{value}");
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn on_sample_complete(&mut self, outcome: &SampleOutcome) {
        let mut value = json!({
            "event": "sample",
            "name": outcome.record.name,
            "path": outcome.record.path.display().to_string(),
            "duration_ms": outcome.duration.as_millis() as u64,
        });
        if let (Some(obj), Ok(serde_json::Value::Object(result))) =
            (value.as_object_mut(), serde_json::to_value(&outcome.result))
        {
            obj.extend(result);
        }
        self.emit(value);
    }

    fn on_run_complete(&mut self, summary: &Summary) {
        let not_passed: Vec<_> = summary
            .not_passed
            .iter()
            .map(|entry| {
                json!({
                    "name": entry.name,
                    "status": entry.result.label().to_ascii_lowercase(),
                    "reason": entry.result.reason(),
                })
            })
            .collect();
        self.emit(json!({
            "event": "summary",
            "passed": summary.passed,
            "failed": summary.failed,
            "skipped": summary.skipped,
            "duration_secs": summary.duration.as_secs_f64(),
            "not_passed": not_passed,
            "success": !summary.has_failures(),
        }));
        let _ = self.out.flush();
    }
}
