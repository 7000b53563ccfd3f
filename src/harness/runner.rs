//! Sample runner
//!
//! Each sample runs in a fresh child process with the sample root as working directory and the sample path as its
//! first argument. Pass/fail is decided by the exit status alone: output is captured for diagnostics and signature
//! matching, never inspected to decide a pass.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};

use tokio::process::Command;

use harness_core::reasons::{TIMEOUT_REASON, failure_reason};

use super::config::HarnessConfig;
use super::guard::ResourceGuard;
use super::locator::SampleRecord;
use super::outcome::{ExecutionResult, FailureKind, RawFailure, SampleOutcome};

/// Interpreters chosen by file extension when no override is configured.
const INTERPRETERS: &[(&str, &str)] = &[("py", "python3"), ("sh", "sh")];

/// Runs samples as isolated child processes.
#[derive(Debug, Clone)]
pub struct SampleRunner {
    root: PathBuf,
    interpreter: Option<Vec<String>>,
    timeout: Option<Duration>,
    guard: ResourceGuard,
}

impl SampleRunner {
    pub fn new(root: impl Into<PathBuf>, config: &HarnessConfig) -> Self {
        let interpreter = config
            .interpreter
            .as_deref()
            .map(|cmd| cmd.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|argv| !argv.is_empty());
        Self {
            root: root.into(),
            interpreter,
            timeout: config.timeout,
            guard: ResourceGuard::new(config.signatures.clone()),
        }
    }

    pub fn guard(&self) -> &ResourceGuard {
        &self.guard
    }

    /// Program and leading arguments used to launch `record`.
    pub fn launcher(&self, record: &SampleRecord) -> (String, Vec<String>) {
        if let Some((program, args)) = self.interpreter.as_ref().and_then(|argv| argv.split_first()) {
            return (program.clone(), args.to_vec());
        }
        let ext = record.path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match INTERPRETERS.iter().find(|(known, _)| *known == ext) {
            Some((_, program)) => (program.to_string(), Vec::new()),
            None => (record.path.to_string_lossy().into_owned(), Vec::new()),
        }
    }

    fn command(&self, record: &SampleRecord) -> Command {
        let (program, args) = self.launcher(record);
        let mut cmd = Command::new(&program);
        cmd.args(&args);
        if program != record.path.to_string_lossy() {
            cmd.arg(&record.path);
        }
        cmd.current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Run one sample to completion (or timeout) and classify the result.
    #[tracing::instrument(skip_all, fields(sample = %record.name))]
    pub async fn run(&self, record: &SampleRecord) -> SampleOutcome {
        let start = Instant::now();
        let mut cmd = self.command(record);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                let detail = format!("failed to start sample: {e}");
                let raw = RawFailure::new(FailureKind::Spawn, &detail, failure_reason(&record.name, &detail));
                return SampleOutcome::new(record.clone(), self.guard.classify(&raw), start.elapsed());
            }
        };
        tracing::debug!(pid = child.id(), "spawned sample");

        // Dropping the wait future on timeout drops the child, and `kill_on_drop` reaps it.
        let waited = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, waited).await {
                Ok(output) => output,
                Err(_) => {
                    tracing::warn!(limit_ms = limit.as_millis() as u64, "sample timed out");
                    let raw = RawFailure::new(FailureKind::Timeout, TIMEOUT_REASON, TIMEOUT_REASON);
                    return SampleOutcome::new(record.clone(), self.guard.classify(&raw), start.elapsed());
                }
            },
            None => waited.await,
        };

        let duration = start.elapsed();
        match output {
            Ok(output) => self.judge(record, output, duration),
            Err(e) => {
                let detail = format!("failed to collect sample output: {e}");
                let raw = RawFailure::new(FailureKind::Spawn, &detail, failure_reason(&record.name, &detail));
                SampleOutcome::new(record.clone(), self.guard.classify(&raw), duration)
            }
        }
    }

    fn judge(&self, record: &SampleRecord, output: Output, duration: Duration) -> SampleOutcome {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        let result = if output.status.success() {
            ExecutionResult::Passed
        } else {
            let kind = match output.status.code() {
                Some(code) => FailureKind::Exit(code),
                None => FailureKind::Signal(signal_of(&output.status)),
            };
            let captured = if stderr.trim().is_empty() { stdout.trim_end() } else { stderr.trim_end() };
            let detail = match kind {
                _ if captured.trim().is_empty() => kind.to_string(),
                FailureKind::Exit(_) => captured.to_string(),
                _ => format!("{captured}\n{kind}"),
            };
            let raw = RawFailure::new(kind, format!("{stderr}\n{stdout}"), failure_reason(&record.name, &detail));
            self.guard.classify(&raw)
        };

        SampleOutcome::new(record.clone(), result, duration).with_output(stdout, stderr)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(unix)]
fn signal_of(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}
