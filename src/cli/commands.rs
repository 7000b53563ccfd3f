//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::time::Duration;

use crate::harness::{ConsoleSink, Harness, HarnessConfig, JsonSink, ReportSink};

use super::{CliError, CliResult, ExitCode, ReportFormat, SelectArgs};

/// Flags of the `run` subcommand beyond sample selection.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub jobs: usize,
    pub timeout: Option<f64>,
    pub stop_on_fail: bool,
    pub verbose: bool,
    pub interpreter: Option<String>,
    pub skip_on: Vec<String>,
    pub no_default_signatures: bool,
    pub format: ReportFormat,
}

/// Translate CLI flags into a harness configuration.
pub fn build_config(select: &SelectArgs, options: &RunOptions) -> CliResult<HarnessConfig> {
    let mut config = HarnessConfig::new()
        .with_pattern(select.pattern.as_str())
        .with_jobs(options.jobs)
        .with_stop_on_fail(options.stop_on_fail);

    if let Some(keyword) = &select.filter {
        config = config.with_filter(keyword.as_str());
    }
    if let Some(secs) = options.timeout {
        let limit = Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or_else(|| {
                CliError::new(
                    format!("Invalid --timeout '{secs}': expected a positive number of seconds"),
                    ExitCode::USAGE,
                )
            })?;
        config = config.with_timeout(limit);
    }
    if let Some(interpreter) = &options.interpreter {
        config = config.with_interpreter(interpreter.as_str());
    }
    if options.no_default_signatures {
        config = config.without_default_signatures();
    }
    for needle in &options.skip_on {
        config = config.with_skip_signature(needle.as_str());
    }

    Ok(config)
}

/// `run`: discover, execute and report. Exits non-zero iff a sample failed.
pub fn run_samples(select: &SelectArgs, options: &RunOptions) -> CliResult<ExitCode> {
    let config = build_config(select, options)?;
    let harness = Harness::new(config);

    let mut sink: Box<dyn ReportSink> = match options.format {
        ReportFormat::Console => Box::new(ConsoleSink::stdout(options.verbose)),
        ReportFormat::Json => Box::new(JsonSink::stdout()),
    };

    let summary = harness.run(&select.root, sink.as_mut())?;
    tracing::debug!(
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        "run complete"
    );

    if summary.has_failures() {
        // Summary already printed; exit quietly with failure
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// `list`: print selected sample names, one per line.
pub fn list_samples(select: &SelectArgs) -> CliResult<ExitCode> {
    let mut config = HarnessConfig::new().with_pattern(select.pattern.as_str());
    if let Some(keyword) = &select.filter {
        config = config.with_filter(keyword.as_str());
    }

    let records = Harness::new(config).collect(&select.root)?;
    if records.is_empty() {
        eprintln!("No samples collected");
    }
    for record in records {
        println!("{}", record.name);
    }
    Ok(ExitCode::SUCCESS)
}
