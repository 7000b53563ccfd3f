//! End-to-end harness runs over scratch sample trees.
//!
//! Samples are small `sh` scripts standing in for the GPU demos: one exits cleanly, one raises a genuine error, one
//! dies because no accelerator is present.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::Command;

use sample_harness::harness::{ConsoleSink, JsonSink};
use sample_harness::{ExecutionResult, Harness, HarnessConfig, NullSink, discover};
use tempfile::{TempDir, tempdir};

fn write(root: &Path, name: &str, body: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

/// The three-sample tree: clean, `boom`, and no CUDA device.
fn scenario() -> TempDir {
    let dir = tempdir().unwrap();
    write(dir.path(), "clean.sh", "echo 'marginal computed'\n");
    write(
        dir.path(),
        "state/boom.sh",
        "echo 'Traceback (most recent call last):' >&2\necho 'RuntimeError: boom' >&2\nexit 1\n",
    );
    write(
        dir.path(),
        "state/mps_marginal_example.sh",
        "echo 'cuTensorNet-vers: 20500'\necho 'RuntimeError: no CUDA-capable device is detected' >&2\nexit 1\n",
    );
    dir
}

fn sh_config() -> HarnessConfig {
    HarnessConfig::default().with_pattern("**/*.sh")
}

#[test]
fn test_scenario_discovers_three_samples() {
    let dir = scenario();
    let records = discover(dir.path(), &sh_config().sample_pattern().unwrap()).unwrap();
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["clean.sh", "state/boom.sh", "state/mps_marginal_example.sh"]);
}

#[test]
fn test_scenario_summary_is_one_of_each() {
    let dir = scenario();
    let harness = Harness::new(sh_config());
    let summary = harness.run(dir.path(), &mut NullSink).unwrap();

    assert_eq!((summary.passed, summary.failed, summary.skipped), (1, 1, 1));
    assert!(summary.has_failures());

    let failure = summary.failures().next().unwrap();
    assert_eq!(failure.name, "state/boom.sh");
    assert!(matches!(&failure.result, ExecutionResult::Failed(reason) if reason.contains("RuntimeError: boom")));

    let skip = summary.skips().next().unwrap();
    assert_eq!(skip.name, "state/mps_marginal_example.sh");
    assert_eq!(
        skip.result,
        ExecutionResult::Skipped("device unavailable: no CUDA-capable device is detected".into())
    );
}

#[test]
fn test_scenario_parallel_matches_sequential() {
    let dir = scenario();
    let sequential = Harness::new(sh_config()).run(dir.path(), &mut NullSink).unwrap();
    let parallel = Harness::new(sh_config().with_jobs(3))
        .run(dir.path(), &mut NullSink)
        .unwrap();
    assert_eq!(
        (sequential.passed, sequential.failed, sequential.skipped),
        (parallel.passed, parallel.failed, parallel.skipped)
    );
}

#[test]
fn test_scenario_console_report() {
    let dir = scenario();
    let mut sink = ConsoleSink::new(Vec::new(), false, false);
    Harness::new(sh_config()).run(dir.path(), &mut sink).unwrap();
    let text = String::from_utf8(sink.into_inner()).unwrap();

    assert!(text.contains("collected 3 sample(s)"));
    assert!(text.contains("clean.sh PASSED"));
    assert!(text.contains("state/boom.sh FAILED"));
    assert!(text.contains("Got error (state/boom.sh):"));
    assert!(text.contains("1 passed, 1 failed, 1 skipped in "));
}

#[test]
fn test_scenario_json_report() {
    let dir = scenario();
    let mut sink = JsonSink::new(Vec::new());
    Harness::new(sh_config()).run(dir.path(), &mut sink).unwrap();
    let text = String::from_utf8(sink.into_inner()).unwrap();

    let events: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(events.len(), 4);
    let summary = events.last().unwrap();
    assert_eq!(summary["event"], "summary");
    assert_eq!(summary["passed"], 1);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["skipped"], 1);
    assert_eq!(summary["success"], false);
}

#[test]
fn test_disabling_default_signatures_turns_skip_into_failure() {
    let dir = scenario();
    let harness = Harness::new(sh_config().without_default_signatures());
    let summary = harness.run(dir.path(), &mut NullSink).unwrap();
    assert_eq!((summary.passed, summary.failed, summary.skipped), (1, 2, 0));
}

#[test]
fn test_empty_tree_is_not_an_error() {
    let dir = tempdir().unwrap();
    let summary = Harness::new(sh_config()).run(dir.path(), &mut NullSink).unwrap();
    assert_eq!(summary.total(), 0);
    assert!(!summary.has_failures());
}

// ============================================================================
// Binary
// ============================================================================

fn harness_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sample-harness"))
}

#[test]
fn test_binary_exits_with_failure_when_a_sample_fails() {
    let dir = scenario();
    let output = harness_bin()
        .args(["run", "-p", "**/*.sh"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 passed, 1 failed, 1 skipped"));
}

#[test]
fn test_binary_succeeds_when_only_skips_remain() {
    let dir = scenario();
    fs::remove_file(dir.path().join("state/boom.sh")).unwrap();
    let output = harness_bin()
        .args(["run", "-p", "**/*.sh"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_binary_missing_root_is_usage_error() {
    let dir = tempdir().unwrap();
    let output = harness_bin()
        .arg("run")
        .arg(dir.path().join("does-not-exist"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot discover samples"));
}

#[test]
fn test_binary_list() {
    let dir = scenario();
    let output = harness_bin()
        .args(["list", "-p", "**/*.sh", "-k", "state"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec!["state/boom.sh", "state/mps_marginal_example.sh"]
    );
}
