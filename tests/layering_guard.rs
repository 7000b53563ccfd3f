//! Layering guardrails to keep the shared vocabulary crate dependency-free.
//!
//! `harness_core` is meant to be pulled into test suites that wrap the harness without dragging in the async
//! runtime or the CLI stack. This test scans its `Cargo.toml` and fails if anything appears in `[dependencies]`.

#[test]
fn harness_core_has_no_dependencies() {
    let manifest = include_str!("../crates/harness_core/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        panic!("`harness_core` must stay dependency-free, found: {line}");
    }
}

#[test]
fn root_crate_depends_on_harness_core() {
    let manifest = include_str!("../Cargo.toml");
    assert!(
        manifest.lines().any(|l| l.trim_start().starts_with("harness_core")),
        "the harness must take its vocabulary from `harness_core`"
    );
}
