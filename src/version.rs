//! Harness version information.
//!
//! This module exposes the version as a single constant so the CLI and machine-readable reports agree on the
//! same value.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.

/// The harness version string (for example, `0.1.0-alpha.1`).
pub const HARNESS_VERSION: &str = env!("CARGO_PKG_VERSION");
