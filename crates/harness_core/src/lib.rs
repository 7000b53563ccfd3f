//! Provide the shared, pure vocabulary of the sample harness.
//!
//! This crate is intentionally small and dependency-free. It holds the data both the harness and anything that
//! wraps it (test suites, CI scripts built on the library) need to agree on:
//! - the categories of "environment unavailable" failures,
//! - the default table of failure signatures that map to those categories, and
//! - canonical reason strings used in reports.
//!
//! ## Notes
//!
//! - **No IO** and no global state. Matching here is plain string work.

pub mod reasons;
pub mod signatures;

pub use signatures::{DEFAULT_SIGNATURES, ResourceKind, Signature};
