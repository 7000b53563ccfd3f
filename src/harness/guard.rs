//! Resource guard: turns "this machine cannot host the sample" failures into skips.

use harness_core::Signature;
use harness_core::signatures::default_signatures;

use super::outcome::{ExecutionResult, RawFailure};

/// Classifies raw sample failures against a set of resource-unavailability signatures.
#[derive(Debug, Clone)]
pub struct ResourceGuard {
    signatures: Vec<Signature>,
}

impl ResourceGuard {
    pub fn new(signatures: Vec<Signature>) -> Self {
        Self { signatures }
    }

    /// A guard with the built-in signature table.
    pub fn with_defaults() -> Self {
        Self::new(default_signatures())
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Return the first signature found in `text`, if any.
    pub fn find(&self, text: &str) -> Option<&Signature> {
        self.signatures.iter().find(|sig| sig.matches(text))
    }

    /// `Skipped` when the failure message carries a known signature, otherwise the failure unchanged.
    pub fn classify(&self, raw: &RawFailure) -> ExecutionResult {
        match self.find(&raw.message) {
            Some(sig) => {
                tracing::debug!(kind = %raw.kind, signature = %sig.needle, "failure reclassified as skip");
                ExecutionResult::Skipped(sig.reason())
            }
            None => ExecutionResult::Failed(raw.reason.clone()),
        }
    }
}

impl Default for ResourceGuard {
    fn default() -> Self {
        Self::with_defaults()
    }
}
