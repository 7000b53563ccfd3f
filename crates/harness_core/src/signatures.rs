//! Resource-unavailability signatures.
//!
//! A signature is a substring that, when found in a failed sample's diagnostic output, means the machine could not
//! host the sample (no accelerator, missing native library, not enough device memory) rather than that the sample is
//! broken. Matching is ASCII case-insensitive: driver and runtime messages are not consistent about capitalisation.

use std::fmt;

/// Category of a missing precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// No usable accelerator present.
    Device,
    /// Driver missing or too old for the runtime.
    Driver,
    /// Native library or optional package not installed.
    Library,
    /// Accelerator present but out of memory.
    Memory,
    /// User-supplied signature.
    Custom,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Device => "device unavailable",
            ResourceKind::Driver => "driver unavailable",
            ResourceKind::Library => "library unavailable",
            ResourceKind::Memory => "insufficient device memory",
            ResourceKind::Custom => "resource unavailable",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recognisable failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub needle: String,
    pub kind: ResourceKind,
}

impl Signature {
    pub fn new(needle: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            needle: needle.into(),
            kind,
        }
    }

    /// A user-supplied signature.
    pub fn custom(needle: impl Into<String>) -> Self {
        Self::new(needle, ResourceKind::Custom)
    }

    /// Whether `haystack` contains this signature, ignoring ASCII case.
    ///
    /// An empty needle never matches.
    pub fn matches(&self, haystack: &str) -> bool {
        contains_ignore_ascii_case(haystack, &self.needle)
    }

    /// Skip reason reported for a match, e.g. `device unavailable: no CUDA-capable device is detected`.
    pub fn reason(&self) -> String {
        format!("{}: {}", self.kind, self.needle)
    }
}

/// Built-in signatures, as `(needle, kind)` pairs.
pub const DEFAULT_SIGNATURES: &[(&str, ResourceKind)] = &[
    ("no CUDA-capable device is detected", ResourceKind::Device),
    ("no compatible device found", ResourceKind::Device),
    ("cudaErrorNoDevice", ResourceKind::Device),
    ("CUDA_ERROR_NO_DEVICE", ResourceKind::Device),
    ("CUDA driver version is insufficient", ResourceKind::Driver),
    ("cudaErrorInsufficientDriver", ResourceKind::Driver),
    ("cannot open shared object file", ResourceKind::Library),
    ("No module named 'cupy'", ResourceKind::Library),
    ("No module named 'cuquantum'", ResourceKind::Library),
    ("No module named 'torch'", ResourceKind::Library),
    ("out of memory", ResourceKind::Memory),
    ("cudaErrorMemoryAllocation", ResourceKind::Memory),
];

/// The built-in table as owned signatures.
pub fn default_signatures() -> Vec<Signature> {
    DEFAULT_SIGNATURES
        .iter()
        .map(|(needle, kind)| Signature::new(*needle, *kind))
        .collect()
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let (hay, pin) = (haystack.as_bytes(), needle.as_bytes());
    if pin.is_empty() || pin.len() > hay.len() {
        return false;
    }
    hay.windows(pin.len()).any(|w| w.eq_ignore_ascii_case(pin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ignores_case() {
        let sig = Signature::new("no CUDA-capable device is detected", ResourceKind::Device);
        assert!(sig.matches("RuntimeError: No CUDA-capable device is detected"));
        assert!(!sig.matches("RuntimeError: boom"));
    }

    #[test]
    fn test_empty_needle_never_matches() {
        assert!(!Signature::custom("").matches("anything"));
    }

    #[test]
    fn test_reason_includes_kind() {
        let sig = Signature::new("out of memory", ResourceKind::Memory);
        assert_eq!(sig.reason(), "insufficient device memory: out of memory");
    }

    #[test]
    fn test_default_table_is_complete() {
        let sigs = default_signatures();
        assert_eq!(sigs.len(), DEFAULT_SIGNATURES.len());
        assert!(sigs.iter().any(|s| s.matches("CUDA driver version is insufficient for CUDA runtime version")));
        assert!(sigs.iter().all(|s| !s.matches("timeout")));
    }
}
