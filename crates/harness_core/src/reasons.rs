//! Canonical reason strings shared by the runner and the reporters.

/// Reason recorded when a sample exceeds its time limit.
pub const TIMEOUT_REASON: &str = "timeout";

/// Number of trailing stderr lines kept in a failure reason.
pub const REASON_TAIL_LINES: usize = 20;

/// Format the reason attached to a failed sample.
///
/// The header names the sample so a reason is still meaningful once separated from its record.
pub fn failure_reason(sample_name: &str, detail: &str) -> String {
    let detail = tail_lines(detail.trim_end(), REASON_TAIL_LINES);
    if detail.is_empty() {
        format!("Got error ({sample_name})")
    } else {
        format!("Got error ({sample_name}):\n{detail}")
    }
}

/// Keep at most the last `n` lines of `text`.
pub fn tail_lines(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    let mut seen = 0;
    for (idx, byte) in text.bytes().enumerate().rev() {
        if byte == b'\n' {
            seen += 1;
            if seen == n {
                return &text[idx + 1..];
            }
        }
    }
    text
}
