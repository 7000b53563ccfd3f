//! Sample glob patterns
//!
//! Patterns are matched against a sample's `/`-separated path relative to the sample root:
//!
//! - `*` matches any run of characters inside one segment
//! - `?` matches exactly one character inside one segment
//! - `**` as a whole segment matches zero or more segments
//!
//! A pattern without any `/` is matched against the file name alone, at any depth (`*.py` behaves like `**/*.py`).

use super::errors::{HarnessError, HarnessResult};

/// Glob used to select sample files (default `**/*.py`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePattern {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    AnyDepth,
    Glob(Vec<char>),
}

impl SamplePattern {
    pub fn new(pattern: &str) -> HarnessResult<Self> {
        let trimmed = pattern.trim().trim_start_matches("./");
        if trimmed.is_empty() || trimmed.starts_with('/') {
            return Err(HarnessError::Pattern(pattern.to_string()));
        }

        let mut segments = Vec::new();
        if !trimmed.contains('/') {
            segments.push(Segment::AnyDepth);
        }
        for part in trimmed.split('/') {
            match part {
                "" => return Err(HarnessError::Pattern(pattern.to_string())),
                "**" => {
                    // `**/**` is the same as `**`
                    if segments.last() != Some(&Segment::AnyDepth) {
                        segments.push(Segment::AnyDepth);
                    }
                }
                glob => segments.push(Segment::Glob(glob.chars().collect())),
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether a relative sample name (e.g. `state/mps_marginal_example.py`) matches.
    pub fn matches(&self, relative: &str) -> bool {
        let parts: Vec<&str> = relative.split('/').filter(|p| !p.is_empty()).collect();
        match_segments(&self.segments, &parts)
    }
}

impl Default for SamplePattern {
    fn default() -> Self {
        Self {
            source: "**/*.py".to_string(),
            segments: vec![Segment::AnyDepth, Segment::Glob("*.py".chars().collect())],
        }
    }
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            match_segments(rest, path) || (!path.is_empty() && match_segments(pattern, &path[1..]))
        }
        Some((Segment::Glob(glob), rest)) => match path.split_first() {
            Some((head, tail)) => {
                let name: Vec<char> = head.chars().collect();
                match_glob(glob, &name) && match_segments(rest, tail)
            }
            None => false,
        },
    }
}

/// Iterative wildcard match with single-star backtracking.
fn match_glob(glob: &[char], name: &[char]) -> bool {
    let (mut g, mut n) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while n < name.len() {
        if g < glob.len() && (glob[g] == '?' || glob[g] == name[n]) {
            g += 1;
            n += 1;
        } else if g < glob.len() && glob[g] == '*' {
            star = Some((g, n));
            g += 1;
        } else if let Some((star_g, star_n)) = star {
            g = star_g + 1;
            n = star_n + 1;
            star = Some((star_g, star_n + 1));
        } else {
            return false;
        }
    }

    glob[g..].iter().all(|c| *c == '*')
}
