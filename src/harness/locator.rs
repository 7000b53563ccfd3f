//! Sample discovery
//!
//! Walks the sample root recursively and returns one [`SampleRecord`] per file matching the pattern, sorted by
//! relative name so runs are reproducible.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use super::errors::{HarnessError, HarnessResult};
use super::pattern::SamplePattern;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["target", "__pycache__", "node_modules"];

/// One discovered sample.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SampleRecord {
    /// Relative path from the sample root, `/`-separated.
    pub name: String,
    /// Absolute path to the file.
    pub path: PathBuf,
}

impl SampleRecord {
    /// Build a record for `path` under `root`. Relative `path`s are taken relative to `root`.
    pub fn from_path(root: &Path, path: &Path) -> HarnessResult<Self> {
        let root = canonical_root(root)?;
        let joined = if path.is_absolute() { path.to_path_buf() } else { root.join(path) };
        let path = joined
            .canonicalize()
            .map_err(|e| HarnessError::discovery(&joined, e.to_string()))?;
        if !path.is_file() {
            return Err(HarnessError::discovery(&path, "not a file"));
        }
        let name = match path.strip_prefix(&root) {
            Ok(rel) => relative_name(rel),
            Err(_) => path.to_string_lossy().into_owned(),
        };
        Ok(Self { name, path })
    }

    /// File name without directories, for compact output.
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Discover every sample under `root` matching `pattern`.
///
/// ## Errors
///
/// Returns [`HarnessError::Discovery`] if `root` does not exist, is not a directory, or cannot be listed.
/// Unreadable subdirectories are logged and skipped.
#[tracing::instrument(skip_all, fields(root = %root.display(), pattern = pattern.as_str()))]
pub fn discover(root: &Path, pattern: &SamplePattern) -> HarnessResult<Vec<SampleRecord>> {
    let root = canonical_root(root)?;
    let entries = fs::read_dir(&root).map_err(|e| HarnessError::discovery(&root, e.to_string()))?;

    let mut records = Vec::new();
    walk(&root, entries, pattern, &mut records);

    // Several names may resolve to one file (symlinks); the first name in sorted order wins.
    records.sort();
    let mut seen = HashSet::new();
    records.retain(|record| seen.insert(record.path.clone()));
    tracing::debug!(count = records.len(), "discovered samples");
    Ok(records)
}

fn canonical_root(root: &Path) -> HarnessResult<PathBuf> {
    if !root.exists() {
        return Err(HarnessError::discovery(root, "directory does not exist"));
    }
    let root = root
        .canonicalize()
        .map_err(|e| HarnessError::discovery(root, e.to_string()))?;
    if !root.is_dir() {
        return Err(HarnessError::discovery(&root, "not a directory"));
    }
    Ok(root)
}

fn walk(root: &Path, entries: fs::ReadDir, pattern: &SamplePattern, out: &mut Vec<SampleRecord>) {
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        // Hidden entries are skipped, files and directories alike.
        if name.starts_with('.') {
            continue;
        }
        // Symlinked directories are not followed.
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if SKIPPED_DIRS.contains(&name.as_ref()) {
                continue;
            }
            match fs::read_dir(&path) {
                Ok(children) => walk(root, children, pattern, out),
                Err(e) => tracing::warn!("skipping unreadable directory {}: {}", path.display(), e),
            }
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let rel = relative_name(rel);
            if !pattern.matches(&rel) {
                continue;
            }
            let path = if file_type.is_symlink() {
                match path.canonicalize() {
                    Ok(target) => target,
                    Err(e) => {
                        tracing::warn!("skipping unresolvable link {}: {}", path.display(), e);
                        continue;
                    }
                }
            } else {
                path
            };
            out.push(SampleRecord { name: rel, path });
        }
    }
}

fn relative_name(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
