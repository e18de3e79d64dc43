//! # Search Walk
//!
//! Depth-first traversal behind `search_files`. Entries match when their
//! base name matches the include pattern and none of the exclude
//! patterns, under shell-glob semantics (`*`, `?`, bracket classes).
//! Excluded directories are still descended into: exclusion affects
//! reporting, not traversal.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::error::ToolError;
use crate::infrastructure::tools::sandbox::Sandbox;

#[derive(Debug)]
struct WalkEntry {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

/// Lazy iterator over matched absolute paths: depth-first, parents before
/// children, siblings sorted by name so a fixed tree always yields the
/// same sequence.
///
/// Every directory is re-checked against the sandbox before descent, so a
/// symlinked subtree pointing outside the allowed roots is skipped (with
/// a warning) rather than followed. Unreadable subtrees are skipped the
/// same way; neither is fatal to the walk.
#[derive(Debug)]
pub struct SearchWalk {
    sandbox: Arc<Sandbox>,
    include: GlobSet,
    exclude: GlobSet,
    frames: Vec<std::vec::IntoIter<WalkEntry>>,
    // Canonical paths of directories already entered; breaks symlink cycles.
    visited: HashSet<PathBuf>,
}

impl SearchWalk {
    pub fn new(
        sandbox: Arc<Sandbox>,
        root: PathBuf,
        pattern: &str,
        exclude_patterns: &[String],
    ) -> Result<Self, ToolError> {
        let include = build_glob_set(std::slice::from_ref(&pattern.to_string()))?;
        let exclude = build_glob_set(exclude_patterns)?;

        let mut walk = Self {
            sandbox,
            include,
            exclude,
            frames: Vec::new(),
            visited: HashSet::new(),
        };
        if let Some(children) = walk.enter(&root) {
            walk.frames.push(children.into_iter());
        }
        Ok(walk)
    }

    /// Admission check for descending into `dir`: must canonicalize, must
    /// stay inside the sandbox, must not have been entered before.
    fn enter(&mut self, dir: &Path) -> Option<Vec<WalkEntry>> {
        let real = match dir.canonicalize() {
            Ok(real) => real,
            Err(err) => {
                tracing::warn!("skipping {}: {err}", dir.display());
                return None;
            }
        };
        if !self.sandbox.contains(&real) {
            tracing::warn!(
                "skipping {}: resolves outside the allowed directories",
                dir.display()
            );
            return None;
        }
        if !self.visited.insert(real) {
            return None;
        }
        read_children(dir)
    }
}

impl Iterator for SearchWalk {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let frame = self.frames.last_mut()?;
            let Some(entry) = frame.next() else {
                self.frames.pop();
                continue;
            };

            if entry.is_dir {
                if let Some(children) = self.enter(&entry.path) {
                    self.frames.push(children.into_iter());
                }
            }

            if self.include.is_match(entry.name.as_str())
                && !self.exclude.is_match(entry.name.as_str())
            {
                return Some(entry.path);
            }
        }
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ToolError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .build()
            .map_err(|err| ToolError::InvalidArgument(format!("invalid pattern '{pattern}': {err}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|err| ToolError::InvalidArgument(format!("invalid pattern set: {err}")))
}

fn read_children(dir: &Path) -> Option<Vec<WalkEntry>> {
    let reader = match std::fs::read_dir(dir) {
        Ok(reader) => reader,
        Err(err) => {
            tracing::warn!("skipping unreadable directory {}: {err}", dir.display());
            return None;
        }
    };

    let mut children: Vec<WalkEntry> = reader
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            // Follows symlinks so a linked directory is still treated as
            // one; `enter` decides whether descent is safe.
            let is_dir = std::fs::metadata(&path)
                .map(|meta| meta.is_dir())
                .unwrap_or(false);
            WalkEntry { path, name, is_dir }
        })
        .collect();
    children.sort_by(|a, b| a.name.cmp(&b.name));
    Some(children)
}
