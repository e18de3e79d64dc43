//! # Path Sandbox
//!
//! Validates caller-supplied paths against the allowed root directories.
//! Every filesystem operation goes through [`Sandbox::resolve`] first; the
//! handlers only ever see [`ResolvedPath`] values, so no raw caller string
//! can reach a syscall.

use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::domain::error::ToolError;

/// The immutable set of allowed roots, canonicalized at startup.
#[derive(Debug)]
pub struct Sandbox {
    roots: Vec<PathBuf>,
}

/// A validated, symlink-resolved absolute path together with the allowed
/// root that contains it and the string the caller originally supplied.
///
/// Only [`Sandbox::resolve`] can construct one. Error messages built from
/// a `ResolvedPath` use [`requested`](Self::requested) so that resolved
/// internals never leak to the caller.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    requested: String,
    real: PathBuf,
    root: PathBuf,
}

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.real
    }

    pub fn requested(&self) -> &str {
        &self.requested
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Sandbox {
    /// Canonicalizes and checks every configured root. A root that does
    /// not exist or is not a directory is a startup error, not a per-call
    /// one.
    pub fn new(dirs: &[PathBuf]) -> Result<Self> {
        anyhow::ensure!(!dirs.is_empty(), "at least one allowed directory is required");

        let mut roots = Vec::with_capacity(dirs.len());
        for dir in dirs {
            let canonical = dir.canonicalize().with_context(|| {
                format!("allowed directory {} cannot be resolved", dir.display())
            })?;
            anyhow::ensure!(
                canonical.is_dir(),
                "allowed directory {} is not a directory",
                canonical.display()
            );
            roots.push(canonical);
        }
        Ok(Self { roots })
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Component-wise containment check, so `/allowedabc` never passes
    /// for the root `/allowed`.
    pub fn contains(&self, path: &Path) -> bool {
        self.containing_root(path).is_some()
    }

    fn containing_root(&self, path: &Path) -> Option<&Path> {
        self.roots
            .iter()
            .map(PathBuf::as_path)
            .find(|root| path.starts_with(root))
    }

    /// Resolves a caller-supplied path to its canonical, symlink-free
    /// absolute form and proves containment within an allowed root.
    ///
    /// Relative inputs are resolved against the process working directory
    /// before validation. For targets that do not exist yet (writes,
    /// directory creation) the longest existing ancestor is canonicalized
    /// and the literal remainder re-appended, with `.`/`..` segments
    /// normalized, before the containment check runs on the composed
    /// result. A symlink whose final target escapes every root is
    /// rejected even when its literal location is inside one.
    pub fn resolve(&self, raw: &str) -> Result<ResolvedPath, ToolError> {
        if raw.trim().is_empty() {
            return Err(ToolError::InvalidArgument(
                "path must not be empty".to_string(),
            ));
        }

        let requested = Path::new(raw);
        let absolute = if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|err| ToolError::Io(err.to_string()))?
                .join(requested)
        };

        let real = canonicalize_with_missing_tail(&absolute, raw)?;

        match self.containing_root(&real) {
            Some(root) => {
                tracing::debug!(
                    requested = raw,
                    root = %root.display(),
                    "path admitted"
                );
                Ok(ResolvedPath {
                    requested: raw.to_string(),
                    real,
                    root: root.to_path_buf(),
                })
            }
            None => {
                tracing::warn!(requested = raw, "path rejected: outside allowed directories");
                Err(ToolError::OutsideSandbox(raw.to_string()))
            }
        }
    }
}

/// Canonicalizes `absolute`, tolerating a missing tail: walk up to the
/// longest existing ancestor, canonicalize it, then re-append the
/// not-yet-existing remainder literally.
///
/// An existing entry that still fails to canonicalize is a dangling
/// symlink; writing through one would create the target outside the
/// checked path, so it is reported as not found rather than resolved.
fn canonicalize_with_missing_tail(absolute: &Path, raw: &str) -> Result<PathBuf, ToolError> {
    let mut current = absolute.to_path_buf();
    let mut tail: Vec<OsString> = Vec::new();

    loop {
        match current.symlink_metadata() {
            Ok(_) => {
                let canonical = current
                    .canonicalize()
                    .map_err(|_| ToolError::NotFound(raw.to_string()))?;
                return Ok(append_normalized(canonical, tail));
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                match (current.parent(), current.file_name()) {
                    (Some(parent), Some(name)) => {
                        tail.push(name.to_os_string());
                        current = parent.to_path_buf();
                    }
                    (Some(parent), None) => {
                        // Trailing `..` or `.` component; keep walking up.
                        tail.push(OsString::from(".."));
                        current = parent.to_path_buf();
                    }
                    _ => {
                        return Err(ToolError::InvalidArgument(format!(
                            "cannot resolve path '{raw}'"
                        )));
                    }
                }
            }
            Err(err) => return Err(ToolError::Io(err.to_string())),
        }
    }
}

fn append_normalized(mut base: PathBuf, tail: Vec<OsString>) -> PathBuf {
    for segment in tail.into_iter().rev() {
        if segment == OsStr::new(".") {
            continue;
        }
        if segment == OsStr::new("..") {
            base.pop();
            continue;
        }
        base.push(segment);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;

    fn sandbox_over(dir: &Path) -> Sandbox {
        Sandbox::new(&[dir.to_path_buf()]).unwrap()
    }

    #[test]
    fn admits_existing_path_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        let sandbox = sandbox_over(dir.path());

        let raw = dir.path().join("a.txt");
        let resolved = sandbox.resolve(raw.to_str().unwrap()).unwrap();
        assert!(resolved.as_path().ends_with("a.txt"));
        assert_eq!(resolved.root(), sandbox.roots()[0].as_path());
    }

    #[test]
    fn admits_missing_file_under_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = sandbox_over(dir.path());

        let raw = dir.path().join("not-yet.txt");
        let resolved = sandbox.resolve(raw.to_str().unwrap()).unwrap();
        assert!(resolved.as_path().ends_with("not-yet.txt"));
        assert!(sandbox.contains(resolved.as_path()));
    }

    #[test]
    fn rejects_path_outside_every_root() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("allowed");
        std::fs::create_dir(&root).unwrap();
        let sandbox = sandbox_over(&root);

        let outside = parent.path().join("elsewhere.txt");
        let err = sandbox.resolve(outside.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutsideSandbox);
    }

    #[test]
    fn rejects_sibling_with_root_as_string_prefix() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("allowed");
        let sibling = parent.path().join("allowedabc");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(&sibling).unwrap();
        let sandbox = sandbox_over(&root);

        let err = sandbox.resolve(sibling.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutsideSandbox);
    }

    #[test]
    fn rejects_dot_dot_escape_through_missing_tail() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("allowed");
        std::fs::create_dir(&root).unwrap();
        let sandbox = sandbox_over(&root);

        let raw = root.join("missing").join("..").join("..").join("flag.txt");
        let err = sandbox.resolve(raw.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutsideSandbox);
    }

    #[test]
    fn rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = sandbox_over(dir.path());
        let err = sandbox.resolve("  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn rejection_message_echoes_caller_input() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("allowed");
        std::fs::create_dir(&root).unwrap();
        let sandbox = sandbox_over(&root);

        let raw = format!("{}/../other", root.display());
        let err = sandbox.resolve(&raw).unwrap_err();
        assert!(err.to_string().contains(&raw));
        assert!(!err.to_string().contains("other\u{0}"));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlink_escaping_the_root() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("allowed");
        let outside = parent.path().join("outside");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(&outside).unwrap();
        std::fs::write(outside.join("secret.txt"), "s").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();
        let sandbox = sandbox_over(&root);

        let raw = root.join("link").join("secret.txt");
        let err = sandbox.resolve(raw.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutsideSandbox);
    }

    #[cfg(unix)]
    #[test]
    fn refuses_to_resolve_through_dangling_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = sandbox_over(dir.path());
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        let raw = dir.path().join("dangling");
        let err = sandbox.resolve(raw.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn startup_fails_on_missing_root() {
        let parent = tempfile::tempdir().unwrap();
        let missing = parent.path().join("nope");
        assert!(Sandbox::new(&[missing]).is_err());
    }

    #[test]
    fn startup_fails_on_empty_root_set() {
        assert!(Sandbox::new(&[]).is_err());
    }
}
