//! # Tool Executor
//!
//! Handles the filesystem operations behind the gateway's tools. Every
//! method takes paths that already passed [`Sandbox::resolve`]; the only
//! exception is `read_multiple_files`, which validates each entry itself
//! so that one bad path becomes an embedded per-slot error instead of
//! failing the whole call.

use std::sync::Arc;

use crate::domain::error::ToolError;
use crate::domain::types::FileInfo;
use crate::infrastructure::tools::sandbox::{ResolvedPath, Sandbox};
use crate::infrastructure::tools::search::SearchWalk;

/// Executes filesystem operations within the sandbox.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    sandbox: Arc<Sandbox>,
}

impl ToolExecutor {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self { sandbox }
    }

    pub async fn read_file(&self, path: &ResolvedPath) -> Result<String, ToolError> {
        let meta = tokio::fs::metadata(path.as_path())
            .await
            .map_err(|err| ToolError::from_io(err, path.requested()))?;
        if meta.is_dir() {
            return Err(ToolError::NotAFile(path.requested().to_string()));
        }
        tokio::fs::read_to_string(path.as_path())
            .await
            .map_err(|err| ToolError::from_io(err, path.requested()))
    }

    /// Reads each path independently and concurrently. Output order
    /// matches input order regardless of completion order; a failing
    /// slot carries its own error text and never aborts the others.
    pub async fn read_multiple_files(&self, paths: &[String]) -> Vec<String> {
        let reads = paths.iter().map(|path| self.read_one_lenient(path));
        futures::future::join_all(reads).await
    }

    async fn read_one_lenient(&self, raw: &str) -> String {
        let attempt = async {
            let resolved = self.sandbox.resolve(raw)?;
            self.read_file(&resolved).await
        };
        match attempt.await {
            Ok(content) => content,
            Err(err) => format!("Error reading file {raw}: {err}"),
        }
    }

    /// Creates or fully overwrites the file. Missing parent directories
    /// are not created; callers get `create_directory` for that.
    pub async fn write_file(&self, path: &ResolvedPath, content: &str) -> Result<String, ToolError> {
        tokio::fs::write(path.as_path(), content)
            .await
            .map_err(|err| ToolError::from_io(err, path.requested()))?;
        Ok(format!("File written to {}", path.requested()))
    }

    /// Creates the directory and any missing ancestors. Idempotent on an
    /// existing directory; a non-directory occupying the path is an error.
    pub async fn create_directory(&self, path: &ResolvedPath) -> Result<String, ToolError> {
        match tokio::fs::metadata(path.as_path()).await {
            Ok(meta) if meta.is_dir() => {
                return Ok(format!("Directory created at {}", path.requested()));
            }
            Ok(_) => return Err(ToolError::NotADirectory(path.requested().to_string())),
            Err(_) => {}
        }
        tokio::fs::create_dir_all(path.as_path())
            .await
            .map_err(|err| ToolError::from_io(err, path.requested()))?;
        Ok(format!("Directory created at {}", path.requested()))
    }

    /// Lists immediate children, each tagged `[FILE]` or `[DIR]`, sorted
    /// by name so identical directory state always renders identically.
    pub async fn list_directory(&self, path: &ResolvedPath) -> Result<String, ToolError> {
        let meta = tokio::fs::metadata(path.as_path())
            .await
            .map_err(|err| ToolError::from_io(err, path.requested()))?;
        if !meta.is_dir() {
            return Err(ToolError::NotADirectory(path.requested().to_string()));
        }

        let mut reader = tokio::fs::read_dir(path.as_path())
            .await
            .map_err(|err| ToolError::from_io(err, path.requested()))?;

        let mut entries: Vec<(String, bool)> = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|err| ToolError::from_io(err, path.requested()))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            // Follows symlinks so a linked directory is tagged [DIR].
            let is_dir = tokio::fs::metadata(entry.path())
                .await
                .map(|meta| meta.is_dir())
                .unwrap_or(false);
            entries.push((name, is_dir));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let listing: Vec<String> = entries
            .into_iter()
            .map(|(name, is_dir)| {
                if is_dir {
                    format!("[DIR] {name}")
                } else {
                    format!("[FILE] {name}")
                }
            })
            .collect();
        Ok(listing.join("\n"))
    }

    /// Atomic rename. The destination must not exist; overwriting is the
    /// job of `write_file`, never of a move.
    pub async fn move_file(
        &self,
        source: &ResolvedPath,
        destination: &ResolvedPath,
    ) -> Result<String, ToolError> {
        if tokio::fs::symlink_metadata(destination.as_path()).await.is_ok() {
            return Err(ToolError::AlreadyExists(destination.requested().to_string()));
        }
        if source.root() != destination.root() {
            // Different roots may sit on different filesystems; rename
            // then fails with EXDEV instead of copying.
            tracing::debug!("moving across allowed roots");
        }
        tokio::fs::rename(source.as_path(), destination.as_path())
            .await
            .map_err(|err| ToolError::from_io(err, source.requested()))?;
        Ok(format!(
            "Moved {} to {}",
            source.requested(),
            destination.requested()
        ))
    }

    /// Recursive search under `path`. The walk happens on the blocking
    /// pool; matched absolute paths come back one per line, empty output
    /// meaning "no matches" as distinct from an error result.
    pub async fn search_files(
        &self,
        path: &ResolvedPath,
        pattern: &str,
        exclude_patterns: &[String],
    ) -> Result<String, ToolError> {
        let meta = tokio::fs::metadata(path.as_path())
            .await
            .map_err(|err| ToolError::from_io(err, path.requested()))?;
        if !meta.is_dir() {
            return Err(ToolError::NotADirectory(path.requested().to_string()));
        }

        let walk = SearchWalk::new(
            self.sandbox.clone(),
            path.as_path().to_path_buf(),
            pattern,
            exclude_patterns,
        )?;
        let matches = tokio::task::spawn_blocking(move || {
            walk.map(|hit| hit.display().to_string()).collect::<Vec<_>>()
        })
        .await
        .map_err(|err| ToolError::Io(err.to_string()))?;

        Ok(matches.join("\n"))
    }

    pub async fn get_file_info(&self, path: &ResolvedPath) -> Result<String, ToolError> {
        let meta = tokio::fs::metadata(path.as_path())
            .await
            .map_err(|err| ToolError::from_io(err, path.requested()))?;
        let info = FileInfo::from_metadata(&meta);
        serde_json::to_string_pretty(&info).map_err(|err| ToolError::Io(err.to_string()))
    }

    /// The sandbox boundary, verbatim, so callers can discover it without
    /// probing.
    pub fn list_allowed_directories(&self) -> String {
        self.sandbox
            .roots()
            .iter()
            .map(|root| root.display().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
