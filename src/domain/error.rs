//! # Error Taxonomy
//!
//! Bounded set of failure kinds for gateway operations. Every handler
//! converts its operation-local failures into one of these before the
//! result crosses the router boundary; unclassified OS failures land in
//! the `Io` bucket.

use thiserror::Error;

/// Failure kinds, used by tests and metrics. The wire only ever carries
/// the rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    OutsideSandbox,
    NotFound,
    NotAFile,
    NotADirectory,
    AlreadyExists,
    UnknownOperation,
    Io,
}

/// A failed gateway operation.
///
/// Messages echo the caller-supplied path, never the resolved internal
/// one, so a rejected probe learns nothing about the host filesystem.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArgument(String),

    #[error("access denied: '{0}' is outside the allowed directories")]
    OutsideSandbox(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("unknown tool: {0}")]
    UnknownOperation(String),

    #[error("io error: {0}")]
    Io(String),
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::OutsideSandbox(_) => ErrorKind::OutsideSandbox,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NotAFile(_) => ErrorKind::NotAFile,
            Self::NotADirectory(_) => ErrorKind::NotADirectory,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::UnknownOperation(_) => ErrorKind::UnknownOperation,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Classify an `std::io::Error` for an operation on `path`.
    ///
    /// `path` must be the caller-supplied string, not a resolved path.
    pub fn from_io(err: std::io::Error, path: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_string()),
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}
