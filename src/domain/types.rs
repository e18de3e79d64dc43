//! # Domain Types
//!
//! Request and result shapes shared between the transport layer and the
//! operation handlers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::error::{ErrorKind, ToolError};

/// One decoded call from the transport: a tool name plus its raw
/// argument map. Owned by the router for the duration of the call.
#[derive(Debug, Clone)]
pub struct ToolRequest {
    pub name: String,
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

/// Uniform outcome of every operation. Success carries one or more text
/// items (`read_multiple_files` produces one per requested path); failure
/// carries a single message plus the kind used for assertions and metrics.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Content(Vec<String>),
    Error { kind: ErrorKind, message: String },
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Content(vec![text.into()])
    }

    #[allow(dead_code)]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<ToolError> for ToolResult {
    fn from(err: ToolError) -> Self {
        Self::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Entry classification reported by `get_file_info` and `list_directory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// Metadata snapshot taken at stat time and serialized immediately.
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub size: u64,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub accessed: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub permissions: String,
}

impl FileInfo {
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        Self {
            size: meta.len(),
            created: meta.created().ok().map(DateTime::<Utc>::from),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
            accessed: meta.accessed().ok().map(DateTime::<Utc>::from),
            kind: if meta.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
            permissions: permissions_string(meta),
        }
    }
}

#[cfg(unix)]
fn permissions_string(meta: &std::fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format!("{:03o}", meta.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn permissions_string(meta: &std::fs::Metadata) -> String {
    if meta.permissions().readonly() {
        "444".to_string()
    } else {
        "644".to_string()
    }
}
