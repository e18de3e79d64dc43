//! # Tool Catalog
//!
//! Static descriptors for the nine tools, with JSON-Schema argument
//! shapes matching what the router actually deserializes.

use rmcp::model::{JsonObject, Tool};
use serde_json::json;
use std::sync::Arc;

fn schema(value: serde_json::Value) -> Arc<JsonObject> {
    match value {
        serde_json::Value::Object(map) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

fn path_only() -> Arc<JsonObject> {
    schema(json!({
        "type": "object",
        "properties": {
            "path": {"type": "string"},
        },
        "required": ["path"],
    }))
}

pub fn tools() -> Vec<Tool> {
    vec![
        Tool::new(
            "read_file",
            "Read complete contents of a file",
            path_only(),
        ),
        Tool::new(
            "read_multiple_files",
            "Read multiple files simultaneously",
            schema(json!({
                "type": "object",
                "properties": {
                    "paths": {"type": "array", "items": {"type": "string"}},
                },
                "required": ["paths"],
            })),
        ),
        Tool::new(
            "write_file",
            "Create new file or overwrite existing (exercise caution with this)",
            schema(json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "content": {"type": "string"},
                },
                "required": ["path", "content"],
            })),
        ),
        Tool::new(
            "create_directory",
            "Create new directory or ensure it exists",
            path_only(),
        ),
        Tool::new(
            "list_directory",
            "List directory contents with [FILE] or [DIR] prefixes",
            path_only(),
        ),
        Tool::new(
            "move_file",
            "Move or rename files and directories",
            schema(json!({
                "type": "object",
                "properties": {
                    "source": {"type": "string"},
                    "destination": {"type": "string"},
                },
                "required": ["source", "destination"],
            })),
        ),
        Tool::new(
            "search_files",
            "Recursively search for files/directories",
            schema(json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "pattern": {"type": "string"},
                    "excludePatterns": {"type": "array", "items": {"type": "string"}},
                },
                "required": ["path", "pattern"],
            })),
        ),
        Tool::new(
            "get_file_info",
            "Get detailed file/directory metadata",
            path_only(),
        ),
        Tool::new(
            "list_allowed_directories",
            "List all directories the server is allowed to access",
            schema(json!({
                "type": "object",
                "properties": {},
            })),
        ),
    ]
}
