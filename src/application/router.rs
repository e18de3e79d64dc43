//! # Tool Router
//!
//! Routes a decoded request to the matching operation handler. Argument
//! shapes are checked eagerly and path arguments validated against the
//! sandbox before any handler runs, so malformed or escaping requests
//! never reach the filesystem.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::domain::error::ToolError;
use crate::domain::types::{ToolRequest, ToolResult};
use crate::infrastructure::tools::executor::ToolExecutor;
use crate::infrastructure::tools::sandbox::Sandbox;

/// The closed set of operations the gateway serves.
pub const TOOL_NAMES: [&str; 9] = [
    "read_file",
    "read_multiple_files",
    "write_file",
    "create_directory",
    "list_directory",
    "move_file",
    "search_files",
    "get_file_info",
    "list_allowed_directories",
];

#[derive(Debug, Deserialize)]
struct PathArgs {
    path: String,
}

#[derive(Debug, Deserialize)]
struct PathsArgs {
    paths: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WriteFileArgs {
    path: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MoveFileArgs {
    source: String,
    destination: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFilesArgs {
    path: String,
    pattern: String,
    #[serde(default)]
    exclude_patterns: Vec<String>,
}

pub struct ToolRouter {
    sandbox: Arc<Sandbox>,
    executor: ToolExecutor,
}

impl ToolRouter {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self {
            executor: ToolExecutor::new(sandbox.clone()),
            sandbox,
        }
    }

    /// Serves one request. Never panics and never returns a transport
    /// error: every failure becomes an error-tagged [`ToolResult`].
    pub async fn route(&self, request: ToolRequest) -> ToolResult {
        let name = request.name.clone();
        tracing::info!(tool = %name, "handling request");
        match self.dispatch(request).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(tool = %name, error = %err, "request failed");
                ToolResult::from(err)
            }
        }
    }

    async fn dispatch(&self, request: ToolRequest) -> Result<ToolResult, ToolError> {
        let ToolRequest { name, arguments } = request;
        match name.as_str() {
            "read_file" => {
                let args: PathArgs = parse_args(arguments)?;
                let path = self.sandbox.resolve(&args.path)?;
                Ok(ToolResult::text(self.executor.read_file(&path).await?))
            }
            "read_multiple_files" => {
                let args: PathsArgs = parse_args(arguments)?;
                Ok(ToolResult::Content(
                    self.executor.read_multiple_files(&args.paths).await,
                ))
            }
            "write_file" => {
                let args: WriteFileArgs = parse_args(arguments)?;
                let path = self.sandbox.resolve(&args.path)?;
                Ok(ToolResult::text(
                    self.executor.write_file(&path, &args.content).await?,
                ))
            }
            "create_directory" => {
                let args: PathArgs = parse_args(arguments)?;
                let path = self.sandbox.resolve(&args.path)?;
                Ok(ToolResult::text(
                    self.executor.create_directory(&path).await?,
                ))
            }
            "list_directory" => {
                let args: PathArgs = parse_args(arguments)?;
                let path = self.sandbox.resolve(&args.path)?;
                Ok(ToolResult::text(self.executor.list_directory(&path).await?))
            }
            "move_file" => {
                let args: MoveFileArgs = parse_args(arguments)?;
                let source = self.sandbox.resolve(&args.source)?;
                let destination = self.sandbox.resolve(&args.destination)?;
                Ok(ToolResult::text(
                    self.executor.move_file(&source, &destination).await?,
                ))
            }
            "search_files" => {
                let args: SearchFilesArgs = parse_args(arguments)?;
                let path = self.sandbox.resolve(&args.path)?;
                Ok(ToolResult::text(
                    self.executor
                        .search_files(&path, &args.pattern, &args.exclude_patterns)
                        .await?,
                ))
            }
            "get_file_info" => {
                let args: PathArgs = parse_args(arguments)?;
                let path = self.sandbox.resolve(&args.path)?;
                Ok(ToolResult::text(self.executor.get_file_info(&path).await?))
            }
            "list_allowed_directories" => {
                Ok(ToolResult::text(self.executor.list_allowed_directories()))
            }
            _ => {
                tracing::debug!(known = ?TOOL_NAMES, "unknown tool requested");
                Err(ToolError::UnknownOperation(name))
            }
        }
    }
}

fn parse_args<T: DeserializeOwned>(
    arguments: serde_json::Map<String, serde_json::Value>,
) -> Result<T, ToolError> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|err| ToolError::InvalidArgument(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use serde_json::json;
    use std::path::Path;

    fn router_over(dir: &Path) -> ToolRouter {
        let sandbox = Arc::new(Sandbox::new(&[dir.to_path_buf()]).unwrap());
        ToolRouter::new(sandbox)
    }

    fn request(name: &str, arguments: serde_json::Value) -> ToolRequest {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        ToolRequest {
            name: name.to_string(),
            arguments,
        }
    }

    fn expect_error(result: ToolResult) -> (ErrorKind, String) {
        match result {
            ToolResult::Error { kind, message } => (kind, message),
            other => panic!("expected error result, got {other:?}"),
        }
    }

    fn expect_content(result: ToolResult) -> Vec<String> {
        match result {
            ToolResult::Content(items) => items,
            other => panic!("expected content result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_operation_is_rejected_per_request() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_over(dir.path());

        let result = router.route(request("delete_file", json!({}))).await;
        let (kind, message) = expect_error(result);
        assert_eq!(kind, ErrorKind::UnknownOperation);
        assert!(message.contains("delete_file"));
    }

    #[tokio::test]
    async fn missing_argument_is_invalid_argument() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_over(dir.path());

        let result = router.route(request("read_file", json!({}))).await;
        let (kind, _) = expect_error(result);
        assert_eq!(kind, ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn mistyped_argument_is_invalid_argument() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_over(dir.path());

        let result = router
            .route(request("read_multiple_files", json!({"paths": "not-a-list"})))
            .await;
        let (kind, _) = expect_error(result);
        assert_eq!(kind, ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn write_then_read_through_the_router() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_over(dir.path());
        let path = dir.path().join("roundtrip.txt").display().to_string();

        let result = router
            .route(request(
                "write_file",
                json!({"path": path, "content": "payload"}),
            ))
            .await;
        assert!(!result.is_error());

        let result = router.route(request("read_file", json!({"path": path}))).await;
        assert_eq!(expect_content(result), vec!["payload".to_string()]);
    }

    #[tokio::test]
    async fn escaping_path_is_rejected_before_any_handler() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("allowed");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(parent.path().join("secret.txt"), "s").unwrap();
        let router = router_over(&root);

        let outside = parent.path().join("secret.txt").display().to_string();
        let result = router
            .route(request("read_file", json!({"path": outside})))
            .await;
        let (kind, message) = expect_error(result);
        assert_eq!(kind, ErrorKind::OutsideSandbox);
        assert!(message.contains(&outside));
    }

    #[tokio::test]
    async fn both_move_endpoints_are_validated() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("allowed");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("src.txt"), "x").unwrap();
        let router = router_over(&root);

        let inside = root.join("src.txt").display().to_string();
        let outside = parent.path().join("dst.txt").display().to_string();
        let result = router
            .route(request(
                "move_file",
                json!({"source": inside, "destination": outside}),
            ))
            .await;
        let (kind, _) = expect_error(result);
        assert_eq!(kind, ErrorKind::OutsideSandbox);
        assert!(root.join("src.txt").exists());
    }

    #[tokio::test]
    async fn search_files_accepts_optional_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_over(dir.path());
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        let base = dir.path().display().to_string();

        let result = router
            .route(request(
                "search_files",
                json!({"path": base, "pattern": "*.txt", "excludePatterns": ["a.*"]}),
            ))
            .await;
        let content = expect_content(result);
        assert_eq!(content.len(), 1);
        assert!(content[0].ends_with("b.txt"));

        let result = router
            .route(request(
                "search_files",
                json!({"path": base, "pattern": "*.txt"}),
            ))
            .await;
        let content = expect_content(result);
        assert_eq!(content[0].lines().count(), 2);
    }

    #[tokio::test]
    async fn empty_search_is_distinguishable_from_failure() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_over(dir.path());
        let base = dir.path().display().to_string();

        let result = router
            .route(request(
                "search_files",
                json!({"path": base, "pattern": "*.nothing"}),
            ))
            .await;
        assert_eq!(expect_content(result), vec![String::new()]);
    }

    #[tokio::test]
    async fn read_multiple_files_is_partial_success() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_over(dir.path());
        std::fs::write(dir.path().join("ok.txt"), "fine").unwrap();

        let ok = dir.path().join("ok.txt").display().to_string();
        let missing = dir.path().join("missing.txt").display().to_string();
        let result = router
            .route(request(
                "read_multiple_files",
                json!({"paths": [ok, missing]}),
            ))
            .await;
        let content = expect_content(result);
        assert_eq!(content.len(), 2);
        assert_eq!(content[0], "fine");
        assert!(content[1].contains("Error reading file"));
    }

    #[tokio::test]
    async fn list_allowed_directories_needs_no_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_over(dir.path());

        let result = router
            .route(request("list_allowed_directories", json!({})))
            .await;
        let content = expect_content(result);
        assert_eq!(content.len(), 1);
        assert_eq!(content[0], router.sandbox.roots()[0].display().to_string());
    }
}
