//! # MCP Server
//!
//! The transport boundary: decodes each `tools/call` into a
//! [`ToolRequest`], hands it to the router, and serializes the
//! [`ToolResult`] back into MCP content. Connection lifecycle,
//! capability negotiation, and framing all belong to `rmcp`.

use anyhow::{Context, Result};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ListToolsResult, PaginatedRequestParam,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use std::sync::Arc;

use crate::application::router::ToolRouter;
use crate::domain::types::{ToolRequest, ToolResult};
use crate::infrastructure::mcp::catalog;
use crate::infrastructure::tools::sandbox::Sandbox;

/// MCP-facing wrapper around the router.
#[derive(Clone)]
pub struct GatewayService {
    router: Arc<ToolRouter>,
}

impl GatewayService {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self {
            router: Arc::new(ToolRouter::new(sandbox)),
        }
    }
}

impl ServerHandler for GatewayService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Filesystem gateway confined to its allowed directories. \
                 Call list_allowed_directories to discover the boundary."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: catalog::tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = ToolRequest {
            name: request.name.to_string(),
            arguments: request.arguments.unwrap_or_default(),
        };
        match self.router.route(request).await {
            ToolResult::Content(items) => Ok(CallToolResult::success(
                items.into_iter().map(Content::text).collect(),
            )),
            ToolResult::Error { message, .. } => {
                Ok(CallToolResult::error(vec![Content::text(message)]))
            }
        }
    }
}

/// Runs the gateway over stdio until the client disconnects.
pub async fn start_server(sandbox: Arc<Sandbox>) -> Result<()> {
    let service = GatewayService::new(sandbox)
        .serve(stdio())
        .await
        .context("failed to start MCP server on stdio")?;
    tracing::info!("filesystem gateway ready");

    service
        .waiting()
        .await
        .context("server terminated abnormally")?;
    tracing::info!("filesystem gateway stopped");
    Ok(())
}
