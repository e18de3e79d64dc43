//! # Main Entry Point
//!
//! Initializes the gateway:
//! - Interface: command-line arguments
//! - Domain: configuration and the error taxonomy
//! - Infrastructure: path sandbox, tool executor, MCP transport
//! - Application: request routing
//!
//! Stdout belongs to the MCP wire, so logs go to stderr or to the file
//! given with `--log-file`.

mod application;
mod domain;
mod infrastructure;
mod interface;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use crate::infrastructure::tools::sandbox::Sandbox;
use crate::interface::cli::CommandArguments;

#[tokio::main]
async fn main() -> Result<()> {
    let arguments = CommandArguments::parse();
    let _log_guard = init_tracing(&arguments)?;

    let roots = arguments.resolve_roots()?;
    let sandbox =
        Arc::new(Sandbox::new(&roots).context("invalid allowed-directory configuration")?);
    for root in sandbox.roots() {
        tracing::info!("allowed directory: {}", root.display());
    }

    infrastructure::mcp::server::start_server(sandbox).await
}

fn init_tracing(
    arguments: &CommandArguments,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&arguments.log_level));

    match &arguments.log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().context("--log-file must name a file")?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            Ok(None)
        }
    }
}
