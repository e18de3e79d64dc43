//! # Command Line
//!
//! Argument surface of the gateway binary. Allowed directories come from
//! positional arguments, an optional YAML config file, or both; the
//! merged set must be non-empty before the server starts.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

use crate::domain::config::AppConfig;

#[derive(Debug, Parser)]
#[command(
    name = "fsgate",
    about = "Sandboxed filesystem gateway speaking MCP over stdio",
    version
)]
pub struct CommandArguments {
    /// Directories the gateway is allowed to operate in.
    pub allowed_directories: Vec<PathBuf>,

    /// YAML config file providing `system.allowed_directories`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter when RUST_LOG is not set (e.g. "debug" or "fsgate=trace").
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl CommandArguments {
    /// Merges CLI and config-file roots. An empty result is a startup
    /// error; the sandbox cannot run without a boundary.
    pub fn resolve_roots(&self) -> Result<Vec<PathBuf>> {
        let mut roots = self.allowed_directories.clone();
        if let Some(config_path) = &self.config {
            let config = AppConfig::load(config_path)?;
            roots.extend(config.system.allowed_directories);
        }
        if roots.is_empty() {
            bail!(
                "no allowed directories configured; pass at least one directory \
                 or a config file with system.allowed_directories"
            );
        }
        Ok(roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_directories_become_roots() {
        let args =
            CommandArguments::parse_from(["fsgate", "/srv/data", "/srv/scratch"]);
        let roots = args.resolve_roots().unwrap();
        assert_eq!(
            roots,
            vec![PathBuf::from("/srv/data"), PathBuf::from("/srv/scratch")]
        );
    }

    #[test]
    fn config_file_roots_are_merged() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(
            &config_path,
            "system:\n  allowed_directories:\n    - /srv/extra\n",
        )
        .unwrap();

        let args = CommandArguments::parse_from([
            "fsgate",
            "--config",
            config_path.to_str().unwrap(),
            "/srv/data",
        ]);
        let roots = args.resolve_roots().unwrap();
        assert_eq!(
            roots,
            vec![PathBuf::from("/srv/data"), PathBuf::from("/srv/extra")]
        );
    }

    #[test]
    fn empty_root_set_is_a_startup_error() {
        let args = CommandArguments::parse_from(["fsgate"]);
        assert!(args.resolve_roots().is_err());
    }
}
