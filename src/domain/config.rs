//! # Configuration
//!
//! Optional YAML configuration file for the gateway. Allowed directories
//! can come from here, from the command line, or both; the merged set is
//! fixed for the lifetime of the process.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration file layout.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub system: SystemConfig,
}

/// System-level settings for the gateway.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default)]
    pub allowed_directories: Vec<PathBuf>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_allowed_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(
            &config_path,
            "system:\n  allowed_directories:\n    - /srv/data\n    - /srv/scratch\n",
        )
        .unwrap();

        let config = AppConfig::load(&config_path).unwrap();
        assert_eq!(
            config.system.allowed_directories,
            vec![PathBuf::from("/srv/data"), PathBuf::from("/srv/scratch")]
        );
    }

    #[test]
    fn empty_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, "{}\n").unwrap();

        let config = AppConfig::load(&config_path).unwrap();
        assert!(config.system.allowed_directories.is_empty());
    }
}
