//! Client-side settings.
//!
//! Reads/writes `~/.issueforge/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Server used when nothing else is configured.
pub const DEFAULT_SERVER: &str = "http://localhost:5000";

/// Client configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root URL (e.g. "http://localhost:5000").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,
}

impl ClientConfig {
    /// Default config file path: ~/.issueforge/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Pick the server URL: explicit override, then the config file, then
    /// [`DEFAULT_SERVER`].
    pub fn server_url(&self, flag: Option<&str>) -> String {
        flag.map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.server.trim()).filter(|s| !s.is_empty()))
            .unwrap_or(DEFAULT_SERVER)
            .to_string()
    }
}

/// Return the IssueForge config directory (~/.issueforge).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".issueforge")
}
