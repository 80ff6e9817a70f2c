//! Server configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/bitsd/bitsd.toml`
//! - Windows: `%APPDATA%/bitsd/bitsd.toml`
//!
//! The `BITSD_CONFIG` environment variable overrides the path.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listener address.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// URL route serving the protocol.
    #[serde(default = "default_route")]
    pub route: String,

    /// Base path for assembled uploads.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

fn default_route() -> String {
    "/bits".into()
}

fn default_storage_dir() -> String {
    "bits".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            route: default_route(),
            storage_dir: default_storage_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Saves the current configuration to `path`.
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Returns the configuration file path.
fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("BITSD_CONFIG") {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("bitsd").join("bitsd.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("bitsd")
            .join("bitsd.toml")
    }
}
