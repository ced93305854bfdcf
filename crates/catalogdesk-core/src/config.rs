//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API origin, the token storage backend, and the last
//! used username.
//!
//! Configuration is stored at `~/.config/catalogdesk/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::DEFAULT_BASE_URL;
use crate::auth::TokenBackend;

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "catalogdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API origin
pub const API_URL_ENV: &str = "CATALOGDESK_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub token_backend: TokenBackend,
    #[serde(default)]
    pub last_username: Option<String>,
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        match Self::default_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `~/.config/catalogdesk/config.json` (platform equivalent)
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the token file and logs
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// API origin: environment, then config file, then the public default
    pub fn base_url(&self) -> String {
        Self::resolve_base_url(std::env::var(API_URL_ENV).ok(), self.api_base_url.as_deref())
    }

    fn resolve_base_url(env: Option<String>, configured: Option<&str>) -> String {
        env.filter(|v| !v.trim().is_empty())
            .or_else(|| configured.filter(|v| !v.trim().is_empty()).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }
}
