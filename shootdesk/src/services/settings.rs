//! Settings service
//!
//! Manages application settings persistence using JSON file storage.

use crate::config;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Remote mirror configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Project base URL, e.g. "https://xyz.supabase.co"
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_remote_table")]
    pub table: String,
    /// HTTP request timeout in seconds
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
}

fn default_remote_table() -> String {
    config::DEFAULT_REMOTE_TABLE.to_string()
}

fn default_remote_timeout() -> u64 {
    config::DEFAULT_REMOTE_TIMEOUT_SECS
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            api_key: String::new(),
            table: default_remote_table(),
            timeout_secs: default_remote_timeout(),
        }
    }
}

impl RemoteSettings {
    /// Check the settings are usable when the remote is enabled
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if !(self.url.starts_with("https://") || self.url.starts_with("http://")) {
            return Err(AppError::Config(format!(
                "Remote URL must start with http:// or https://, got {:?}",
                self.url
            )));
        }

        if self.api_key.trim().is_empty() {
            return Err(AppError::Config("Remote API key is empty".to_string()));
        }

        if self.table.trim().is_empty() {
            return Err(AppError::Config("Remote table name is empty".to_string()));
        }

        if self.timeout_secs == 0 || self.timeout_secs > config::MAX_REMOTE_TIMEOUT_SECS {
            return Err(AppError::Config(format!(
                "Remote timeout must be between 1 and {} seconds",
                config::MAX_REMOTE_TIMEOUT_SECS
            )));
        }

        Ok(())
    }
}

/// Local persistence configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory of the key-value store (if None, uses data_dir/store)
    #[serde(default)]
    pub store_dir: Option<String>,
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

impl AppSettings {
    /// Apply environment overrides; a URL and key together enable the remote
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = lookup(config::ENV_REMOTE_URL).filter(|v| !v.is_empty());
        let key = lookup(config::ENV_REMOTE_KEY).filter(|v| !v.is_empty());

        if url.is_some() && key.is_some() {
            self.remote.enabled = true;
        }
        if let Some(url) = url {
            self.remote.url = url;
        }
        if let Some(key) = key {
            self.remote.api_key = key;
        }

        self
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join(config::SETTINGS_FILE_NAME),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Settings from disk with environment overrides applied and validated
    pub async fn effective(&self) -> Result<AppSettings> {
        let settings = self
            .load()
            .await?
            .with_env_overrides(|name| std::env::var(name).ok());
        settings.remote.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;

        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Get remote mirror settings
    pub async fn get_remote(&self) -> Result<RemoteSettings> {
        let settings = self.load().await?;
        Ok(settings.remote)
    }

    /// Update remote mirror settings
    pub async fn update_remote(&self, remote: RemoteSettings) -> Result<()> {
        remote.validate()?;
        let mut settings = self.load().await?;
        settings.remote = remote;
        self.save(&settings).await?;
        Ok(())
    }
}
