//! Settings-related commands
//!
//! Viewing and changing the remote mirror configuration stored in the
//! settings file. Environment overrides are not written back.

use clap::Args;
use serde::Serialize;
use shootdesk::app::AppState;
use shootdesk::error::Result;
use shootdesk::services::RemoteSettings;

#[derive(Args, Debug, Default)]
pub struct RemoteArgs {
    /// Project base URL, e.g. https://xyz.supabase.co
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub api_key: Option<String>,
    #[arg(long)]
    pub table: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,
    #[arg(long)]
    pub disable: bool,
}

impl RemoteArgs {
    fn is_empty(&self) -> bool {
        self.url.is_none()
            && self.api_key.is_none()
            && self.table.is_none()
            && self.timeout_secs.is_none()
            && !self.enable
            && !self.disable
    }

    fn apply(self, mut remote: RemoteSettings) -> RemoteSettings {
        if let Some(url) = self.url {
            remote.url = url;
        }
        if let Some(api_key) = self.api_key {
            remote.api_key = api_key;
        }
        if let Some(table) = self.table {
            remote.table = table;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            remote.timeout_secs = timeout_secs;
        }
        if self.enable {
            remote.enabled = true;
        }
        if self.disable {
            remote.enabled = false;
        }
        remote
    }
}

/// Remote settings as shown to the user, with the key masked
#[derive(Debug, Serialize)]
pub struct RemoteSettingsView {
    pub enabled: bool,
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub timeout_secs: u64,
}

impl From<RemoteSettings> for RemoteSettingsView {
    fn from(remote: RemoteSettings) -> Self {
        let api_key = match remote.api_key.chars().count() {
            0 => String::new(),
            len if len <= 8 => "*".repeat(len),
            _ => format!("{}...", remote.api_key.chars().take(4).collect::<String>()),
        };

        Self {
            enabled: remote.enabled,
            url: remote.url,
            api_key,
            table: remote.table,
            timeout_secs: remote.timeout_secs,
        }
    }
}

/// Show the stored remote settings, or update them when any flag is given.
///
/// Changes take effect on the next start.
pub async fn remote_settings(state: &AppState, args: RemoteArgs) -> Result<RemoteSettingsView> {
    let service = &state.settings_service;

    if args.is_empty() {
        return Ok(service.get_remote().await?.into());
    }

    let remote = args.apply(service.get_remote().await?);
    service.update_remote(remote.clone()).await?;
    tracing::info!("Remote settings updated, restart to apply");

    Ok(remote.into())
}
