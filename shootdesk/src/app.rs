//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config;
use crate::error::{AppError, Result};
use crate::models::Principal;
use crate::remote::{RemoteStore, RestRemoteStore};
use crate::services::{RemoteSettings, SettingsService, ShootsService};
use crate::storage::{FileStore, KeyValueStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    /// Directory holding the persisted shoots and signed-in user
    pub store_dir: PathBuf,
    pub settings_service: SettingsService,
    pub shoots_service: ShootsService,
    store: Arc<dyn KeyValueStore>,
}

impl AppState {
    /// Sign a principal in and remember them across sessions
    pub fn sign_in(&self, principal: Principal) -> Result<()> {
        let json = serde_json::to_string(&principal)?;
        self.store.set(config::USER_STORAGE_KEY, &json)?;
        self.shoots_service.set_principal(Some(principal));
        Ok(())
    }

    pub fn sign_out(&self) -> Result<()> {
        self.store.remove(config::USER_STORAGE_KEY)?;
        self.shoots_service.set_principal(None);
        Ok(())
    }
}

/// Build the remote mirror described by `settings`, if enabled
pub fn build_remote(settings: &RemoteSettings) -> Result<Option<Arc<dyn RemoteStore>>> {
    if !settings.enabled {
        return Ok(None);
    }

    settings.validate()?;
    let remote: Arc<dyn RemoteStore> = Arc::new(RestRemoteStore::new(
        &settings.url,
        &settings.api_key,
        &settings.table,
        Duration::from_secs(settings.timeout_secs),
    )?);

    tracing::info!("Remote mirror: {} (table {})", settings.url, settings.table);
    Ok(Some(remote))
}

/// Principal remembered from an earlier session; unreadable entries are dropped
fn restore_principal(store: &dyn KeyValueStore) -> Option<Principal> {
    let json = match store.get(config::USER_STORAGE_KEY) {
        Ok(json) => json?,
        Err(e) => {
            tracing::warn!("Failed to read stored user: {}", e);
            return None;
        }
    };

    match serde_json::from_str(&json) {
        Ok(principal) => Some(principal),
        Err(e) => {
            tracing::warn!("Ignoring unreadable stored user: {}", e);
            None
        }
    }
}

/// Default data directory under the platform's data dir
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(config::APP_DIR_NAME))
        .ok_or_else(|| AppError::Config("Failed to determine the data directory".to_string()))
}

/// Application setup - called once on startup.
///
/// Restores the local cache and, unless `offline`, loads the remote mirror
/// over it.
pub async fn setup(app_data_dir: PathBuf, offline: bool) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("App data directory: {:?}", app_data_dir);

    std::fs::create_dir_all(&app_data_dir)?;

    let settings_service = SettingsService::new(app_data_dir.clone());
    let settings = settings_service.effective().await?;

    let store_root = settings
        .storage
        .store_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| app_data_dir.join(config::DEFAULT_STORE_DIR));
    let file_store = FileStore::new(store_root);
    file_store.initialize()?;
    let store_dir = file_store.root().to_path_buf();
    let store: Arc<dyn KeyValueStore> = Arc::new(file_store);

    let remote = if offline {
        tracing::info!("Offline mode, remote mirror disabled");
        None
    } else {
        build_remote(&settings.remote)?
    };

    let shoots_service = ShootsService::new(Arc::clone(&store), remote);
    if let Some(principal) = restore_principal(store.as_ref()) {
        shoots_service.set_principal(Some(principal));
    }
    shoots_service.load().await;

    tracing::info!("Application initialized successfully");

    Ok(AppState {
        app_data_dir,
        store_dir,
        settings_service,
        shoots_service,
        store,
    })
}
