//! Commands exposed on the command line
//!
//! This module organizes commands into logical submodules:
//! - `shoots`: Shoot listing, booking, updates and deletion
//! - `session`: Signing a principal in and out
//! - `settings`: Remote mirror configuration

pub mod session;
pub mod settings;
pub mod shoots;

use serde::Serialize;
use shootdesk::app::AppState;
use shootdesk::error::Result;

pub use session::LoginArgs;
pub use settings::RemoteArgs;
pub use shoots::{BookArgs, ListArgs, UpdateArgs, UploadArgs};

/// Application information structure
#[derive(Serialize)]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
    pub store_dir: String,
    pub shoot_count: usize,
    pub remote_enabled: bool,
}

/// Get application information
pub async fn get_app_info(state: &AppState) -> Result<AppInfo> {
    let settings = state.settings_service.effective().await?;

    Ok(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.app_data_dir.to_string_lossy().to_string(),
        store_dir: state.store_dir.to_string_lossy().to_string(),
        shoot_count: state.shoots_service.shoots().len(),
        remote_enabled: settings.remote.enabled,
    })
}
