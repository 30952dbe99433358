//! Services module
//!
//! Business logic services that coordinate between commands, the local
//! cache and the remote mirror.

pub mod history;
pub mod notifications;
pub mod queries;
pub mod settings;
pub mod shoots;

pub use notifications::{
    LogNotifier, Notification, NotificationVariant, Notifier, RecordingNotifier,
};
pub use settings::{AppSettings, RemoteSettings, SettingsService, StorageSettings};
pub use shoots::{RemoteSync, ShootsService};
