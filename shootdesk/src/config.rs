//! Application configuration constants
//!
//! Central location for storage keys, remote defaults, and the placeholder
//! values used when booking a shoot from a partial draft.

// ===== Persistence =====

/// Storage key holding the JSON array of all shoot records
pub const SHOOTS_STORAGE_KEY: &str = "shoots";

/// Storage key holding the signed-in principal
pub const USER_STORAGE_KEY: &str = "user";

/// Settings file name inside the data directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Subdirectory of the data directory used by the file-backed key-value store
pub const DEFAULT_STORE_DIR: &str = "store";

/// Application directory name under the platform data directory
pub const APP_DIR_NAME: &str = "shootdesk";

// ===== Remote Store =====

/// Remote table mirroring the shoot records
pub const DEFAULT_REMOTE_TABLE: &str = "shoots";

/// REST path prefix of the remote table API
pub const REMOTE_REST_PATH: &str = "rest/v1";

/// Request timeout applied by the HTTP transport, in seconds
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Upper bound for a configured request timeout (5 minutes)
pub const MAX_REMOTE_TIMEOUT_SECS: u64 = 300;

/// Environment variable overriding the remote base URL
pub const ENV_REMOTE_URL: &str = "SHOOTDESK_REMOTE_URL";

/// Environment variable overriding the remote API key
pub const ENV_REMOTE_KEY: &str = "SHOOTDESK_REMOTE_KEY";

// ===== Booking Draft Defaults =====

pub const DEFAULT_SHOOT_TIME: &str = "10:00";
pub const DEFAULT_CLIENT_NAME: &str = "New Client";
pub const DEFAULT_CLIENT_EMAIL: &str = "client@example.com";
pub const DEFAULT_ADDRESS: &str = "123 Main St";
pub const DEFAULT_CITY: &str = "Anytown";
pub const DEFAULT_STATE: &str = "CA";
pub const DEFAULT_ZIP: &str = "12345";
pub const DEFAULT_FULL_ADDRESS: &str = "123 Main St, Anytown, CA 12345";
pub const DEFAULT_PHOTOGRAPHER_NAME: &str = "John Doe";
pub const DEFAULT_PHOTOGRAPHER_AVATAR: &str = "/avatars/avatar-john.png";
pub const DEFAULT_SERVICE: &str = "Photography";

/// Default base quote in dollars
pub const DEFAULT_BASE_QUOTE: f64 = 500.0;
/// Default tax rate in percent
pub const DEFAULT_TAX_RATE: f64 = 7.25;
pub const DEFAULT_TAX_AMOUNT: f64 = 36.25;
pub const DEFAULT_TOTAL_QUOTE: f64 = 536.25;

/// Creator recorded when nobody is signed in
pub const SYSTEM_CREATOR: &str = "System";

/// Date format used for scheduled dates ("2024-05-01")
pub const SCHEDULED_DATE_FORMAT: &str = "%Y-%m-%d";
