// GroupScout - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Every bound used by the controller, config validation, and catalog loading
// is defined here so the limits can be reviewed in one place.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "GroupScout";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "GroupScout";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Selection limits
// =============================================================================

/// Maximum number of log groups a single query may select.
///
/// Once the selected set reaches this size the selection surface stops
/// offering further options; an externally supplied list that is already
/// larger is kept as-is and never truncated.
pub const MAX_LOG_GROUPS: usize = 20;

/// Number of selected log groups rendered as chips before the remainder is
/// collapsed into a "+N" badge.
pub const MAX_VISIBLE_VALUES: usize = 4;

/// Query reference ID used when the owner does not supply one.
pub const DEFAULT_REF_ID: &str = "A";

// =============================================================================
// Search timing
// =============================================================================

/// Quiet period (ms) after the last keystroke before a remote search fires.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Minimum user-configurable search debounce (ms).
pub const MIN_SEARCH_DEBOUNCE_MS: u64 = 50;

/// Maximum user-configurable search debounce (ms).
pub const MAX_SEARCH_DEBOUNCE_MS: u64 = 5_000;

/// How often the UI repaints while a remote search is outstanding (ms), so
/// that completed results show up without waiting for user input.
pub const SEARCH_POLL_INTERVAL_MS: u64 = 50;

/// Maximum number of completed-search messages applied per UI frame.
pub const MAX_SEARCH_MESSAGES_PER_FRAME: usize = 50;

// =============================================================================
// Preload
// =============================================================================

/// Number of log groups requested (with no prefix) when the controller mounts
/// or the region changes.
pub const DEFAULT_PRELOAD_LIMIT: usize = 50;

/// Hard upper bound on the configurable preload limit.
pub const ABSOLUTE_MAX_PRELOAD_LIMIT: usize = 1_000;

// =============================================================================
// Remote source
// =============================================================================

/// Maximum user-configurable simulated latency for the catalog source (ms).
pub const MAX_SIMULATED_LATENCY_MS: u64 = 10_000;

/// Maximum size of a catalog TOML file in bytes.
pub const MAX_CATALOG_FILE_SIZE: u64 = 4 * 1024 * 1024; // 4 MB

/// Page size the catalog source uses when a request carries no limit.
pub const DEFAULT_SERVICE_PAGE_SIZE: usize = 50;

/// Maximum length of a single log group name (matches the remote service).
pub const MAX_LOG_GROUP_NAME_LENGTH: usize = 512;

/// Fallback text shown when a remote error has no printable form.
pub const UNKNOWN_ERROR_MESSAGE: &str = "unknown error";

// =============================================================================
// Notifications
// =============================================================================

/// Maximum number of notifications retained by the notification centre.
/// Older notifications are dropped first.
pub const MAX_NOTIFICATIONS: usize = 50;

/// Seconds a notification stays on screen before the UI hides it.
pub const NOTIFICATION_DISPLAY_SECS: i64 = 8;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Session persistence file name (stored in the platform data directory).
pub const SESSION_FILE_NAME: &str = "session.json";

/// Default region selected on first launch when the catalog offers none.
pub const DEFAULT_REGION: &str = "us-east-1";
