// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "CRM Provider";

/// Crate name (used as the default tracing target)
pub const APP_NAME_LOWER: &str = "crm_provider";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".crm-provider";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "crm-provider.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "CRM_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "CRM_LOG";

// =============================================================================
// Environment Variables - Filters
// =============================================================================

/// Environment variable for the maximum number of filter keys
pub const ENV_MAX_FILTER_KEYS: &str = "CRM_MAX_FILTER_KEYS";

/// Environment variable for the maximum filter JSON size in bytes
pub const ENV_MAX_FILTER_JSON_BYTES: &str = "CRM_MAX_FILTER_JSON_BYTES";

// =============================================================================
// Environment Variables - Store
// =============================================================================

/// Environment variable for the JSON record data file
pub const ENV_DATA_FILE: &str = "CRM_DATA_FILE";

// =============================================================================
// Filter Defaults
// =============================================================================

/// Maximum number of keys in one filter object
pub const DEFAULT_MAX_FILTER_KEYS: usize = 50;

/// Maximum filter JSON size (64 KiB)
pub const DEFAULT_MAX_FILTER_JSON_BYTES: usize = 64 * 1024;
