//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of reverse geocoding attempts per item
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default fixed delay between reverse geocoding attempts
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default map link template
pub const DEFAULT_MAP_LINK: &str = "https://www.google.com/maps?q={lat},{lng}";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "pk-search";
