// syslogview - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "syslogview";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "syslogview";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Timestamp parsing
// =============================================================================

/// Default timestamp extraction pattern for BSD syslog (RFC 3164) prefixes.
///
/// An optional weekday abbreviation may precede the month; only the
/// `timestamp` group is handed to chrono.
/// Examples: `Mar 17 18:50:12`, `Mar  1 08:00:00`, `Tue Mar 17 18:50:12`.
pub const DEFAULT_TIMESTAMP_PATTERN: &str =
    r"^(?:[A-Z][a-z]{2} +)?(?P<timestamp>[A-Z][a-z]{2} +\d{1,2} \d{2}:\d{2}:\d{2})";

/// chrono format string matching the `timestamp` group of the default pattern.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%b %e %H:%M:%S";

/// Name of the capture group holding the timestamp text.
pub const TIMESTAMP_GROUP: &str = "timestamp";

/// Lowest accepted reference year.
pub const MIN_REFERENCE_YEAR: i32 = 1970;

/// Highest accepted reference year.
pub const MAX_REFERENCE_YEAR: i32 = 9999;

// =============================================================================
// Pattern limits
// =============================================================================

/// Maximum length of any user-supplied regex (timestamp or filter pattern).
pub const MAX_PATTERN_LENGTH: usize = 4_096;

// =============================================================================
// Input
// =============================================================================

/// File size in bytes above which input files are memory-mapped.
pub const LARGE_FILE_THRESHOLD: u64 = 64 * 1024 * 1024; // 64 MB

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// File names
// =============================================================================

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
