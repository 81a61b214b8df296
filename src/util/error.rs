// syslogview - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all syslogview operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum SyslogViewError {
    /// Timestamp parsing failed (strict mode, bounds, parser setup).
    Parse(ParseError),

    /// Filter operation failed.
    Filter(FilterError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for SyslogViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SyslogViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors related to timestamp extraction.
///
/// Only reachable through strict parsing, range bound parsing, or building a
/// parser from a bad pattern. Tolerant parsing never produces one.
#[derive(Debug)]
pub enum ParseError {
    /// The timestamp pattern did not match the line.
    NoTimestamp { line_number: usize },

    /// The pattern matched but the text is not a valid date-time.
    InvalidTimestamp {
        line_number: usize,
        raw_timestamp: String,
        format: String,
    },

    /// A user-supplied range bound could not be parsed.
    InvalidBound { raw: String },

    /// The timestamp extraction pattern does not compile.
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// The timestamp extraction pattern exceeds the maximum length.
    PatternTooLong { length: usize, max_length: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTimestamp { line_number } => {
                write!(f, "line {line_number}: no timestamp found")
            }
            Self::InvalidTimestamp {
                line_number,
                raw_timestamp,
                format,
            } => write!(
                f,
                "line {line_number}: cannot parse timestamp \
                 '{raw_timestamp}' with format '{format}'"
            ),
            Self::InvalidBound { raw } => write!(
                f,
                "cannot parse range bound '{raw}'. Expected the log's timestamp \
                 format, RFC 3339, 'YYYY-MM-DD HH:MM:SS', 'YYYY-MM-DD' or 'HH:MM:SS'"
            ),
            Self::InvalidPattern { pattern, source } => {
                write!(f, "invalid timestamp pattern '{pattern}': {source}")
            }
            Self::PatternTooLong { length, max_length } => write!(
                f,
                "timestamp pattern is {length} chars, exceeds maximum of {max_length}"
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for SyslogViewError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to filter operations.
#[derive(Debug)]
pub enum FilterError {
    /// User-provided regex is invalid.
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// An empty pattern was handed to the filter.
    EmptyPattern,

    /// User-provided regex exceeds the maximum length.
    PatternTooLong { length: usize, max_length: usize },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern { pattern, source } => {
                write!(f, "Invalid filter regex '{pattern}': {source}")
            }
            Self::EmptyPattern => write!(f, "Filter pattern is empty"),
            Self::PatternTooLong { length, max_length } => write!(
                f,
                "Filter regex is {length} chars, exceeds maximum of {max_length}"
            ),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FilterError> for SyslogViewError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for SyslogViewError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for syslogview results.
pub type Result<T> = std::result::Result<T, SyslogViewError>;
