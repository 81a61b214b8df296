// syslogview - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::filter::{PatternMode, RangeMode};
use crate::core::timestamp::TimestampParser;
use crate::util::constants;
use crate::util::error::{ConfigError, ParseError};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for syslogview configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/syslogview/ or %APPDATA%\syslogview\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Full path of the default config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[timestamp]` section.
    pub timestamp: TimestampSection,
    /// `[filter]` section.
    pub filter: FilterSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[timestamp]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TimestampSection {
    /// Regex locating the timestamp at the start of a line.
    pub pattern: Option<String>,
    /// chrono format string for the extracted text.
    pub format: Option<String>,
    /// Year injected into year-less timestamps.
    pub reference_year: Option<i64>,
}

/// `[filter]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// "keep" or "remove".
    pub range_mode: Option<String>,
    /// "keep" or "remove".
    pub pattern_mode: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Timestamp --
    pub timestamp_pattern: String,
    pub timestamp_format: String,
    /// `None` = year of "now" at filter time.
    pub reference_year: Option<i32>,

    // -- Filter --
    pub range_mode: RangeMode,
    pub pattern_mode: PatternMode,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timestamp_pattern: constants::DEFAULT_TIMESTAMP_PATTERN.to_string(),
            timestamp_format: constants::DEFAULT_TIMESTAMP_FORMAT.to_string(),
            reference_year: None,
            range_mode: RangeMode::default(),
            pattern_mode: PatternMode::default(),
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Build the timestamp parser described by this configuration.
    pub fn timestamp_parser(&self) -> Result<TimestampParser, ParseError> {
        Ok(
            TimestampParser::new(&self.timestamp_pattern, &self.timestamp_format)?
                .with_reference_year(self.reference_year),
        )
    }
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning;
/// the program still runs but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config file found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw_config(config_path) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config file");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validate each field, accumulating one warning per rejected value.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Timestamp: pattern + format (validated together) --
    let pattern = raw
        .timestamp
        .pattern
        .unwrap_or_else(|| config.timestamp_pattern.clone());
    let format = raw
        .timestamp
        .format
        .unwrap_or_else(|| config.timestamp_format.clone());
    let checked = TimestampParser::new(&pattern, &format);
    match checked {
        Ok(_) if !format.trim().is_empty() => {
            config.timestamp_pattern = pattern;
            config.timestamp_format = format;
        }
        Ok(_) => warnings.push(
            "[timestamp] format is empty. Using default timestamp pattern and format.".to_string(),
        ),
        Err(e) => warnings.push(format!(
            "[timestamp] {e}. Using default timestamp pattern and format."
        )),
    }

    // -- Timestamp: reference_year --
    if let Some(year) = raw.timestamp.reference_year {
        match validate_year(year) {
            Ok(y) => config.reference_year = Some(y),
            Err(e) => warnings.push(format!("[timestamp] {e}. Using the current year.")),
        }
    }

    // -- Filter: modes --
    if let Some(ref name) = raw.filter.range_mode {
        match RangeMode::from_name(name) {
            Some(mode) => config.range_mode = mode,
            None => warnings.push(format!(
                "[filter] range_mode = \"{name}\" is not recognised. \
                 Expected \"keep\" or \"remove\". Using default (keep)."
            )),
        }
    }
    if let Some(ref name) = raw.filter.pattern_mode {
        match PatternMode::from_name(name) {
            Some(mode) => config.pattern_mode = mode,
            None => warnings.push(format!(
                "[filter] pattern_mode = \"{name}\" is not recognised. \
                 Expected \"keep\" or \"remove\". Using default (keep)."
            )),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    config
}

/// Check a reference year against the accepted range.
pub fn validate_year(year: i64) -> Result<i32, ConfigError> {
    let min = i64::from(constants::MIN_REFERENCE_YEAR);
    let max = i64::from(constants::MAX_REFERENCE_YEAR);
    if (min..=max).contains(&year) {
        // In range, so the narrowing cannot fail.
        Ok(year as i32)
    } else {
        Err(ConfigError::ValueOutOfRange {
            field: "reference_year".to_string(),
            value: year.to_string(),
            expected: format!("{min}-{max}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_gives_defaults_silently() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("absent.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.timestamp_format, constants::DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(config.range_mode, RangeMode::KeepInRange);
    }

    #[test]
    fn test_valid_config_applied() {
        let file = write_config(
            r#"
[timestamp]
pattern = '^(?P<timestamp>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})'
format = "%Y-%m-%d %H:%M:%S"
reference_year = 2021

[filter]
range_mode = "remove"
pattern_mode = "Remove"

[logging]
level = "DEBUG"

[unknown_section]
whatever = 1
"#,
        );
        let (config, warnings) = load_config(file.path());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.timestamp_format, "%Y-%m-%d %H:%M:%S");
        assert_eq!(config.reference_year, Some(2021));
        assert_eq!(config.range_mode, RangeMode::RemoveInRange);
        assert_eq!(config.pattern_mode, PatternMode::RemoveMatching);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.timestamp_parser().is_ok());
    }

    #[test]
    fn test_invalid_values_fall_back_with_warnings() {
        let file = write_config(
            r#"
[timestamp]
pattern = '(unclosed'
reference_year = 12

[filter]
range_mode = "sideways"

[logging]
level = "loud"
"#,
        );
        let (config, warnings) = load_config(file.path());
        assert_eq!(warnings.len(), 4, "warnings: {warnings:?}");
        assert_eq!(config.timestamp_pattern, constants::DEFAULT_TIMESTAMP_PATTERN);
        assert_eq!(config.reference_year, None);
        assert_eq!(config.range_mode, RangeMode::KeepInRange);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_unparseable_toml_warns() {
        let file = write_config("this is = = not toml");
        let (config, warnings) = load_config(file.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
        assert_eq!(config.pattern_mode, PatternMode::KeepMatching);
    }

    #[test]
    fn test_validate_year_bounds() {
        assert_eq!(validate_year(2024).unwrap(), 2024);
        assert!(validate_year(1969).is_err());
        assert!(validate_year(10_000).is_err());
    }
}
