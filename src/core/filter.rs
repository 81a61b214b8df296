// syslogview - core/filter.rs
//
// Visibility filters over a LineStore: timestamp range and regex pattern.
// Filters only hide lines; successive filters therefore AND-combine.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{LineStore, Timestamp};
use crate::core::timestamp::TimestampParser;
use crate::util::constants;
use crate::util::error::FilterError;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::fmt;

// =============================================================================
// Modes and ranges
// =============================================================================

/// What a range filter does with in-range lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeMode {
    #[default]
    KeepInRange,
    RemoveInRange,
}

impl RangeMode {
    /// Parse the config/CLI spelling: "keep" or "remove" (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "keep" => Some(Self::KeepInRange),
            "remove" => Some(Self::RemoveInRange),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::KeepInRange => "keep",
            Self::RemoveInRange => "remove",
        }
    }
}

/// What a pattern filter does with matching lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternMode {
    #[default]
    KeepMatching,
    RemoveMatching,
}

impl PatternMode {
    /// Parse the config/CLI spelling: "keep" or "remove" (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "keep" => Some(Self::KeepMatching),
            "remove" => Some(Self::RemoveMatching),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::KeepMatching => "keep",
            Self::RemoveMatching => "remove",
        }
    }
}

/// Half-open time interval `[start, end)`.
///
/// `start >= end` describes an empty range: nothing is in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeRange {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Range with an open lower bound, an open upper bound, or both.
    pub fn bounded(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self {
            start: start.unwrap_or(DateTime::<Utc>::MIN_UTC),
            end: end.unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn contains(&self, t: &Timestamp) -> bool {
        self.start <= *t && *t < self.end
    }

    /// True when no instant satisfies `start <= t < end`.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.format("%Y-%m-%d %H:%M:%S"),
            self.end.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Outcome of one filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterStats {
    /// Lines looked at.
    pub examined: usize,
    /// Lines that were visible before the pass and are hidden after it.
    pub hidden: usize,
    /// Contiguous hidden batches written to the store.
    pub runs: usize,
}

// =============================================================================
// Range filter
// =============================================================================

/// Hide lines whose timestamp is (or is not) within `range`.
///
/// Single forward pass. Lines with no parseable timestamp count as out of
/// range. Adjacent hide decisions are merged into runs and each run is
/// hidden in one batch. Timestamps need not be sorted.
pub fn apply_range_filter(
    store: &mut LineStore,
    range: &TimeRange,
    mode: RangeMode,
    parser: &TimestampParser,
    reference_year: i32,
) -> FilterStats {
    let mut stats = FilterStats {
        examined: store.len(),
        ..Default::default()
    };
    // Start index of the pending hidden run, if one is open.
    let mut hide_from: Option<usize> = None;

    for index in 0..store.len() {
        let in_range = store
            .line(index)
            .and_then(|line| parser.parse(&line.text, reference_year))
            .is_some_and(|t| range.contains(&t));
        let keep = match mode {
            RangeMode::KeepInRange => in_range,
            RangeMode::RemoveInRange => !in_range,
        };

        match (keep, hide_from) {
            (true, Some(start)) => {
                stats.hidden += store.hide_range(start..index);
                stats.runs += 1;
                hide_from = None;
            }
            (false, None) => hide_from = Some(index),
            _ => {}
        }
    }

    if let Some(start) = hide_from {
        stats.hidden += store.hide_range(start..store.len());
        stats.runs += 1;
    }

    tracing::debug!(
        range = %range,
        ?mode,
        examined = stats.examined,
        hidden = stats.hidden,
        runs = stats.runs,
        "Range filter applied"
    );
    stats
}

// =============================================================================
// Pattern filter
// =============================================================================

/// Compile a user-supplied filter pattern.
///
/// Empty input is rejected here; front ends treat it as "cancel" and never
/// call the filter.
pub fn compile_pattern(pattern: &str) -> Result<Regex, FilterError> {
    if pattern.is_empty() {
        return Err(FilterError::EmptyPattern);
    }
    if pattern.len() > constants::MAX_PATTERN_LENGTH {
        return Err(FilterError::PatternTooLong {
            length: pattern.len(),
            max_length: constants::MAX_PATTERN_LENGTH,
        });
    }
    Regex::new(pattern).map_err(|e| FilterError::InvalidPattern {
        pattern: pattern.to_string(),
        source: e,
    })
}

/// Hide lines that do not match (`KeepMatching`) or that match
/// (`RemoveMatching`) `pattern`. Unanchored search.
pub fn apply_pattern_filter(
    store: &mut LineStore,
    pattern: &Regex,
    mode: PatternMode,
) -> FilterStats {
    let mut stats = FilterStats {
        examined: store.len(),
        ..Default::default()
    };

    for index in 0..store.len() {
        let matched = store
            .line(index)
            .is_some_and(|line| pattern.is_match(&line.text));
        let keep = match mode {
            PatternMode::KeepMatching => matched,
            PatternMode::RemoveMatching => !matched,
        };
        if !keep && store.is_visible(index) {
            store.set_visible(index, false);
            stats.hidden += 1;
        }
    }

    tracing::debug!(
        pattern = pattern.as_str(),
        ?mode,
        examined = stats.examined,
        hidden = stats.hidden,
        "Pattern filter applied"
    );
    stats
}

/// Timestamp of the first line that carries a parseable one.
///
/// Used to anchor time-only range bounds to the log's own day.
pub fn first_timestamp(
    store: &LineStore,
    parser: &TimestampParser,
    reference_year: i32,
) -> Option<Timestamp> {
    store
        .lines()
        .iter()
        .find_map(|line| parser.parse(&line.text, reference_year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const YEAR: i32 = 2024;

    fn at(h: u32, m: u32, s: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(YEAR, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
            .and_utc()
    }

    fn visible(store: &LineStore) -> Vec<&str> {
        store.visible_lines().map(|l| l.text.as_str()).collect()
    }

    fn abc() -> LineStore {
        LineStore::load_lines(["Mar 1 10:00:00 a", "Mar 1 11:00:00 b", "Mar 1 12:00:00 c"])
    }

    #[test]
    fn test_keep_in_range_scenario() {
        let mut store = abc();
        let range = TimeRange::new(at(10, 30, 0), at(11, 30, 0));
        let stats = apply_range_filter(
            &mut store,
            &range,
            RangeMode::KeepInRange,
            &TimestampParser::default(),
            YEAR,
        );
        assert_eq!(visible(&store), vec!["Mar 1 11:00:00 b"]);
        assert_eq!(stats.hidden, 2);
        assert_eq!(stats.runs, 2);
    }

    #[test]
    fn test_boundaries_half_open() {
        let mut store = abc();
        let range = TimeRange::new(at(10, 0, 0), at(11, 0, 0));
        apply_range_filter(
            &mut store,
            &range,
            RangeMode::KeepInRange,
            &TimestampParser::default(),
            YEAR,
        );
        // Start is inclusive, end is exclusive.
        assert_eq!(visible(&store), vec!["Mar 1 10:00:00 a"]);
    }

    #[test]
    fn test_remove_in_range_is_complement() {
        let parser = TimestampParser::default();
        let range = TimeRange::new(at(10, 30, 0), at(11, 30, 0));

        let mut store = abc();
        apply_range_filter(&mut store, &range, RangeMode::RemoveInRange, &parser, YEAR);
        assert_eq!(visible(&store), vec!["Mar 1 10:00:00 a", "Mar 1 12:00:00 c"]);
    }

    #[test]
    fn test_range_never_reveals_hidden_lines() {
        let parser = TimestampParser::default();
        let mut store = abc();
        store.set_visible(0, false);

        let range = TimeRange::new(at(9, 0, 0), at(13, 0, 0));
        let stats = apply_range_filter(&mut store, &range, RangeMode::RemoveInRange, &parser, YEAR);
        assert_eq!(visible(&store), Vec::<&str>::new());
        assert_eq!(stats.hidden, 2, "line 0 was already hidden");
        assert!(!store.is_visible(0));
    }

    #[test]
    fn test_start_after_end_is_empty_range() {
        let parser = TimestampParser::default();
        let range = TimeRange::new(at(12, 0, 0), at(10, 0, 0));

        let mut keep = abc();
        apply_range_filter(&mut keep, &range, RangeMode::KeepInRange, &parser, YEAR);
        assert_eq!(keep.visible_count(), 0);

        let mut remove = abc();
        apply_range_filter(&mut remove, &range, RangeMode::RemoveInRange, &parser, YEAR);
        assert_eq!(remove.visible_count(), 3);
    }

    #[test]
    fn test_unparseable_timestamps() {
        let parser = TimestampParser::default();
        let lines = ["no stamp", "-- MARK --", ""];
        let range = TimeRange::bounded(None, None);

        let mut keep = LineStore::load_lines(lines);
        let stats = apply_range_filter(&mut keep, &range, RangeMode::KeepInRange, &parser, YEAR);
        assert_eq!(keep.visible_count(), 0);
        assert_eq!(stats.runs, 1, "one run closed at end of input");

        let mut remove = LineStore::load_lines(lines);
        apply_range_filter(&mut remove, &range, RangeMode::RemoveInRange, &parser, YEAR);
        assert_eq!(remove.visible_count(), 3);
    }

    #[test]
    fn test_non_monotonic_and_mixed_lines() {
        let parser = TimestampParser::default();
        let mut store = LineStore::load_lines([
            "Mar 1 11:00:00 in",
            "Mar 1 09:00:00 out",
            "continuation without stamp",
            "Mar 1 11:10:00 in",
            "Mar 1 23:00:00 out",
            "Mar 1 11:20:00 in",
        ]);
        let range = TimeRange::new(at(10, 0, 0), at(12, 0, 0));
        let stats = apply_range_filter(&mut store, &range, RangeMode::KeepInRange, &parser, YEAR);
        assert_eq!(
            visible(&store),
            vec!["Mar 1 11:00:00 in", "Mar 1 11:10:00 in", "Mar 1 11:20:00 in"]
        );
        assert_eq!(stats.runs, 2);
        assert_eq!(stats.hidden, 3);
    }

    #[test]
    fn test_empty_store_is_noop() {
        let parser = TimestampParser::default();
        let mut store = LineStore::load_lines(Vec::<String>::new());
        let range = TimeRange::new(at(10, 0, 0), at(11, 0, 0));
        let stats = apply_range_filter(&mut store, &range, RangeMode::KeepInRange, &parser, YEAR);
        assert_eq!(stats, FilterStats::default());

        let re = compile_pattern("x").unwrap();
        apply_pattern_filter(&mut store, &re, PatternMode::KeepMatching);
        assert_eq!(store.visible_lines().count(), 0);
    }

    #[test]
    fn test_keep_matching_scenario() {
        let mut store = LineStore::load_lines(["foo ERROR x", "foo INFO y", "foo ERROR z"]);
        let re = compile_pattern("ERROR").unwrap();
        let stats = apply_pattern_filter(&mut store, &re, PatternMode::KeepMatching);
        assert!(store.is_visible(0));
        assert!(!store.is_visible(1));
        assert!(store.is_visible(2));
        assert_eq!(stats.hidden, 1);
    }

    #[test]
    fn test_keep_then_remove_hides_everything() {
        let mut store = LineStore::load_lines(["foo ERROR x", "foo INFO y", "foo ERROR z"]);
        let re = compile_pattern("ERROR").unwrap();
        apply_pattern_filter(&mut store, &re, PatternMode::KeepMatching);
        apply_pattern_filter(&mut store, &re, PatternMode::RemoveMatching);
        assert_eq!(store.visible_count(), 0);
    }

    #[test]
    fn test_pattern_is_unanchored_search() {
        let mut store = LineStore::load_lines(["sshd[12]: Failed password", "cron: ok"]);
        let re = compile_pattern(r"Fail\w+").unwrap();
        apply_pattern_filter(&mut store, &re, PatternMode::RemoveMatching);
        assert_eq!(visible(&store), vec!["cron: ok"]);
    }

    #[test]
    fn test_compile_pattern_errors() {
        assert!(matches!(compile_pattern(""), Err(FilterError::EmptyPattern)));
        assert!(matches!(
            compile_pattern("[invalid"),
            Err(FilterError::InvalidPattern { .. })
        ));
        let long = "a".repeat(constants::MAX_PATTERN_LENGTH + 1);
        assert!(matches!(
            compile_pattern(&long),
            Err(FilterError::PatternTooLong { .. })
        ));
    }

    #[test]
    fn test_first_timestamp_skips_unstamped_lines() {
        let parser = TimestampParser::default();
        let store = LineStore::load_lines(["header", "Mar 1 10:00:00 a"]);
        assert_eq!(first_timestamp(&store, &parser, YEAR), Some(at(10, 0, 0)));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(RangeMode::from_name("Remove"), Some(RangeMode::RemoveInRange));
        assert_eq!(PatternMode::from_name("keep"), Some(PatternMode::KeepMatching));
        assert_eq!(PatternMode::from_name("drop"), None);
        assert_eq!(RangeMode::RemoveInRange.label(), "remove");
    }

    #[test]
    fn test_time_range_is_empty() {
        assert!(TimeRange::new(at(11, 0, 0), at(11, 0, 0)).is_empty());
        assert!(TimeRange::new(at(12, 0, 0), at(11, 0, 0)).is_empty());
        assert!(!TimeRange::new(at(11, 0, 0), at(11, 0, 1)).is_empty());
        assert!(!TimeRange::bounded(None, None).is_empty());
    }

    #[test]
    fn test_time_range_display() {
        let range = TimeRange::new(at(10, 0, 0), at(11, 0, 0));
        assert_eq!(range.to_string(), "[2024-03-01 10:00:00, 2024-03-01 11:00:00)");
    }
}
