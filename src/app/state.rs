// syslogview - app/state.rs
//
// Viewer state: one line store, the configured timestamp parser, and the
// ordered list of filters applied so far. Driven by a front end, one user
// action per call.

use crate::core::filter::{self, FilterStats, PatternMode, RangeMode, TimeRange};
use crate::core::model::{Line, LineStore, Timestamp};
use crate::core::timestamp::TimestampParser;
use crate::util::error::{FilterError, ParseError};
use std::fmt;

/// A filter that has been applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedFilter {
    Range { range: TimeRange, mode: RangeMode },
    Pattern { pattern: String, mode: PatternMode },
}

impl fmt::Display for AppliedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { range, mode } => write!(f, "{} range {range}", mode.label()),
            Self::Pattern { pattern, mode } => {
                write!(f, "{} matching /{pattern}/", mode.label())
            }
        }
    }
}

/// Top-level viewer state.
#[derive(Debug)]
pub struct ViewerState {
    store: LineStore,
    parser: TimestampParser,
    history: Vec<(AppliedFilter, FilterStats)>,
}

impl ViewerState {
    pub fn new(store: LineStore, parser: TimestampParser) -> Self {
        Self {
            store,
            parser,
            history: Vec::new(),
        }
    }

    pub fn store(&self) -> &LineStore {
        &self.store
    }

    pub fn parser(&self) -> &TimestampParser {
        &self.parser
    }

    pub fn visible_lines(&self) -> impl Iterator<Item = &Line> + Clone + '_ {
        self.store.visible_lines()
    }

    /// Filters applied since load or the last reset, oldest first.
    pub fn history(&self) -> &[(AppliedFilter, FilterStats)] {
        &self.history
    }

    /// Parse a user-supplied range bound.
    ///
    /// A bare `HH:MM:SS` is placed on the day of the first stamped line.
    pub fn parse_bound(&self, raw: &str) -> Result<Timestamp, ParseError> {
        let year = self.parser.reference_year();
        let anchor = filter::first_timestamp(&self.store, &self.parser, year)
            .map(|ts| ts.date_naive());
        self.parser.parse_bound(raw, year, anchor)
    }

    /// Verify that every line carries a parseable timestamp.
    ///
    /// Returns the first failure in line order.
    pub fn check_timestamps(&self) -> Result<(), ParseError> {
        let year = self.parser.reference_year();
        for line in self.store.lines() {
            self.parser.parse_strict(&line.text, line.number(), year)?;
        }
        Ok(())
    }

    pub fn keep_in_range(&mut self, range: TimeRange) -> FilterStats {
        self.apply_range(range, RangeMode::KeepInRange)
    }

    pub fn remove_in_range(&mut self, range: TimeRange) -> FilterStats {
        self.apply_range(range, RangeMode::RemoveInRange)
    }

    pub fn apply_range(&mut self, range: TimeRange, mode: RangeMode) -> FilterStats {
        if range.is_empty() {
            tracing::warn!(
                %range,
                ?mode,
                "Range start is not before its end; no line can fall inside it"
            );
        }
        // Resolved once so the interval and year are fixed for the whole pass.
        let year = self.parser.reference_year();
        let stats = filter::apply_range_filter(&mut self.store, &range, mode, &self.parser, year);
        self.record(AppliedFilter::Range { range, mode }, stats);
        stats
    }

    /// Keep only lines matching `pattern`. Empty input cancels: `Ok(None)`.
    pub fn keep_matching(&mut self, pattern: &str) -> Result<Option<FilterStats>, FilterError> {
        self.apply_pattern(pattern, PatternMode::KeepMatching)
    }

    /// Hide lines matching `pattern`. Empty input cancels: `Ok(None)`.
    pub fn remove_matching(&mut self, pattern: &str) -> Result<Option<FilterStats>, FilterError> {
        self.apply_pattern(pattern, PatternMode::RemoveMatching)
    }

    pub fn apply_pattern(
        &mut self,
        pattern: &str,
        mode: PatternMode,
    ) -> Result<Option<FilterStats>, FilterError> {
        if pattern.is_empty() {
            tracing::debug!(?mode, "Empty pattern; filter cancelled");
            return Ok(None);
        }
        let regex = filter::compile_pattern(pattern)?;
        let stats = filter::apply_pattern_filter(&mut self.store, &regex, mode);
        self.record(
            AppliedFilter::Pattern {
                pattern: pattern.to_string(),
                mode,
            },
            stats,
        );
        Ok(Some(stats))
    }

    /// Reveal every line and forget the applied filters.
    pub fn reset(&mut self) {
        self.store.reset_visibility();
        self.history.clear();
        tracing::info!(lines = self.store.len(), "Visibility reset");
    }

    fn record(&mut self, applied: AppliedFilter, stats: FilterStats) {
        tracing::info!(
            filter = %applied,
            hidden = stats.hidden,
            visible = self.store.visible_count(),
            "Filter applied"
        );
        self.history.push((applied, stats));
    }
}
