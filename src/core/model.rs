// syslogview - core/model.rs
//
// Core data model: the ordered line store and its visibility flags.
// Pure data definitions with no I/O, no UI, no platform dependencies.

use chrono::{DateTime, Utc};
use std::ops::Range;

/// A point in time extracted from a log line.
///
/// Syslog prefixes carry no zone; the wall-clock value is taken as UTC.
pub type Timestamp = DateTime<Utc>;

// =============================================================================
// Line
// =============================================================================

/// A single log line. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 0-based position in the store.
    pub index: usize,

    /// Original text, without the trailing newline.
    pub text: String,
}

impl Line {
    /// 1-based line number for display and error messages.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

// =============================================================================
// LineStore
// =============================================================================

/// Ordered sequence of lines plus one visibility flag per line.
///
/// Filters only ever clear flags; [`LineStore::reset_visibility`] is the one
/// way back to an all-visible state.
#[derive(Debug, Clone, Default)]
pub struct LineStore {
    lines: Vec<Line>,
    visible: Vec<bool>,
}

impl LineStore {
    /// Build a store from any sequence of strings. Every line starts visible.
    pub fn load_lines<I, S>(text: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<Line> = text
            .into_iter()
            .enumerate()
            .map(|(index, s)| Line {
                index,
                text: s.into(),
            })
            .collect();
        let visible = vec![true; lines.len()];
        tracing::debug!(lines = lines.len(), "Line store loaded");
        Self { lines, visible }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// All lines in order, regardless of visibility.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Set one line's flag. Out-of-range indices are ignored.
    pub fn set_visible(&mut self, index: usize, visible: bool) {
        match self.visible.get_mut(index) {
            Some(flag) => *flag = visible,
            None => tracing::debug!(index, len = self.lines.len(), "set_visible out of range"),
        }
    }

    /// Out-of-range indices report `false`.
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    /// Hide a contiguous run of lines, returning how many were visible before.
    ///
    /// The range is clamped to the store length.
    pub fn hide_range(&mut self, range: Range<usize>) -> usize {
        let end = range.end.min(self.visible.len());
        let start = range.start.min(end);
        let mut newly_hidden = 0;
        for flag in &mut self.visible[start..end] {
            if *flag {
                *flag = false;
                newly_hidden += 1;
            }
        }
        newly_hidden
    }

    /// Make every line visible again.
    pub fn reset_visibility(&mut self) {
        self.visible.iter_mut().for_each(|flag| *flag = true);
    }

    /// Visible lines in original order.
    ///
    /// Lazily re-scans the flags on every call, so it always reflects the
    /// latest filter state.
    pub fn visible_lines(&self) -> impl Iterator<Item = &Line> + Clone + '_ {
        self.lines
            .iter()
            .zip(self.visible.iter())
            .filter(|(_, visible)| **visible)
            .map(|(line, _)| line)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(it: impl Iterator<Item = &'a Line>) -> Vec<&'a str> {
        it.map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_load_lines_all_visible() {
        let store = LineStore::load_lines(["a", "b", "c"]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.visible_count(), 3);
        assert_eq!(texts(store.visible_lines()), vec!["a", "b", "c"]);
        assert_eq!(store.line(1).map(Line::number), Some(2));
    }

    #[test]
    fn test_set_visible_and_rescan() {
        let mut store = LineStore::load_lines(["a", "b", "c"]);
        let view = store.visible_lines().count();
        assert_eq!(view, 3);

        store.set_visible(1, false);
        assert!(!store.is_visible(1));
        assert_eq!(texts(store.visible_lines()), vec!["a", "c"]);

        // Restartable: a second scan yields the same result.
        let first = texts(store.visible_lines());
        let second = texts(store.visible_lines());
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut store = LineStore::load_lines(["a"]);
        store.set_visible(5, false);
        assert!(!store.is_visible(5));
        assert!(store.is_visible(0));
    }

    #[test]
    fn test_hide_range_counts_only_newly_hidden() {
        let mut store = LineStore::load_lines(["a", "b", "c", "d"]);
        store.set_visible(1, false);
        assert_eq!(store.hide_range(0..3), 2);
        assert_eq!(texts(store.visible_lines()), vec!["d"]);
        // Clamped past the end.
        assert_eq!(store.hide_range(2..100), 1);
        assert_eq!(store.visible_count(), 0);
    }

    #[test]
    fn test_reset_visibility() {
        let mut store = LineStore::load_lines(["a", "b"]);
        store.hide_range(0..2);
        store.reset_visibility();
        assert_eq!(store.visible_count(), 2);
    }

    #[test]
    fn test_empty_store() {
        let store = LineStore::load_lines(Vec::<String>::new());
        assert!(store.is_empty());
        assert_eq!(store.visible_lines().count(), 0);
    }
}
