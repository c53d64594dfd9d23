//! Bounded, width-wrapped transcript of REPL output.

use std::collections::VecDeque;

/// Default number of rows a view keeps.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Output transcript shown in the REPL view.
///
/// Incoming lines are wrapped to the view width (in characters); the oldest rows are dropped
/// once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct ReplView {
    width: usize,
    capacity: usize,
    rows: VecDeque<String>,
}

impl ReplView {
    /// Create an empty view.
    pub fn new(width: u16, capacity: usize) -> Self {
        Self {
            width: usize::from(width.max(1)),
            capacity: capacity.max(1),
            rows: VecDeque::new(),
        }
    }

    /// Wrap width in characters.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Append one logical output line.
    pub fn push_line(&mut self, line: &str) {
        if line.is_empty() {
            self.push_row(String::new());
            return;
        }

        let mut row = String::new();
        let mut count = 0;
        for ch in line.chars() {
            if count == self.width {
                self.push_row(std::mem::take(&mut row));
                count = 0;
            }
            row.push(ch);
            count += 1;
        }
        self.push_row(row);
    }

    fn push_row(&mut self, row: String) {
        if self.rows.len() == self.capacity {
            self.rows.pop_front();
        }
        self.rows.push_back(row);
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing was printed yet.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All stored rows, oldest first.
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(String::as_str)
    }

    /// The last `count` rows, oldest first.
    pub fn tail(&self, count: usize) -> Vec<&str> {
        let skip = self.rows.len().saturating_sub(count);
        self.rows.iter().skip(skip).map(String::as_str).collect()
    }

    /// Drop every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_lines_wrap_at_width() {
        let mut view = ReplView::new(4, 100);
        view.push_line("abcdefghij");
        assert_eq!(view.rows().collect::<Vec<_>>(), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrapping_counts_characters() {
        let mut view = ReplView::new(3, 100);
        view.push_line("αβγδ");
        assert_eq!(view.rows().collect::<Vec<_>>(), vec!["αβγ", "δ"]);
    }

    #[test]
    fn test_exact_width_and_empty_lines() {
        let mut view = ReplView::new(3, 100);
        view.push_line("abc");
        view.push_line("");
        assert_eq!(view.rows().collect::<Vec<_>>(), vec!["abc", ""]);
    }

    #[test]
    fn test_capacity_drops_oldest_rows() {
        let mut view = ReplView::new(80, 2);
        view.push_line("one");
        view.push_line("two");
        view.push_line("three");
        assert_eq!(view.len(), 2);
        assert_eq!(view.tail(5), vec!["two", "three"]);
        assert_eq!(view.tail(1), vec!["three"]);
    }
}
