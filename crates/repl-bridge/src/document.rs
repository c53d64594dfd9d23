//! Read-only document model.
//!
//! The bridge never owns editor text. It reads lines through the [`Document`] trait, which uses
//! **1-indexed** line numbers to match the editor-facing coordinates in [`crate::CursorPosition`].

use crate::text::split_lines_preserve_trailing;
use ropey::Rope;
use std::borrow::Cow;

/// An ordered, 1-indexed sequence of lines.
pub trait Document {
    /// Number of lines in the document.
    fn line_count(&self) -> usize;

    /// Line `number` (1-indexed) without its line break, or `None` if out of range.
    fn line(&self, number: usize) -> Option<Cow<'_, str>>;
}

impl Document for [String] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, number: usize) -> Option<Cow<'_, str>> {
        let idx = number.checked_sub(1)?;
        self.get(idx).map(|line| Cow::Borrowed(line.as_str()))
    }
}

impl Document for Vec<String> {
    fn line_count(&self) -> usize {
        self.as_slice().line_count()
    }

    fn line(&self, number: usize) -> Option<Cow<'_, str>> {
        self.as_slice().line(number)
    }
}

impl Document for [&str] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, number: usize) -> Option<Cow<'_, str>> {
        let idx = number.checked_sub(1)?;
        self.get(idx).map(|line| Cow::Borrowed(*line))
    }
}

/// Rope-backed document snapshot.
///
/// Rope provides O(log N) line access, which keeps chunk searches over large notebooks cheap.
/// CRLF input is normalized to LF on load.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    rope: Rope,
}

impl TextDocument {
    /// Create an empty document (one empty line).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from text (N newlines => N+1 lines).
    pub fn from_text(text: &str) -> Self {
        let rope = if text.contains('\r') {
            Rope::from_str(&split_lines_preserve_trailing(text).join("\n"))
        } else {
            Rope::from_str(text)
        };
        Self { rope }
    }

    /// Build a document from individual lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (idx, line) in lines.into_iter().enumerate() {
            if idx > 0 {
                text.push('\n');
            }
            text.push_str(line.as_ref());
        }
        Self::from_text(&text)
    }

    /// Replace the whole content.
    pub fn set_text(&mut self, text: &str) {
        *self = Self::from_text(text);
    }

    /// Full text of the document.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }
}

impl Document for TextDocument {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line(&self, number: usize) -> Option<Cow<'_, str>> {
        let idx = number.checked_sub(1)?;
        if idx >= self.rope.len_lines() {
            return None;
        }
        Some(strip_line_break(self.rope.line(idx).into()))
    }
}

/// Drop the trailing `\n`. Only LF breaks lines (the rope is built without Unicode line breaks),
/// so form feeds, lone `\r`, and U+2028/U+2029 stay part of the line.
fn strip_line_break(line: Cow<'_, str>) -> Cow<'_, str> {
    match line {
        Cow::Borrowed(s) => Cow::Borrowed(s.strip_suffix('\n').unwrap_or(s)),
        Cow::Owned(mut s) => {
            if s.ends_with('\n') {
                s.pop();
            }
            Cow::Owned(s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_document_lines_are_one_indexed() {
        let doc = TextDocument::from_text("a\r\nb\nc");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line(0), None);
        assert_eq!(doc.line(1).as_deref(), Some("a"));
        assert_eq!(doc.line(3).as_deref(), Some("c"));
        assert_eq!(doc.line(4), None);
    }

    #[test]
    fn test_trailing_newline_yields_empty_last_line() {
        let doc = TextDocument::from_lines(["x", ""]);
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.line(2).as_deref(), Some(""));
        assert_eq!(doc.text(), "x\n");
    }

    #[test]
    fn test_only_line_feed_breaks_lines() {
        let text = "```{r}\nx <- 1\x0c\ny <- 'a\u{2028}b'\u{2029}\rz\u{85}\n```";
        let doc = TextDocument::from_text(text);
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line(2).as_deref(), Some("x <- 1\x0c"));
        assert_eq!(doc.line(3).as_deref(), Some("y <- 'a\u{2028}b'\u{2029}\rz\u{85}"));
        assert_eq!(doc.line(4).as_deref(), Some("```"));
    }

    #[test]
    fn test_string_slices_implement_document() {
        let lines = vec!["one".to_string(), "two".to_string()];
        assert_eq!(lines.line_count(), 2);
        assert_eq!(lines.line(2).as_deref(), Some("two"));
        assert_eq!(lines.line(3), None);
    }
}
