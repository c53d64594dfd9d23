//! Region extraction.
//!
//! A [`Region`] is the ordered list of lines one dispatch delivers to the REPL. Each
//! [`RegionKind`] has its own boundary rules:
//!
//! - [`RegionKind::Line`]: the cursor line.
//! - [`RegionKind::Selection`]: the selected text, trimmed to the selection columns.
//! - [`RegionKind::Chunk`]: the lines strictly between the delimiters of the chunk around the
//!   cursor. The cursor may sit on either delimiter line.
//! - [`RegionKind::PreviousChunks`]: the non-blank content of every chunk from the top of the
//!   document through the cursor line.
//!
//! Extraction is pure: it only reads the document, cursor, and selection.

use crate::document::Document;
use crate::error::ExtractionError;
use crate::host::{CursorPosition, SelectionBounds};
use crate::pattern::ChunkPattern;
use crate::text::{char_slice, char_suffix, is_blank};

/// Extraction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Current line.
    Line,
    /// Active selection.
    Selection,
    /// Chunk around the cursor.
    Chunk,
    /// All chunks above (and including) the cursor line.
    PreviousChunks,
}

impl RegionKind {
    /// Human-readable name used in messages and log records.
    pub fn label(self) -> &'static str {
        match self {
            RegionKind::Line => "line",
            RegionKind::Selection => "selection",
            RegionKind::Chunk => "chunk",
            RegionKind::PreviousChunks => "previous chunks",
        }
    }
}

/// Extracted lines, tagged with the mode that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Extraction mode.
    pub kind: RegionKind,
    /// Lines in document order.
    pub lines: Vec<String>,
}

impl Region {
    /// Create a region.
    pub fn new(kind: RegionKind, lines: Vec<String>) -> Self {
        Self { kind, lines }
    }

    /// Returns `true` if every line is blank after trimming.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| is_blank(line))
    }

    /// Non-blank lines, in order.
    pub fn non_blank_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|line| !is_blank(line))
    }
}

/// Delimiter lines of a chunk (1-indexed, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBounds {
    /// Start delimiter line.
    pub start: usize,
    /// End delimiter line.
    pub end: usize,
}

impl ChunkBounds {
    /// Returns `true` if `line` lies within `[start, end]`.
    pub fn contains(&self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

/// Extracts regions using a compiled [`ChunkPattern`].
#[derive(Debug, Clone)]
pub struct RegionExtractor {
    pattern: ChunkPattern,
}

impl RegionExtractor {
    /// Create an extractor.
    pub fn new(pattern: ChunkPattern) -> Self {
        Self { pattern }
    }

    /// The delimiter pair in use.
    pub fn pattern(&self) -> &ChunkPattern {
        &self.pattern
    }

    /// Extract the region for `kind`.
    pub fn extract(
        &self,
        kind: RegionKind,
        document: &dyn Document,
        cursor: CursorPosition,
        selection: Option<SelectionBounds>,
    ) -> Result<Region, ExtractionError> {
        let lines = match kind {
            RegionKind::Line => self.line(document, cursor.line),
            RegionKind::Selection => {
                let bounds = selection.ok_or(ExtractionError::NoSelection)?;
                self.selection(document, bounds)
            }
            RegionKind::Chunk => {
                let bounds = self.chunk_bounds(document, cursor.line)?;
                self.chunk_lines(document, bounds)
            }
            RegionKind::PreviousChunks => self.previous_chunks(document, cursor.line),
        };
        Ok(Region::new(kind, lines))
    }

    /// The cursor line as a one-element sequence (empty if out of range).
    pub fn line(&self, document: &dyn Document, line: usize) -> Vec<String> {
        document
            .line(line)
            .map(|text| vec![text.into_owned()])
            .unwrap_or_default()
    }

    /// Text covered by `bounds`.
    ///
    /// A single-line selection yields the substring between the columns. A multi-line selection
    /// keeps the first line from its start column, the last line up to its end column, and the
    /// interior lines whole. The result is empty if the selected text is blank.
    pub fn selection(&self, document: &dyn Document, bounds: SelectionBounds) -> Vec<String> {
        let SelectionBounds { start, end } = bounds;
        let last = end.line.min(document.line_count());

        let mut lines = Vec::new();
        for number in start.line.max(1)..=last {
            let Some(text) = document.line(number) else {
                break;
            };
            let piece = if start.line == end.line {
                char_slice(&text, start.column, end.column)
            } else if number == start.line {
                char_suffix(&text, start.column)
            } else if number == end.line {
                char_slice(&text, 0, end.column)
            } else {
                &*text
            };
            lines.push(piece.to_string());
        }

        if lines.iter().all(|line| is_blank(line)) {
            lines.clear();
        }
        lines
    }

    /// Locate the chunk around `cursor_line`.
    ///
    /// Searches backward (cursor line included) for the nearest start delimiter, then forward
    /// from the line after it for the nearest end delimiter. The cursor must lie within
    /// `[start, end]`.
    pub fn chunk_bounds(
        &self,
        document: &dyn Document,
        cursor_line: usize,
    ) -> Result<ChunkBounds, ExtractionError> {
        let from = cursor_line.min(document.line_count());
        let start = (1..=from)
            .rev()
            .find(|&n| document.line(n).is_some_and(|l| self.pattern.is_start(&l)))
            .ok_or(ExtractionError::ChunkStartNotFound { cursor_line })?;

        let end = (start + 1..=document.line_count())
            .find(|&n| document.line(n).is_some_and(|l| self.pattern.is_end(&l)))
            .ok_or(ExtractionError::ChunkEndNotFound { start })?;

        let bounds = ChunkBounds { start, end };
        if !bounds.contains(cursor_line) {
            return Err(ExtractionError::CursorOutsideChunk {
                cursor_line,
                start,
                end,
            });
        }
        Ok(bounds)
    }

    /// Lines strictly between the delimiters of `bounds`.
    pub fn chunk_lines(&self, document: &dyn Document, bounds: ChunkBounds) -> Vec<String> {
        (bounds.start + 1..bounds.end)
            .filter_map(|n| document.line(n).map(|l| l.into_owned()))
            .collect()
    }

    /// The next start delimiter strictly after `line`.
    pub fn next_chunk_start(&self, document: &dyn Document, line: usize) -> Option<usize> {
        (line + 1..=document.line_count())
            .find(|&n| document.line(n).is_some_and(|l| self.pattern.is_start(&l)))
    }

    /// Non-blank chunk content from line 1 through `cursor_line`, in document order.
    ///
    /// Two start delimiters without an end in between are not rejected: content keeps
    /// accumulating until an end delimiter is seen.
    pub fn previous_chunks(&self, document: &dyn Document, cursor_line: usize) -> Vec<String> {
        let last = cursor_line.min(document.line_count());
        let mut inside_chunk = false;
        let mut lines = Vec::new();

        for number in 1..=last {
            let Some(text) = document.line(number) else {
                break;
            };
            if self.pattern.is_start(&text) {
                inside_chunk = true;
            } else if self.pattern.is_end(&text) {
                inside_chunk = false;
            } else if inside_chunk && !is_blank(&text) {
                lines.push(text.into_owned());
            }
        }
        lines
    }
}
