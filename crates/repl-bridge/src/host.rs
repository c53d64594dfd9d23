//! Host collaborator interfaces.
//!
//! The bridge is UI-agnostic. Everything it needs from the editor is behind [`EditorHost`], and
//! everything it needs from the operating system (or a terminal emulator) is behind
//! [`ProcessHost`]. Both are driven from the caller's thread only.

use crate::config::CommandLine;
use crate::document::{Document, TextDocument};
use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Opaque identifier for an editing context (tab, window group, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(u64);

impl ContextId {
    /// Wrap a host-provided numeric id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cursor coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    /// 1-indexed line number.
    pub line: usize,
    /// 0-indexed character column.
    pub column: usize,
}

impl CursorPosition {
    /// Create a new cursor position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for CursorPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for CursorPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Selection range. The end column is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBounds {
    /// Selection start.
    pub start: CursorPosition,
    /// Selection end (exclusive column).
    pub end: CursorPosition,
}

impl SelectionBounds {
    /// Create a selection; bounds are normalized so that `start <= end`.
    pub fn new(start: CursorPosition, end: CursorPosition) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Selection covering whole lines `first..=last`.
    pub fn lines(first: usize, last: usize) -> Self {
        Self::new(
            CursorPosition::new(first, 0),
            CursorPosition::new(last, usize::MAX),
        )
    }
}

/// Severity of a message surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational status.
    Info,
    /// Something failed.
    Error,
}

/// Editor-side collaborator.
pub trait EditorHost {
    /// Editing context the current operation belongs to.
    fn context_id(&self) -> ContextId;

    /// The current document (read-only).
    fn document(&self) -> &dyn Document;

    /// Current cursor position.
    fn cursor(&self) -> CursorPosition;

    /// Current selection, if selection mode is active.
    fn selection(&self) -> Option<SelectionBounds>;

    /// Move the cursor to the start of `line` (1-indexed).
    fn move_cursor(&mut self, line: usize);

    /// Leave selection mode.
    fn exit_selection(&mut self);

    /// Give focus back to `context` (e.g. after a REPL view was opened).
    fn restore_focus(&mut self, context: ContextId);

    /// Surface a human-readable message.
    fn notify(&mut self, level: MessageLevel, message: &str);
}

/// Process-side collaborator.
///
/// `Handle` identifies a REPL process together with the view it is attached to.
pub trait ProcessHost {
    /// Handle for a spawned process.
    type Handle: Clone + fmt::Debug;

    /// Resolve `program` to an executable path.
    fn resolve_executable(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    /// Spawn `command_line` attached to a new view of `width` columns.
    fn spawn(&mut self, command_line: &CommandLine, width: u16) -> io::Result<Self::Handle>;

    /// Returns `true` if the view backing `handle` still exists.
    fn buffer_exists(&self, handle: &Self::Handle) -> bool;

    /// Returns `true` if the process behind `handle` is running.
    fn is_running(&mut self, handle: &Self::Handle) -> bool;

    /// Hand `bytes` to the process input.
    fn write(&mut self, handle: &Self::Handle, bytes: &[u8]) -> io::Result<()>;

    /// OS process id, if known.
    fn process_id(&self, handle: &Self::Handle) -> Option<u32>;
}

/// In-memory [`EditorHost`].
///
/// Keeps a rope-backed document, a cursor, an optional selection, and records messages and
/// focus changes. Useful for hosts that mirror their state into the bridge before each call.
#[derive(Debug, Clone)]
pub struct MemoryEditor {
    context: ContextId,
    document: TextDocument,
    cursor: CursorPosition,
    selection: Option<SelectionBounds>,
    focused: Option<ContextId>,
    messages: Vec<(MessageLevel, String)>,
}

impl MemoryEditor {
    /// Create an editor for `context` showing `text`, cursor on line 1.
    pub fn new(context: ContextId, text: &str) -> Self {
        Self {
            context,
            document: TextDocument::from_text(text),
            cursor: CursorPosition::new(1, 0),
            selection: None,
            focused: None,
            messages: Vec::new(),
        }
    }

    /// Create an editor from individual lines.
    pub fn from_lines<I, S>(context: ContextId, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut editor = Self::new(context, "");
        editor.document = TextDocument::from_lines(lines);
        editor
    }

    /// Set the cursor (line is clamped to the document).
    pub fn set_cursor(&mut self, line: usize, column: usize) {
        let line = line.clamp(1, self.document.line_count().max(1));
        self.cursor = CursorPosition::new(line, column);
    }

    /// Enter selection mode with `bounds`.
    pub fn select(&mut self, bounds: SelectionBounds) {
        self.selection = Some(bounds);
    }

    /// Replace the document text.
    pub fn set_text(&mut self, text: &str) {
        self.document.set_text(text);
        let line = self.cursor.line;
        self.set_cursor(line, 0);
    }

    /// Last context focus was restored to.
    pub fn focused(&self) -> Option<ContextId> {
        self.focused
    }

    /// Messages surfaced so far.
    pub fn messages(&self) -> &[(MessageLevel, String)] {
        &self.messages
    }

    /// Take and clear recorded messages.
    pub fn take_messages(&mut self) -> Vec<(MessageLevel, String)> {
        std::mem::take(&mut self.messages)
    }
}

impl EditorHost for MemoryEditor {
    fn context_id(&self) -> ContextId {
        self.context
    }

    fn document(&self) -> &dyn Document {
        &self.document
    }

    fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    fn selection(&self) -> Option<SelectionBounds> {
        self.selection
    }

    fn move_cursor(&mut self, line: usize) {
        self.set_cursor(line, 0);
    }

    fn exit_selection(&mut self) {
        self.selection = None;
    }

    fn restore_focus(&mut self, context: ContextId) {
        self.focused = Some(context);
    }

    fn notify(&mut self, level: MessageLevel, message: &str) {
        self.messages.push((level, message.to_string()));
    }
}
