//! Dispatch engine.
//!
//! Turns an extracted [`Region`] (or a literal [`Command`]) into writes to the REPL of the
//! editor's context, then applies the region's cursor navigation.
//!
//! Multi-line content is delivered with one of two strategies, chosen by region kind:
//!
//! - **line by line** ([`RegionKind::Line`], [`RegionKind::Selection`], literal commands): every
//!   non-blank line is written on its own, with a settle delay in between, so the REPL echoes each
//!   statement interactively;
//! - **source file** ([`RegionKind::Chunk`], [`RegionKind::PreviousChunks`]): the lines are written
//!   verbatim to a fresh temp file and a single source command is written, so multi-line
//!   constructs are evaluated as a whole.
//!
//! Delivery is fire-and-forget: success means the bytes reached the process input.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, TransmissionError};
use crate::host::{ContextId, EditorHost, MessageLevel, ProcessHost};
use crate::region::{Region, RegionExtractor, RegionKind};
use crate::session::SessionManager;
use crate::text::{is_blank, split_lines_preserve_trailing};
use repl_bridge_lang::SourceTemplate;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const LINE_TERMINATOR: &str = "\n";
const TEMP_FILE_PREFIX: &str = "repl-bridge-";

/// Per-call dispatch options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOptions {
    /// Keep the cursor on the current line after a [`RegionKind::Line`] dispatch.
    pub stay: bool,
}

impl DispatchOptions {
    /// Options that keep the cursor in place.
    pub fn stay() -> Self {
        Self { stay: true }
    }
}

/// A literal string for the REPL, with a description used only in messages and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Text to transmit (may span several lines).
    pub text: String,
    /// Human-readable description.
    pub description: String,
}

impl Command {
    /// Create a command.
    pub fn new(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    LineByLine,
    SourceFile,
}

fn strategy_for(kind: RegionKind) -> Strategy {
    match kind {
        RegionKind::Line | RegionKind::Selection => Strategy::LineByLine,
        RegionKind::Chunk | RegionKind::PreviousChunks => Strategy::SourceFile,
    }
}

/// Extracts, transmits, and navigates.
#[derive(Debug, Clone)]
pub struct DispatchEngine {
    extractor: RegionExtractor,
    source_template: SourceTemplate,
    echoes_source: bool,
    file_extension: String,
    temp_dir: Option<PathBuf>,
    line_delay: Duration,
}

impl DispatchEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            extractor: RegionExtractor::new(config.chunk_pattern().clone()),
            source_template: config.source_template().clone(),
            echoes_source: config.echoes_source(),
            file_extension: config.file_extension().to_string(),
            temp_dir: config.temp_dir().map(Path::to_path_buf),
            line_delay: config.line_delay(),
        }
    }

    /// The region extractor.
    pub fn extractor(&self) -> &RegionExtractor {
        &self.extractor
    }

    /// Extract the `kind` region around the editor's cursor and send it to the context's REPL.
    ///
    /// Returns `false` if no session could be ensured, extraction failed, or the write failed.
    /// Failures have already been reported through [`EditorHost::notify`].
    pub fn dispatch<P, E>(
        &self,
        sessions: &mut SessionManager<P>,
        editor: &mut E,
        kind: RegionKind,
        options: DispatchOptions,
    ) -> bool
    where
        P: ProcessHost,
        E: EditorHost + ?Sized,
    {
        if !sessions.ensure(editor) {
            return false;
        }

        let result = match kind {
            RegionKind::Line => self.dispatch_line(sessions, editor, options),
            RegionKind::Selection => self.dispatch_selection(sessions, editor),
            RegionKind::Chunk => self.dispatch_chunk(sessions, editor),
            RegionKind::PreviousChunks => self.dispatch_previous_chunks(sessions, editor),
        };
        self.finish(sessions, editor, kind.label(), result)
    }

    /// Send a literal command to the context's REPL, line by line. Never moves the cursor.
    pub fn send_command<P, E>(
        &self,
        sessions: &mut SessionManager<P>,
        editor: &mut E,
        command: &Command,
    ) -> bool
    where
        P: ProcessHost,
        E: EditorHost + ?Sized,
    {
        if !sessions.ensure(editor) {
            return false;
        }

        let context = editor.context_id();
        let lines: Vec<String> = split_lines_preserve_trailing(&command.text)
            .into_iter()
            .filter(|line| !is_blank(line))
            .collect();
        tracing::debug!(
            context = %context,
            description = %command.description,
            lines = lines.len(),
            "sending command"
        );
        let result = self.send_lines_individually(sessions, context, &lines);
        self.finish(sessions, editor, &command.description, result)
    }

    fn dispatch_line<P, E>(
        &self,
        sessions: &mut SessionManager<P>,
        editor: &mut E,
        options: DispatchOptions,
    ) -> Result<(), BridgeError>
    where
        P: ProcessHost,
        E: EditorHost + ?Sized,
    {
        let cursor = editor.cursor();
        let region = Region::new(
            RegionKind::Line,
            self.extractor.line(editor.document(), cursor.line),
        );
        self.transmit(sessions, editor.context_id(), &region)?;

        if !options.stay {
            let last = editor.document().line_count().max(1);
            editor.move_cursor((cursor.line + 1).min(last));
        }
        Ok(())
    }

    fn dispatch_selection<P, E>(
        &self,
        sessions: &mut SessionManager<P>,
        editor: &mut E,
    ) -> Result<(), BridgeError>
    where
        P: ProcessHost,
        E: EditorHost + ?Sized,
    {
        let region = self.extractor.extract(
            RegionKind::Selection,
            editor.document(),
            editor.cursor(),
            editor.selection(),
        )?;
        self.transmit(sessions, editor.context_id(), &region)?;

        // `extract` succeeded, so a selection is present.
        if let Some(bounds) = editor.selection() {
            let last = editor.document().line_count().max(1);
            editor.exit_selection();
            editor.move_cursor((bounds.end.line + 1).min(last));
        }
        Ok(())
    }

    fn dispatch_chunk<P, E>(
        &self,
        sessions: &mut SessionManager<P>,
        editor: &mut E,
    ) -> Result<(), BridgeError>
    where
        P: ProcessHost,
        E: EditorHost + ?Sized,
    {
        let document = editor.document();
        let bounds = self.extractor.chunk_bounds(document, editor.cursor().line)?;
        let region = Region::new(RegionKind::Chunk, self.extractor.chunk_lines(document, bounds));
        let next = self.extractor.next_chunk_start(document, bounds.end);
        let last = document.line_count().max(1);

        self.transmit(sessions, editor.context_id(), &region)?;

        match next {
            Some(start) => editor.move_cursor((start + 1).min(last)),
            None => editor.move_cursor(bounds.end),
        }
        Ok(())
    }

    fn dispatch_previous_chunks<P, E>(
        &self,
        sessions: &mut SessionManager<P>,
        editor: &mut E,
    ) -> Result<(), BridgeError>
    where
        P: ProcessHost,
        E: EditorHost + ?Sized,
    {
        let region = Region::new(
            RegionKind::PreviousChunks,
            self.extractor.previous_chunks(editor.document(), editor.cursor().line),
        );
        self.transmit(sessions, editor.context_id(), &region)
    }

    fn finish<P, E>(
        &self,
        sessions: &mut SessionManager<P>,
        editor: &mut E,
        what: &str,
        result: Result<(), BridgeError>,
    ) -> bool
    where
        P: ProcessHost,
        E: EditorHost + ?Sized,
    {
        let Err(err) = result else {
            return true;
        };

        let context = editor.context_id();
        match &err {
            BridgeError::Extraction(_) => {
                tracing::debug!(context = %context, what, error = %err, "nothing to send");
            }
            _ => {
                tracing::warn!(context = %context, what, error = %err, "dispatch failed");
                // The next dispatch recreates the session on demand.
                sessions.cleanup(context);
            }
        }
        editor.notify(MessageLevel::Error, &err.to_string());
        false
    }

    fn transmit<P: ProcessHost>(
        &self,
        sessions: &mut SessionManager<P>,
        context: ContextId,
        region: &Region,
    ) -> Result<(), BridgeError> {
        let lines: Vec<&str> = region.non_blank_lines().collect();
        match lines.as_slice() {
            [] => {
                tracing::debug!(context = %context, kind = region.kind.label(), "empty region");
                Ok(())
            }
            [line] => self.send_line(sessions, context, line),
            _ => match strategy_for(region.kind) {
                Strategy::LineByLine => self.send_lines_individually(sessions, context, &lines),
                Strategy::SourceFile => self.send_as_source_file(sessions, context, &region.lines),
            },
        }
    }

    fn send_line<P: ProcessHost>(
        &self,
        sessions: &mut SessionManager<P>,
        context: ContextId,
        line: &str,
    ) -> Result<(), BridgeError> {
        let mut bytes = String::with_capacity(line.len() + LINE_TERMINATOR.len());
        bytes.push_str(line);
        bytes.push_str(LINE_TERMINATOR);
        sessions.write(context, bytes.as_bytes())
    }

    fn send_lines_individually<P, S>(
        &self,
        sessions: &mut SessionManager<P>,
        context: ContextId,
        lines: &[S],
    ) -> Result<(), BridgeError>
    where
        P: ProcessHost,
        S: AsRef<str>,
    {
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 && !self.line_delay.is_zero() {
                thread::sleep(self.line_delay);
            }
            self.send_line(sessions, context, line.as_ref())?;
        }
        tracing::debug!(context = %context, lines = lines.len(), "sent line by line");
        Ok(())
    }

    fn send_as_source_file<P: ProcessHost>(
        &self,
        sessions: &mut SessionManager<P>,
        context: ContextId,
        lines: &[String],
    ) -> Result<(), BridgeError> {
        let path = self
            .write_source_file(lines)
            .map_err(TransmissionError::SourceFile)?;
        let command = self.source_template.render(&path.to_string_lossy());
        tracing::debug!(
            context = %context,
            path = %path.display(),
            lines = lines.len(),
            echo = self.echoes_source,
            "sourcing temp file"
        );
        self.send_line(sessions, context, &command)
    }

    /// Write `lines` verbatim to a fresh temp file, one line per file line.
    ///
    /// The file is kept on disk; removal is left to the OS temp-dir housekeeping.
    fn write_source_file(&self, lines: &[String]) -> io::Result<PathBuf> {
        let suffix = format!(".{}", self.file_extension);
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX).suffix(&suffix);
        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        for line in lines {
            writeln!(file, "{}", line)?;
        }
        file.flush()?;

        file.into_temp_path().keep().map_err(|err| err.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_follows_region_kind() {
        assert_eq!(strategy_for(RegionKind::Line), Strategy::LineByLine);
        assert_eq!(strategy_for(RegionKind::Selection), Strategy::LineByLine);
        assert_eq!(strategy_for(RegionKind::Chunk), Strategy::SourceFile);
        assert_eq!(strategy_for(RegionKind::PreviousChunks), Strategy::SourceFile);
    }

    #[test]
    fn test_source_file_keeps_lines_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let config = BridgeConfig::for_language(&repl_bridge_lang::ReplLanguage::R)
            .unwrap()
            .with_temp_dir(dir.path());
        let engine = DispatchEngine::new(&config);

        let lines = vec!["f <- function(x) {".to_string(), "".to_string(), "}".to_string()];
        let path = engine.write_source_file(&lines).unwrap();

        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("R"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "f <- function(x) {\n\n}\n"
        );
    }
}
