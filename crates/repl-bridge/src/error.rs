//! Error taxonomy.
//!
//! Public bridge operations only return a success flag; these types carry the detail that is
//! turned into a single message for the host (see [`crate::EditorHost::notify`]) and into log
//! records.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings parse error: {0}")]
    /// The TOML settings document is malformed.
    Toml(#[from] toml::de::Error),

    #[error("I/O error reading {path}: {source}")]
    /// A settings file could not be read.
    Io {
        /// Path of the settings file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    #[error("unknown REPL language '{0}'")]
    /// No preset exists for the configured language id.
    UnknownLanguage(String),

    #[error("REPL command line is empty")]
    /// The configured command line contains no program.
    EmptyCommandLine,

    #[error("invalid {role} pattern '{pattern}': {source}")]
    /// A chunk delimiter pattern failed to compile.
    InvalidPattern {
        /// Which delimiter (`"chunk start"` or `"chunk end"`).
        role: &'static str,
        /// The offending pattern.
        pattern: String,
        /// The regex compiler error.
        source: regex::Error,
    },

    #[error("source template '{0}' does not contain {{path}}")]
    /// The source template never references the temp file.
    SourceTemplateWithoutPath(String),

    #[error("REPL executable '{0}' could not be found")]
    /// The REPL program does not resolve to an executable.
    ExecutableNotFound(String),
}

/// Errors in the session lifecycle.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to start '{program}': {source}")]
    /// Spawning the REPL process failed.
    Spawn {
        /// Program that was spawned.
        program: String,
        /// The underlying I/O error.
        source: io::Error,
    },

    #[error("REPL session is no longer running")]
    /// The stored handle refers to a process or view that is gone.
    StaleHandle,
}

/// Errors raised while extracting a region.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no selection")]
    /// A selection region was requested without an active selection.
    NoSelection,

    #[error("no chunk start found above line {cursor_line}")]
    /// Backward search reached the top of the document.
    ChunkStartNotFound {
        /// Cursor line (1-indexed).
        cursor_line: usize,
    },

    #[error("chunk starting at line {start} is not closed")]
    /// A start delimiter was found but no end delimiter follows it.
    ChunkEndNotFound {
        /// Start delimiter line (1-indexed).
        start: usize,
    },

    #[error("cursor line {cursor_line} is not inside a chunk (nearest chunk spans {start}..={end})")]
    /// The nearest chunk does not contain the cursor.
    CursorOutsideChunk {
        /// Cursor line (1-indexed).
        cursor_line: usize,
        /// Start delimiter line.
        start: usize,
        /// End delimiter line.
        end: usize,
    },
}

/// Errors raised while handing content to the REPL.
#[derive(Debug, Error)]
pub enum TransmissionError {
    #[error("write to REPL failed: {0}")]
    /// The process input rejected the bytes.
    Write(#[source] io::Error),

    #[error("could not prepare source file: {0}")]
    /// Creating or writing the temp file used for block sourcing failed.
    SourceFile(#[source] io::Error),
}

/// Any failure a bridge operation can report.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    /// Configuration problem (including an unresolvable REPL executable).
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    /// Session lifecycle problem.
    Session(#[from] SessionError),

    #[error(transparent)]
    /// Region extraction problem.
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    /// Transmission problem.
    Transmission(#[from] TransmissionError),
}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
