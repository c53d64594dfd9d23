#![warn(missing_docs)]
//! REPL Bridge - Headless Document-to-REPL Delivery Kernel
//!
//! # Overview
//!
//! `repl-bridge` sends well-defined regions of an editor document (the cursor line, a selection,
//! a fenced chunk, or every chunk above the cursor) to a long-lived interactive process such as
//! an R, Python, or Julia REPL. It keeps exactly one process per editing context, notices lazily
//! when that process died, and recreates it on the next operation.
//!
//! It does not render anything and does not own editor state: the host supplies the document,
//! cursor, and selection through [`EditorHost`], and process plumbing through [`ProcessHost`]
//! (see `repl-bridge-process` for an implementation over OS processes).
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ReplBridge                                 │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  DispatchEngine (strategy + navigation)     │  ← Delivery
//! ├──────────────────────┬──────────────────────┤
//! │  RegionExtractor     │  SessionManager      │  ← Extraction / Lifecycle
//! ├──────────────────────┼──────────────────────┤
//! │  Document + patterns │  ProcessHost         │  ← Host collaborators
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use repl_bridge::{ChunkPattern, CursorPosition, RegionExtractor, RegionKind, TextDocument};
//!
//! let doc = TextDocument::from_text("```{r}\nx <- 1\ny <- 2\n```\n");
//! let extractor = RegionExtractor::new(ChunkPattern::new(r"^```\{r", r"^```\s*$").unwrap());
//!
//! let region = extractor
//!     .extract(RegionKind::Chunk, &doc, CursorPosition::new(2, 0), None)
//!     .unwrap();
//! assert_eq!(region.lines, vec!["x <- 1", "y <- 2"]);
//! ```
//!
//! # Module Description
//!
//! - [`config`] - settings loading (TOML) and validation
//! - [`document`] - read-only, 1-indexed document model
//! - [`pattern`] - compiled chunk delimiters
//! - [`region`] - region extraction rules
//! - [`session`] - per-context REPL lifecycle
//! - [`dispatch`] - transmission strategies and cursor navigation
//! - [`host`] - editor and process collaborator traits

mod bridge;
pub mod config;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod host;
pub mod pattern;
pub mod region;
pub mod session;
mod text;

pub use bridge::ReplBridge;
pub use config::{BridgeConfig, BridgeSettings, CommandLine, MAX_VIEW_WIDTH, MIN_VIEW_WIDTH};
pub use dispatch::{Command, DispatchEngine, DispatchOptions};
pub use document::{Document, TextDocument};
pub use error::{
    BridgeError, ConfigError, ExtractionError, Result, SessionError, TransmissionError,
};
pub use host::{
    ContextId, CursorPosition, EditorHost, MemoryEditor, MessageLevel, ProcessHost,
    SelectionBounds,
};
pub use pattern::ChunkPattern;
pub use region::{ChunkBounds, Region, RegionExtractor, RegionKind};
pub use repl_bridge_lang::{ReplLanguage, SourceTemplate};
pub use session::{CreateOutcome, Session, SessionManager, SessionState, SessionStatus};
