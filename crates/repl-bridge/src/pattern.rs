//! Chunk delimiter patterns.
//!
//! Patterns are matched against one line at a time (without its line break). They are compiled
//! once, when a [`crate::BridgeConfig`] is built, so an invalid pattern fails at configuration
//! time instead of on the first search.

use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};

/// A compiled `(start, end)` delimiter pair.
#[derive(Debug, Clone)]
pub struct ChunkPattern {
    start: Regex,
    end: Regex,
}

fn compile_line_regex(role: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            role,
            pattern: pattern.to_string(),
            source,
        })
}

impl ChunkPattern {
    /// Compile a delimiter pair.
    pub fn new(start: &str, end: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            start: compile_line_regex("chunk start", start)?,
            end: compile_line_regex("chunk end", end)?,
        })
    }

    /// Returns `true` if `line` opens a chunk.
    pub fn is_start(&self, line: &str) -> bool {
        self.start.is_match(line)
    }

    /// Returns `true` if `line` closes a chunk.
    pub fn is_end(&self, line: &str) -> bool {
        self.end.is_match(line)
    }

    /// Source of the start pattern.
    pub fn start_pattern(&self) -> &str {
        self.start.as_str()
    }

    /// Source of the end pattern.
    pub fn end_pattern(&self) -> &str {
        self.end.as_str()
    }
}
