//! Configuration loading and validation.
//!
//! [`BridgeSettings`] is the user-facing, serde-deserialized shape (every key optional, TOML on
//! disk). [`BridgeSettings::validate`] turns it into an immutable [`BridgeConfig`]: the language
//! preset is resolved, chunk patterns are compiled, and the view width is clamped. Nothing is
//! re-validated per call.
//!
//! ```toml
//! language = "r"
//! command-line = "R --no-save --quiet --no-restore"
//! view-width = 100
//! line-delay-ms = 20
//! ```

use crate::error::ConfigError;
use crate::pattern::ChunkPattern;
use repl_bridge_lang::{ReplLanguage, SourceTemplate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Smallest accepted REPL view width.
pub const MIN_VIEW_WIDTH: u16 = 30;
/// Largest accepted REPL view width.
pub const MAX_VIEW_WIDTH: u16 = 300;

/// Raw settings as written by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BridgeSettings {
    /// Language preset id (`r`, `python`, `julia`).
    pub language: String,
    /// Override for the REPL invocation.
    pub command_line: Option<String>,
    /// Override for the chunk start pattern.
    pub chunk_start: Option<String>,
    /// Override for the chunk end pattern.
    pub chunk_end: Option<String>,
    /// Override for the source-file command template.
    pub source_template: Option<String>,
    /// Width of the REPL view, clamped to `[MIN_VIEW_WIDTH, MAX_VIEW_WIDTH]`.
    pub view_width: u16,
    /// Settle delay between line-by-line sends, in milliseconds.
    pub line_delay_ms: u64,
    /// Directory for source temp files (system temp dir when unset).
    pub temp_dir: Option<PathBuf>,
    /// Disables the default key bindings of the binding layer. Not used by the core.
    pub disable_default_keymaps: bool,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            language: ReplLanguage::default().id.to_string(),
            command_line: None,
            chunk_start: None,
            chunk_end: None,
            source_template: None,
            view_width: 80,
            line_delay_ms: 20,
            temp_dir: None,
            disable_default_keymaps: false,
        }
    }
}

impl BridgeSettings {
    /// Parse settings from a TOML string.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Read and parse a TOML settings file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// Validate the settings and build the runtime configuration.
    pub fn validate(&self) -> Result<BridgeConfig, ConfigError> {
        let language = ReplLanguage::by_id(&self.language)
            .ok_or_else(|| ConfigError::UnknownLanguage(self.language.clone()))?;

        let command_line =
            CommandLine::parse(self.command_line.as_deref().unwrap_or(language.command_line))?;
        let chunk_pattern = ChunkPattern::new(
            self.chunk_start.as_deref().unwrap_or(language.chunk_start),
            self.chunk_end.as_deref().unwrap_or(language.chunk_end),
        )?;

        // A custom template is taken to echo; only the presets are known not to.
        let (source_template, echoes_source) = match &self.source_template {
            Some(template) => (SourceTemplate::new(template.clone()), true),
            None => (language.source(), language.echoes_source),
        };
        if !source_template.has_placeholder() {
            return Err(ConfigError::SourceTemplateWithoutPath(
                source_template.as_str().to_string(),
            ));
        }

        let view_width = self.view_width.clamp(MIN_VIEW_WIDTH, MAX_VIEW_WIDTH);
        if view_width != self.view_width {
            tracing::warn!(
                requested = self.view_width,
                used = view_width,
                "REPL view width out of range; clamped"
            );
        }

        Ok(BridgeConfig {
            language: language.id,
            command_line,
            chunk_pattern,
            source_template,
            echoes_source,
            file_extension: language.file_extension.to_string(),
            view_width,
            line_delay: Duration::from_millis(self.line_delay_ms),
            temp_dir: self.temp_dir.clone(),
            default_keymaps: !self.disable_default_keymaps,
        })
    }
}

/// A REPL invocation: program plus arguments.
///
/// Parsed by splitting on whitespace; quoting is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Parse a whitespace-separated command line.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut parts = input.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ConfigError::EmptyCommandLine)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Program to execute.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Validated, immutable configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    language: &'static str,
    command_line: CommandLine,
    chunk_pattern: ChunkPattern,
    source_template: SourceTemplate,
    echoes_source: bool,
    file_extension: String,
    view_width: u16,
    line_delay: Duration,
    temp_dir: Option<PathBuf>,
    default_keymaps: bool,
}

impl BridgeConfig {
    /// Configuration for a language preset with default settings.
    pub fn for_language(language: &ReplLanguage) -> Result<Self, ConfigError> {
        BridgeSettings {
            language: language.id.to_string(),
            ..BridgeSettings::default()
        }
        .validate()
    }

    /// Override the settle delay between line-by-line sends.
    pub fn with_line_delay(mut self, delay: Duration) -> Self {
        self.line_delay = delay;
        self
    }

    /// Override the directory used for source temp files.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Override the REPL invocation.
    pub fn with_command_line(mut self, command_line: CommandLine) -> Self {
        self.command_line = command_line;
        self
    }

    /// Language preset id.
    pub fn language(&self) -> &'static str {
        self.language
    }

    /// REPL invocation.
    pub fn command_line(&self) -> &CommandLine {
        &self.command_line
    }

    /// Compiled chunk delimiters.
    pub fn chunk_pattern(&self) -> &ChunkPattern {
        &self.chunk_pattern
    }

    /// Source-file command template.
    pub fn source_template(&self) -> &SourceTemplate {
        &self.source_template
    }

    /// Whether sourcing a temp file echoes each statement into the REPL transcript.
    pub fn echoes_source(&self) -> bool {
        self.echoes_source
    }

    /// Extension used for source temp files.
    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// REPL view width (already clamped).
    pub fn view_width(&self) -> u16 {
        self.view_width
    }

    /// Settle delay between line-by-line sends.
    pub fn line_delay(&self) -> Duration {
        self.line_delay
    }

    /// Directory for source temp files, if overridden.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    /// Whether the binding layer should install its default key bindings.
    pub fn default_keymaps(&self) -> bool {
        self.default_keymaps
    }
}
