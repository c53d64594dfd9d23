#![warn(missing_docs)]
//! `repl-bridge-lang` - data-driven REPL language presets for `repl-bridge`.
//!
//! This crate intentionally stays lightweight and does **not** depend on regex engines or process
//! APIs. Patterns are plain strings; the core compiles and validates them once when a
//! configuration is built.

/// Placeholder substituted by [`SourceTemplate::render`].
pub const PATH_PLACEHOLDER: &str = "{path}";

/// A command template that makes the REPL evaluate a file.
///
/// The template contains a single [`PATH_PLACEHOLDER`], which is replaced by the escaped path
/// inside a double-quoted string literal of the target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTemplate {
    template: String,
}

impl SourceTemplate {
    /// Create a template from a raw string (e.g. `source("{path}", echo = TRUE)`).
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Returns `true` if the template references the file path.
    pub fn has_placeholder(&self) -> bool {
        self.template.contains(PATH_PLACEHOLDER)
    }

    /// Render the template for `path`.
    ///
    /// Backslashes and double quotes are escaped so the path survives a double-quoted literal
    /// (Windows paths included).
    pub fn render(&self, path: &str) -> String {
        self.template.replace(PATH_PLACEHOLDER, &escape_double_quoted(path))
    }
}

fn escape_double_quoted(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for ch in path.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}

/// Language preset for a REPL target.
///
/// Hosts usually pick one by id (see [`ReplLanguage::by_id`]) and override individual fields from
/// user settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplLanguage {
    /// Short identifier (e.g. `"r"`).
    pub id: &'static str,
    /// Default REPL invocation (program followed by whitespace-separated arguments).
    pub command_line: &'static str,
    /// Line pattern that opens a chunk.
    pub chunk_start: &'static str,
    /// Line pattern that closes a chunk.
    pub chunk_end: &'static str,
    /// Template used to source a temp file.
    pub source_template: &'static str,
    /// Whether the source template echoes each statement into the transcript.
    ///
    /// When `false`, sourced chunks only show their printed output, unlike line-by-line sends.
    pub echoes_source: bool,
    /// File extension (without dot) for sourced temp files.
    pub file_extension: &'static str,
}

const FENCE_END: &str = r"^\s*```+\s*$";

impl ReplLanguage {
    /// R (R Markdown / Quarto `{r}` chunks).
    pub const R: ReplLanguage = ReplLanguage {
        id: "r",
        command_line: "R --no-save --quiet",
        chunk_start: r"^\s*```+\s*\{\s*[rR]\b",
        chunk_end: FENCE_END,
        source_template: r#"source("{path}", echo = TRUE)"#,
        echoes_source: true,
        file_extension: "R",
    };

    /// Python (`{python}` chunks).
    ///
    /// `exec` evaluates the file silently: only printed output reaches the transcript.
    pub const PYTHON: ReplLanguage = ReplLanguage {
        id: "python",
        command_line: "python3 -i -q",
        chunk_start: r"^\s*```+\s*\{\s*python\b",
        chunk_end: FENCE_END,
        source_template: r#"exec(open("{path}").read())"#,
        echoes_source: false,
        file_extension: "py",
    };

    /// Julia (`{julia}` chunks).
    ///
    /// `include` shows only the value of the last expression, not each statement.
    pub const JULIA: ReplLanguage = ReplLanguage {
        id: "julia",
        command_line: "julia --quiet",
        chunk_start: r"^\s*```+\s*\{\s*julia\b",
        chunk_end: FENCE_END,
        source_template: r#"include("{path}")"#,
        echoes_source: false,
        file_extension: "jl",
    };

    /// All built-in presets.
    pub const ALL: [ReplLanguage; 3] = [Self::R, Self::PYTHON, Self::JULIA];

    /// Look up a preset by id (ASCII case-insensitive).
    pub fn by_id(id: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|lang| lang.id.eq_ignore_ascii_case(id.trim()))
            .cloned()
    }

    /// The source template as a [`SourceTemplate`].
    pub fn source(&self) -> SourceTemplate {
        SourceTemplate::new(self.source_template)
    }
}

impl Default for ReplLanguage {
    fn default() -> Self {
        Self::R
    }
}
