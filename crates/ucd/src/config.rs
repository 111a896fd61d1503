//! Configuration types for ucd output.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file. Every section and field is optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`OutputConfig`] - Controls how a parsed diagram is rendered.
//! - [`OutputFormat`] - Text tree or JSON.
//!
//! # Example
//!
//! ```
//! # use ucd::config::{AppConfig, OutputFormat};
//! let config = AppConfig::default();
//! assert_eq!(config.output().format(), OutputFormat::Text);
//! assert_eq!(config.output().indent(), 4);
//! ```

use serde::Deserialize;

use ucd_core::printer::DEFAULT_INDENT;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given output configuration.
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Format a parsed diagram is rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The diagram printed back as source text.
    #[default]
    Text,
    /// The AST serialized as pretty JSON.
    Json,
}

/// Rendering options.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    format: OutputFormat,

    /// Spaces per nesting level, used for both package bodies and JSON.
    #[serde(default = "default_indent")]
    indent: usize,
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(OutputFormat::default(), DEFAULT_INDENT)
    }
}

impl OutputConfig {
    /// Creates a new [`OutputConfig`].
    ///
    /// # Arguments
    ///
    /// * `format` - Text tree or JSON.
    /// * `indent` - Spaces per nesting level.
    pub fn new(format: OutputFormat, indent: usize) -> Self {
        Self { format, indent }
    }

    /// Returns the output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Returns the indent width.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Returns a copy with the format replaced.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
