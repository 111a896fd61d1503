//! ucd - A front end for PlantUML use case diagrams.
//!
//! Parses the textual use case diagram language into a validated AST and
//! renders it back as source text or JSON.

pub mod config;

mod error;

pub use ucd_core::{ast, printer};
pub use ucd_parser::error::{Diagnostic, ErrorCode, ParseError, Stage};

pub use error::UcdError;

use std::fmt::Write as _;

use log::{debug, info, trace};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use ast::Diagram;
use config::{AppConfig, OutputFormat};
use printer::Printer;

/// Builder for parsing and rendering use case diagrams.
///
/// # Examples
///
/// ```rust
/// use ucd::{DiagramBuilder, config::AppConfig};
///
/// let source = "@startuml\n:User:\n(Login)\n:User: --> (Login)\n@enduml\n";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Parse source to a validated AST
/// let diagram = builder.parse(source)
///     .expect("Failed to parse");
///
/// // Render it back as source text
/// let text = builder.render(&diagram)
///     .expect("Failed to render");
/// assert!(text.starts_with("@startuml\n"));
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse source code into a validated diagram.
    ///
    /// # Errors
    ///
    /// Returns [`UcdError::Parse`] carrying the first lexical, syntax or
    /// semantic error together with `source`.
    pub fn parse(&self, source: &str) -> Result<Diagram, UcdError> {
        info!("Parsing diagram");

        let diagram =
            ucd_parser::parse(source).map_err(|err| UcdError::new_parse_error(err, source))?;

        debug!(
            name:? = diagram.name(),
            entities = diagram.entities().count();
            "Diagram parsed successfully"
        );
        trace!(diagram:?; "Parsed diagram");

        Ok(diagram)
    }

    /// Render a diagram in the configured output format.
    ///
    /// # Errors
    ///
    /// Returns `UcdError` if serialization fails.
    pub fn render(&self, diagram: &Diagram) -> Result<String, UcdError> {
        let output = self.config.output();
        info!(format:? = output.format(), indent = output.indent(); "Rendering diagram");

        match output.format() {
            OutputFormat::Text => Printer::new(output.indent())
                .render(diagram)
                .map_err(|err| UcdError::Render(err.to_string())),
            OutputFormat::Json => render_json(diagram, output.indent()),
        }
    }

    /// List the tokens of `source`, one per line, as `line:column kind text`.
    ///
    /// # Errors
    ///
    /// Returns [`UcdError::Parse`] if the source does not tokenize.
    pub fn render_tokens(&self, source: &str) -> Result<String, UcdError> {
        info!("Tokenizing source");

        let tokens =
            ucd_parser::tokenize(source).map_err(|err| UcdError::new_parse_error(err, source))?;

        let mut out = String::new();
        for positioned in &tokens {
            let position = format!("{}:{}", positioned.line(), positioned.column());
            writeln!(
                out,
                "{position:<8} {:<18} {}",
                positioned.token.kind_name(),
                positioned.token
            )
            .map_err(|err| UcdError::Render(err.to_string()))?;
        }

        debug!(token_count = tokens.len(); "Tokens rendered");
        Ok(out)
    }
}

/// Serialize `diagram` as pretty JSON indented by `indent` spaces.
fn render_json(diagram: &Diagram, indent: usize) -> Result<String, UcdError> {
    let indent = vec![b' '; indent];
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(&indent));
    diagram.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer).map_err(|err| UcdError::Render(err.to_string()))?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::OutputConfig;

    const SOURCE: &str = "@startuml\n:User: as u\n(Login)\nu --> (Login) : includes\n@enduml\n";

    #[test]
    fn test_render_json_uses_configured_indent() {
        let config = AppConfig::new(OutputConfig::new(OutputFormat::Json, 2));
        let builder = DiagramBuilder::new(config);

        let diagram = builder.parse(SOURCE).unwrap();
        let json = builder.render(&diagram).unwrap();

        assert!(json.starts_with("{\n  \"name\": null,"), "{json}");
        assert!(json.ends_with("}\n"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let definitions = value["definitions"].as_array().unwrap();
        assert_eq!(definitions.len(), 3);
        assert_eq!(definitions[0]["type"], "entity");
        assert_eq!(definitions[2]["type"], "relation");
        assert_eq!(definitions[2]["relation"], "association");
        assert_eq!(definitions[2]["left"]["namespace"], "identifier");
    }

    #[test]
    fn test_render_tokens() {
        let builder = DiagramBuilder::default();
        let tokens = builder.render_tokens("@startuml\n:User:\n").unwrap();
        let lines: Vec<_> = tokens.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("1:1"));
        assert!(lines[0].ends_with("@startuml"));
        assert!(lines[2].contains("actor text"));
        assert!(lines[2].ends_with(":User:"));
        assert!(lines[4].starts_with("3:1"));
        assert!(lines[4].contains("end of input"));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let builder = DiagramBuilder::default();
        let err = builder.parse("@startuml\n(Login\n@enduml\n").unwrap_err();

        match err {
            UcdError::Parse { err, src } => {
                assert_eq!(err.code(), ErrorCode::E003);
                assert!(src.contains("(Login"));
            }
            other => panic!("Expected parse error, got {other:?}"),
        }
    }
}
