//! The core diagnostic type.

use std::fmt;

use crate::{
    error::{
        error_code::{ErrorCode, Stage},
        label::Label,
    },
    span::{Location, Span},
};

/// A single error with source location information.
///
/// # Example
///
/// ```text
/// error[E201]: actor `User` is declared more than once
///   --> diagram.puml:3:1
///    |
///  2 | actor :User:
///    |       ------ first declared here
///  3 | actor :User:
///    |       ^^^^^^ duplicate declaration
///    |
///    = help: give each actor a distinct label
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: ErrorCode,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
    found: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            found: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Stage that produced the diagnostic.
    pub fn stage(&self) -> Stage {
        self.code.stage()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The offending source text or token, if recorded.
    pub fn found(&self) -> Option<&str> {
        self.found.as_deref()
    }

    /// Span of the primary label.
    pub fn span(&self) -> Span {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .or(self.labels.first())
            .map(Label::span)
            .unwrap_or_default()
    }

    /// Line and column of the primary label.
    pub fn location(&self) -> Location {
        self.span().location()
    }

    /// Add a primary label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Record the offending text.
    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error[{}]: {} at {}",
            self.code,
            self.message,
            self.location()
        )
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, line: usize, column: usize) -> Span {
        Span::new(start..end, Location::new(line, column))
    }

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::error(ErrorCode::E100, "unexpected `}`");

        assert_eq!(diag.code(), ErrorCode::E100);
        assert_eq!(diag.stage(), Stage::Syntactic);
        assert_eq!(diag.message(), "unexpected `}`");
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert!(diag.found().is_none());
        assert_eq!(diag.location(), Location::new(1, 1));
    }

    #[test]
    fn test_location_follows_primary_label() {
        let diag = Diagnostic::error(ErrorCode::E200, "identifier `a` is declared more than once")
            .with_secondary_label(span(4, 5, 1, 5), "first declared here")
            .with_label(span(20, 21, 3, 9), "duplicate declaration");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_secondary());
        assert!(diag.labels()[1].is_primary());
        assert_eq!(diag.location(), Location::new(3, 9));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(ErrorCode::E002, "unexpected character `#`")
            .with_label(span(7, 8, 2, 3), "unexpected character")
            .with_found("#");

        assert_eq!(
            diag.to_string(),
            "error[E002]: unexpected character `#` at 2:3"
        );
        assert_eq!(diag.found(), Some("#"));
    }
}
