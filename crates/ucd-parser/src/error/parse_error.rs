//! The ParseError type returned by the parsing pipeline.

use thiserror::Error;

use crate::{
    error::{Diagnostic, ErrorCode, Stage},
    span::Location,
};

/// Error type for the parsing pipeline.
///
/// Parsing stops at the first problem, so a `ParseError` always holds exactly
/// one diagnostic.
#[derive(Debug, Error)]
#[error("{diagnostic}")]
pub struct ParseError {
    diagnostic: Diagnostic,
}

impl ParseError {
    pub fn new(diagnostic: Diagnostic) -> Self {
        Self { diagnostic }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        self.diagnostic
    }

    pub fn code(&self) -> ErrorCode {
        self.diagnostic.code()
    }

    pub fn stage(&self) -> Stage {
        self.diagnostic.stage()
    }

    pub fn location(&self) -> Location {
        self.diagnostic.location()
    }
}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    #[test]
    fn test_parse_error_from_diagnostic() {
        let diag = Diagnostic::error(ErrorCode::E203, "`Login` is not declared")
            .with_label(Span::new(12..19, Location::new(2, 10)), "not declared");
        let err: ParseError = diag.into();

        assert_eq!(err.code(), ErrorCode::E203);
        assert_eq!(err.stage(), Stage::Semantic);
        assert_eq!(err.location(), Location::new(2, 10));
        assert_eq!(err.diagnostic().message(), "`Login` is not declared");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(
            Diagnostic::error(ErrorCode::E101, "unexpected end of input, expected `@enduml`")
                .with_label(Span::new(9..9, Location::new(1, 10)), "input ends here"),
        );

        assert_eq!(
            err.to_string(),
            "error[E101]: unexpected end of input, expected `@enduml` at 1:10"
        );
    }
}
