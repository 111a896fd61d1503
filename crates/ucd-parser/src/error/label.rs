//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to a span of source text.
///
/// A diagnostic has one primary label marking where the problem is. Secondary
/// labels add context, such as where a duplicated name was first declared.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Label marking the offending text.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Label pointing at related text, such as an earlier declaration.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Location;

    #[test]
    fn test_first_declaration_label() {
        let first = Span::new(16..20, Location::new(2, 7));
        let label = Label::secondary(first, "first declared here");

        assert!(label.is_secondary());
        assert!(!label.is_primary());
        assert_eq!(label.span().location(), Location::new(2, 7));
        assert_eq!(label.span().len(), 4);
        assert_eq!(label.message(), "first declared here");
    }

    #[test]
    fn test_primary_label_keeps_location() {
        let label = Label::primary(Span::new(31..35, Location::new(3, 11)), "not declared");

        assert!(label.is_primary());
        assert_eq!((label.span().line(), label.span().column()), (3, 11));
        assert_eq!(label.span().start(), 31);
    }
}
