//! Declaration tables consulted while a diagram is parsed.
//!
//! A [`SymbolTable`] holds three independent namespaces:
//!
//! - identifiers: aliases, package names and the diagram name
//! - actor labels
//! - use case labels
//!
//! Each namespace rejects a second declaration of the same name. Packages do
//! not open scopes, so every name is global to the document from the point of
//! its declaration. The parser creates a fresh table for every parse and
//! checks each node against it as soon as the node is built.

use indexmap::IndexMap;
use log::trace;

use ucd_core::ast::{EntityKind, Namespace};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::{Span, Spanned},
};

/// The three declaration namespaces of one parse.
#[derive(Debug, Default)]
pub struct SymbolTable {
    identifiers: IndexMap<String, Span>,
    actor_labels: IndexMap<String, Span>,
    use_case_labels: IndexMap<String, Span>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an alias, package name or diagram name.
    ///
    /// # Errors
    ///
    /// Returns an E200 diagnostic if the identifier is already declared.
    pub fn declare_identifier(&mut self, name: &Spanned<String>) -> Result<(), Diagnostic> {
        declare(&mut self.identifiers, name).map_err(|first| {
            Diagnostic::error(
                ErrorCode::E200,
                format!("identifier `{name}` is declared more than once"),
            )
            .with_label(name.span(), "duplicate declaration")
            .with_secondary_label(first, "first declared here")
            .with_help("aliases, package names and the diagram name share one namespace")
            .with_found(name.inner().as_str())
        })
    }

    /// Declare an actor label.
    ///
    /// # Errors
    ///
    /// Returns an E201 diagnostic if another actor already has this label.
    pub fn declare_actor_label(&mut self, label: &Spanned<String>) -> Result<(), Diagnostic> {
        declare(&mut self.actor_labels, label)
            .map_err(|first| duplicate_label(EntityKind::Actor, label, first))
    }

    /// Declare a use case label.
    ///
    /// # Errors
    ///
    /// Returns an E202 diagnostic if another use case already has this label.
    pub fn declare_use_case_label(&mut self, label: &Spanned<String>) -> Result<(), Diagnostic> {
        declare(&mut self.use_case_labels, label)
            .map_err(|first| duplicate_label(EntityKind::UseCase, label, first))
    }

    /// Declare a label in the namespace matching `kind`.
    pub fn declare_label(
        &mut self,
        kind: EntityKind,
        label: &Spanned<String>,
    ) -> Result<(), Diagnostic> {
        match kind {
            EntityKind::Actor => self.declare_actor_label(label),
            EntityKind::UseCase => self.declare_use_case_label(label),
        }
    }

    /// Find the namespace a reference was declared in.
    ///
    /// Identifiers are checked first, then actor labels, then use case labels.
    ///
    /// # Errors
    ///
    /// Returns an E203 diagnostic if the name is in none of them.
    pub fn resolve(&self, reference: &Spanned<String>) -> Result<Namespace, Diagnostic> {
        let name = reference.inner().as_str();
        let namespace = if self.identifiers.contains_key(name) {
            Namespace::Identifier
        } else if self.actor_labels.contains_key(name) {
            Namespace::ActorLabel
        } else if self.use_case_labels.contains_key(name) {
            Namespace::UseCaseLabel
        } else {
            return Err(Diagnostic::error(
                ErrorCode::E203,
                format!("`{name}` is not declared before it is used"),
            )
            .with_label(reference.span(), "unresolved reference")
            .with_help(format!("declare `{name}` above this relation"))
            .with_found(name));
        };

        trace!(name = name, namespace:%; "Resolved reference");
        Ok(namespace)
    }

    /// Number of declared identifiers.
    pub fn identifier_count(&self) -> usize {
        self.identifiers.len()
    }

    /// Number of declared actor and use case labels.
    pub fn label_count(&self) -> usize {
        self.actor_labels.len() + self.use_case_labels.len()
    }
}

/// Insert `name` unless present; on conflict return the span of the first
/// declaration.
fn declare(table: &mut IndexMap<String, Span>, name: &Spanned<String>) -> Result<(), Span> {
    if let Some(first) = table.get(name.inner()) {
        return Err(*first);
    }
    table.insert(name.inner().clone(), name.span());
    Ok(())
}

fn duplicate_label(kind: EntityKind, label: &Spanned<String>, first: Span) -> Diagnostic {
    let code = match kind {
        EntityKind::Actor => ErrorCode::E201,
        EntityKind::UseCase => ErrorCode::E202,
    };
    Diagnostic::error(
        code,
        format!("{kind} `{label}` is declared more than once"),
    )
    .with_label(label.span(), "duplicate declaration")
    .with_secondary_label(first, "first declared here")
    .with_help(format!("give each {kind} a distinct label"))
    .with_found(label.inner().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Location;

    fn name(text: &str, line: usize) -> Spanned<String> {
        Spanned::new(
            text.to_string(),
            Span::new(line * 10..line * 10 + text.len(), Location::new(line, 1)),
        )
    }

    #[test]
    fn test_duplicate_identifier() {
        let mut symbols = SymbolTable::new();
        symbols.declare_identifier(&name("admin", 1)).unwrap();

        let err = symbols.declare_identifier(&name("admin", 4)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E200);
        assert_eq!(err.location(), Location::new(4, 1));
        assert_eq!(err.labels().len(), 2);
        assert_eq!(err.labels()[1].span().location(), Location::new(1, 1));
        assert_eq!(err.found(), Some("admin"));
    }

    #[test]
    fn test_label_namespaces_are_independent() {
        let mut symbols = SymbolTable::new();
        symbols.declare_actor_label(&name("Admin", 1)).unwrap();
        symbols.declare_use_case_label(&name("Admin", 2)).unwrap();
        symbols.declare_identifier(&name("Admin", 3)).unwrap();

        let err = symbols.declare_actor_label(&name("Admin", 4)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E201);
        assert!(err.code().is_duplicate_label());

        let err = symbols
            .declare_label(EntityKind::UseCase, &name("Admin", 5))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::E202);
    }

    #[test]
    fn test_resolve_order() {
        let mut symbols = SymbolTable::new();
        symbols.declare_use_case_label(&name("Login", 1)).unwrap();
        assert_eq!(
            symbols.resolve(&name("Login", 2)).unwrap(),
            Namespace::UseCaseLabel
        );

        symbols.declare_actor_label(&name("Login", 3)).unwrap();
        assert_eq!(
            symbols.resolve(&name("Login", 4)).unwrap(),
            Namespace::ActorLabel
        );

        symbols.declare_identifier(&name("Login", 5)).unwrap();
        assert_eq!(
            symbols.resolve(&name("Login", 6)).unwrap(),
            Namespace::Identifier
        );
    }

    #[test]
    fn test_unresolved_reference() {
        let symbols = SymbolTable::new();
        let err = symbols.resolve(&name("Ghost", 2)).unwrap_err();

        assert_eq!(err.code(), ErrorCode::E203);
        assert_eq!(err.location(), Location::new(2, 1));
        assert_eq!(err.found(), Some("Ghost"));
    }

    #[test]
    fn test_counts() {
        let mut symbols = SymbolTable::new();
        symbols.declare_identifier(&name("a", 1)).unwrap();
        symbols.declare_actor_label(&name("A", 2)).unwrap();
        symbols.declare_use_case_label(&name("B", 3)).unwrap();

        assert_eq!(symbols.identifier_count(), 1);
        assert_eq!(symbols.label_count(), 2);
    }
}
