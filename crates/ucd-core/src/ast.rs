//! Syntax tree for use case diagrams.
//!
//! A [`Diagram`] is the root. It owns an ordered list of [`Definition`]s, each
//! of which is an entity declaration, a relation between two previously
//! declared names, or a package grouping further definitions.
//!
//! Nodes keep the notation they were written in (for example `:User:` versus
//! `actor User`) so that printing a tree and parsing the output yields an equal
//! tree. Source positions are not part of the tree.

use std::fmt;

use serde::Serialize;

/// Root of a parsed diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagram {
    name: Option<String>,
    definitions: Vec<Definition>,
}

impl Diagram {
    /// Create a diagram with an optional name and its top-level definitions.
    pub fn new(name: Option<String>, definitions: Vec<Definition>) -> Self {
        Self { name, definitions }
    }

    /// Name given after `@startuml`, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Top-level definitions in source order.
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Iterate over every entity declaration, descending into packages.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDecl> {
        let mut entities = Vec::new();
        collect_entities(&self.definitions, &mut entities);
        entities.into_iter()
    }
}

fn collect_entities<'a>(definitions: &'a [Definition], out: &mut Vec<&'a EntityDecl>) {
    for definition in definitions {
        match definition {
            Definition::Entity(entity) => out.push(entity),
            Definition::Package(package) => collect_entities(package.definitions(), out),
            Definition::Relation(_) => {}
        }
    }
}

/// A single statement of a diagram or package body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Definition {
    Entity(EntityDecl),
    Relation(Relation),
    Package(PackageDecl),
}

/// Whether an entity is an actor or a use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Actor,
    UseCase,
}

impl EntityKind {
    /// Keyword introducing the long form of the declaration.
    pub fn keyword(self) -> &'static str {
        match self {
            EntityKind::Actor => "actor",
            EntityKind::UseCase => "usecase",
        }
    }

    /// Opening and closing delimiters of the shorthand text form.
    pub fn delimiters(self) -> (char, char) {
        match self {
            EntityKind::Actor => (':', ':'),
            EntityKind::UseCase => ('(', ')'),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Actor => write!(f, "actor"),
            EntityKind::UseCase => write!(f, "use case"),
        }
    }
}

/// How an entity label was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notation {
    /// Delimited text without a keyword: `:User:` or `(Login)`.
    Shorthand,
    /// Keyword followed by a bare identifier: `actor User`.
    Identifier,
    /// Keyword followed by delimited text: `actor :User:`.
    Delimited,
    /// Keyword followed by a quoted string: `actor "Main User"`.
    Quoted,
}

/// An actor or use case declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDecl {
    kind: EntityKind,
    label: String,
    notation: Notation,
    alias: Option<String>,
    stereotype: Option<String>,
}

impl EntityDecl {
    pub fn new(
        kind: EntityKind,
        label: impl Into<String>,
        notation: Notation,
        alias: Option<String>,
        stereotype: Option<String>,
    ) -> Self {
        Self {
            kind,
            label: label.into(),
            notation,
            alias,
            stereotype,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The declared label, with delimiters and quotes removed.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// Identifier bound with `as`, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Stereotype name without the `<<` `>>` delimiters.
    pub fn stereotype(&self) -> Option<&str> {
        self.stereotype.as_deref()
    }
}

impl fmt::Display for EntityDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = self.kind.delimiters();
        match self.notation {
            Notation::Shorthand => write_delimited(f, open, &self.label, close)?,
            Notation::Identifier => write!(f, "{} {}", self.kind.keyword(), self.label)?,
            Notation::Delimited => {
                write!(f, "{} ", self.kind.keyword())?;
                write_delimited(f, open, &self.label, close)?;
            }
            Notation::Quoted => write!(f, "{} \"{}\"", self.kind.keyword(), self.label)?,
        }
        if let Some(alias) = &self.alias {
            write!(f, " as {alias}")?;
        }
        if let Some(stereotype) = &self.stereotype {
            write!(f, " <<{stereotype}>>")?;
        }
        Ok(())
    }
}

/// Write delimited label text. An empty label keeps one blank between the
/// delimiters so that it still reads back as delimited text.
/// Write `text` between delimiters. An empty label is written with one blank
/// inside so it lexes back as the same delimited text.
pub fn write_delimited(
    f: &mut fmt::Formatter<'_>,
    open: char,
    text: &str,
    close: char,
) -> fmt::Result {
    if text.is_empty() {
        write!(f, "{open} {close}")
    } else {
        write!(f, "{open}{text}{close}")
    }
}

/// Visual style of an association arrow. Both styles mean the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowStyle {
    Solid,
    Dotted,
}

impl fmt::Display for ArrowStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrowStyle::Solid => write!(f, "-->"),
            ArrowStyle::Dotted => write!(f, "..>"),
        }
    }
}

/// Label after the `:` of an association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkLabel {
    Includes,
    Extends,
    Named(String),
}

impl fmt::Display for LinkLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkLabel::Includes => write!(f, "includes"),
            LinkLabel::Extends => write!(f, "extends"),
            LinkLabel::Named(name) => write!(f, "{name}"),
        }
    }
}

/// A relation between two references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "relation", rename_all = "snake_case")]
pub enum Relation {
    /// `left --> right [: label]`
    Association {
        left: Reference,
        right: Reference,
        style: ArrowStyle,
        label: Option<LinkLabel>,
    },
    /// `parent <|-- child`
    Inheritance { parent: Reference, child: Reference },
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Association {
                left,
                right,
                style,
                label,
            } => {
                write!(f, "{left} {style} {right}")?;
                if let Some(label) = label {
                    write!(f, " : {label}")?;
                }
                Ok(())
            }
            Relation::Inheritance { parent, child } => write!(f, "{parent} <|-- {child}"),
        }
    }
}

/// How a reference was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefNotation {
    Identifier,
    ActorText,
    UseCaseText,
}

/// Which declaration table a reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Identifier,
    ActorLabel,
    UseCaseLabel,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Identifier => write!(f, "identifier"),
            Namespace::ActorLabel => write!(f, "actor label"),
            Namespace::UseCaseLabel => write!(f, "use case label"),
        }
    }
}

/// A resolved relation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    name: String,
    notation: RefNotation,
    namespace: Namespace,
}

impl Reference {
    pub fn new(name: impl Into<String>, notation: RefNotation, namespace: Namespace) -> Self {
        Self {
            name: name.into(),
            notation,
            namespace,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notation(&self) -> RefNotation {
        self.notation
    }

    /// Declaration table the name resolved against.
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.notation {
            RefNotation::Identifier => write!(f, "{}", self.name),
            RefNotation::ActorText => write_delimited(f, ':', &self.name, ':'),
            RefNotation::UseCaseText => write_delimited(f, '(', &self.name, ')'),
        }
    }
}

/// A named group of definitions.
///
/// Packages only structure the document; names declared inside remain visible
/// everywhere after their declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDecl {
    name: String,
    definitions: Vec<Definition>,
}

impl PackageDecl {
    pub fn new(name: impl Into<String>, definitions: Vec<Definition>) -> Self {
        Self {
            name: name.into(),
            definitions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(label: &str, notation: Notation) -> EntityDecl {
        EntityDecl::new(EntityKind::Actor, label, notation, None, None)
    }

    #[test]
    fn test_entity_notations() {
        assert_eq!(actor("User", Notation::Shorthand).to_string(), ":User:");
        assert_eq!(actor("User", Notation::Identifier).to_string(), "actor User");
        assert_eq!(actor("User", Notation::Delimited).to_string(), "actor :User:");
        assert_eq!(
            actor("Main User", Notation::Quoted).to_string(),
            "actor \"Main User\""
        );

        let login = EntityDecl::new(
            EntityKind::UseCase,
            "Log in",
            Notation::Delimited,
            Some("login".to_string()),
            Some("primary".to_string()),
        );
        assert_eq!(login.to_string(), "usecase (Log in) as login <<primary>>");
    }

    #[test]
    fn test_empty_delimited_label_keeps_a_blank() {
        assert_eq!(actor("", Notation::Shorthand).to_string(), ": :");
        let reference = Reference::new("", RefNotation::UseCaseText, Namespace::UseCaseLabel);
        assert_eq!(reference.to_string(), "( )");
    }

    #[test]
    fn test_relation_display() {
        let user = Reference::new("User", RefNotation::ActorText, Namespace::ActorLabel);
        let login = Reference::new("Login", RefNotation::UseCaseText, Namespace::UseCaseLabel);

        let association = Relation::Association {
            left: user.clone(),
            right: login.clone(),
            style: ArrowStyle::Dotted,
            label: Some(LinkLabel::Includes),
        };
        assert_eq!(association.to_string(), ":User: ..> (Login) : includes");

        let inheritance = Relation::Inheritance {
            parent: user,
            child: Reference::new("root", RefNotation::Identifier, Namespace::Identifier),
        };
        assert_eq!(inheritance.to_string(), ":User: <|-- root");
    }

    #[test]
    fn test_entities_descends_into_packages() {
        let diagram = Diagram::new(
            None,
            vec![
                Definition::Entity(actor("User", Notation::Shorthand)),
                Definition::Package(PackageDecl::new(
                    "Admin",
                    vec![Definition::Entity(actor("Root", Notation::Shorthand))],
                )),
            ],
        );

        let labels: Vec<_> = diagram.entities().map(EntityDecl::label).collect();
        assert_eq!(labels, ["User", "Root"]);
    }

    #[test]
    fn test_serialize_definition_tags() {
        let definition = Definition::Entity(actor("User", Notation::Shorthand));
        let json = serde_json::to_value(&definition).expect("serializable");

        assert_eq!(json["type"], "entity");
        assert_eq!(json["kind"], "actor");
        assert_eq!(json["label"], "User");
    }
}
