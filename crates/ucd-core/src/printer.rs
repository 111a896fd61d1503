//! Pretty-printer for [`Diagram`] trees.
//!
//! The output is valid source: marker lines around the body, one definition
//! per line, and package bodies between `{` and `}` indented one level deeper
//! than their header. Parsing the output yields a tree equal to the input.

use std::fmt::{self, Write};

use crate::ast::{Definition, Diagram};

/// Default number of spaces per nesting level.
pub const DEFAULT_INDENT: usize = 4;

/// Renders diagrams back to source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Printer {
    indent: usize,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl Printer {
    /// Create a printer that indents package bodies by `indent` spaces per level.
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    /// Render `diagram` into a new string.
    pub fn render(&self, diagram: &Diagram) -> Result<String, fmt::Error> {
        let mut out = String::new();
        self.write(&mut out, diagram)?;
        Ok(out)
    }

    /// Write `diagram` to any formatter sink.
    pub fn write<W: Write>(&self, out: &mut W, diagram: &Diagram) -> fmt::Result {
        match diagram.name() {
            Some(name) => writeln!(out, "@startuml {name}")?,
            None => writeln!(out, "@startuml")?,
        }
        self.write_definitions(out, diagram.definitions(), 0)?;
        writeln!(out, "@enduml")
    }

    fn write_definitions<W: Write>(
        &self,
        out: &mut W,
        definitions: &[Definition],
        depth: usize,
    ) -> fmt::Result {
        let pad = depth * self.indent;
        for definition in definitions {
            match definition {
                Definition::Entity(entity) => writeln!(out, "{:pad$}{entity}", "")?,
                Definition::Relation(relation) => writeln!(out, "{:pad$}{relation}", "")?,
                Definition::Package(package) => {
                    writeln!(out, "{:pad$}package {} {{", "", package.name())?;
                    self.write_definitions(out, package.definitions(), depth + 1)?;
                    writeln!(out, "{:pad$}}}", "")?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::default().write(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        ArrowStyle, EntityDecl, EntityKind, Namespace, Notation, PackageDecl, RefNotation,
        Reference, Relation,
    };

    fn sample() -> Diagram {
        let user = EntityDecl::new(EntityKind::Actor, "User", Notation::Delimited, None, None);
        let root = EntityDecl::new(EntityKind::Actor, "Root", Notation::Shorthand, None, None);
        let inherit = Relation::Inheritance {
            parent: Reference::new("User", RefNotation::ActorText, Namespace::ActorLabel),
            child: Reference::new("Root", RefNotation::ActorText, Namespace::ActorLabel),
        };
        let login = Relation::Association {
            left: Reference::new("User", RefNotation::ActorText, Namespace::ActorLabel),
            right: Reference::new("Login", RefNotation::UseCaseText, Namespace::UseCaseLabel),
            style: ArrowStyle::Solid,
            label: None,
        };

        Diagram::new(
            Some("System".to_string()),
            vec![
                Definition::Entity(user),
                Definition::Package(PackageDecl::new(
                    "Admin",
                    vec![Definition::Entity(root), Definition::Relation(inherit)],
                )),
                Definition::Relation(login),
            ],
        )
    }

    #[test]
    fn test_render_nested_package() {
        let expected = "\
@startuml System
actor :User:
package Admin {
    :Root:
    :User: <|-- :Root:
}
:User: --> (Login)
@enduml
";
        assert_eq!(Printer::default().render(&sample()).unwrap(), expected);
    }

    #[test]
    fn test_custom_indent() {
        let rendered = Printer::new(2).render(&sample()).unwrap();
        assert!(rendered.contains("\n  :Root:\n"));
    }

    #[test]
    fn test_empty_anonymous_diagram() {
        let diagram = Diagram::new(None, Vec::new());
        assert_eq!(diagram.to_string(), "@startuml\n@enduml\n");
    }

    #[test]
    fn test_empty_package_body() {
        let diagram = Diagram::new(
            None,
            vec![Definition::Package(PackageDecl::new("Empty", Vec::new()))],
        );
        assert_eq!(diagram.to_string(), "@startuml\npackage Empty {\n}\n@enduml\n");
    }
}
