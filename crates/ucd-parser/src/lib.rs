//! # ucd Parser
//!
//! Front end for PlantUML use case diagrams. This crate turns source text into
//! a validated [`ucd_core::ast::Diagram`], or stops at the first problem with a
//! [`ParseError`] that names the stage, the offending text and its location.
//!
//! ## Usage
//!
//! ```
//! # use ucd_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "@startuml\n:User:\n(Login)\n:User: --> (Login)\n@enduml\n";
//!
//!     let diagram = parse(source)?;
//!     assert_eq!(diagram.definitions().len(), 3);
//!     Ok(())
//! }
//! ```

pub mod error;

mod lexer;
mod parser;
mod span;
mod symbols;
mod tokens;

pub use error::ParseError;
pub use span::{Location, Span, Spanned};
pub use symbols::SymbolTable;
pub use tokens::{Keyword, PositionedToken, Token};

use log::debug;

use ucd_core::ast::Diagram;

/// Split source text into positioned tokens.
///
/// The returned vector always ends with [`Token::Eof`].
///
/// # Errors
///
/// Returns a lexical [`ParseError`] for the first character sequence that
/// does not form a token.
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    lexer::tokenize(source)
}

/// Parse source text into a validated diagram.
///
/// The pipeline runs in two steps:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Build the AST from tokens, checking every declaration and
///    reference against a fresh symbol table as each node is built
///
/// # Errors
///
/// Returns the first lexical, syntactic or semantic error found.
///
/// # Example
///
/// ```
/// # use ucd_parser::{parse, error::ErrorCode};
///
/// let err = parse("@startuml\n:A: --> :B:\n@enduml\n").unwrap_err();
/// assert_eq!(err.code(), ErrorCode::E203);
/// assert_eq!(err.location().line(), 2);
/// ```
pub fn parse(source: &str) -> Result<Diagram, ParseError> {
    // Step 1: Tokenize
    let tokens = lexer::tokenize(source)?;
    debug!(token_count = tokens.len(); "Source tokenized");

    // Step 2: Parse and validate
    parse_tokens(&tokens)
}

/// Parse an already tokenized source into a validated diagram.
///
/// The tokens must end with [`Token::Eof`], as [`tokenize`] produces them.
///
/// # Errors
///
/// Returns the first syntactic or semantic error found.
pub fn parse_tokens(tokens: &[PositionedToken<'_>]) -> Result<Diagram, ParseError> {
    let diagram = parser::build_diagram(tokens)?;
    debug!(definitions = diagram.definitions().len(); "Diagram parsed");

    Ok(diagram)
}
