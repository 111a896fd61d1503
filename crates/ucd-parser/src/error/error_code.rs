//! Error codes for the ucd diagnostic system.
//!
//! Error codes are organized by stage:
//! - `E0xx` - Lexical errors
//! - `E1xx` - Syntax errors
//! - `E2xx` - Semantic errors

use std::fmt;

/// The pipeline stage that rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Lexical,
    Syntactic,
    Semantic,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lexical => write!(f, "lexical"),
            Stage::Syntactic => write!(f, "syntactic"),
            Stage::Semantic => write!(f, "semantic"),
        }
    }
}

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexical Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with `"` but never closed.
    E001,

    /// Unexpected character.
    ///
    /// No token starts with this character.
    E002,

    /// Unterminated use case text.
    ///
    /// A `(` was not followed by text and a `)` on the same line.
    E003,

    /// Malformed stereotype.
    ///
    /// A `<<` was not followed by a name made of letters, digits, `_` or `-`
    /// and a closing `>>`.
    E004,

    // =========================================================================
    // Syntax Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The token cannot continue the construct being parsed.
    E100,

    /// Unexpected end of input.
    ///
    /// The input ended before the diagram was closed.
    E101,

    // =========================================================================
    // Semantic Errors (E2xx)
    // =========================================================================
    /// Duplicate identifier.
    ///
    /// An alias, package name or diagram name is declared more than once.
    /// Packages do not open a new scope, so the check spans the whole document.
    E200,

    /// Duplicate actor label.
    E201,

    /// Duplicate use case label.
    E202,

    /// Unresolved reference.
    ///
    /// A relation names something that has not been declared before it.
    E203,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "unterminated use case text",
            ErrorCode::E004 => "malformed stereotype",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of input",
            ErrorCode::E200 => "duplicate identifier",
            ErrorCode::E201 => "duplicate actor label",
            ErrorCode::E202 => "duplicate use case label",
            ErrorCode::E203 => "unresolved reference",
        }
    }

    /// The stage this code belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            ErrorCode::E001 | ErrorCode::E002 | ErrorCode::E003 | ErrorCode::E004 => {
                Stage::Lexical
            }
            ErrorCode::E100 | ErrorCode::E101 => Stage::Syntactic,
            ErrorCode::E200 | ErrorCode::E201 | ErrorCode::E202 | ErrorCode::E203 => {
                Stage::Semantic
            }
        }
    }

    /// Whether this is a duplicate actor or use case label.
    pub fn is_duplicate_label(&self) -> bool {
        matches!(self, ErrorCode::E201 | ErrorCode::E202)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
