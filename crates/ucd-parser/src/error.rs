//! Error and diagnostic system for the ucd parser.
//!
//! Parsing is fail-fast: the first lexical, syntactic or semantic problem
//! stops the pipeline and is reported as a single [`Diagnostic`] wrapped in a
//! [`ParseError`]. Every diagnostic carries an [`ErrorCode`] whose
//! [`Stage`] tells which part of the pipeline rejected the input.
//!
//! # Example
//!
//! ```
//! # use ucd_parser::error::{Diagnostic, ErrorCode};
//! # use ucd_parser::{Location, Span};
//!
//! let span = Span::new(30..36, Location::new(3, 1));
//! let first = Span::new(10..16, Location::new(2, 7));
//!
//! let diag = Diagnostic::error(ErrorCode::E201, "actor `User` is declared more than once")
//!     .with_label(span, "duplicate declaration")
//!     .with_secondary_label(first, "first declared here")
//!     .with_found(":User:");
//! assert_eq!(diag.location().line(), 3);
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, Stage};
pub use label::Label;
pub use parse_error::ParseError;
