//! Core types for the ucd use case diagram language.
//!
//! This crate holds the syntax tree produced by `ucd-parser` and the printer
//! that turns a tree back into source text. It has no knowledge of tokens or
//! diagnostics.

pub mod ast;
pub mod printer;
