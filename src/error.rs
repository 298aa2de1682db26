//! Crate-level error types
//!
//! Each pipeline stage has its own error type. [`SyntaxError`] puts the two
//! input-dependent ones behind a single `{location, expected, found}` view,
//! and [`Error`] is what the public entry points return.

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::LexError;
use crate::parser::parse::{Expected, ParseError};
use crate::printer::emit::UnsupportedNodeError;
use thiserror::Error;

/// A lex or parse error, both caused by malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn location(&self) -> SourceLocation {
        match self {
            SyntaxError::Lex(e) => e.location,
            SyntaxError::Parse(e) => e.location(),
        }
    }

    /// What would have been accepted; empty when the error is not about a
    /// missing token.
    pub fn expected(&self) -> &[Expected] {
        match self {
            SyntaxError::Parse(ParseError::Unexpected { expected, .. }) => expected,
            _ => &[],
        }
    }

    /// Description of the offending token, when there was one.
    pub fn found(&self) -> Option<&str> {
        match self {
            SyntaxError::Parse(ParseError::Unexpected { found, .. }) => Some(found),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}", join_lines(.0))]
    Syntax(Vec<SyntaxError>),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedNodeError),
}

fn join_lines(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl Error {
    /// The syntax errors carried, if any.
    pub fn syntax_errors(&self) -> &[SyntaxError] {
        match self {
            Error::Syntax(errors) => errors,
            Error::Unsupported(_) => &[],
        }
    }
}

impl From<Vec<LexError>> for Error {
    fn from(errors: Vec<LexError>) -> Self {
        Error::Syntax(errors.into_iter().map(SyntaxError::Lex).collect())
    }
}

impl From<Vec<ParseError>> for Error {
    fn from(errors: Vec<ParseError>) -> Self {
        Error::Syntax(errors.into_iter().map(SyntaxError::Parse).collect())
    }
}
