//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the translation-unit entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: declarations, specifiers and declarators
//! - `statements`: statements and blocks
//! - `expressions`: the expression precedence ladder
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! Where C needs more than one token of lookahead, the parser tries ordered
//! alternatives from a saved position with [`Parser::first_of`]. When every
//! alternative fails, the error that got furthest into the input is kept.

use super::ast::SourceLocation;
use super::cst::{ExternalDeclaration, TranslationUnit};
use super::lexer::{Category, Token, TokenKind};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Nesting limit used when no [`FormatOptions`](crate::config::FormatOptions) are given.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Highest nesting limit a caller may configure.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Something the parser would have accepted at the error position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Expected {
    Token(TokenKind),
    Category(Category),
    Production(&'static str),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::Category(category) => write!(f, "{}", category),
            Expected::Production(name) => f.write_str(name),
        }
    }
}

fn one_of(expected: &[Expected]) -> String {
    match expected {
        [] => "something else".to_string(),
        [single] => single.to_string(),
        [init @ .., last] => {
            let init: Vec<String> = init.iter().map(|e| e.to_string()).collect();
            format!("{} or {}", init.join(", "), last)
        }
    }
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Parse error at {location}: expected {}, found {found}", one_of(.expected))]
    Unexpected {
        expected: Vec<Expected>,
        found: String,
        found_kind: TokenKind,
        location: SourceLocation,
    },
    #[error("Parse error at {location}: nesting exceeds {limit} levels")]
    TooDeep {
        limit: usize,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Unexpected { location, .. } | ParseError::TooDeep { location, .. } => {
                *location
            }
        }
    }

    /// Keep whichever error got further; at the same position, pool what
    /// both would have accepted.
    fn furthest(self, other: ParseError) -> ParseError {
        match (self, other) {
            (deep @ ParseError::TooDeep { .. }, _) | (_, deep @ ParseError::TooDeep { .. }) => deep,
            (
                ParseError::Unexpected {
                    mut expected,
                    found,
                    found_kind,
                    location,
                },
                ParseError::Unexpected {
                    expected: more,
                    location: other_location,
                    ..
                },
            ) if location == other_location => {
                for e in more {
                    if !expected.contains(&e) {
                        expected.push(e);
                    }
                }
                ParseError::Unexpected {
                    expected,
                    found,
                    found_kind,
                    location,
                }
            }
            (a, b) => {
                if b.location() > a.location() {
                    b
                } else {
                    a
                }
            }
        }
    }
}

/// Recursive descent parser for C
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    depth: usize,
    max_depth: usize,
}

/// One ordered alternative for [`Parser::first_of`].
pub(crate) type Alternative<T> = fn(&mut Parser) -> Result<T, ParseError>;

impl Parser {
    /// `tokens` must end with [`TokenKind::Eof`], as the lexer guarantees.
    /// `max_depth` is clamped to [`MAX_NESTING_DEPTH`].
    pub fn new(tokens: Vec<Token>, max_depth: usize) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
            max_depth: max_depth.min(MAX_NESTING_DEPTH),
        }
    }

    /// Parse the entire translation unit.
    ///
    /// No resynchronization is attempted: the first failing external
    /// declaration ends the run.
    pub(crate) fn parse_translation_unit(&mut self) -> Result<TranslationUnit, Vec<ParseError>> {
        let mut items = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            match self.parse_external_declaration() {
                Ok(item) => items.push(item),
                Err(e) => {
                    errors.push(e);
                    break;
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(TranslationUnit {
            items,
            eof: self.peek().clone(),
        })
    }

    fn parse_external_declaration(&mut self) -> Result<ExternalDeclaration, ParseError> {
        self.first_of(&[
            |p| {
                p.parse_function_definition(true)
                    .map(ExternalDeclaration::Function)
            },
            |p| p.parse_declaration().map(ExternalDeclaration::Declaration),
            |p| {
                p.parse_function_definition(false)
                    .map(ExternalDeclaration::Function)
            },
        ])
    }

    // ===== Helper methods =====

    /// Try each alternative from the same starting position and return the
    /// first that succeeds.
    pub(crate) fn first_of<T>(&mut self, alternatives: &[Alternative<T>]) -> Result<T, ParseError> {
        let start = self.position;
        let mut best: Option<ParseError> = None;

        for alternative in alternatives {
            match alternative(self) {
                Ok(value) => return Ok(value),
                Err(e @ ParseError::TooDeep { .. }) => return Err(e),
                Err(e) => {
                    self.position = start;
                    best = Some(match best {
                        Some(prev) => prev.furthest(e),
                        None => e,
                    });
                }
            }
        }

        Err(best.unwrap_or_else(|| self.error_here(Vec::new())))
    }

    /// Like [`first_of`](Self::first_of) for two alternatives that need
    /// captured state.
    pub(crate) fn either<T>(
        &mut self,
        first: impl FnOnce(&mut Self) -> Result<T, ParseError>,
        second: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let start = self.position;
        match first(self) {
            Ok(value) => Ok(value),
            Err(e @ ParseError::TooDeep { .. }) => Err(e),
            Err(e) => {
                self.position = start;
                second(self).map_err(|e2| e.furthest(e2))
            }
        }
    }

    /// Run `f` one nesting level deeper, failing once the limit is reached.
    ///
    /// Every level gets a fresh stack segment when the current one runs low,
    /// so the limit is the only bound on how deep the input may go.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
                location: self.current_location(),
            });
        }
        self.depth += 1;
        let result = super::with_stack(|| f(self));
        self.depth -= 1;
        result
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn check_category(&self, category: Category) -> bool {
        self.peek().kind.is(category)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.position.min(last)]
    }

    /// Kind of the token `n` places ahead, or `Eof` past the end.
    pub(crate) fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.position + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    pub(crate) fn error_here(&self, expected: Vec<Expected>) -> ParseError {
        let token = self.peek();
        ParseError::Unexpected {
            expected,
            found: token.to_string(),
            found_kind: token.kind,
            location: token.location,
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.eat(kind)
            .ok_or_else(|| self.error_here(vec![Expected::Token(kind)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn parse(source: &str) -> Result<TranslationUnit, Vec<ParseError>> {
        let tokens = tokenize(source).unwrap().tokens;
        Parser::new(tokens, DEFAULT_MAX_DEPTH).parse_translation_unit()
    }

    #[test]
    fn test_empty_translation_unit() {
        let unit = parse("").unwrap();
        assert!(unit.items.is_empty());
        assert_eq!(unit.eof.kind, TokenKind::Eof);
    }

    #[test]
    fn test_external_declaration_priority() {
        let unit = parse("int x; int f(void) { return 0; } main() {}").unwrap();
        assert!(matches!(unit.items[0], ExternalDeclaration::Declaration(_)));
        assert!(matches!(
            &unit.items[1],
            ExternalDeclaration::Function(f) if f.specifiers.is_some()
        ));
        assert!(matches!(
            &unit.items[2],
            ExternalDeclaration::Function(f) if f.specifiers.is_none()
        ));
    }

    #[test]
    fn test_single_error_at_semicolon() {
        let errors = parse("int x = ;").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location(), SourceLocation::new(1, 9));
        match &errors[0] {
            ParseError::Unexpected { found_kind, .. } => {
                assert_eq!(*found_kind, TokenKind::Semicolon)
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_error_message_lists_expected() {
        let errors = parse("int main() { return 0 }").unwrap_err();
        let message = errors[0].to_string();
        assert!(message.starts_with("Parse error at line 1, column 23"), "{}", message);
        assert!(message.contains("';'"), "{}", message);
        assert!(message.ends_with("found '}'"), "{}", message);
    }

    #[test]
    fn test_too_deep() {
        let source = format!("int x = {}1{};", "(".repeat(100), ")".repeat(100));
        let tokens = tokenize(&source).unwrap().tokens;
        let errors = Parser::new(tokens, 16).parse_translation_unit().unwrap_err();
        assert!(matches!(errors[0], ParseError::TooDeep { limit: 16, .. }));
    }

    #[test]
    fn test_depth_limit_is_clamped() {
        let source = format!("int x = {}1{};", "(".repeat(300), ")".repeat(300));
        let tokens = tokenize(&source).unwrap().tokens;
        let errors = Parser::new(tokens, 10_000)
            .parse_translation_unit()
            .unwrap_err();
        assert!(matches!(
            errors[0],
            ParseError::TooDeep {
                limit: MAX_NESTING_DEPTH,
                ..
            }
        ));
    }

    #[test]
    fn test_furthest_merges_expected() {
        let at = SourceLocation::new(1, 5);
        let a = ParseError::Unexpected {
            expected: vec![Expected::Token(TokenKind::Semicolon)],
            found: "'}'".into(),
            found_kind: TokenKind::RBrace,
            location: at,
        };
        let b = ParseError::Unexpected {
            expected: vec![Expected::Token(TokenKind::Comma)],
            found: "'}'".into(),
            found_kind: TokenKind::RBrace,
            location: at,
        };
        match a.furthest(b) {
            ParseError::Unexpected { expected, .. } => assert_eq!(
                expected,
                vec![
                    Expected::Token(TokenKind::Semicolon),
                    Expected::Token(TokenKind::Comma)
                ]
            ),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
