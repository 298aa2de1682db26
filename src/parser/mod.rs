//! C source code parser
//!
//! This module transforms C source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens + side-channel comments)
//! - [`parse`]: Recursive descent recognition (tokens → concrete syntax tree)
//! - `reduce`: Folding and flattening (concrete tree → AST with spans)
//! - [`ast`]: AST node definitions
//!
//! # Accepted C
//!
//! C89 declarations and statements plus the common C99/C11 additions:
//! interleaved declarations, `for` declarations, `inline`, `restrict`,
//! `_Bool`, `_Atomic`, `_Static_assert`, K&R parameter lists, bit-fields and
//! variadic prototypes. Preprocessor lines are set aside by the lexer, not
//! expanded. Typedef names are not tracked.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with ordered alternatives where C
//! needs more than one token of lookahead. No external parser generator
//! dependencies.

pub mod ast;
pub(crate) mod cst;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
pub(crate) mod reduce;
mod statements;

use ast::Node;
use lexer::{Comment, Lexer};
use parse::Parser;

/// Headroom below which a recursive step moves to a new stack segment.
const STACK_RED_ZONE: usize = 256 * 1024;
const STACK_SEGMENT: usize = 4 * 1024 * 1024;

/// Run `f`, switching to a fresh stack segment first if the current one is
/// nearly used up. Wraps each recursive step of the parser, the reducer and
/// the emitter.
pub(crate) fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, f)
}

/// Run the tokenizer, parser and reducer over `source`.
///
/// Returns the `root` node and the side-channel comments, or every lex
/// error of the input, or the parse errors of the first failing
/// declaration.
pub fn parse_source(
    source: &str,
    max_depth: usize,
) -> Result<(Node, Vec<Comment>), crate::error::Error> {
    let stream = Lexer::new(source).tokenize()?;
    let unit = Parser::new(stream.tokens, max_depth).parse_translation_unit()?;
    Ok((reduce::reduce(unit), stream.comments))
}
