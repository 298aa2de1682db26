//! # Introduction
//!
//! cfmt reads C source text and produces what a pretty printer needs: a
//! span-annotated syntax tree and, for that tree, a sequence of layout
//! instructions (groups, indentation, line breaks) for a layout engine.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser (CST) → Reducer (AST) → Emitter (Doc) → Layout → Text
//! ```
//!
//! 1. [`parser`]: tokenises the source, recognizes it with a recursive
//!    descent parser and reduces the concrete tree into [`parser::ast::Node`]s.
//! 2. [`printer`]: emits a [`printer::Doc`] per node and ships a reference
//!    layout engine that renders it for a print width.
//! 3. [`config`]: [`config::FormatOptions`], optionally loaded from TOML.
//! 4. [`error`]: the crate-level [`Error`].
//!
//! ## Example
//!
//! ```
//! let out = cfmt::format("int main(){return a-b-c;}", &Default::default()).unwrap();
//! assert_eq!(out, "int main() {\n  return a - b - c;\n}\n");
//! ```
//!
//! Every call is independent: the only shared state is the keyword table,
//! built once and read-only afterwards, so inputs may be processed from
//! several threads at once.

pub mod config;
pub mod error;
pub mod parser;
pub mod printer;

pub use config::FormatOptions;
pub use error::Error;

use parser::ast::Node;
use parser::lexer::Comment;
use printer::Doc;

/// A parsed translation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// The `root` node.
    pub ast: Node,
    /// Comments and preprocessor lines, in source order. Not attached to
    /// the tree.
    pub comments: Vec<Comment>,
}

/// Parse with the default nesting limit.
pub fn parse(source: &str) -> Result<Parsed, Error> {
    parse_with(source, &FormatOptions::default())
}

pub fn parse_with(source: &str, options: &FormatOptions) -> Result<Parsed, Error> {
    let (ast, comments) = parser::parse_source(source, options.max_nesting_depth)?;
    Ok(Parsed { ast, comments })
}

/// Layout instructions for a tree.
pub fn print_doc(ast: &Node) -> Result<Doc, Error> {
    Ok(printer::print(ast)?)
}

/// Parse, emit and lay out `source`.
pub fn format(source: &str, options: &FormatOptions) -> Result<String, Error> {
    let parsed = parse_with(source, options)?;
    let doc = print_doc(&parsed.ast)?;
    Ok(printer::render(&doc, options))
}
