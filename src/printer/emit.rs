//! AST → Doc emitter
//!
//! One handler per node kind. Layout decisions that affect output stability:
//!
//! - binary, ternary and assignment expressions sit in a group that breaks
//!   after the operator, continuation indented one level
//! - compound bodies (and struct, enum and switch bodies) always put their
//!   items on their own indented lines; an empty body is `{}`
//! - function headers keep the opening brace on the header line
//! - unary operators are followed by a space except `++`, `--` and `*`, or
//!   when the operand is parenthesized
//! - call arguments break one per line with the closing parenthesis on its
//!   own line

use super::doc::*;
use crate::parser::ast::{Node, NodeKind, Span};
use crate::parser::with_stack;
use thiserror::Error;

/// A node of a kind that has no printer where it occurs.
///
/// Never produced for trees coming out of the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: no printer for a `{variant}` node in this position", .span.start)]
pub struct UnsupportedNodeError {
    pub variant: &'static str,
    pub span: Span,
}

type Result<T> = std::result::Result<T, UnsupportedNodeError>;

/// Where a node sits relative to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Top,
    TopLevel,
    Inner,
}

/// Build the layout instructions for `node` and everything below it.
pub fn print(node: &Node) -> Result<Doc> {
    emit(node, Position::Top)
}

fn emit(node: &Node, position: Position) -> Result<Doc> {
    let unsupported = || UnsupportedNodeError {
        variant: node.kind.name(),
        span: node.span,
    };

    let doc = match &node.kind {
        NodeKind::Root { decls } => {
            if position != Position::Top {
                return Err(unsupported());
            }
            if decls.is_empty() {
                return Ok(concat(Vec::new()));
            }
            let decls = decls
                .iter()
                .map(|decl| emit(decl, Position::TopLevel))
                .collect::<Result<Vec<_>>>()?;
            concat(vec![join(hardline(), decls), hardline()])
        }
        NodeKind::Func {
            decl_specs,
            name,
            params,
            decls,
            body,
        } => {
            if position != Position::TopLevel {
                return Err(unsupported());
            }
            let mut parts = Vec::new();
            if let Some(specs) = decl_specs {
                parts.push(child(specs)?);
                parts.push(text(" "));
            }
            parts.push(child(&with_parameters(name, params))?);
            for decl in decls {
                parts.push(text(" "));
                parts.push(child(decl)?);
            }
            parts.push(text(" "));
            parts.push(child(body)?);
            concat(parts)
        }

        // Declarations
        NodeKind::Decl {
            decl_specs,
            init_decls,
        } => {
            let mut parts = vec![child(decl_specs)?];
            if let Some(init_decls) = init_decls {
                parts.push(text(" "));
                parts.push(join(text(", "), children(init_decls)?));
            }
            parts.push(text(";"));
            concat(parts)
        }
        NodeKind::DeclSpecs { specs } => join(text(" "), children(specs)?),
        NodeKind::SpecQuals { quals } => join(text(" "), children(quals)?),
        NodeKind::InitDecl { decl, init } => match init {
            Some(init) => concat(vec![child(decl)?, text(" = "), child(init)?]),
            None => child(decl)?,
        },
        NodeKind::Keyword { keyword } => text(keyword.as_str()),
        NodeKind::Atomic { name } => concat(vec![text("_Atomic("), child(name)?, text(")")]),
        NodeKind::Assert { expr, msg } => concat(vec![
            text("_Static_assert("),
            child(expr)?,
            text(", "),
            text(msg.as_str()),
            text(");"),
        ]),
        NodeKind::Struct {
            kind,
            name,
            members,
        } => {
            let mut parts = vec![text(kind.as_str())];
            if let Some(name) = name {
                parts.push(text(" "));
                parts.push(text(name.as_str()));
            }
            if let Some(members) = members {
                parts.push(text(" "));
                parts.push(block(children(members)?, hardline()));
            }
            concat(parts)
        }
        NodeKind::Member { spec_quals, decls } => {
            let mut parts = vec![child(spec_quals)?];
            if !decls.is_empty() {
                parts.push(text(" "));
                parts.push(join(text(", "), children(decls)?));
            }
            parts.push(text(";"));
            concat(parts)
        }
        NodeKind::Bitfield { decl, width } => match decl {
            Some(decl) => concat(vec![child(decl)?, text(" : "), child(width)?]),
            None => concat(vec![text(": "), child(width)?]),
        },
        NodeKind::Enum { name, enumerators } => {
            let mut parts = vec![text("enum")];
            if let Some(name) = name {
                parts.push(text(" "));
                parts.push(text(name.as_str()));
            }
            if let Some(enumerators) = enumerators {
                parts.push(text(" "));
                parts.push(block(
                    children(enumerators)?,
                    concat(vec![text(","), hardline()]),
                ));
            }
            concat(parts)
        }
        NodeKind::Enumerator { name, value } => match value {
            Some(value) => concat(vec![text(name.as_str()), text(" = "), child(value)?]),
            None => text(name.as_str()),
        },
        NodeKind::InitList { items } => {
            if items.is_empty() {
                text("{}")
            } else {
                group(concat(vec![
                    text("{"),
                    indent(concat(vec![
                        line(),
                        join(concat(vec![text(","), line()]), children(items)?),
                    ])),
                    line(),
                    text("}"),
                ]))
            }
        }
        NodeKind::TypeName { spec_quals, decl } => {
            concat(vec![child(spec_quals)?, declarator_gap(decl), child(decl)?])
        }

        // Declarators
        NodeKind::Pointer { quals, decl } => {
            let mut parts = vec![text("*"), join(text(" "), children(quals)?)];
            if let Some(decl) = decl {
                if !quals.is_empty() {
                    parts.push(text(" "));
                }
                parts.push(child(decl)?);
            }
            concat(parts)
        }
        NodeKind::Array { decl, size } => {
            let mut parts = Vec::new();
            if let Some(decl) = decl {
                parts.push(child(decl)?);
            }
            parts.push(text("["));
            if let Some(size) = size {
                parts.push(child(size)?);
            }
            parts.push(text("]"));
            concat(parts)
        }
        NodeKind::Function { decl, params } => {
            let mut parts = Vec::new();
            if let Some(decl) = decl {
                parts.push(child(decl)?);
            }
            parts.push(parameters(params.as_deref())?);
            concat(parts)
        }
        NodeKind::Nested { decl } => concat(vec![text("("), child(decl)?, text(")")]),
        NodeKind::Param { decl_specs, decl } => match decl {
            Some(decl) => concat(vec![child(decl_specs)?, declarator_gap(decl), child(decl)?]),
            None => child(decl_specs)?,
        },
        NodeKind::Ellipsis => text("..."),

        // Expressions
        NodeKind::Binary { lhs, oper, rhs } => group(concat(vec![
            child(lhs)?,
            text(" "),
            text(oper.as_str()),
            indent(concat(vec![line(), child(rhs)?])),
        ])),
        NodeKind::Assign { lhs, oper, rhs } => group(concat(vec![
            child(lhs)?,
            text(" "),
            text(oper.as_str()),
            group(indent(concat(vec![line(), child(rhs)?]))),
        ])),
        NodeKind::Ternary {
            pred,
            truthy,
            falsy,
        } => group(concat(vec![
            child(pred)?,
            indent(concat(vec![
                line(),
                text("? "),
                child(truthy)?,
                line(),
                text(": "),
                child(falsy)?,
            ])),
        ])),
        NodeKind::Unary { oper, expr, parens } => {
            if *parens {
                concat(vec![text(oper.as_str()), text("("), child(expr)?, text(")")])
            } else {
                let tight = matches!(oper.as_str(), "++" | "--" | "*")
                    || matches!(expr.kind, NodeKind::Parens { .. });
                let gap = if tight { "" } else { " " };
                concat(vec![text(oper.as_str()), text(gap), child(expr)?])
            }
        }
        NodeKind::PostUnary { expr, oper } => concat(vec![child(expr)?, text(oper.as_str())]),
        NodeKind::Call { recv, args } => match args {
            Some(args) if !args.is_empty() => group(concat(vec![
                child(recv)?,
                text("("),
                indent(concat(vec![
                    softline(),
                    join(concat(vec![text(","), line()]), children(args)?),
                ])),
                softline(),
                text(")"),
            ])),
            _ => concat(vec![child(recv)?, text("()")]),
        },
        NodeKind::Cast { value, expr } => {
            concat(vec![text("("), child(value)?, text(") "), child(expr)?])
        }
        NodeKind::Field { recv, oper, ident } => {
            concat(vec![child(recv)?, text(oper.as_str()), text(ident.as_str())])
        }
        NodeKind::Index { recv, index } => {
            concat(vec![child(recv)?, text("["), child(index)?, text("]")])
        }
        NodeKind::Parens { expr } => concat(vec![text("("), child(expr)?, text(")")]),
        NodeKind::Ident { value } | NodeKind::Const { value } => text(value.as_str()),
        NodeKind::Exprs { exprs } => join(text(", "), children(exprs)?),

        // Statements
        NodeKind::Compound { items } => {
            let items = items.as_deref().unwrap_or(&[]);
            block(children(items)?, hardline())
        }
        NodeKind::Stmt { expr } => match expr {
            Some(expr) => concat(vec![child(expr)?, text(";")]),
            None => text(";"),
        },
        NodeKind::If {
            expr,
            stmt,
            consequent,
        } => {
            let mut parts = vec![text("if ("), child(expr)?, text(") "), child(stmt)?];
            if let Some(consequent) = consequent {
                parts.push(text(" else "));
                parts.push(child(consequent)?);
            }
            concat(parts)
        }
        NodeKind::Switch { expr, stmt } => {
            concat(vec![text("switch ("), child(expr)?, text(") "), child(stmt)?])
        }
        NodeKind::While { pred, stmt } => {
            concat(vec![text("while ("), child(pred)?, text(") "), child(stmt)?])
        }
        NodeKind::Do { stmt, expr } => concat(vec![
            text("do "),
            child(stmt)?,
            text(" while ("),
            child(expr)?,
            text(");"),
        ]),
        NodeKind::For {
            init,
            pred,
            incr,
            stmt,
        } => {
            // init and pred carry their own `;`
            let mut parts = vec![text("for ("), child(init)?];
            if matches!(pred.kind, NodeKind::Stmt { expr: Some(_) }) {
                parts.push(text(" "));
            }
            parts.push(child(pred)?);
            if let Some(incr) = incr {
                parts.push(text(" "));
                parts.push(child(incr)?);
            }
            parts.push(text(") "));
            parts.push(child(stmt)?);
            concat(parts)
        }
        NodeKind::Return { expr } => match expr {
            Some(expr) => concat(vec![text("return "), child(expr)?, text(";")]),
            None => text("return;"),
        },
        NodeKind::Break => text("break;"),
        NodeKind::Continue => text("continue;"),
        NodeKind::Goto { ident } => concat(vec![text("goto "), text(ident.as_str()), text(";")]),
        NodeKind::Label { ident, stmt } => {
            concat(vec![text(ident.as_str()), text(":"), hardline(), child(stmt)?])
        }
        NodeKind::Case { expr, stmt } => concat(vec![
            text("case "),
            child(expr)?,
            text(":"),
            hardline(),
            child(stmt)?,
        ]),
        NodeKind::Default { stmt } => concat(vec![text("default:"), hardline(), child(stmt)?]),
    };

    Ok(doc)
}

fn child(node: &Node) -> Result<Doc> {
    with_stack(|| emit(node, Position::Inner))
}

fn children(nodes: &[Node]) -> Result<Vec<Doc>> {
    nodes.iter().map(child).collect()
}

/// `{}` when empty, otherwise one item per indented line.
fn block(items: Vec<Doc>, separator: Doc) -> Doc {
    if items.is_empty() {
        return text("{}");
    }
    concat(vec![
        text("{"),
        indent(concat(vec![hardline(), join(separator, items)])),
        hardline(),
        text("}"),
    ])
}

/// A function definition's declarator with its parameter list put back
/// right after the declared identifier, or after the parentheses around a
/// bare one as in `(f)(int)`.
fn with_parameters(name: &Node, params: &Option<Vec<Node>>) -> Node {
    fn bare(node: &Node) -> bool {
        match &node.kind {
            NodeKind::Ident { .. } => true,
            NodeKind::Nested { decl } => bare(decl),
            _ => false,
        }
    }

    fn attach(node: Node, params: Option<Vec<Node>>) -> Node {
        let span = node.span;
        let kind = match node.kind {
            NodeKind::Nested { decl } if !bare(&decl) => NodeKind::Nested {
                decl: Box::new(attach(*decl, params)),
            },
            NodeKind::Pointer {
                quals,
                decl: Some(decl),
            } => NodeKind::Pointer {
                quals,
                decl: Some(Box::new(attach(*decl, params))),
            },
            NodeKind::Array {
                decl: Some(decl),
                size,
            } => NodeKind::Array {
                decl: Some(Box::new(attach(*decl, params))),
                size,
            },
            NodeKind::Function {
                decl: Some(decl),
                params: outer,
            } => NodeKind::Function {
                decl: Some(Box::new(attach(*decl, params))),
                params: outer,
            },
            kind => NodeKind::Function {
                decl: Some(Box::new(Node::new(span, kind))),
                params,
            },
        };
        Node::new(span, kind)
    }
    attach(name.clone(), params.clone())
}

fn parameters(params: Option<&[Node]>) -> Result<Doc> {
    match params {
        Some(params) if !params.is_empty() => Ok(group(concat(vec![
            text("("),
            indent(concat(vec![
                softline(),
                join(concat(vec![text(","), line()]), children(params)?),
            ])),
            softline(),
            text(")"),
        ]))),
        _ => Ok(text("()")),
    }
}

/// Space between specifiers and a declarator: `int *`, but `int[3]`.
fn declarator_gap(decl: &Node) -> Doc {
    match &decl.kind {
        NodeKind::Array { decl: None, .. } | NodeKind::Function { decl: None, .. } => {
            text("")
        }
        _ => text(" "),
    }
}
