//! CST → AST reduction
//!
//! Total over every tree the parser can build. Three things happen here:
//! flat operator lists are folded back into nested nodes (binary levels to
//! the left, assignment and casts to the right), single-element wrappers
//! are flattened, and each node receives the span from its first to its
//! last token.

use super::ast::{Node, NodeKind, Span};
use super::cst::*;
use super::lexer::Token;
use super::with_stack;

/// Reduce a whole translation unit into a `root` node.
pub(crate) fn reduce(unit: TranslationUnit) -> Node {
    let decls: Vec<Node> = unit
        .items
        .into_iter()
        .map(|item| match item {
            ExternalDeclaration::Function(def) => function(def),
            ExternalDeclaration::Declaration(decl) => declaration(decl),
        })
        .collect();

    let span = match (decls.first(), decls.last()) {
        (Some(first), Some(last)) => first.span.to(last.span),
        _ => unit.eof.span(),
    };
    Node::new(span, NodeKind::Root { decls })
}

fn leaf(token: &Token, kind: NodeKind) -> Node {
    Node::new(token.span(), kind)
}

fn ident(token: &Token) -> Node {
    leaf(
        token,
        NodeKind::Ident {
            value: token.text.clone(),
        },
    )
}

fn boxed(node: Node) -> Box<Node> {
    Box::new(node)
}

// ===== Declarations =====

fn function(def: FunctionDefinition) -> Node {
    let decl_specs = def.specifiers.map(decl_specs);
    let mut declarator = def.declarator;

    let params = take_parameters(&mut declarator.direct).and_then(parameter_list);
    let name = self::declarator(declarator);

    let decls = def.declarations.into_iter().map(declaration).collect();
    let body = compound(def.body);

    let start = decl_specs.as_ref().map_or(name.span, |specs| specs.span);
    Node::new(
        start.to(body.span),
        NodeKind::Func {
            decl_specs: decl_specs.map(boxed),
            name: boxed(name),
            params,
            decls,
            body: boxed(body),
        },
    )
}

/// Detach the parameter list that belongs to the declared name itself: the
/// first suffix after the identifier, looking through parentheses that add
/// nothing. In `int (*f(int a))(char)` that is `(int a)`; `(char)` belongs
/// to the return type and stays in the declarator.
fn take_parameters(direct: &mut DirectDeclarator) -> Option<ParameterList> {
    if let DeclaratorBase::Nested { inner, .. } = &mut direct.base {
        if let Some(list) = take_parameters(&mut inner.direct) {
            return Some(list);
        }
        if inner.pointer.is_some() || !inner.direct.suffixes.is_empty() {
            return None;
        }
    }

    if !matches!(
        direct.suffixes.first(),
        Some(DeclaratorSuffix::Parameters { .. })
    ) {
        return None;
    }
    match direct.suffixes.remove(0) {
        DeclaratorSuffix::Parameters { list, .. } => Some(list),
        DeclaratorSuffix::Array { .. } => None,
    }
}

fn declaration(decl: Declaration) -> Node {
    match decl {
        Declaration::Plain {
            specifiers,
            declarators,
            semi,
        } => {
            let specs = decl_specs(specifiers);
            let init_decls = if declarators.is_empty() {
                None
            } else {
                Some(declarators.into_iter().map(init_declarator).collect())
            };
            Node::new(
                specs.span.to(semi.span()),
                NodeKind::Decl {
                    decl_specs: boxed(specs),
                    init_decls,
                },
            )
        }
        Declaration::StaticAssert(assert) => {
            let msg: Vec<&str> = assert.message.iter().map(|t| t.text.as_str()).collect();
            Node::new(
                assert.keyword.span().to(assert.semi.span()),
                NodeKind::Assert {
                    expr: boxed(conditional(assert.condition)),
                    msg: msg.join(" "),
                },
            )
        }
    }
}

fn decl_specs(list: DeclarationSpecifiers) -> Node {
    specifier_list(list, |specs| NodeKind::DeclSpecs { specs })
}

fn spec_quals(list: DeclarationSpecifiers) -> Node {
    specifier_list(list, |quals| NodeKind::SpecQuals { quals })
}

/// A list of one is the specifier itself.
fn specifier_list(list: DeclarationSpecifiers, wrap: fn(Vec<Node>) -> NodeKind) -> Node {
    let mut nodes: Vec<Node> = list.specifiers.into_iter().map(specifier).collect();
    if nodes.len() == 1 {
        if let Some(only) = nodes.pop() {
            return only;
        }
    }

    let span = match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) => first.span.to(last.span),
        _ => Span::default(),
    };
    Node::new(span, wrap(nodes))
}

fn specifier(spec: Specifier) -> Node {
    with_stack(|| match spec {
        Specifier::Keyword(token) => leaf(
            &token,
            NodeKind::Keyword {
                keyword: token.text.clone(),
            },
        ),
        Specifier::TypedefName(token) => ident(&token),
        Specifier::Struct(s) => {
            let end = match (&s.body, &s.name) {
                (Some(body), _) => body.close.span(),
                (None, Some(name)) => name.span(),
                (None, None) => s.keyword.span(),
            };
            Node::new(
                s.keyword.span().to(end),
                NodeKind::Struct {
                    kind: s.keyword.text.clone(),
                    name: s.name.map(|t| t.text),
                    members: s
                        .body
                        .map(|body| body.members.into_iter().map(member).collect()),
                },
            )
        }
        Specifier::Enum(e) => {
            let end = match (&e.body, &e.name) {
                (Some(body), _) => body.close.span(),
                (None, Some(name)) => name.span(),
                (None, None) => e.keyword.span(),
            };
            Node::new(
                e.keyword.span().to(end),
                NodeKind::Enum {
                    name: e.name.map(|t| t.text),
                    enumerators: e
                        .body
                        .map(|body| body.enumerators.into_iter().map(enumerator).collect()),
                },
            )
        }
        Specifier::Atomic(a) => Node::new(
            a.keyword.span().to(a.close.span()),
            NodeKind::Atomic {
                name: boxed(type_name(a.type_name)),
            },
        ),
    })
}

fn member(decl: StructDeclaration) -> Node {
    let specs = spec_quals(decl.specifiers);
    let decls = decl
        .declarators
        .into_iter()
        .map(|d| match d {
            StructDeclarator::Plain(declarator) => self::declarator(declarator),
            StructDeclarator::Bitfield {
                declarator,
                colon,
                width,
            } => {
                let decl = declarator.map(self::declarator);
                let width = conditional(width);
                let start = decl.as_ref().map_or(colon.span(), |d| d.span);
                Node::new(
                    start.to(width.span),
                    NodeKind::Bitfield {
                        decl: decl.map(boxed),
                        width: boxed(width),
                    },
                )
            }
        })
        .collect();

    Node::new(
        specs.span.to(decl.semi.span()),
        NodeKind::Member {
            spec_quals: boxed(specs),
            decls,
        },
    )
}

fn enumerator(e: Enumerator) -> Node {
    let value = e.value.map(conditional);
    let end = value.as_ref().map_or(e.name.span(), |v| v.span);
    Node::new(
        e.name.span().to(end),
        NodeKind::Enumerator {
            name: e.name.text,
            value: value.map(boxed),
        },
    )
}

fn init_declarator(init_decl: InitDeclarator) -> Node {
    let decl = declarator(init_decl.declarator);
    let init = init_decl.initializer.map(initializer);
    let end = init.as_ref().map_or(decl.span, |i| i.span);
    Node::new(
        decl.span.to(end),
        NodeKind::InitDecl {
            decl: boxed(decl),
            init: init.map(boxed),
        },
    )
}

fn initializer(init: Initializer) -> Node {
    with_stack(|| match init {
        Initializer::Expression(expr) => assignment(expr),
        Initializer::List { open, items, close } => Node::new(
            open.span().to(close.span()),
            NodeKind::InitList {
                items: items.into_iter().map(initializer).collect(),
            },
        ),
    })
}

fn type_name(name: TypeName) -> Node {
    let specs = spec_quals(name.specifiers);
    match name.declarator.and_then(abstract_declarator) {
        Some(decl) => Node::new(
            specs.span.to(decl.span),
            NodeKind::TypeName {
                spec_quals: boxed(specs),
                decl: boxed(decl),
            },
        ),
        None => specs,
    }
}

// ===== Declarators =====

fn declarator(d: Declarator) -> Node {
    with_stack(|| {
        let direct = direct_declarator(d.direct);
        let levels = d.pointer.map_or_else(Vec::new, |p| p.levels);
        levels
            .into_iter()
            .rev()
            .fold(direct, |inner, level| pointer(level, Some(inner)))
    })
}

/// One `*` level; folding levels last to first puts the first `*` outermost.
fn pointer((star, qualifiers): (Token, Vec<Token>), inner: Option<Node>) -> Node {
    let quals: Vec<Node> = qualifiers
        .iter()
        .map(|q| {
            leaf(
                q,
                NodeKind::Keyword {
                    keyword: q.text.clone(),
                },
            )
        })
        .collect();
    let end = match (&inner, quals.last()) {
        (Some(node), _) => node.span,
        (None, Some(last)) => last.span,
        (None, None) => star.span(),
    };
    Node::new(
        star.span().to(end),
        NodeKind::Pointer {
            quals,
            decl: inner.map(boxed),
        },
    )
}

fn direct_declarator(d: DirectDeclarator) -> Node {
    let base = match d.base {
        DeclaratorBase::Identifier(token) => ident(&token),
        DeclaratorBase::Nested { open, inner, close } => Node::new(
            open.span().to(close.span()),
            NodeKind::Nested {
                decl: boxed(declarator(*inner)),
            },
        ),
    };

    d.suffixes
        .into_iter()
        .fold(base, |decl, suffix| declarator_suffix(Some(decl), suffix))
}

fn declarator_suffix(decl: Option<Node>, suffix: DeclaratorSuffix) -> Node {
    let (open, close) = match &suffix {
        DeclaratorSuffix::Array { open, close, .. }
        | DeclaratorSuffix::Parameters { open, close, .. } => (open.span(), close.span()),
    };
    let span = decl.as_ref().map_or(open, |d| d.span).to(close);
    let decl = decl.map(boxed);

    let kind = match suffix {
        DeclaratorSuffix::Array { size, .. } => NodeKind::Array {
            decl,
            size: size.map(assignment).map(boxed),
        },
        DeclaratorSuffix::Parameters { list, .. } => NodeKind::Function {
            decl,
            params: parameter_list(list),
        },
    };
    Node::new(span, kind)
}

/// `None` for `()`; `(void)` is one keyword parameter.
fn parameter_list(list: ParameterList) -> Option<Vec<Node>> {
    match list {
        ParameterList::Empty => None,
        ParameterList::Identifiers(names) => Some(names.iter().map(ident).collect()),
        ParameterList::Types { params, ellipsis } => {
            let mut nodes: Vec<Node> = params.into_iter().map(parameter).collect();
            if let Some(dots) = ellipsis {
                nodes.push(leaf(&dots, NodeKind::Ellipsis));
            }
            Some(nodes)
        }
    }
}

fn parameter(param: ParameterDeclaration) -> Node {
    let specs = decl_specs(param.specifiers);
    let decl = match param.declarator {
        ParameterDeclarator::Concrete(d) => Some(declarator(d)),
        ParameterDeclarator::Abstract(d) => abstract_declarator(d),
        ParameterDeclarator::None => None,
    };
    let end = decl.as_ref().map_or(specs.span, |d| d.span);
    Node::new(
        specs.span.to(end),
        NodeKind::Param {
            decl_specs: boxed(specs),
            decl: decl.map(boxed),
        },
    )
}

fn abstract_declarator(d: AbstractDeclarator) -> Option<Node> {
    with_stack(|| {
        let direct = d.direct.and_then(|direct| {
            let base = direct.nested.and_then(|(open, inner, close)| {
                abstract_declarator(*inner).map(|inner| {
                    Node::new(
                        open.span().to(close.span()),
                        NodeKind::Nested {
                            decl: boxed(inner),
                        },
                    )
                })
            });
            direct
                .suffixes
                .into_iter()
                .fold(base, |decl, suffix| Some(declarator_suffix(decl, suffix)))
        });

        let levels = d.pointer.map_or_else(Vec::new, |p| p.levels);
        levels
            .into_iter()
            .rev()
            .fold(direct, |inner, level| Some(pointer(level, inner)))
    })
}

// ===== Expressions =====

fn expression(expr: Expression) -> Node {
    let mut exprs: Vec<Node> = expr.items.into_iter().map(assignment).collect();
    if exprs.len() == 1 {
        if let Some(only) = exprs.pop() {
            return only;
        }
    }

    let span = match (exprs.first(), exprs.last()) {
        (Some(first), Some(last)) => first.span.to(last.span),
        _ => Span::default(),
    };
    Node::new(span, NodeKind::Exprs { exprs })
}

/// `a = b = c` folds to `a = (b = c)`.
fn assignment(expr: AssignmentExpression) -> Node {
    expr.targets
        .into_iter()
        .rev()
        .fold(conditional(expr.value), |rhs, (target, op)| {
            let lhs = unary(target);
            Node::new(
                lhs.span.to(rhs.span),
                NodeKind::Assign {
                    lhs: boxed(lhs),
                    oper: op.text,
                    rhs: boxed(rhs),
                },
            )
        })
}

fn conditional(expr: ConditionalExpression) -> Node {
    let pred = binary(expr.condition);
    match expr.branch {
        None => pred,
        Some(branch) => {
            let truthy = expression(*branch.truthy);
            let falsy = conditional(*branch.falsy);
            Node::new(
                pred.span.to(falsy.span),
                NodeKind::Ternary {
                    pred: boxed(pred),
                    truthy: boxed(truthy),
                    falsy: boxed(falsy),
                },
            )
        }
    }
}

/// `a - b - c` folds to `(a - b) - c`.
fn binary(expr: BinaryExpression) -> Node {
    expr.rest
        .into_iter()
        .fold(operand(expr.first), |lhs, (op, rhs)| {
            let rhs = operand(rhs);
            Node::new(
                lhs.span.to(rhs.span),
                NodeKind::Binary {
                    lhs: boxed(lhs),
                    oper: op.text,
                    rhs: boxed(rhs),
                },
            )
        })
}

fn operand(operand: Operand) -> Node {
    match operand {
        Operand::Cast(cast) => self::cast(*cast),
        Operand::Nested(level) => binary(*level),
    }
}

fn cast(expr: CastExpression) -> Node {
    with_stack(|| {
        expr.casts
            .into_iter()
            .rev()
            .fold(unary(expr.operand), |inner, (open, name, _close)| {
                Node::new(
                    open.span().to(inner.span),
                    NodeKind::Cast {
                        value: boxed(type_name(name)),
                        expr: boxed(inner),
                    },
                )
            })
    })
}

fn unary(expr: UnaryExpression) -> Node {
    let body = match expr.body {
        UnaryBody::Postfix(postfix) => self::postfix(postfix),
        UnaryBody::Operator { op, operand } => {
            let inner = cast(*operand);
            Node::new(
                op.span().to(inner.span),
                NodeKind::Unary {
                    oper: op.text,
                    expr: boxed(inner),
                    parens: false,
                },
            )
        }
        UnaryBody::SizeofType {
            keyword,
            type_name: name,
            close,
        } => Node::new(
            keyword.span().to(close.span()),
            NodeKind::Unary {
                oper: keyword.text,
                expr: boxed(type_name(name)),
                parens: true,
            },
        ),
    };

    expr.prefixes.into_iter().rev().fold(body, |inner, op| {
        Node::new(
            op.span().to(inner.span),
            NodeKind::Unary {
                oper: op.text,
                expr: boxed(inner),
                parens: false,
            },
        )
    })
}

fn postfix(expr: PostfixExpression) -> Node {
    let primary = self::primary(expr.primary);
    expr.suffixes
        .into_iter()
        .fold(primary, |recv, suffix| match suffix {
            PostfixSuffix::Index { index, close } => Node::new(
                recv.span.to(close.span()),
                NodeKind::Index {
                    recv: boxed(recv),
                    index: boxed(expression(index)),
                },
            ),
            PostfixSuffix::Call { args, close } => Node::new(
                recv.span.to(close.span()),
                NodeKind::Call {
                    recv: boxed(recv),
                    args: if args.is_empty() {
                        None
                    } else {
                        Some(args.into_iter().map(assignment).collect())
                    },
                },
            ),
            PostfixSuffix::Member { op, name } => Node::new(
                recv.span.to(name.span()),
                NodeKind::Field {
                    recv: boxed(recv),
                    oper: op.text,
                    ident: name.text,
                },
            ),
            PostfixSuffix::Count(op) => Node::new(
                recv.span.to(op.span()),
                NodeKind::PostUnary {
                    expr: boxed(recv),
                    oper: op.text,
                },
            ),
        })
}

fn primary(expr: PrimaryExpression) -> Node {
    match expr {
        PrimaryExpression::Identifier(token) => ident(&token),
        PrimaryExpression::Constant(token) => leaf(
            &token,
            NodeKind::Const {
                value: token.text.clone(),
            },
        ),
        PrimaryExpression::Strings(tokens) => {
            let span = match (tokens.first(), tokens.last()) {
                (Some(first), Some(last)) => first.span().to(last.span()),
                _ => Span::default(),
            };
            let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
            Node::new(
                span,
                NodeKind::Const {
                    value: texts.join(" "),
                },
            )
        }
        PrimaryExpression::Parens { open, inner, close } => Node::new(
            open.span().to(close.span()),
            NodeKind::Parens {
                expr: boxed(expression(*inner)),
            },
        ),
    }
}

// ===== Statements =====

fn statement(stmt: Statement) -> Node {
    with_stack(|| match stmt {
        Statement::Labeled(LabeledStatement::Label { name, body }) => {
            let stmt = statement(*body);
            Node::new(
                name.span().to(stmt.span),
                NodeKind::Label {
                    ident: name.text,
                    stmt: boxed(stmt),
                },
            )
        }
        Statement::Labeled(LabeledStatement::Case {
            keyword,
            value,
            body,
        }) => {
            let stmt = statement(*body);
            Node::new(
                keyword.span().to(stmt.span),
                NodeKind::Case {
                    expr: boxed(conditional(value)),
                    stmt: boxed(stmt),
                },
            )
        }
        Statement::Labeled(LabeledStatement::Default { keyword, body }) => {
            let stmt = statement(*body);
            Node::new(
                keyword.span().to(stmt.span),
                NodeKind::Default { stmt: boxed(stmt) },
            )
        }
        Statement::Compound(block) => compound(block),
        Statement::Expression(stmt) => expression_statement(stmt),
        Statement::If {
            keyword,
            condition,
            then,
            otherwise,
        } => {
            let stmt = statement(*then);
            let consequent = otherwise.map(|s| statement(*s));
            let end = consequent.as_ref().map_or(stmt.span, |c| c.span);
            Node::new(
                keyword.span().to(end),
                NodeKind::If {
                    expr: boxed(expression(condition)),
                    stmt: boxed(stmt),
                    consequent: consequent.map(boxed),
                },
            )
        }
        Statement::Switch {
            keyword,
            condition,
            body,
        } => {
            let stmt = statement(*body);
            Node::new(
                keyword.span().to(stmt.span),
                NodeKind::Switch {
                    expr: boxed(expression(condition)),
                    stmt: boxed(stmt),
                },
            )
        }
        Statement::While {
            keyword,
            condition,
            body,
        } => {
            let stmt = statement(*body);
            Node::new(
                keyword.span().to(stmt.span),
                NodeKind::While {
                    pred: boxed(expression(condition)),
                    stmt: boxed(stmt),
                },
            )
        }
        Statement::Do {
            keyword,
            body,
            condition,
            semi,
        } => Node::new(
            keyword.span().to(semi.span()),
            NodeKind::Do {
                stmt: boxed(statement(*body)),
                expr: boxed(expression(condition)),
            },
        ),
        Statement::For {
            keyword,
            init,
            condition,
            step,
            body,
        } => {
            let init = match *init {
                ForInit::Declaration(decl) => declaration(decl),
                ForInit::Expression(stmt) => expression_statement(stmt),
            };
            let stmt = statement(*body);
            Node::new(
                keyword.span().to(stmt.span),
                NodeKind::For {
                    init: boxed(init),
                    pred: boxed(expression_statement(condition)),
                    incr: step.map(expression).map(boxed),
                    stmt: boxed(stmt),
                },
            )
        }
        Statement::Goto {
            keyword,
            label,
            semi,
        } => Node::new(
            keyword.span().to(semi.span()),
            NodeKind::Goto { ident: label.text },
        ),
        Statement::Continue { keyword, semi } => {
            Node::new(keyword.span().to(semi.span()), NodeKind::Continue)
        }
        Statement::Break { keyword, semi } => {
            Node::new(keyword.span().to(semi.span()), NodeKind::Break)
        }
        Statement::Return {
            keyword,
            value,
            semi,
        } => Node::new(
            keyword.span().to(semi.span()),
            NodeKind::Return {
                expr: value.map(expression).map(boxed),
            },
        ),
    })
}

fn compound(block: CompoundStatement) -> Node {
    let items = if block.items.is_empty() {
        None
    } else {
        Some(
            block
                .items
                .into_iter()
                .map(|item| match item {
                    BlockItem::Declaration(decl) => declaration(decl),
                    BlockItem::Statement(stmt) => statement(stmt),
                })
                .collect(),
        )
    };
    Node::new(
        block.open.span().to(block.close.span()),
        NodeKind::Compound { items },
    )
}

fn expression_statement(stmt: ExpressionStatement) -> Node {
    let expr = stmt.expr.map(expression);
    let start = expr.as_ref().map_or(stmt.semi.span(), |e| e.span);
    Node::new(
        start.to(stmt.semi.span()),
        NodeKind::Stmt {
            expr: expr.map(boxed),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::SourceLocation;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::{Parser, DEFAULT_MAX_DEPTH};

    fn root(source: &str) -> Vec<Node> {
        let tokens = tokenize(source).unwrap().tokens;
        let unit = Parser::new(tokens, DEFAULT_MAX_DEPTH)
            .parse_translation_unit()
            .unwrap();
        match reduce(unit).kind {
            NodeKind::Root { decls } => decls,
            other => panic!("expected root, got {:?}", other),
        }
    }

    /// The initializer of the first declarator of the first declaration.
    fn init(source: &str) -> Node {
        match root(source).remove(0).kind {
            NodeKind::Decl {
                init_decls: Some(mut decls),
                ..
            } => match decls.remove(0).kind {
                NodeKind::InitDecl {
                    init: Some(init), ..
                } => *init,
                other => panic!("expected initDecl, got {:?}", other),
            },
            other => panic!("expected decl, got {:?}", other),
        }
    }

    fn name(node: &Node) -> &'static str {
        node.kind.name()
    }

    #[test]
    fn test_binary_folds_left() {
        let node = init("int x = a - b - c;");
        match node.kind {
            NodeKind::Binary { lhs, oper, rhs } => {
                assert_eq!(oper, "-");
                assert_eq!(name(&lhs), "binary");
                assert!(matches!(rhs.kind, NodeKind::Ident { ref value } if value == "c"));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let node = init("int x = a + b * c;");
        match node.kind {
            NodeKind::Binary { lhs, oper, rhs } => {
                assert_eq!(oper, "+");
                assert_eq!(name(&lhs), "ident");
                assert!(matches!(rhs.kind, NodeKind::Binary { ref oper, .. } if oper == "*"));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_ternary_folds_right() {
        let node = init("int x = a ? b : c ? d : e;");
        match node.kind {
            NodeKind::Ternary { falsy, .. } => assert_eq!(name(&falsy), "ternary"),
            other => panic!("expected ternary, got {:?}", other),
        }
    }

    #[test]
    fn test_prefix_order() {
        // `- ++x` is unary(-, unary(++, x))
        let node = init("int y = -++x;");
        match node.kind {
            NodeKind::Unary { oper, expr, parens } => {
                assert_eq!(oper, "-");
                assert!(!parens);
                assert!(matches!(expr.kind, NodeKind::Unary { ref oper, .. } if oper == "++"));
            }
            other => panic!("expected unary, got {:?}", other),
        }
    }

    #[test]
    fn test_sizeof_forms() {
        assert!(matches!(
            init("int n = sizeof(int);").kind,
            NodeKind::Unary { parens: true, .. }
        ));
        match init("int n = sizeof(x);").kind {
            NodeKind::Unary { oper, expr, parens } => {
                assert_eq!(oper, "sizeof");
                assert!(!parens);
                assert_eq!(name(&expr), "parens");
            }
            other => panic!("expected unary, got {:?}", other),
        }
    }

    #[test]
    fn test_adjacent_strings_join() {
        match init(r#"char *s = "ab" "cd";"#).kind {
            NodeKind::Const { value } => assert_eq!(value, r#""ab" "cd""#),
            other => panic!("expected const, got {:?}", other),
        }
    }

    #[test]
    fn test_single_specifier_is_flattened() {
        match root("int x;").remove(0).kind {
            NodeKind::Decl { decl_specs, .. } => assert_eq!(name(&decl_specs), "keyword"),
            other => panic!("expected decl, got {:?}", other),
        }
        match root("static const int x;").remove(0).kind {
            NodeKind::Decl { decl_specs, .. } => match decl_specs.kind {
                NodeKind::DeclSpecs { specs } => assert_eq!(specs.len(), 3),
                other => panic!("expected declSpecs, got {:?}", other),
            },
            other => panic!("expected decl, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_type_declaration() {
        match root("struct point;").remove(0).kind {
            NodeKind::Decl {
                decl_specs,
                init_decls,
            } => {
                assert!(init_decls.is_none());
                assert!(matches!(
                    decl_specs.kind,
                    NodeKind::Struct { ref kind, ref name, members: None }
                        if kind == "struct" && name.as_deref() == Some("point")
                ));
            }
            other => panic!("expected decl, got {:?}", other),
        }
    }

    #[test]
    fn test_pointer_levels_nest_outermost_first() {
        let decl = root("int * const * p;").remove(0);
        let NodeKind::Decl {
            init_decls: Some(decls),
            ..
        } = decl.kind
        else {
            panic!("expected decl");
        };
        let NodeKind::InitDecl { decl, .. } = &decls[0].kind else {
            panic!("expected initDecl");
        };
        match &decl.kind {
            NodeKind::Pointer { quals, decl } => {
                assert_eq!(quals.len(), 1);
                let inner = decl.as_ref().unwrap();
                assert!(matches!(
                    inner.kind,
                    NodeKind::Pointer { ref quals, .. } if quals.is_empty()
                ));
            }
            other => panic!("expected pointer, got {:?}", other),
        }
    }

    #[test]
    fn test_function_params() {
        let func = root("int f(void) { return 0; }").remove(0);
        match func.kind {
            NodeKind::Func { params, name, .. } => {
                assert_eq!(name.kind, NodeKind::Ident { value: "f".into() });
                let params = params.unwrap();
                assert_eq!(params.len(), 1);
                assert!(matches!(params[0].kind, NodeKind::Param { decl: None, .. }));
            }
            other => panic!("expected func, got {:?}", other),
        }

        match root("int g() {}").remove(0).kind {
            NodeKind::Func { params, body, .. } => {
                assert!(params.is_none());
                assert_eq!(body.kind, NodeKind::Compound { items: None });
            }
            other => panic!("expected func, got {:?}", other),
        }
    }

    #[test]
    fn test_function_returning_function_pointer() {
        match root("int (*f(int a))(char) { return 0; }").remove(0).kind {
            NodeKind::Func {
                params,
                name: declared,
                ..
            } => {
                let params = params.unwrap();
                assert_eq!(params.len(), 1);
                match &params[0].kind {
                    NodeKind::Param { decl: Some(decl), .. } => {
                        assert_eq!(decl.kind, NodeKind::Ident { value: "a".into() })
                    }
                    other => panic!("expected named param, got {:?}", other),
                }

                // `(char)` stays with the return type
                let NodeKind::Function {
                    decl: Some(inner),
                    params: Some(rest),
                } = &declared.kind
                else {
                    panic!("expected function declarator, got {:?}", declared);
                };
                assert_eq!(rest.len(), 1);
                let NodeKind::Nested { decl } = &inner.kind else {
                    panic!("expected nested, got {:?}", inner);
                };
                match &decl.kind {
                    NodeKind::Pointer { decl: Some(f), .. } => {
                        assert_eq!(f.kind, NodeKind::Ident { value: "f".into() })
                    }
                    other => panic!("expected pointer, got {:?}", other),
                }
            }
            other => panic!("expected func, got {:?}", other),
        }
    }

    #[test]
    fn test_knr_function() {
        match root("int f(a, b) int a; char b; { return a; }").remove(0).kind {
            NodeKind::Func { params, decls, .. } => {
                let params = params.unwrap();
                assert!(params.iter().all(|p| name(p) == "ident"));
                assert_eq!(decls.len(), 2);
            }
            other => panic!("expected func, got {:?}", other),
        }
    }

    #[test]
    fn test_abstract_parameters() {
        match root("void qsort(void *, int (*)(const void *, const void *));")
            .remove(0)
            .kind
        {
            NodeKind::Decl {
                init_decls: Some(decls),
                ..
            } => {
                let NodeKind::InitDecl { decl, .. } = &decls[0].kind else {
                    panic!("expected initDecl");
                };
                let NodeKind::Function {
                    params: Some(params),
                    ..
                } = &decl.kind
                else {
                    panic!("expected function declarator, got {:?}", decl.kind);
                };
                assert_eq!(params.len(), 2);
                assert!(matches!(
                    &params[1].kind,
                    NodeKind::Param { decl: Some(d), .. } if name(d) == "function"
                ));
            }
            other => panic!("expected decl, got {:?}", other),
        }
    }

    #[test]
    fn test_spans() {
        let decls = root("int main() {\n  return 1 + 2;\n}");
        let func = &decls[0];
        assert_eq!(func.span.start, SourceLocation::new(1, 1));
        assert_eq!(func.span.end, SourceLocation::new(3, 1));

        let NodeKind::Func { body, .. } = &func.kind else {
            panic!("expected func");
        };
        let NodeKind::Compound { items: Some(items) } = &body.kind else {
            panic!("expected compound");
        };
        assert_eq!(items[0].span.start, SourceLocation::new(2, 3));
        assert_eq!(items[0].span.end, SourceLocation::new(2, 15));

        let NodeKind::Return { expr: Some(expr) } = &items[0].kind else {
            panic!("expected return");
        };
        assert_eq!(expr.span.start, SourceLocation::new(2, 10));
        assert_eq!(expr.span.end, SourceLocation::new(2, 14));
    }

    #[test]
    fn test_empty_root_span() {
        let tokens = tokenize("\n\n").unwrap().tokens;
        let unit = Parser::new(tokens, DEFAULT_MAX_DEPTH)
            .parse_translation_unit()
            .unwrap();
        let node = reduce(unit);
        assert_eq!(node.kind, NodeKind::Root { decls: Vec::new() });
        assert!(node.span.is_well_formed());
    }
}
