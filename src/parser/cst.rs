//! Concrete syntax tree
//!
//! One type per grammar production. Nothing here is folded or flattened:
//! binary operators are kept as flat operand/operator lists, assignment as a
//! list of `(target, operator)` pairs, and every delimiter token that bounds
//! a node is retained so the reducer can compute spans. The tree lives only
//! between [`Parser`](super::parse::Parser) and [`reduce`](super::reduce).

use super::lexer::Token;

#[derive(Debug, Clone)]
pub(crate) struct TranslationUnit {
    pub items: Vec<ExternalDeclaration>,
    pub eof: Token,
}

#[derive(Debug, Clone)]
pub(crate) enum ExternalDeclaration {
    Function(FunctionDefinition),
    Declaration(Declaration),
}

#[derive(Debug, Clone)]
pub(crate) struct FunctionDefinition {
    pub specifiers: Option<DeclarationSpecifiers>,
    pub declarator: Declarator,
    /// K&R parameter declarations between the declarator and the body.
    pub declarations: Vec<Declaration>,
    pub body: CompoundStatement,
}

// ===== Declarations =====

#[derive(Debug, Clone)]
pub(crate) enum Declaration {
    Plain {
        specifiers: DeclarationSpecifiers,
        declarators: Vec<InitDeclarator>,
        semi: Token,
    },
    StaticAssert(StaticAssert),
}

#[derive(Debug, Clone)]
pub(crate) struct StaticAssert {
    pub keyword: Token,
    pub condition: ConditionalExpression,
    pub message: Vec<Token>,
    pub semi: Token,
}

/// Non-empty, in source order. Also used for specifier-qualifier lists.
#[derive(Debug, Clone)]
pub(crate) struct DeclarationSpecifiers {
    pub specifiers: Vec<Specifier>,
}

#[derive(Debug, Clone)]
pub(crate) enum Specifier {
    /// Storage class, type keyword, qualifier or `inline`.
    Keyword(Token),
    TypedefName(Token),
    Struct(StructSpecifier),
    Enum(EnumSpecifier),
    Atomic(AtomicSpecifier),
}

#[derive(Debug, Clone)]
pub(crate) struct StructSpecifier {
    pub keyword: Token,
    pub name: Option<Token>,
    pub body: Option<StructBody>,
}

#[derive(Debug, Clone)]
pub(crate) struct StructBody {
    pub members: Vec<StructDeclaration>,
    pub close: Token,
}

#[derive(Debug, Clone)]
pub(crate) struct StructDeclaration {
    pub specifiers: DeclarationSpecifiers,
    pub declarators: Vec<StructDeclarator>,
    pub semi: Token,
}

#[derive(Debug, Clone)]
pub(crate) enum StructDeclarator {
    Plain(Declarator),
    Bitfield {
        declarator: Option<Declarator>,
        colon: Token,
        width: ConditionalExpression,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct EnumSpecifier {
    pub keyword: Token,
    pub name: Option<Token>,
    pub body: Option<EnumBody>,
}

#[derive(Debug, Clone)]
pub(crate) struct EnumBody {
    pub enumerators: Vec<Enumerator>,
    pub close: Token,
}

#[derive(Debug, Clone)]
pub(crate) struct Enumerator {
    pub name: Token,
    pub value: Option<ConditionalExpression>,
}

#[derive(Debug, Clone)]
pub(crate) struct AtomicSpecifier {
    pub keyword: Token,
    pub type_name: TypeName,
    pub close: Token,
}

#[derive(Debug, Clone)]
pub(crate) struct InitDeclarator {
    pub declarator: Declarator,
    pub initializer: Option<Initializer>,
}

#[derive(Debug, Clone)]
pub(crate) enum Initializer {
    Expression(AssignmentExpression),
    List {
        open: Token,
        items: Vec<Initializer>,
        close: Token,
    },
}

// ===== Declarators =====

#[derive(Debug, Clone)]
pub(crate) struct Declarator {
    pub pointer: Option<Pointer>,
    pub direct: DirectDeclarator,
}

/// `*` levels in source order, each with its trailing qualifiers.
#[derive(Debug, Clone)]
pub(crate) struct Pointer {
    pub levels: Vec<(Token, Vec<Token>)>,
}

#[derive(Debug, Clone)]
pub(crate) struct DirectDeclarator {
    pub base: DeclaratorBase,
    pub suffixes: Vec<DeclaratorSuffix>,
}

#[derive(Debug, Clone)]
pub(crate) enum DeclaratorBase {
    Identifier(Token),
    Nested {
        open: Token,
        inner: Box<Declarator>,
        close: Token,
    },
}

#[derive(Debug, Clone)]
pub(crate) enum DeclaratorSuffix {
    Array {
        open: Token,
        size: Option<AssignmentExpression>,
        close: Token,
    },
    Parameters {
        open: Token,
        list: ParameterList,
        close: Token,
    },
}

#[derive(Debug, Clone)]
pub(crate) enum ParameterList {
    /// `()`: parameters unspecified.
    Empty,
    Types {
        params: Vec<ParameterDeclaration>,
        ellipsis: Option<Token>,
    },
    /// Legacy `f(a, b)` identifier list.
    Identifiers(Vec<Token>),
}

#[derive(Debug, Clone)]
pub(crate) struct ParameterDeclaration {
    pub specifiers: DeclarationSpecifiers,
    pub declarator: ParameterDeclarator,
}

#[derive(Debug, Clone)]
pub(crate) enum ParameterDeclarator {
    Concrete(Declarator),
    Abstract(AbstractDeclarator),
    None,
}

/// At least one of `pointer` and `direct` is present.
#[derive(Debug, Clone)]
pub(crate) struct AbstractDeclarator {
    pub pointer: Option<Pointer>,
    pub direct: Option<DirectAbstractDeclarator>,
}

#[derive(Debug, Clone)]
pub(crate) struct DirectAbstractDeclarator {
    pub nested: Option<(Token, Box<AbstractDeclarator>, Token)>,
    pub suffixes: Vec<DeclaratorSuffix>,
}

#[derive(Debug, Clone)]
pub(crate) struct TypeName {
    pub specifiers: DeclarationSpecifiers,
    pub declarator: Option<AbstractDeclarator>,
}

// ===== Expressions =====

/// Comma-separated, non-empty.
#[derive(Debug, Clone)]
pub(crate) struct Expression {
    pub items: Vec<AssignmentExpression>,
}

#[derive(Debug, Clone)]
pub(crate) struct AssignmentExpression {
    pub targets: Vec<(UnaryExpression, Token)>,
    pub value: ConditionalExpression,
}

#[derive(Debug, Clone)]
pub(crate) struct ConditionalExpression {
    pub condition: BinaryExpression,
    pub branch: Option<ConditionalBranch>,
}

#[derive(Debug, Clone)]
pub(crate) struct ConditionalBranch {
    pub truthy: Box<Expression>,
    pub falsy: Box<ConditionalExpression>,
}

/// One precedence level: `first (operator operand)*`.
#[derive(Debug, Clone)]
pub(crate) struct BinaryExpression {
    pub first: Operand,
    pub rest: Vec<(Token, Operand)>,
}

#[derive(Debug, Clone)]
pub(crate) enum Operand {
    Cast(Box<CastExpression>),
    Nested(Box<BinaryExpression>),
}

#[derive(Debug, Clone)]
pub(crate) struct CastExpression {
    /// `( type-name )` prefixes, outermost first.
    pub casts: Vec<(Token, TypeName, Token)>,
    pub operand: UnaryExpression,
}

#[derive(Debug, Clone)]
pub(crate) struct UnaryExpression {
    /// `++`, `--` and `sizeof` prefixes, outermost first.
    pub prefixes: Vec<Token>,
    pub body: UnaryBody,
}

#[derive(Debug, Clone)]
pub(crate) enum UnaryBody {
    Postfix(PostfixExpression),
    Operator {
        op: Token,
        operand: Box<CastExpression>,
    },
    SizeofType {
        keyword: Token,
        type_name: TypeName,
        close: Token,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct PostfixExpression {
    pub primary: PrimaryExpression,
    pub suffixes: Vec<PostfixSuffix>,
}

#[derive(Debug, Clone)]
pub(crate) enum PostfixSuffix {
    Index {
        index: Expression,
        close: Token,
    },
    Call {
        args: Vec<AssignmentExpression>,
        close: Token,
    },
    Member {
        op: Token,
        name: Token,
    },
    Count(Token),
}

#[derive(Debug, Clone)]
pub(crate) enum PrimaryExpression {
    Identifier(Token),
    Constant(Token),
    /// Adjacent string literals, at least one.
    Strings(Vec<Token>),
    Parens {
        open: Token,
        inner: Box<Expression>,
        close: Token,
    },
}

impl ConditionalExpression {
    /// Recover the bare unary expression this conditional wraps, if it is
    /// nothing more than that. Assignment targets are parsed as conditionals
    /// first and narrowed here once an assignment operator is seen.
    pub(crate) fn into_unary(self) -> Option<UnaryExpression> {
        if self.branch.is_some() {
            return None;
        }
        let mut level = self.condition;
        loop {
            if !level.rest.is_empty() {
                return None;
            }
            match level.first {
                Operand::Nested(inner) => level = *inner,
                Operand::Cast(cast) => {
                    return if cast.casts.is_empty() {
                        Some(cast.operand)
                    } else {
                        None
                    };
                }
            }
        }
    }
}

// ===== Statements =====

#[derive(Debug, Clone)]
pub(crate) enum Statement {
    Labeled(LabeledStatement),
    Compound(CompoundStatement),
    Expression(ExpressionStatement),
    If {
        keyword: Token,
        condition: Expression,
        then: Box<Statement>,
        otherwise: Option<Box<Statement>>,
    },
    Switch {
        keyword: Token,
        condition: Expression,
        body: Box<Statement>,
    },
    While {
        keyword: Token,
        condition: Expression,
        body: Box<Statement>,
    },
    Do {
        keyword: Token,
        body: Box<Statement>,
        condition: Expression,
        semi: Token,
    },
    For {
        keyword: Token,
        init: Box<ForInit>,
        condition: ExpressionStatement,
        step: Option<Expression>,
        body: Box<Statement>,
    },
    Goto {
        keyword: Token,
        label: Token,
        semi: Token,
    },
    Continue {
        keyword: Token,
        semi: Token,
    },
    Break {
        keyword: Token,
        semi: Token,
    },
    Return {
        keyword: Token,
        value: Option<Expression>,
        semi: Token,
    },
}

#[derive(Debug, Clone)]
pub(crate) enum LabeledStatement {
    Label {
        name: Token,
        body: Box<Statement>,
    },
    Case {
        keyword: Token,
        value: ConditionalExpression,
        body: Box<Statement>,
    },
    Default {
        keyword: Token,
        body: Box<Statement>,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct CompoundStatement {
    pub open: Token,
    pub items: Vec<BlockItem>,
    pub close: Token,
}

#[derive(Debug, Clone)]
pub(crate) enum BlockItem {
    Declaration(Declaration),
    Statement(Statement),
}

#[derive(Debug, Clone)]
pub(crate) struct ExpressionStatement {
    pub expr: Option<Expression>,
    pub semi: Token,
}

#[derive(Debug, Clone)]
pub(crate) enum ForInit {
    Declaration(Declaration),
    Expression(ExpressionStatement),
}
