// AST (Abstract Syntax Tree) definitions for the C front end

use serde::Serialize;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Inclusive source range covered by a node.
///
/// `end` points at the last character of the last token, so a one-character
/// token has `start == end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl Span {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// Span starting where `self` starts and ending where `other` ends.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }

    /// `start` never comes after `end`.
    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }
}

/// A node of the syntax tree: a span plus one of the tagged variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub span: Span,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    pub fn new(span: Span, kind: NodeKind) -> Self {
        Self { span, kind }
    }

    pub fn boxed(span: Span, kind: NodeKind) -> Box<Self> {
        Box::new(Self::new(span, kind))
    }
}

/// Every shape the reducer can produce.
///
/// Operators, keywords and literals keep their source spelling; nothing is
/// evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NodeKind {
    // Top level
    Root {
        decls: Vec<Node>,
    },
    Func {
        decl_specs: Option<Box<Node>>,
        name: Box<Node>,
        params: Option<Vec<Node>>,
        decls: Vec<Node>,
        body: Box<Node>,
    },

    // Declarations
    Decl {
        decl_specs: Box<Node>,
        init_decls: Option<Vec<Node>>,
    },
    DeclSpecs {
        specs: Vec<Node>,
    },
    InitDecl {
        decl: Box<Node>,
        init: Option<Box<Node>>,
    },
    Keyword {
        keyword: String,
    },
    Atomic {
        name: Box<Node>,
    },
    SpecQuals {
        quals: Vec<Node>,
    },
    Assert {
        expr: Box<Node>,
        msg: String,
    },
    Struct {
        kind: String,
        name: Option<String>,
        members: Option<Vec<Node>>,
    },
    Member {
        spec_quals: Box<Node>,
        decls: Vec<Node>,
    },
    Bitfield {
        decl: Option<Box<Node>>,
        width: Box<Node>,
    },
    Enum {
        name: Option<String>,
        enumerators: Option<Vec<Node>>,
    },
    Enumerator {
        name: String,
        value: Option<Box<Node>>,
    },
    InitList {
        items: Vec<Node>,
    },
    TypeName {
        spec_quals: Box<Node>,
        decl: Box<Node>,
    },

    // Declarators
    Pointer {
        quals: Vec<Node>,
        decl: Option<Box<Node>>,
    },
    Array {
        decl: Option<Box<Node>>,
        size: Option<Box<Node>>,
    },
    Function {
        decl: Option<Box<Node>>,
        params: Option<Vec<Node>>,
    },
    Nested {
        decl: Box<Node>,
    },
    Param {
        decl_specs: Box<Node>,
        decl: Option<Box<Node>>,
    },
    Ellipsis,

    // Expressions
    Binary {
        lhs: Box<Node>,
        oper: String,
        rhs: Box<Node>,
    },
    Unary {
        oper: String,
        expr: Box<Node>,
        parens: bool,
    },
    PostUnary {
        expr: Box<Node>,
        oper: String,
    },
    Assign {
        lhs: Box<Node>,
        oper: String,
        rhs: Box<Node>,
    },
    Ternary {
        pred: Box<Node>,
        truthy: Box<Node>,
        falsy: Box<Node>,
    },
    Call {
        recv: Box<Node>,
        args: Option<Vec<Node>>,
    },
    Cast {
        value: Box<Node>,
        expr: Box<Node>,
    },
    Field {
        recv: Box<Node>,
        oper: String,
        ident: String,
    },
    Index {
        recv: Box<Node>,
        index: Box<Node>,
    },
    Parens {
        expr: Box<Node>,
    },
    Ident {
        value: String,
    },
    Const {
        value: String,
    },
    Exprs {
        exprs: Vec<Node>,
    },

    // Statements
    Compound {
        items: Option<Vec<Node>>,
    },
    Stmt {
        expr: Option<Box<Node>>,
    },
    If {
        expr: Box<Node>,
        stmt: Box<Node>,
        consequent: Option<Box<Node>>,
    },
    Switch {
        expr: Box<Node>,
        stmt: Box<Node>,
    },
    While {
        pred: Box<Node>,
        stmt: Box<Node>,
    },
    Do {
        stmt: Box<Node>,
        expr: Box<Node>,
    },
    For {
        init: Box<Node>,
        pred: Box<Node>,
        incr: Option<Box<Node>>,
        stmt: Box<Node>,
    },
    Return {
        expr: Option<Box<Node>>,
    },
    Break,
    Continue,
    Goto {
        ident: String,
    },
    Label {
        ident: String,
        stmt: Box<Node>,
    },
    Case {
        expr: Box<Node>,
        stmt: Box<Node>,
    },
    Default {
        stmt: Box<Node>,
    },
}

impl NodeKind {
    /// The tag this variant serialises under.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root { .. } => "root",
            NodeKind::Func { .. } => "func",
            NodeKind::Decl { .. } => "decl",
            NodeKind::DeclSpecs { .. } => "declSpecs",
            NodeKind::InitDecl { .. } => "initDecl",
            NodeKind::Keyword { .. } => "keyword",
            NodeKind::Atomic { .. } => "atomic",
            NodeKind::SpecQuals { .. } => "specQuals",
            NodeKind::Assert { .. } => "assert",
            NodeKind::Struct { .. } => "struct",
            NodeKind::Member { .. } => "member",
            NodeKind::Bitfield { .. } => "bitfield",
            NodeKind::Enum { .. } => "enum",
            NodeKind::Enumerator { .. } => "enumerator",
            NodeKind::InitList { .. } => "initList",
            NodeKind::TypeName { .. } => "typeName",
            NodeKind::Pointer { .. } => "pointer",
            NodeKind::Array { .. } => "array",
            NodeKind::Function { .. } => "function",
            NodeKind::Nested { .. } => "nested",
            NodeKind::Param { .. } => "param",
            NodeKind::Ellipsis => "ellipsis",
            NodeKind::Binary { .. } => "binary",
            NodeKind::Unary { .. } => "unary",
            NodeKind::PostUnary { .. } => "postUnary",
            NodeKind::Assign { .. } => "assign",
            NodeKind::Ternary { .. } => "ternary",
            NodeKind::Call { .. } => "call",
            NodeKind::Cast { .. } => "cast",
            NodeKind::Field { .. } => "field",
            NodeKind::Index { .. } => "index",
            NodeKind::Parens { .. } => "parens",
            NodeKind::Ident { .. } => "ident",
            NodeKind::Const { .. } => "const",
            NodeKind::Exprs { .. } => "exprs",
            NodeKind::Compound { .. } => "compound",
            NodeKind::Stmt { .. } => "stmt",
            NodeKind::If { .. } => "if",
            NodeKind::Switch { .. } => "switch",
            NodeKind::While { .. } => "while",
            NodeKind::Do { .. } => "do",
            NodeKind::For { .. } => "for",
            NodeKind::Return { .. } => "return",
            NodeKind::Break => "break",
            NodeKind::Continue => "continue",
            NodeKind::Goto { .. } => "goto",
            NodeKind::Label { .. } => "label",
            NodeKind::Case { .. } => "case",
            NodeKind::Default { .. } => "default",
        }
    }
}
