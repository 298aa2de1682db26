//! Lexer (tokenizer) for C source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Every token keeps its raw spelling: numeric, character and string constants
//! are never evaluated, so they can be printed back byte for byte.
//!
//! Comments and preprocessor directive lines are not tokens. They are routed
//! into a side channel ([`TokenStream::comments`]) so they never disturb the
//! grammar, but stay available to tooling.

use super::ast::{SourceLocation, Span};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Literals
    Constant,
    StringLiteral,

    // Identifiers
    Ident,

    // Keywords
    Auto,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Register,
    Restrict,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,
    Bool,
    Complex,
    Imaginary,
    Atomic,
    StaticAssert,
    ThreadLocal,

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    LtLt,  // <<
    GtGt,  // >>

    // Assignment
    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=
    AmpEq,     // &=
    PipeEq,    // |=
    CaretEq,   // ^=
    LtLtEq,    // <<=
    GtGtEq,    // >>=

    // Increment/Decrement
    PlusPlus,   // ++
    MinusMinus, // --

    // Member access
    Dot,   // .
    Arrow, // ->

    // Ternary
    Question, // ?
    Colon,    // :

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // { or <%
    RBrace,    // } or %>
    LBracket,  // [ or <:
    RBracket,  // ] or :>
    Semicolon, // ;
    Comma,     // ,
    Ellipsis,  // ...

    // End of file
    Eof,
}

/// Groups of token kinds the grammar treats uniformly at one decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    StorageClass,
    StructOrUnion,
    TypeQualifier,
    TypeKeyword,
    FunctionSpecifier,
    Assignment,
    Multiplicative,
    Additive,
    Shift,
    Relational,
    Equality,
    Unary,
    Count,
}

impl TokenKind {
    /// Category membership. A kind may belong to several categories
    /// (`*` is both multiplicative and unary).
    pub fn is(self, category: Category) -> bool {
        use TokenKind::*;
        match category {
            Category::StorageClass => matches!(
                self,
                Auto | Extern | Register | Static | Typedef | ThreadLocal
            ),
            Category::StructOrUnion => matches!(self, Struct | Union),
            Category::TypeQualifier => matches!(self, Const | Volatile | Restrict | Atomic),
            Category::TypeKeyword => matches!(
                self,
                Void | Char
                    | Short
                    | Int
                    | Long
                    | Float
                    | Double
                    | Signed
                    | Unsigned
                    | Bool
                    | Complex
                    | Imaginary
            ),
            Category::FunctionSpecifier => matches!(self, Inline),
            Category::Assignment => matches!(
                self,
                Eq | PlusEq
                    | MinusEq
                    | StarEq
                    | SlashEq
                    | PercentEq
                    | AmpEq
                    | PipeEq
                    | CaretEq
                    | LtLtEq
                    | GtGtEq
            ),
            Category::Multiplicative => matches!(self, Star | Slash | Percent),
            Category::Additive => matches!(self, Plus | Minus),
            Category::Shift => matches!(self, LtLt | GtGt),
            Category::Relational => matches!(self, Lt | Le | Gt | Ge),
            Category::Equality => matches!(self, EqEq | NotEq),
            Category::Unary => matches!(self, Amp | Star | Plus | Minus | Tilde | Bang),
            Category::Count => matches!(self, PlusPlus | MinusMinus),
        }
    }

    /// Canonical spelling, or `None` for kinds whose spelling varies.
    pub fn spelling(self) -> Option<&'static str> {
        use TokenKind::*;
        let s = match self {
            Constant | StringLiteral | Ident | Eof => return None,
            Auto => "auto",
            Break => "break",
            Case => "case",
            Char => "char",
            Const => "const",
            Continue => "continue",
            Default => "default",
            Do => "do",
            Double => "double",
            Else => "else",
            Enum => "enum",
            Extern => "extern",
            Float => "float",
            For => "for",
            Goto => "goto",
            If => "if",
            Inline => "inline",
            Int => "int",
            Long => "long",
            Register => "register",
            Restrict => "restrict",
            Return => "return",
            Short => "short",
            Signed => "signed",
            Sizeof => "sizeof",
            Static => "static",
            Struct => "struct",
            Switch => "switch",
            Typedef => "typedef",
            Union => "union",
            Unsigned => "unsigned",
            Void => "void",
            Volatile => "volatile",
            While => "while",
            Bool => "_Bool",
            Complex => "_Complex",
            Imaginary => "_Imaginary",
            Atomic => "_Atomic",
            StaticAssert => "_Static_assert",
            ThreadLocal => "_Thread_local",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            EqEq => "==",
            NotEq => "!=",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            AndAnd => "&&",
            OrOr => "||",
            Bang => "!",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Tilde => "~",
            LtLt => "<<",
            GtGt => ">>",
            Eq => "=",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            PercentEq => "%=",
            AmpEq => "&=",
            PipeEq => "|=",
            CaretEq => "^=",
            LtLtEq => "<<=",
            GtGtEq => ">>=",
            PlusPlus => "++",
            MinusMinus => "--",
            Dot => ".",
            Arrow => "->",
            Question => "?",
            Colon => ":",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Semicolon => ";",
            Comma => ",",
            Ellipsis => "...",
        };
        Some(s)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.spelling()) {
            (_, Some(s)) => write!(f, "'{}'", s),
            (TokenKind::Constant, None) => write!(f, "constant"),
            (TokenKind::StringLiteral, None) => write!(f, "string literal"),
            (TokenKind::Ident, None) => write!(f, "identifier"),
            (_, None) => write!(f, "end of file"),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::StorageClass => "storage-class specifier",
            Category::StructOrUnion => "'struct' or 'union'",
            Category::TypeQualifier => "type qualifier",
            Category::TypeKeyword => "type keyword",
            Category::FunctionSpecifier => "function specifier",
            Category::Assignment => "assignment operator",
            Category::Multiplicative => "multiplicative operator",
            Category::Additive => "additive operator",
            Category::Shift => "shift operator",
            Category::Relational => "relational operator",
            Category::Equality => "equality operator",
            Category::Unary => "unary operator",
            Category::Count => "'++' or '--'",
        };
        f.write_str(name)
    }
}

static KEYWORDS: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    [
        Auto, Break, Case, Char, Const, Continue, Default, Do, Double, Else, Enum, Extern,
        Float, For, Goto, If, Inline, Int, Long, Register, Restrict, Return, Short, Signed,
        Sizeof, Static, Struct, Switch, Typedef, Union, Unsigned, Void, Volatile, While, Bool,
        Complex, Imaginary, Atomic, StaticAssert, ThreadLocal,
    ]
    .into_iter()
    .filter_map(|kind| kind.spelling().map(|s| (s, kind)))
    .collect()
});

/// A token with its raw source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    /// Location of the last character of the token.
    pub fn end(&self) -> SourceLocation {
        let mut end = self.location;
        let mut chars = self.text.chars().peekable();
        while let Some(ch) = chars.next() {
            if chars.peek().is_none() {
                break;
            }
            if ch == '\n' {
                end.line += 1;
                end.column = 1;
            } else {
                end.column += 1;
            }
        }
        end
    }

    pub fn span(&self) -> Span {
        Span::new(self.location, self.end())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of file"),
            TokenKind::Ident => write!(f, "identifier '{}'", self.text),
            TokenKind::Constant => write!(f, "constant {}", self.text),
            TokenKind::StringLiteral => write!(f, "string literal {}", self.text),
            _ => write!(f, "'{}'", self.text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    Line,
    Block,
    /// A preprocessor directive line, kept verbatim.
    Directive,
}

/// Side-channel text that is not part of the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
    pub location: SourceLocation,
}

/// Output of a successful tokenization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenStream {
    /// Grammar tokens, always terminated by a single [`TokenKind::Eof`].
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorReason {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character constant")]
    UnterminatedChar,
    #[error("empty character constant")]
    EmptyChar,
    #[error("malformed number {0:?}")]
    MalformedNumber(String),
}

/// No token pattern matches at `location`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at {location}: {reason}")]
pub struct LexError {
    pub reason: LexErrorReason,
    pub location: SourceLocation,
}

impl LexError {
    fn new(reason: LexErrorReason, location: SourceLocation) -> Self {
        Self { reason, location }
    }
}

/// Lexer for C source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    /// Only whitespace or comments seen since the last newline.
    line_start: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            line_start: true,
        }
    }

    /// Tokenize the entire input.
    ///
    /// Lexing does not stop at the first bad character: the offending
    /// character is skipped and every error of the input is returned.
    pub fn tokenize(&mut self) -> Result<TokenStream, Vec<LexError>> {
        let mut stream = TokenStream::default();
        let mut errors = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                stream.tokens.push(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    location: self.current_location(),
                });
                break;
            }

            let loc = self.current_location();
            match (self.peek(), self.peek_ahead(1)) {
                (Some('#'), _) if self.line_start => {
                    stream.comments.push(self.directive(loc));
                }
                (Some('/'), Some('/')) => stream.comments.push(self.line_comment(loc)),
                (Some('/'), Some('*')) => match self.block_comment(loc) {
                    Ok(comment) => stream.comments.push(comment),
                    Err(e) => errors.push(e),
                },
                _ => {
                    self.line_start = false;
                    match self.next_token() {
                        Ok(token) => stream.tokens.push(token),
                        Err(e) => errors.push(e),
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(stream)
        } else {
            Err(errors)
        }
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let start = self.position;
        let ch = self
            .advance()
            .ok_or_else(|| LexError::new(LexErrorReason::UnexpectedChar('\0'), loc))?;

        let kind = match ch {
            '"' => self.string_literal(loc)?,
            '\'' => self.char_constant(loc)?,
            '0'..='9' => self.number(ch, start, loc)?,
            '.' if matches!(self.peek(), Some(c) if c.is_ascii_digit()) => {
                self.number(ch, start, loc)?
            }
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(start, loc)?,

            '+' => self.pick(
                &[('+', TokenKind::PlusPlus), ('=', TokenKind::PlusEq)],
                TokenKind::Plus,
            ),
            '-' => self.pick(
                &[
                    ('-', TokenKind::MinusMinus),
                    ('=', TokenKind::MinusEq),
                    ('>', TokenKind::Arrow),
                ],
                TokenKind::Minus,
            ),
            '*' => self.pick(&[('=', TokenKind::StarEq)], TokenKind::Star),
            '/' => self.pick(&[('=', TokenKind::SlashEq)], TokenKind::Slash),
            '%' => self.pick(
                &[('=', TokenKind::PercentEq), ('>', TokenKind::RBrace)],
                TokenKind::Percent,
            ),
            '=' => self.pick(&[('=', TokenKind::EqEq)], TokenKind::Eq),
            '!' => self.pick(&[('=', TokenKind::NotEq)], TokenKind::Bang),
            '<' => {
                if self.peek() == Some('<') && self.peek_ahead(1) == Some('=') {
                    self.advance();
                    self.advance();
                    TokenKind::LtLtEq
                } else {
                    self.pick(
                        &[
                            ('<', TokenKind::LtLt),
                            ('=', TokenKind::Le),
                            ('%', TokenKind::LBrace),
                            (':', TokenKind::LBracket),
                        ],
                        TokenKind::Lt,
                    )
                }
            }
            '>' => {
                if self.peek() == Some('>') && self.peek_ahead(1) == Some('=') {
                    self.advance();
                    self.advance();
                    TokenKind::GtGtEq
                } else {
                    self.pick(&[('>', TokenKind::GtGt), ('=', TokenKind::Ge)], TokenKind::Gt)
                }
            }
            '&' => self.pick(&[('&', TokenKind::AndAnd), ('=', TokenKind::AmpEq)], TokenKind::Amp),
            '|' => self.pick(&[('|', TokenKind::OrOr), ('=', TokenKind::PipeEq)], TokenKind::Pipe),
            '^' => self.pick(&[('=', TokenKind::CaretEq)], TokenKind::Caret),
            ':' => self.pick(&[('>', TokenKind::RBracket)], TokenKind::Colon),
            '.' => {
                if self.peek() == Some('.') && self.peek_ahead(1) == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }
            '~' => TokenKind::Tilde,
            '?' => TokenKind::Question,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,

            _ => return Err(LexError::new(LexErrorReason::UnexpectedChar(ch), loc)),
        };

        Ok(Token {
            kind,
            text: self.text_from(start),
            location: loc,
        })
    }

    /// Consume the first follower that matches, or fall back to `single`.
    fn pick(&mut self, followers: &[(char, TokenKind)], single: TokenKind) -> TokenKind {
        for &(next, kind) in followers {
            if self.peek() == Some(next) {
                self.advance();
                return kind;
            }
        }
        single
    }

    /// Scan a string literal body (opening quote already consumed).
    fn string_literal(&mut self, loc: SourceLocation) -> Result<TokenKind, LexError> {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError::new(LexErrorReason::UnterminatedString, loc));
                }
                Some('"') => {
                    self.advance();
                    return Ok(TokenKind::StringLiteral);
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan a character constant body (opening quote already consumed).
    fn char_constant(&mut self, loc: SourceLocation) -> Result<TokenKind, LexError> {
        if self.peek() == Some('\'') {
            self.advance();
            return Err(LexError::new(LexErrorReason::EmptyChar, loc));
        }

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError::new(LexErrorReason::UnterminatedChar, loc));
                }
                Some('\'') => {
                    self.advance();
                    return Ok(TokenKind::Constant);
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan a numeric constant.
    ///
    /// Integers take `[uUlL]*` suffixes, floats take one of `fFlL`. A number
    /// only becomes a float once a `.` or a complete exponent is seen, so an
    /// integer suffix is never swallowed by the float rules.
    fn number(
        &mut self,
        first: char,
        start: usize,
        loc: SourceLocation,
    ) -> Result<TokenKind, LexError> {
        if first == '0' && matches!(self.peek(), Some('x') | Some('X')) {
            self.advance();
            let digits = self.consume_while(|c| c.is_ascii_hexdigit());
            if digits == 0 {
                return Err(LexError::new(
                    LexErrorReason::MalformedNumber(self.text_from(start)),
                    loc,
                ));
            }
            self.consume_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
            return Ok(TokenKind::Constant);
        }

        let mut is_float = first == '.';
        self.consume_while(|c| c.is_ascii_digit());
        if !is_float && self.peek() == Some('.') {
            self.advance();
            is_float = true;
            self.consume_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let exponent_digit = match self.peek_ahead(1) {
                Some(c) if c.is_ascii_digit() => Some(1),
                Some('+') | Some('-') => match self.peek_ahead(2) {
                    Some(c) if c.is_ascii_digit() => Some(2),
                    _ => None,
                },
                _ => None,
            };
            if let Some(skip) = exponent_digit {
                for _ in 0..skip {
                    self.advance();
                }
                self.consume_while(|c| c.is_ascii_digit());
                is_float = true;
            }
        }

        if is_float {
            if matches!(self.peek(), Some('f') | Some('F') | Some('l') | Some('L')) {
                self.advance();
            }
        } else {
            self.consume_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
        }

        Ok(TokenKind::Constant)
    }

    /// Parse identifier or keyword, including `L"..."`-style literal prefixes.
    fn identifier_or_keyword(
        &mut self,
        start: usize,
        loc: SourceLocation,
    ) -> Result<TokenKind, LexError> {
        self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let ident = self.text_from(start);

        if matches!(ident.as_str(), "L" | "u" | "U" | "u8") {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return self.string_literal(loc);
                }
                Some('\'') => {
                    self.advance();
                    return self.char_constant(loc);
                }
                _ => {}
            }
        }

        Ok(KEYWORDS.get(ident.as_str()).copied().unwrap_or(TokenKind::Ident))
    }

    /// Skip whitespace
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Single-line comment (// ...), newline excluded
    fn line_comment(&mut self, loc: SourceLocation) -> Comment {
        let start = self.position;
        while matches!(self.peek(), Some(c) if c != '\n') {
            self.advance();
        }
        Comment {
            kind: CommentKind::Line,
            text: self.text_from(start),
            location: loc,
        }
    }

    /// Multi-line comment (/* ... */)
    fn block_comment(&mut self, loc: SourceLocation) -> Result<Comment, LexError> {
        let start = self.position;
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(Comment {
                    kind: CommentKind::Block,
                    text: self.text_from(start),
                    location: loc,
                });
            }
            self.advance();
        }

        Err(LexError::new(LexErrorReason::UnterminatedComment, loc))
    }

    /// Preprocessor directive line, following backslash continuations
    fn directive(&mut self, loc: SourceLocation) -> Comment {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            if ch == '\\' {
                match (self.peek_ahead(1), self.peek_ahead(2)) {
                    (Some('\n'), _) => {
                        self.advance();
                        self.advance();
                        continue;
                    }
                    (Some('\r'), Some('\n')) => {
                        self.advance();
                        self.advance();
                        self.advance();
                        continue;
                    }
                    _ => {}
                }
            }
            self.advance();
        }

        let mut text = self.text_from(start);
        if text.ends_with('\r') {
            text.pop();
        }
        Comment {
            kind: CommentKind::Directive,
            text,
            location: loc,
        }
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.advance();
            count += 1;
        }
        count
    }

    fn text_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_start = true;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Result<TokenStream, Vec<LexError>> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        tokenize(source)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = tokenize("int main() { return 0; }").unwrap().tokens;

        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].text, "main");
        assert_eq!(tokens[2].kind, TokenKind::LParen);
        assert_eq!(tokens[3].kind, TokenKind::RParen);
        assert_eq!(tokens[4].kind, TokenKind::LBrace);
        assert_eq!(tokens[5].kind, TokenKind::Return);
        assert_eq!(tokens[6].kind, TokenKind::Constant);
        assert_eq!(tokens[6].text, "0");
        assert_eq!(tokens[7].kind, TokenKind::Semicolon);
        assert_eq!(tokens[8].kind, TokenKind::RBrace);
        assert_eq!(tokens[9].kind, TokenKind::Eof);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("++ -- += -= == != && || <<= >>= -> ... << >>"),
            vec![
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::LtLtEq,
                TokenKind::GtGtEq,
                TokenKind::Arrow,
                TokenKind::Ellipsis,
                TokenKind::LtLt,
                TokenKind::GtGt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_longest_match_on_plus_runs() {
        assert_eq!(
            kinds("a+++b"),
            vec![
                TokenKind::Ident,
                TokenKind::PlusPlus,
                TokenKind::Plus,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_digraphs() {
        let stream = tokenize("<% %> <: :>").unwrap();
        let kinds: Vec<_> = stream.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
        assert_eq!(stream.tokens[0].text, "<%");
    }

    #[test]
    fn test_comments_go_to_side_channel() {
        let stream = tokenize("int x; // comment\nint y; /* block\ncomment */ int z;").unwrap();

        let idents: Vec<_> = stream
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Ident)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(idents, vec!["x", "y", "z"]);

        assert_eq!(stream.comments.len(), 2);
        assert_eq!(stream.comments[0].kind, CommentKind::Line);
        assert_eq!(stream.comments[0].text, "// comment");
        assert_eq!(stream.comments[1].kind, CommentKind::Block);
        assert_eq!(stream.comments[1].text, "/* block\ncomment */");
        assert_eq!(stream.comments[1].location, SourceLocation::new(2, 8));
    }

    #[test]
    fn test_string_literal_keeps_raw_text() {
        assert_eq!(texts(r#""a\"b" L"wide""#), vec![r#""a\"b""#, r#"L"wide""#, ""]);
    }

    #[test]
    fn test_constants_keep_spelling() {
        assert_eq!(
            texts("0x1AuL 3.14f 1e10 .5 017 42ul 'a' '\\n' 1.e5L"),
            vec!["0x1AuL", "3.14f", "1e10", ".5", "017", "42ul", "'a'", "'\\n'", "1.e5L", ""]
        );
        assert!(kinds("0x1AuL 3.14f 'a'")[..3]
            .iter()
            .all(|k| *k == TokenKind::Constant));
    }

    #[test]
    fn test_exponent_needs_digits() {
        // `1e` is the integer 1 followed by the identifier `e`
        assert_eq!(
            kinds("1e"),
            vec![TokenKind::Constant, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn test_preprocessor_side_channel() {
        let stream = tokenize("#include <stdio.h>\n#define X \\\n  1\nint x;").unwrap();

        assert_eq!(stream.tokens[0].kind, TokenKind::Int);
        assert_eq!(stream.tokens[1].text, "x");
        assert_eq!(stream.comments.len(), 2);
        assert_eq!(stream.comments[0].kind, CommentKind::Directive);
        assert_eq!(stream.comments[0].text, "#include <stdio.h>");
        assert_eq!(stream.comments[1].text, "#define X \\\n  1");
    }

    #[test]
    fn test_hash_mid_line_is_an_error() {
        let errors = tokenize("int x # 1;").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].reason, LexErrorReason::UnexpectedChar('#'));
        assert_eq!(errors[0].location, SourceLocation::new(1, 7));
    }

    #[test]
    fn test_errors_accumulate() {
        let errors = tokenize("a @ b $ c").unwrap_err();
        let locations: Vec<_> = errors.iter().map(|e| e.location.column).collect();
        assert_eq!(locations, vec![3, 7]);
    }

    #[test]
    fn test_unterminated_literals() {
        let errors = tokenize("\"abc\nint /* never closed").unwrap_err();
        assert_eq!(errors[0].reason, LexErrorReason::UnterminatedString);
        assert_eq!(
            errors.last().map(|e| &e.reason),
            Some(&LexErrorReason::UnterminatedComment)
        );
        assert_eq!(
            tokenize("0x;").unwrap_err()[0].reason,
            LexErrorReason::MalformedNumber("0x".into())
        );
    }

    #[test]
    fn test_token_end_location() {
        let tokens = tokenize("  foo\n bar").unwrap().tokens;
        assert_eq!(tokens[0].span().start, SourceLocation::new(1, 3));
        assert_eq!(tokens[0].end(), SourceLocation::new(1, 5));
        assert_eq!(tokens[1].end(), SourceLocation::new(2, 4));
    }

    #[test]
    fn test_categories() {
        assert!(TokenKind::Star.is(Category::Multiplicative));
        assert!(TokenKind::Star.is(Category::Unary));
        assert!(TokenKind::LtLtEq.is(Category::Assignment));
        assert!(TokenKind::ThreadLocal.is(Category::StorageClass));
        assert!(!TokenKind::Slash.is(Category::Unary));
        assert!(!TokenKind::Eq.is(Category::Equality));
    }

    #[test]
    fn test_keyword_table() {
        assert_eq!(kinds("_Static_assert")[0], TokenKind::StaticAssert);
        assert_eq!(kinds("restrict")[0], TokenKind::Restrict);
        assert_eq!(kinds("integer")[0], TokenKind::Ident);
    }
}
