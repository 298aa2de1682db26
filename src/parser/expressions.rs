//! Expression parsing implementation
//!
//! The binary operator levels are not left-recursive rules: each level is a
//! flat list of next-tighter operands separated by operators of that level,
//! and the reducer folds the list left to right. The ladder, loosest first:
//!
//! ```text
//! comma → assignment → ternary → || → && → | → ^ → & → equality
//!       → relational → shift → additive → multiplicative → cast → unary → postfix
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::cst::*;
use crate::parser::lexer::{Category, TokenKind};
use crate::parser::parse::{Expected, ParseError, Parser};

/// Operators accepted at each binary level, loosest first.
const LADDER: [Expected; 10] = [
    Expected::Token(TokenKind::OrOr),
    Expected::Token(TokenKind::AndAnd),
    Expected::Token(TokenKind::Pipe),
    Expected::Token(TokenKind::Caret),
    Expected::Token(TokenKind::Amp),
    Expected::Category(Category::Equality),
    Expected::Category(Category::Relational),
    Expected::Category(Category::Shift),
    Expected::Category(Category::Additive),
    Expected::Category(Category::Multiplicative),
];

impl Expected {
    fn matches(self, kind: TokenKind) -> bool {
        match self {
            Expected::Token(expected) => kind == expected,
            Expected::Category(category) => kind.is(category),
            Expected::Production(_) => false,
        }
    }
}

impl Parser {
    /// Parse expression (comma-separated, top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let mut items = vec![self.parse_assignment_expression()?];
        while self.eat(TokenKind::Comma).is_some() {
            items.push(self.parse_assignment_expression()?);
        }
        Ok(Expression { items })
    }

    /// Parse `(unary assignment-operator)* conditional`.
    ///
    /// The target is only known to be a unary expression once the operator
    /// shows up, so each operand is parsed as a conditional and narrowed.
    pub(crate) fn parse_assignment_expression(
        &mut self,
    ) -> Result<AssignmentExpression, ParseError> {
        let mut targets = Vec::new();
        loop {
            let value = self.parse_conditional_expression()?;
            if !self.check_category(Category::Assignment) {
                return Ok(AssignmentExpression { targets, value });
            }

            let target = value.into_unary().ok_or_else(|| {
                self.error_here(vec![Expected::Production(
                    "unary expression before assignment operator",
                )])
            })?;
            let op = self.advance();
            targets.push((target, op));
        }
    }

    /// Parse ternary: condition ? expression : conditional
    pub(crate) fn parse_conditional_expression(
        &mut self,
    ) -> Result<ConditionalExpression, ParseError> {
        let condition = self.parse_binary_expression(0)?;

        if self.eat(TokenKind::Question).is_none() {
            return Ok(ConditionalExpression {
                condition,
                branch: None,
            });
        }

        let truthy = self.nested(|p| p.parse_expression())?;
        self.expect(TokenKind::Colon)?;
        let falsy = self.nested(|p| p.parse_conditional_expression())?;

        Ok(ConditionalExpression {
            condition,
            branch: Some(ConditionalBranch {
                truthy: Box::new(truthy),
                falsy: Box::new(falsy),
            }),
        })
    }

    /// One rung of [`LADDER`] as a separated one-or-more list.
    fn parse_binary_expression(&mut self, level: usize) -> Result<BinaryExpression, ParseError> {
        let operator = LADDER[level];
        let first = self.parse_operand(level)?;
        let mut rest = Vec::new();

        while operator.matches(self.peek().kind) {
            let op = self.advance();
            rest.push((op, self.parse_operand(level)?));
        }

        Ok(BinaryExpression { first, rest })
    }

    fn parse_operand(&mut self, level: usize) -> Result<Operand, ParseError> {
        if level + 1 < LADDER.len() {
            Ok(Operand::Nested(Box::new(
                self.parse_binary_expression(level + 1)?,
            )))
        } else {
            Ok(Operand::Cast(Box::new(self.parse_cast_expression()?)))
        }
    }

    /// Parse `( type-name )* unary`
    pub(crate) fn parse_cast_expression(&mut self) -> Result<CastExpression, ParseError> {
        self.nested(|p| {
            let mut casts = Vec::new();
            while p.check(TokenKind::LParen) && p.starts_type_name(1, false) {
                let open = p.advance();
                let type_name = p.parse_type_name()?;
                let close = p.expect(TokenKind::RParen)?;
                casts.push((open, type_name, close));
            }

            let operand = p.parse_unary_expression()?;
            Ok(CastExpression { casts, operand })
        })
    }

    /// Whether the token `offset` places ahead begins a parenthesized type
    /// name. Without a symbol table an identifier only counts when the
    /// tokens around it leave no expression reading.
    pub(crate) fn starts_type_name(&self, offset: usize, after_sizeof: bool) -> bool {
        let kind = self.peek_kind(offset);
        if kind.is(Category::TypeKeyword)
            || kind.is(Category::TypeQualifier)
            || kind.is(Category::StructOrUnion)
            || kind == TokenKind::Enum
        {
            return true;
        }
        if kind != TokenKind::Ident {
            return false;
        }

        let mut n = offset + 1;
        while self.peek_kind(n) == TokenKind::Star {
            n += 1;
        }
        if self.peek_kind(n) != TokenKind::RParen {
            return false;
        }
        if n > offset + 1 {
            return true;
        }

        !after_sizeof
            && matches!(
                self.peek_kind(n + 1),
                TokenKind::Ident
                    | TokenKind::Constant
                    | TokenKind::StringLiteral
                    | TokenKind::Bang
                    | TokenKind::Tilde
                    | TokenKind::Sizeof
            )
    }

    /// Parse prefix `++`/`--`/`sizeof`, then the operand
    fn parse_unary_expression(&mut self) -> Result<UnaryExpression, ParseError> {
        let mut prefixes = Vec::new();

        loop {
            if self.check_category(Category::Count) {
                prefixes.push(self.advance());
            } else if self.check(TokenKind::Sizeof) {
                if self.peek_kind(1) == TokenKind::LParen && self.starts_type_name(2, true) {
                    let keyword = self.advance();
                    self.advance(); // '('
                    let type_name = self.parse_type_name()?;
                    let close = self.expect(TokenKind::RParen)?;
                    return Ok(UnaryExpression {
                        prefixes,
                        body: UnaryBody::SizeofType {
                            keyword,
                            type_name,
                            close,
                        },
                    });
                }
                prefixes.push(self.advance());
            } else {
                break;
            }
        }

        let body = if self.check_category(Category::Unary) {
            let op = self.advance();
            let operand = self.parse_cast_expression()?;
            UnaryBody::Operator {
                op,
                operand: Box::new(operand),
            }
        } else {
            UnaryBody::Postfix(self.parse_postfix_expression()?)
        };

        Ok(UnaryExpression { prefixes, body })
    }

    /// Parse postfix operators: [], (), ., ->, ++, --
    fn parse_postfix_expression(&mut self) -> Result<PostfixExpression, ParseError> {
        let primary = self.parse_primary_expression()?;
        let mut suffixes = Vec::new();

        loop {
            match self.peek().kind {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    let close = self.expect(TokenKind::RBracket)?;
                    suffixes.push(PostfixSuffix::Index { index, close });
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_argument_list()?;
                    let close = self.expect(TokenKind::RParen)?;
                    suffixes.push(PostfixSuffix::Call { args, close });
                }
                TokenKind::Dot | TokenKind::Arrow => {
                    let op = self.advance();
                    let name = self.expect(TokenKind::Ident)?;
                    suffixes.push(PostfixSuffix::Member { op, name });
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    suffixes.push(PostfixSuffix::Count(self.advance()));
                }
                _ => break,
            }
        }

        Ok(PostfixExpression { primary, suffixes })
    }

    fn parse_argument_list(&mut self) -> Result<Vec<AssignmentExpression>, ParseError> {
        let mut args = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_assignment_expression()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        if !self.check(TokenKind::RParen) {
            return Err(self.error_here(vec![
                Expected::Token(TokenKind::Comma),
                Expected::Token(TokenKind::RParen),
            ]));
        }
        Ok(args)
    }

    /// Parse primary expressions: identifiers, constants, strings, parens
    fn parse_primary_expression(&mut self) -> Result<PrimaryExpression, ParseError> {
        match self.peek().kind {
            TokenKind::Ident => Ok(PrimaryExpression::Identifier(self.advance())),
            TokenKind::Constant => Ok(PrimaryExpression::Constant(self.advance())),
            TokenKind::StringLiteral => {
                let mut strings = vec![self.advance()];
                while let Some(next) = self.eat(TokenKind::StringLiteral) {
                    strings.push(next);
                }
                Ok(PrimaryExpression::Strings(strings))
            }
            TokenKind::LParen => {
                let open = self.advance();
                let inner = self.parse_expression()?;
                let close = self.expect(TokenKind::RParen)?;
                Ok(PrimaryExpression::Parens {
                    open,
                    inner: Box::new(inner),
                    close,
                })
            }
            _ => Err(self.error_here(vec![Expected::Production("expression")])),
        }
    }
}
