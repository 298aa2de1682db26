//! Statement parsing implementation
//!
//! Handles labeled, compound, expression, selection, iteration and jump
//! statements. Block items may interleave declarations and statements.
//!
//! A trailing `else` is consumed by the innermost `if` that is still being
//! parsed, which binds it to the nearest unmatched `if`.

use crate::parser::cst::*;
use crate::parser::lexer::{Category, TokenKind};
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a single statement
    pub(crate) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        self.nested(|p| p.parse_statement_body())
    }

    fn parse_statement_body(&mut self) -> Result<Statement, ParseError> {
        match self.peek().kind {
            TokenKind::Ident if self.peek_kind(1) == TokenKind::Colon => {
                let name = self.advance();
                self.advance(); // ':'
                let body = Box::new(self.parse_statement()?);
                Ok(Statement::Labeled(LabeledStatement::Label { name, body }))
            }
            TokenKind::Case => {
                let keyword = self.advance();
                let value = self.parse_conditional_expression()?;
                self.expect(TokenKind::Colon)?;
                let body = Box::new(self.parse_statement()?);
                Ok(Statement::Labeled(LabeledStatement::Case {
                    keyword,
                    value,
                    body,
                }))
            }
            TokenKind::Default => {
                let keyword = self.advance();
                self.expect(TokenKind::Colon)?;
                let body = Box::new(self.parse_statement()?);
                Ok(Statement::Labeled(LabeledStatement::Default { keyword, body }))
            }
            TokenKind::LBrace => Ok(Statement::Compound(self.parse_compound_statement()?)),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Switch => {
                let keyword = self.advance();
                let condition = self.parse_parenthesized_expression()?;
                let body = Box::new(self.parse_statement()?);
                Ok(Statement::Switch {
                    keyword,
                    condition,
                    body,
                })
            }
            TokenKind::While => {
                let keyword = self.advance();
                let condition = self.parse_parenthesized_expression()?;
                let body = Box::new(self.parse_statement()?);
                Ok(Statement::While {
                    keyword,
                    condition,
                    body,
                })
            }
            TokenKind::Do => {
                let keyword = self.advance();
                let body = Box::new(self.parse_statement()?);
                self.expect(TokenKind::While)?;
                let condition = self.parse_parenthesized_expression()?;
                let semi = self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Do {
                    keyword,
                    body,
                    condition,
                    semi,
                })
            }
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Goto => {
                let keyword = self.advance();
                let label = self.expect(TokenKind::Ident)?;
                let semi = self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Goto {
                    keyword,
                    label,
                    semi,
                })
            }
            TokenKind::Continue => {
                let keyword = self.advance();
                let semi = self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Continue { keyword, semi })
            }
            TokenKind::Break => {
                let keyword = self.advance();
                let semi = self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Break { keyword, semi })
            }
            TokenKind::Return => {
                let keyword = self.advance();
                let value = if self.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                let semi = self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Return {
                    keyword,
                    value,
                    semi,
                })
            }
            _ => Ok(Statement::Expression(self.parse_expression_statement()?)),
        }
    }

    /// Parse if statement with optional else
    ///
    /// An `else if` ladder is read in a loop, so its length does not count
    /// against the nesting limit; only the arms' bodies do.
    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        let keyword = self.advance();
        let condition = self.parse_parenthesized_expression()?;
        let then = Box::new(self.parse_statement()?);

        let mut ladder = Vec::new();
        let mut otherwise = None;
        while self.eat(TokenKind::Else).is_some() {
            if !self.check(TokenKind::If) {
                otherwise = Some(Box::new(self.parse_statement()?));
                break;
            }
            let keyword = self.advance();
            let condition = self.parse_parenthesized_expression()?;
            let then = Box::new(self.parse_statement()?);
            ladder.push((keyword, condition, then));
        }

        let otherwise = ladder
            .into_iter()
            .rev()
            .fold(otherwise, |otherwise, (keyword, condition, then)| {
                Some(Box::new(Statement::If {
                    keyword,
                    condition,
                    then,
                    otherwise,
                }))
            });

        Ok(Statement::If {
            keyword,
            condition,
            then,
            otherwise,
        })
    }

    /// Parse for loop: for (init; condition; step) body
    fn parse_for_statement(&mut self) -> Result<Statement, ParseError> {
        let keyword = self.advance();
        self.expect(TokenKind::LParen)?;

        let init = if self.starts_declaration() {
            self.either(
                |p| p.parse_declaration().map(ForInit::Declaration),
                |p| p.parse_expression_statement().map(ForInit::Expression),
            )?
        } else {
            ForInit::Expression(self.parse_expression_statement()?)
        };

        let condition = self.parse_expression_statement()?;
        let step = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);

        Ok(Statement::For {
            keyword,
            init: Box::new(init),
            condition,
            step,
            body,
        })
    }

    fn parse_parenthesized_expression(&mut self) -> Result<Expression, ParseError> {
        self.expect(TokenKind::LParen)?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(expr)
    }

    /// Parse `expression? ;`
    pub(crate) fn parse_expression_statement(
        &mut self,
    ) -> Result<ExpressionStatement, ParseError> {
        if let Some(semi) = self.eat(TokenKind::Semicolon) {
            return Ok(ExpressionStatement { expr: None, semi });
        }

        let expr = self.parse_expression()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(ExpressionStatement {
            expr: Some(expr),
            semi,
        })
    }

    /// Parse block: { item* }
    pub(crate) fn parse_compound_statement(&mut self) -> Result<CompoundStatement, ParseError> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut items = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            items.push(self.parse_block_item()?);
        }

        let close = self.expect(TokenKind::RBrace)?;
        Ok(CompoundStatement { open, items, close })
    }

    fn parse_block_item(&mut self) -> Result<BlockItem, ParseError> {
        if self.starts_declaration() {
            self.either(
                |p| p.parse_declaration().map(BlockItem::Declaration),
                |p| p.parse_statement().map(BlockItem::Statement),
            )
        } else {
            self.parse_statement().map(BlockItem::Statement)
        }
    }

    /// Whether the upcoming tokens read as a declaration: a specifier
    /// keyword, or an identifier followed by an identifier, possibly
    /// through `*`s.
    pub(crate) fn starts_declaration(&self) -> bool {
        let kind = self.peek().kind;
        if kind.is(Category::StorageClass)
            || kind.is(Category::TypeQualifier)
            || kind.is(Category::TypeKeyword)
            || kind.is(Category::StructOrUnion)
            || kind.is(Category::FunctionSpecifier)
            || kind == TokenKind::Enum
            || kind == TokenKind::StaticAssert
        {
            return true;
        }
        if kind != TokenKind::Ident {
            return false;
        }

        let mut n = 1;
        while self.peek_kind(n) == TokenKind::Star {
            n += 1;
        }
        self.peek_kind(n) == TokenKind::Ident
    }
}
