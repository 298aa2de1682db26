//! Declaration parsing implementation
//!
//! Handles function definitions, declarations, declaration specifiers
//! (including inline `struct`/`union`/`enum` bodies) and both concrete and
//! abstract declarators.
//!
//! There is no symbol table, so an identifier is taken as a type name
//! whenever a specifier list has not yet seen a type specifier. `T x;` and
//! `a * b;` are therefore always declarations.

use crate::parser::cst::*;
use crate::parser::lexer::{Category, TokenKind};
use crate::parser::parse::{Expected, ParseError, Parser};

impl Parser {
    /// Parse `specifiers? declarator declaration* compound-statement`.
    ///
    /// The declarator must end in a parameter list, which is what separates
    /// a definition from a declaration sharing the same prefix.
    pub(crate) fn parse_function_definition(
        &mut self,
        with_specifiers: bool,
    ) -> Result<FunctionDefinition, ParseError> {
        let specifiers = if with_specifiers {
            Some(self.parse_declaration_specifiers()?)
        } else {
            None
        };

        let declarator = self.parse_declarator()?;
        if !matches!(
            declarator.direct.suffixes.last(),
            Some(DeclaratorSuffix::Parameters { .. })
        ) {
            return Err(self.error_here(vec![Expected::Token(TokenKind::LParen)]));
        }

        let mut declarations = Vec::new();
        while !self.check(TokenKind::LBrace) {
            declarations.push(self.parse_declaration()?);
        }

        let body = self.parse_compound_statement()?;

        Ok(FunctionDefinition {
            specifiers,
            declarator,
            declarations,
            body,
        })
    }

    /// Parse `specifiers init-declarator-list? ;` or a static assertion.
    pub(crate) fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        if self.check(TokenKind::StaticAssert) {
            return self.parse_static_assert().map(Declaration::StaticAssert);
        }

        let specifiers = self.parse_declaration_specifiers()?;
        let mut declarators = Vec::new();

        if !self.check(TokenKind::Semicolon) {
            loop {
                declarators.push(self.parse_init_declarator()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        let semi = self.eat(TokenKind::Semicolon).ok_or_else(|| {
            self.error_here(vec![
                Expected::Token(TokenKind::Comma),
                Expected::Token(TokenKind::Semicolon),
            ])
        })?;

        Ok(Declaration::Plain {
            specifiers,
            declarators,
            semi,
        })
    }

    fn parse_static_assert(&mut self) -> Result<StaticAssert, ParseError> {
        let keyword = self.advance();
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_conditional_expression()?;
        self.expect(TokenKind::Comma)?;

        let mut message = vec![self.expect(TokenKind::StringLiteral)?];
        while let Some(next) = self.eat(TokenKind::StringLiteral) {
            message.push(next);
        }

        self.expect(TokenKind::RParen)?;
        let semi = self.expect(TokenKind::Semicolon)?;

        Ok(StaticAssert {
            keyword,
            condition,
            message,
            semi,
        })
    }

    /// Parse one or more storage-class, type and qualifier specifiers in any
    /// order. Also serves as the specifier-qualifier list of members and
    /// type names.
    pub(crate) fn parse_declaration_specifiers(
        &mut self,
    ) -> Result<DeclarationSpecifiers, ParseError> {
        let mut specifiers = Vec::new();
        let mut seen_type = false;

        loop {
            let kind = self.peek().kind;
            let specifier = if kind == TokenKind::Atomic && self.peek_kind(1) == TokenKind::LParen
            {
                seen_type = true;
                Specifier::Atomic(self.parse_atomic_specifier()?)
            } else if kind.is(Category::StorageClass)
                || kind.is(Category::TypeQualifier)
                || kind.is(Category::FunctionSpecifier)
            {
                Specifier::Keyword(self.advance())
            } else if kind.is(Category::TypeKeyword) {
                seen_type = true;
                Specifier::Keyword(self.advance())
            } else if kind.is(Category::StructOrUnion) {
                seen_type = true;
                Specifier::Struct(self.parse_struct_specifier()?)
            } else if kind == TokenKind::Enum {
                seen_type = true;
                Specifier::Enum(self.parse_enum_specifier()?)
            } else if kind == TokenKind::Ident && !seen_type {
                seen_type = true;
                Specifier::TypedefName(self.advance())
            } else {
                break;
            };
            specifiers.push(specifier);
        }

        if specifiers.is_empty() {
            return Err(self.error_here(vec![Expected::Production("declaration specifiers")]));
        }

        Ok(DeclarationSpecifiers { specifiers })
    }

    fn parse_atomic_specifier(&mut self) -> Result<AtomicSpecifier, ParseError> {
        let keyword = self.advance();
        self.expect(TokenKind::LParen)?;
        let type_name = self.parse_type_name()?;
        let close = self.expect(TokenKind::RParen)?;
        Ok(AtomicSpecifier {
            keyword,
            type_name,
            close,
        })
    }

    /// Parse struct/union specifier: tag, body, or both
    fn parse_struct_specifier(&mut self) -> Result<StructSpecifier, ParseError> {
        self.nested(|p| {
            let keyword = p.advance();
            let name = p.eat(TokenKind::Ident);

            if p.eat(TokenKind::LBrace).is_none() {
                if name.is_none() {
                    return Err(p.error_here(vec![
                        Expected::Token(TokenKind::Ident),
                        Expected::Token(TokenKind::LBrace),
                    ]));
                }
                return Ok(StructSpecifier {
                    keyword,
                    name,
                    body: None,
                });
            }

            let mut members = Vec::new();
            while !p.check(TokenKind::RBrace) && !p.is_at_end() {
                members.push(p.parse_struct_declaration()?);
            }
            let close = p.expect(TokenKind::RBrace)?;

            Ok(StructSpecifier {
                keyword,
                name,
                body: Some(StructBody { members, close }),
            })
        })
    }

    /// Parse one member line: `specifiers (declarator? (: width)?)* ;`
    fn parse_struct_declaration(&mut self) -> Result<StructDeclaration, ParseError> {
        let specifiers = self.parse_declaration_specifiers()?;
        let mut declarators = Vec::new();

        if !self.check(TokenKind::Semicolon) {
            loop {
                let declarator = if self.check(TokenKind::Colon) {
                    None
                } else {
                    Some(self.parse_declarator()?)
                };
                let member = match (declarator, self.eat(TokenKind::Colon)) {
                    (declarator, Some(colon)) => StructDeclarator::Bitfield {
                        declarator,
                        colon,
                        width: self.parse_conditional_expression()?,
                    },
                    (Some(declarator), None) => StructDeclarator::Plain(declarator),
                    (None, None) => {
                        return Err(self.error_here(vec![Expected::Token(TokenKind::Colon)]))
                    }
                };
                declarators.push(member);

                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(StructDeclaration {
            specifiers,
            declarators,
            semi,
        })
    }

    /// Parse enum specifier; a trailing comma is allowed
    fn parse_enum_specifier(&mut self) -> Result<EnumSpecifier, ParseError> {
        let keyword = self.advance();
        let name = self.eat(TokenKind::Ident);

        if self.eat(TokenKind::LBrace).is_none() {
            if name.is_none() {
                return Err(self.error_here(vec![
                    Expected::Token(TokenKind::Ident),
                    Expected::Token(TokenKind::LBrace),
                ]));
            }
            return Ok(EnumSpecifier {
                keyword,
                name,
                body: None,
            });
        }

        let mut enumerators = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let name = self.expect(TokenKind::Ident)?;
            let value = match self.eat(TokenKind::Eq) {
                Some(_) => Some(self.parse_conditional_expression()?),
                None => None,
            };
            enumerators.push(Enumerator { name, value });

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        let close = self.expect(TokenKind::RBrace)?;

        Ok(EnumSpecifier {
            keyword,
            name,
            body: Some(EnumBody { enumerators, close }),
        })
    }

    fn parse_init_declarator(&mut self) -> Result<InitDeclarator, ParseError> {
        let declarator = self.parse_declarator()?;
        let initializer = match self.eat(TokenKind::Eq) {
            Some(_) => Some(self.parse_initializer()?),
            None => None,
        };
        Ok(InitDeclarator {
            declarator,
            initializer,
        })
    }

    /// Parse an assignment expression or a braced list; trailing comma allowed
    fn parse_initializer(&mut self) -> Result<Initializer, ParseError> {
        self.nested(|p| {
            let Some(open) = p.eat(TokenKind::LBrace) else {
                return Ok(Initializer::Expression(p.parse_assignment_expression()?));
            };

            let mut items = Vec::new();
            while !p.check(TokenKind::RBrace) {
                items.push(p.parse_initializer()?);
                if p.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            let close = p.expect(TokenKind::RBrace)?;

            Ok(Initializer::List { open, items, close })
        })
    }

    // ===== Declarators =====

    /// Parse `pointer? direct-declarator`
    pub(crate) fn parse_declarator(&mut self) -> Result<Declarator, ParseError> {
        self.nested(|p| {
            let pointer = p.parse_pointer();
            let direct = p.parse_direct_declarator()?;
            Ok(Declarator { pointer, direct })
        })
    }

    fn parse_pointer(&mut self) -> Option<Pointer> {
        let mut levels = Vec::new();
        while let Some(star) = self.eat(TokenKind::Star) {
            let mut qualifiers = Vec::new();
            while self.check_category(Category::TypeQualifier) {
                qualifiers.push(self.advance());
            }
            levels.push((star, qualifiers));
        }

        if levels.is_empty() {
            None
        } else {
            Some(Pointer { levels })
        }
    }

    fn parse_direct_declarator(&mut self) -> Result<DirectDeclarator, ParseError> {
        let base = match self.peek().kind {
            TokenKind::Ident => DeclaratorBase::Identifier(self.advance()),
            TokenKind::LParen => {
                let open = self.advance();
                let inner = self.parse_declarator()?;
                let close = self.expect(TokenKind::RParen)?;
                DeclaratorBase::Nested {
                    open,
                    inner: Box::new(inner),
                    close,
                }
            }
            _ => {
                return Err(self.error_here(vec![
                    Expected::Token(TokenKind::Ident),
                    Expected::Token(TokenKind::LParen),
                ]))
            }
        };

        let suffixes = self.parse_declarator_suffixes()?;
        Ok(DirectDeclarator { base, suffixes })
    }

    /// Parse any run of `[size?]` and `(parameters)` suffixes
    fn parse_declarator_suffixes(&mut self) -> Result<Vec<DeclaratorSuffix>, ParseError> {
        let mut suffixes = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::LBracket => {
                    let open = self.advance();
                    let size = if self.check(TokenKind::RBracket) {
                        None
                    } else {
                        Some(self.parse_assignment_expression()?)
                    };
                    let close = self.expect(TokenKind::RBracket)?;
                    suffixes.push(DeclaratorSuffix::Array { open, size, close });
                }
                TokenKind::LParen => {
                    let open = self.advance();
                    let list = self.parse_parameter_list()?;
                    let close = self.expect(TokenKind::RParen)?;
                    suffixes.push(DeclaratorSuffix::Parameters { open, list, close });
                }
                _ => break,
            }
        }
        Ok(suffixes)
    }

    /// Parse the inside of a parameter suffix: empty, an identifier list, or
    /// typed parameters with an optional trailing `...`
    fn parse_parameter_list(&mut self) -> Result<ParameterList, ParseError> {
        if self.check(TokenKind::RParen) {
            return Ok(ParameterList::Empty);
        }

        if self.is_identifier_list() {
            let mut names = Vec::new();
            loop {
                names.push(self.expect(TokenKind::Ident)?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            return Ok(ParameterList::Identifiers(names));
        }

        let mut params = Vec::new();
        let mut ellipsis = None;
        loop {
            params.push(self.parse_parameter_declaration()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            if let Some(dots) = self.eat(TokenKind::Ellipsis) {
                ellipsis = Some(dots);
                break;
            }
        }

        if !self.check(TokenKind::RParen) {
            return Err(self.error_here(vec![
                Expected::Token(TokenKind::Comma),
                Expected::Token(TokenKind::RParen),
            ]));
        }

        Ok(ParameterList::Types { params, ellipsis })
    }

    fn is_identifier_list(&self) -> bool {
        let mut n = 0;
        loop {
            if self.peek_kind(n) != TokenKind::Ident {
                return false;
            }
            match self.peek_kind(n + 1) {
                TokenKind::RParen => return true,
                TokenKind::Comma => n += 2,
                _ => return false,
            }
        }
    }

    /// Parse `specifiers (declarator | abstract-declarator)?`, trying the
    /// named form first
    fn parse_parameter_declaration(&mut self) -> Result<ParameterDeclaration, ParseError> {
        let specifiers = self.parse_declaration_specifiers()?;
        let declarator = self.first_of(&[
            |p| {
                let declarator = p.parse_declarator()?;
                p.expect_parameter_end()?;
                Ok(ParameterDeclarator::Concrete(declarator))
            },
            |p| {
                let declarator = p.parse_abstract_declarator()?;
                p.expect_parameter_end()?;
                Ok(ParameterDeclarator::Abstract(declarator))
            },
            |p| {
                p.expect_parameter_end()?;
                Ok(ParameterDeclarator::None)
            },
        ])?;

        Ok(ParameterDeclaration {
            specifiers,
            declarator,
        })
    }

    fn expect_parameter_end(&self) -> Result<(), ParseError> {
        if self.check(TokenKind::Comma) || self.check(TokenKind::RParen) {
            Ok(())
        } else {
            Err(self.error_here(vec![
                Expected::Token(TokenKind::Comma),
                Expected::Token(TokenKind::RParen),
            ]))
        }
    }

    /// Parse `pointer? direct-abstract-declarator?`, at least one present
    pub(crate) fn parse_abstract_declarator(&mut self) -> Result<AbstractDeclarator, ParseError> {
        self.nested(|p| {
            let pointer = p.parse_pointer();
            let direct = p.parse_direct_abstract_declarator()?;

            if pointer.is_none() && direct.is_none() {
                return Err(p.error_here(vec![Expected::Production("abstract declarator")]));
            }

            Ok(AbstractDeclarator { pointer, direct })
        })
    }

    fn parse_direct_abstract_declarator(
        &mut self,
    ) -> Result<Option<DirectAbstractDeclarator>, ParseError> {
        // `(*` and `([` group an inner declarator; any other `(` opens parameters
        let nested = if self.check(TokenKind::LParen)
            && matches!(self.peek_kind(1), TokenKind::Star | TokenKind::LBracket)
        {
            let open = self.advance();
            let inner = self.parse_abstract_declarator()?;
            let close = self.expect(TokenKind::RParen)?;
            Some((open, Box::new(inner), close))
        } else {
            None
        };

        let suffixes = self.parse_declarator_suffixes()?;
        if nested.is_none() && suffixes.is_empty() {
            return Ok(None);
        }

        Ok(Some(DirectAbstractDeclarator { nested, suffixes }))
    }

    /// Parse `specifier-qualifier-list abstract-declarator?`
    pub(crate) fn parse_type_name(&mut self) -> Result<TypeName, ParseError> {
        let specifiers = self.parse_declaration_specifiers()?;
        let declarator = if matches!(
            self.peek().kind,
            TokenKind::Star | TokenKind::LParen | TokenKind::LBracket
        ) {
            Some(self.parse_abstract_declarator()?)
        } else {
            None
        };
        Ok(TypeName {
            specifiers,
            declarator,
        })
    }
}
