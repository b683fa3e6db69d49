//! Statement parsing implementation
//!
//! One method per non-terminal of the Parcel statement grammar:
//!
//! ```text
//! statement   ::= var_decl | if_stmt | func_decl | func_call
//!               | while_loop | print_stmt
//! var_decl    ::= identifier 'be' '(' expression ')' ';'
//! if_stmt     ::= 'check' '(' condition ')' '{' body '}' elif? else?
//! func_decl   ::= 'make' identifier ( '(' params ')' )? '{' body '}'
//! func_call   ::= 'deliver' identifier ( '(' args ')' )? ';'
//! while_loop  ::= 'repeat' '(' condition ')' '{' body '}'
//! print_stmt  ::= 'show' '(' expression ( ',' expression )* ')' ';'
//! ```
//!
//! Block bodies run until the closing brace; a semicolon after a statement
//! is consumed when present but never required. Every body is parsed in its
//! own lexical scope.

use tracing::debug;

use crate::error::{Error, Result};
use crate::parser::ast::AstNode;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use crate::symbols::SymbolData;

impl Parser {
    /// Statement dispatch on the current token kind, with one token of
    /// lookahead to tell a variable declaration from other identifier uses.
    /// Both call sites check `is_at_end` first, so a token is always present.
    pub(crate) fn parse_statement(&mut self) -> Result<AstNode> {
        let token = self.current_token();

        debug!(kind = ?token.kind, position = self.position, "parsing statement");

        match token.kind {
            TokenKind::Identifier if self.peek_ahead_kind() == Some(TokenKind::VarKey) => {
                self.parse_variable_declaration()
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::FuncDec => self.parse_function_declaration(),
            TokenKind::FuncCall => self.parse_function_call(),
            TokenKind::Loop => self.parse_while_loop(),
            TokenKind::Print => self.parse_print_statement(),
            _ => Err(Error::UnexpectedStatement {
                found: token,
                position: self.position,
            }),
        }
    }

    /// `identifier 'be' '(' expression ')' ';'`
    ///
    /// The name is defined only after the whole declaration has been parsed,
    /// so the value expression cannot reference the name being declared.
    fn parse_variable_declaration(&mut self) -> Result<AstNode> {
        let name = self.match_kind(TokenKind::Identifier)?;
        let line = self.previous_line();
        self.match_kind(TokenKind::VarKey)?;
        self.match_kind(TokenKind::LParen)?;
        let value = self.parse_expression()?;
        self.match_kind(TokenKind::RParen)?;
        self.match_kind(TokenKind::Semicolon)?;

        self.symbols.define(
            &name,
            SymbolData::Variable {
                value: Some(value.clone()),
            },
            line,
        )?;

        Ok(AstNode::VariableDeclaration {
            name,
            value: Box::new(value),
        })
    }

    /// `'check' '(' condition ')' '{' body '}'` plus at most one elif clause
    /// and at most one else clause.
    fn parse_if_statement(&mut self) -> Result<AstNode> {
        self.match_kind(TokenKind::If)?;
        self.match_kind(TokenKind::LParen)?;
        let condition = self.parse_condition()?;
        self.match_kind(TokenKind::RParen)?;
        let body = self.parse_scoped_block()?;

        let elif_branch = self.parse_elif_statement()?;
        let else_branch = self.parse_else_statement()?;

        Ok(AstNode::IfStatement {
            condition: Box::new(condition),
            body,
            elif_branch,
            else_branch,
        })
    }

    /// `'alsocheck' '(' condition ')' '{' body '}'` or nothing.
    fn parse_elif_statement(&mut self) -> Result<Option<Box<AstNode>>> {
        if !self.check(TokenKind::ElseIf) {
            return Ok(None);
        }

        self.match_kind(TokenKind::ElseIf)?;
        self.match_kind(TokenKind::LParen)?;
        let condition = self.parse_condition()?;
        self.match_kind(TokenKind::RParen)?;
        let body = self.parse_scoped_block()?;

        Ok(Some(Box::new(AstNode::ElifStatement {
            condition: Box::new(condition),
            body,
        })))
    }

    /// `'other' '{' body '}'` or nothing.
    fn parse_else_statement(&mut self) -> Result<Option<Box<AstNode>>> {
        if !self.check(TokenKind::Else) {
            return Ok(None);
        }

        self.match_kind(TokenKind::Else)?;
        let body = self.parse_scoped_block()?;

        Ok(Some(Box::new(AstNode::ElseStatement { body })))
    }

    /// `'make' identifier ( '(' params ')' )? '{' body '}'`
    ///
    /// The function symbol lands in the scope surrounding the declaration,
    /// after the body has been parsed; parameters are defined inside the
    /// body's scope.
    fn parse_function_declaration(&mut self) -> Result<AstNode> {
        self.match_kind(TokenKind::FuncDec)?;
        let name = self.match_kind(TokenKind::Identifier)?;
        let line = self.previous_line();

        let parameters = if self.check(TokenKind::LParen) {
            self.match_kind(TokenKind::LParen)?;
            let params = self.parse_parameter_list()?;
            self.match_kind(TokenKind::RParen)?;
            Some(params)
        } else {
            None
        };

        self.match_kind(TokenKind::LBrace)?;
        self.symbols.push_scope();
        if let Some(params) = &parameters {
            for param in params {
                self.symbols
                    .define(param, SymbolData::Variable { value: None }, line)?;
            }
        }
        let body = self.parse_block_body()?;
        self.symbols.pop_scope();
        self.match_kind(TokenKind::RBrace)?;

        self.symbols.define(
            &name,
            SymbolData::Function {
                parameters: parameters.clone(),
                body: body.clone(),
            },
            line,
        )?;

        Ok(AstNode::FunctionDeclaration {
            name,
            parameters,
            body,
        })
    }

    /// Comma-separated identifiers, possibly empty.
    fn parse_parameter_list(&mut self) -> Result<Vec<String>> {
        let mut parameters = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(parameters);
        }

        parameters.push(self.match_kind(TokenKind::Identifier)?);
        while self.check(TokenKind::Comma) {
            self.match_kind(TokenKind::Comma)?;
            parameters.push(self.match_kind(TokenKind::Identifier)?);
        }
        Ok(parameters)
    }

    /// `'deliver' identifier ';'` or `'deliver' identifier '(' args ')' ';'`.
    /// The callee must already be declared; the call site is recorded as a
    /// usage line.
    fn parse_function_call(&mut self) -> Result<AstNode> {
        self.match_kind(TokenKind::FuncCall)?;
        let name = self.match_kind(TokenKind::Identifier)?;
        let line = self.previous_line();
        self.symbols.resolve(&name, line)?;

        let arguments = if self.check(TokenKind::LParen) {
            self.match_kind(TokenKind::LParen)?;
            let args = self.parse_argument_list()?;
            self.match_kind(TokenKind::RParen)?;
            Some(args)
        } else {
            None
        };
        self.match_kind(TokenKind::Semicolon)?;

        Ok(AstNode::FunctionCall { name, arguments })
    }

    /// Comma-separated expressions, possibly empty.
    fn parse_argument_list(&mut self) -> Result<Vec<AstNode>> {
        let mut arguments = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(arguments);
        }

        arguments.push(self.parse_expression()?);
        while self.check(TokenKind::Comma) {
            self.match_kind(TokenKind::Comma)?;
            arguments.push(self.parse_expression()?);
        }
        Ok(arguments)
    }

    /// `'repeat' '(' condition ')' '{' body '}'`; the body must contain at
    /// least one statement, unlike if/else bodies.
    fn parse_while_loop(&mut self) -> Result<AstNode> {
        self.match_kind(TokenKind::Loop)?;
        self.match_kind(TokenKind::LParen)?;
        let condition = self.parse_condition()?;
        self.match_kind(TokenKind::RParen)?;
        self.match_kind(TokenKind::LBrace)?;

        if self.check(TokenKind::RBrace) {
            return Err(Error::UnexpectedStatement {
                found: self.current_token(),
                position: self.position,
            });
        }

        self.symbols.push_scope();
        let body = self.parse_block_body()?;
        self.symbols.pop_scope();
        self.match_kind(TokenKind::RBrace)?;

        Ok(AstNode::WhileLoop {
            condition: Box::new(condition),
            body,
        })
    }

    /// `'show' '(' expression ( ',' expression )* ')' ';'`
    fn parse_print_statement(&mut self) -> Result<AstNode> {
        self.match_kind(TokenKind::Print)?;
        self.match_kind(TokenKind::LParen)?;

        let mut expressions = vec![self.parse_expression()?];
        while self.check(TokenKind::Comma) {
            self.match_kind(TokenKind::Comma)?;
            expressions.push(self.parse_expression()?);
        }

        self.match_kind(TokenKind::RParen)?;
        self.match_kind(TokenKind::Semicolon)?;

        Ok(AstNode::PrintStatement { expressions })
    }

    /// `'{' body '}'` in a fresh lexical scope.
    fn parse_scoped_block(&mut self) -> Result<Vec<AstNode>> {
        self.match_kind(TokenKind::LBrace)?;
        self.symbols.push_scope();
        let body = self.parse_block_body()?;
        self.symbols.pop_scope();
        self.match_kind(TokenKind::RBrace)?;
        Ok(body)
    }

    /// Statements up to (not including) the closing brace. A semicolon after
    /// a statement is consumed when present.
    fn parse_block_body(&mut self) -> Result<Vec<AstNode>> {
        let mut body = Vec::new();

        while !self.is_at_end() && !self.check(TokenKind::RBrace) {
            body.push(self.parse_statement()?);
            if self.check(TokenKind::Semicolon) {
                self.match_kind(TokenKind::Semicolon)?;
            }
        }

        Ok(body)
    }
}
