//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and its core infrastructure:
//! the token cursor, the match primitive, and the program entry point.
//!
//! # Parser Architecture
//!
//! Grammar-directed recursive descent with one token of lookahead, fail-fast
//! on the first structural error, no backtracking. Rule methods are split
//! across files using `impl Parser` blocks:
//! - This module: Parser struct, helpers, and the `Program` rule
//! - `statements`: statement dispatch and the statement rules
//! - `expressions`: expressions, factors, and conditions
//!
//! [`Parser::match_kind`] is the single place token consumption happens, so
//! the cursor invariant lives in one method. The symbol table is a value
//! owned by the parser and threaded through one parse invocation; there is
//! no ambient global state, and independent parses never interact.

use tracing::trace;

use crate::error::{Error, Result};
use crate::parser::ast::AstNode;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use crate::symbols::SymbolTable;

/// Recursive descent parser for Parcel.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) symbols: SymbolTable,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            symbols: SymbolTable::new(),
        }
    }

    /// Tokenize `source` and build a parser over the result.
    pub fn from_source(source: &str) -> Result<Self> {
        let tokens = Lexer::new().tokenize(source)?;
        Ok(Self::new(tokens))
    }

    /// Parse the whole token stream as a program: a sequence of statements
    /// until tokens are exhausted.
    pub fn parse_program(&mut self) -> Result<AstNode> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        Ok(AstNode::Program { body })
    }

    /// Consume the parser, returning the finalized symbol table.
    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }

    // ===== Helper methods =====

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Kind of the token after the current one (the single lookahead).
    pub(crate) fn peek_ahead_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.position + 1).map(|t| t.kind)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Line of the most recently consumed token.
    pub(crate) fn previous_line(&self) -> usize {
        self.tokens[self.position - 1].line
    }

    pub(crate) fn current_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    /// The single token-consuming primitive: compare the current token's
    /// kind against `expected`, consume it and return its lexeme on success.
    pub(crate) fn match_kind(&mut self, expected: TokenKind) -> Result<String> {
        match self.tokens.get(self.position) {
            Some(token) if token.kind == expected => {
                trace!(kind = ?token.kind, lexeme = %token.lexeme, position = self.position, "consumed token");
                let lexeme = token.lexeme.clone();
                self.position += 1;
                Ok(lexeme)
            }
            Some(token) => Err(Error::UnexpectedToken {
                expected,
                found: token.clone(),
                position: self.position,
            }),
            None => Err(Error::UnexpectedEnd { expected }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<(AstNode, SymbolTable)> {
        let mut parser = Parser::from_source(source)?;
        let program = parser.parse_program()?;
        Ok((program, parser.into_symbols()))
    }

    #[test]
    fn test_empty_source_is_an_empty_program() {
        let (program, _) = parse("").unwrap();

        assert_eq!(program, AstNode::Program { body: Vec::new() });
    }

    #[test]
    fn test_declaration_then_print() {
        let (program, symbols) = parse("x be ( 5 ) ; show ( x ) ;").unwrap();

        let AstNode::Program { body } = &program else {
            panic!("expected a program node");
        };
        assert_eq!(body.len(), 2);
        assert_eq!(
            body[0],
            AstNode::VariableDeclaration {
                name: "x".to_string(),
                value: Box::new(AstNode::Number {
                    value: "5".to_string()
                }),
            }
        );
        assert!(matches!(&body[1], AstNode::PrintStatement { expressions } if expressions.len() == 1));

        let entry = symbols.global().get("x").unwrap();
        assert_eq!(entry.declaration_line, 1);
        assert_eq!(entry.usage_lines, vec![1]);
    }

    #[test]
    fn test_undefined_function_call() {
        let err = parse("deliver y ;").unwrap_err();

        assert_eq!(
            err,
            Error::UndefinedSymbol {
                name: "y".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn test_duplicate_declaration() {
        let err = parse("x be ( 1 ) ; x be ( 2 ) ;").unwrap_err();

        assert_eq!(
            err,
            Error::DuplicateSymbol {
                name: "x".to_string(),
                depth: 0
            }
        );
    }

    #[test]
    fn test_self_referential_declaration_rejected() {
        // The declared name only becomes visible after the whole declaration
        // is parsed.
        let err = parse("x be ( x ) ;").unwrap_err();

        assert_eq!(
            err,
            Error::UndefinedSymbol {
                name: "x".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn test_unexpected_statement_start() {
        let err = parse("; x be ( 1 ) ;").unwrap_err();

        assert!(matches!(err, Error::UnexpectedStatement { position: 0, .. }));
    }

    #[test]
    fn test_missing_token_reports_expected_kind() {
        let err = parse("x be ( 5 ;").unwrap_err();

        assert!(matches!(
            err,
            Error::UnexpectedToken {
                expected: TokenKind::RParen,
                ..
            }
        ));
    }

    #[test]
    fn test_unterminated_block_is_unexpected_end() {
        let err = parse("check ( 1 < 2 ) { x be ( 1 ) ;").unwrap_err();

        assert_eq!(
            err,
            Error::UnexpectedEnd {
                expected: TokenKind::RBrace
            }
        );
    }

    #[test]
    fn test_block_declarations_leave_no_global_trace() {
        let (_, symbols) = parse("check ( 1 < 2 ) { y be ( 3 ) ; }").unwrap();

        assert!(symbols.global().get("y").is_none());
        // The retired body scope still reports the declaration.
        assert!(symbols.scopes().any(|s| s.get("y").is_some()));
    }
}
