//! Expression and condition parsing implementation
//!
//! ```text
//! expression  ::= identifier | number_expression | string_expression
//! number_expr ::= factor ( op factor )*
//! factor      ::= number | identifier
//! condition   ::= expression comp_op expression
//! ```
//!
//! Number expressions build a left-deep binary tree: all four operators bind
//! equally, strictly left to right, with no precedence climbing.

use crate::error::{Error, Result};
use crate::parser::ast::AstNode;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl Parser {
    /// Expression dispatch on the current token kind. An identifier at the
    /// head of an expression is resolved against the symbol table, which
    /// records the usage line.
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode> {
        match self.peek_kind() {
            Some(TokenKind::Identifier) => {
                let name = self.match_kind(TokenKind::Identifier)?;
                let line = self.previous_line();
                self.symbols.resolve(&name, line)?;
                Ok(AstNode::Identifier { name })
            }
            Some(TokenKind::Number) => self.parse_number_expression(),
            Some(TokenKind::Str) => self.parse_string_expression(),
            Some(_) => Err(Error::UnexpectedExpression {
                found: self.current_token(),
                position: self.position,
            }),
            None => Err(Error::UnexpectedEnd {
                expected: TokenKind::Number,
            }),
        }
    }

    /// `factor ( op factor )*`, folded into a left-deep tree: each operator
    /// nests the previous result as the new left operand.
    fn parse_number_expression(&mut self) -> Result<AstNode> {
        let mut left = self.parse_factor()?;

        while self.check(TokenKind::Op) {
            let operator = self.match_kind(TokenKind::Op)?;
            let right = self.parse_factor()?;
            left = AstNode::NumberExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// `number | identifier`. Identifier factors are recorded by name only;
    /// symbol resolution happens at the head of an expression, not here.
    fn parse_factor(&mut self) -> Result<AstNode> {
        match self.peek_kind() {
            Some(TokenKind::Number) => Ok(AstNode::Number {
                value: self.match_kind(TokenKind::Number)?,
            }),
            Some(TokenKind::Identifier) => Ok(AstNode::Identifier {
                name: self.match_kind(TokenKind::Identifier)?,
            }),
            Some(_) => Err(Error::UnexpectedExpression {
                found: self.current_token(),
                position: self.position,
            }),
            None => Err(Error::UnexpectedEnd {
                expected: TokenKind::Number,
            }),
        }
    }

    /// A string literal, quotes and all.
    fn parse_string_expression(&mut self) -> Result<AstNode> {
        let value = self.match_kind(TokenKind::Str)?;
        Ok(AstNode::StringExpression { value })
    }

    /// `expression comp_op expression`, no chaining.
    pub(crate) fn parse_condition(&mut self) -> Result<AstNode> {
        let left = self.parse_expression()?;
        let operator = self.match_kind(TokenKind::CompOp)?;
        let right = self.parse_expression()?;

        Ok(AstNode::Condition {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn expression(source: &str) -> Result<AstNode> {
        let tokens = Lexer::new().tokenize(source)?;
        Parser::new(tokens).parse_expression()
    }

    #[test]
    fn test_number_expression_is_left_deep() {
        let node = expression("1 + 2 * 3").unwrap();

        // ((1 + 2) * 3): the earlier operator ends up nested on the left.
        assert_eq!(
            node,
            AstNode::NumberExpression {
                left: Box::new(AstNode::NumberExpression {
                    left: Box::new(AstNode::Number {
                        value: "1".to_string()
                    }),
                    operator: "+".to_string(),
                    right: Box::new(AstNode::Number {
                        value: "2".to_string()
                    }),
                }),
                operator: "*".to_string(),
                right: Box::new(AstNode::Number {
                    value: "3".to_string()
                }),
            }
        );
    }

    #[test]
    fn test_identifier_factor_is_not_resolved() {
        // `y` appears as a factor after the leading number, so no symbol
        // lookup fires even though `y` was never declared.
        let node = expression("1 + y").unwrap();

        assert!(matches!(
            node,
            AstNode::NumberExpression { right, .. }
                if matches!(*right, AstNode::Identifier { ref name } if name == "y")
        ));
    }

    #[test]
    fn test_leading_identifier_is_resolved() {
        let err = expression("y").unwrap_err();

        assert_eq!(
            err,
            Error::UndefinedSymbol {
                name: "y".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn test_string_expression() {
        let node = expression("\"hello\"").unwrap();

        assert_eq!(
            node,
            AstNode::StringExpression {
                value: "\"hello\"".to_string()
            }
        );
    }

    #[test]
    fn test_expression_rejects_structural_tokens() {
        let err = expression("{").unwrap_err();

        assert!(matches!(err, Error::UnexpectedExpression { .. }));
    }

    #[test]
    fn test_condition_shape() {
        let tokens = Lexer::new().tokenize("1 + 2 < 5").unwrap();
        let node = Parser::new(tokens).parse_condition().unwrap();

        match node {
            AstNode::Condition {
                left,
                operator,
                right,
            } => {
                assert!(matches!(*left, AstNode::NumberExpression { .. }));
                assert_eq!(operator, "<");
                assert!(matches!(*right, AstNode::Number { .. }));
            }
            other => panic!("expected a condition, got {:?}", other),
        }
    }
}
