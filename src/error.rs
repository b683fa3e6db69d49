//! Error taxonomy for the Parcel front end
//!
//! Every failure the core can produce is a variant of [`Error`]: lexical
//! (no rule matches), syntactic (wrong or missing token), or symbolic
//! (redefinition / undefined reference). All of them are fatal for the
//! current `tokenize`/`parse` call and propagate up the recursive-descent
//! chain unchanged; there is no recovery and no partial AST on failure.
//! Rendering (console output, exit codes) is left to the caller.

use thiserror::Error;

use crate::parser::lexer::{Token, TokenKind};

/// The result of a front-end operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Front-end errors, one variant per failure class.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No lexical rule matched at the cursor position.
    #[error("unexpected character '{character}' at byte offset {position}")]
    UnexpectedCharacter { position: usize, character: char },

    /// The match primitive saw a token of the wrong kind.
    #[error("expected {expected}, found {found} at token {position}")]
    UnexpectedToken {
        expected: TokenKind,
        found: Token,
        position: usize,
    },

    /// Input ran out while a specific token kind was still required.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: TokenKind },

    /// The current token cannot begin a statement.
    #[error("{found} at token {position} cannot start a statement")]
    UnexpectedStatement { found: Token, position: usize },

    /// The current token cannot begin an expression or factor.
    #[error("{found} at token {position} cannot start an expression")]
    UnexpectedExpression { found: Token, position: usize },

    /// A name was declared twice in the same scope. `depth` is the scope's
    /// position on the stack, 0 being the global scope.
    #[error("redefinition of '{name}' in the same scope (depth {depth})")]
    DuplicateSymbol { name: String, depth: usize },

    /// A name was referenced that no enclosing scope declares.
    #[error("undefined symbol '{name}' at line {line}")]
    UndefinedSymbol { name: String, line: usize },
}
