//! Parcel source code parser
//!
//! This module transforms Parcel source text into an Abstract Syntax Tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser struct and the program entry point
//! - [`ast`]: AST node definitions
//!
//! Statement and expression rules live in their own files as `impl Parser`
//! blocks extending the shared parser state.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with one token of lookahead. The grammar
//! is resolvable at every decision point with at most that single lookahead
//! token, so there is no backtracking and no memoization. Parsing is
//! fail-fast: the first malformed construct aborts the whole parse.

pub mod ast;
pub mod lexer;
pub mod parse;

mod expressions;
mod statements;
