//! Lexer (tokenizer) for Parcel source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! parser. Scanning is driven by an ordered table of regex rules: at each
//! cursor position the rules are tried in priority order and the first one
//! that matches wins, not the longest. Keyword rules sit above the generic
//! identifier rule and `==`-style operators above their one-character
//! prefixes. Comments (`# ...`), intra-line whitespace, and newlines are
//! recognized but never emitted; newlines only advance the line counter.

use std::fmt;

use regex::Regex;

use crate::error::{Error, Result};

/// Closed set of token categories produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Str,
    Identifier,
    VarKey,
    If,
    ElseIf,
    Else,
    FuncDec,
    FuncCall,
    Loop,
    Print,
    Op,
    CompOp,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Semicolon,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Number => "number literal",
            TokenKind::Str => "string literal",
            TokenKind::Identifier => "identifier",
            TokenKind::VarKey => "'be'",
            TokenKind::If => "'check'",
            TokenKind::ElseIf => "'alsocheck'",
            TokenKind::Else => "'other'",
            TokenKind::FuncDec => "'make'",
            TokenKind::FuncCall => "'deliver'",
            TokenKind::Loop => "'repeat'",
            TokenKind::Print => "'show'",
            TokenKind::Op => "arithmetic operator",
            TokenKind::CompOp => "comparison operator",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
        };
        f.write_str(text)
    }
}

/// A single lexical token: category, matched source text, and 1-based line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' on line {}", self.kind, self.lexeme, self.line)
    }
}

/// What the lexer does when a rule matches.
#[derive(Debug, Clone, Copy)]
enum RuleAction {
    /// Emit a token of this kind and advance.
    Emit(TokenKind),
    /// Advance the line counter, emit nothing.
    Newline,
    /// Advance the cursor, emit nothing (comments, spaces, tabs).
    Skip,
}

struct LexRule {
    action: RuleAction,
    pattern: Regex,
}

/// Rule-table lexer for Parcel.
pub struct Lexer {
    rules: Vec<LexRule>,
}

impl Lexer {
    /// Build the rule table. Order is significant: the first rule matching at
    /// the cursor wins.
    pub fn new() -> Self {
        let rule = |action: RuleAction, pattern: &str| LexRule {
            action,
            // Patterns are fixed literals; they always compile.
            pattern: Regex::new(pattern).expect("lexical rule pattern is valid"),
        };

        let rules = vec![
            rule(RuleAction::Emit(TokenKind::Number), r"^\d+"),
            rule(RuleAction::Emit(TokenKind::Str), "^\"[^\"\n]*\""),
            rule(RuleAction::Emit(TokenKind::VarKey), r"^be\b"),
            rule(RuleAction::Emit(TokenKind::If), r"^check\b"),
            rule(RuleAction::Emit(TokenKind::ElseIf), r"^alsocheck\b"),
            rule(RuleAction::Emit(TokenKind::Else), r"^other\b"),
            rule(RuleAction::Emit(TokenKind::FuncDec), r"^make\b"),
            rule(RuleAction::Emit(TokenKind::FuncCall), r"^deliver\b"),
            rule(RuleAction::Emit(TokenKind::Loop), r"^repeat\b"),
            rule(RuleAction::Emit(TokenKind::Print), r"^show\b"),
            rule(
                RuleAction::Emit(TokenKind::Identifier),
                r"^[a-zA-Z_][a-zA-Z0-9_]*",
            ),
            rule(RuleAction::Emit(TokenKind::Op), r"^[+\-*/]"),
            rule(RuleAction::Emit(TokenKind::CompOp), r"^(==|!=|<=|>=|<|>)"),
            rule(RuleAction::Emit(TokenKind::LBrace), r"^\{"),
            rule(RuleAction::Emit(TokenKind::RBrace), r"^\}"),
            rule(RuleAction::Emit(TokenKind::LParen), r"^\("),
            rule(RuleAction::Emit(TokenKind::RParen), r"^\)"),
            rule(RuleAction::Emit(TokenKind::Semicolon), r"^;"),
            rule(RuleAction::Emit(TokenKind::Comma), r"^,"),
            rule(RuleAction::Skip, r"^#.*"),
            rule(RuleAction::Newline, r"^\n"),
            rule(RuleAction::Skip, r"^[ \t\r]+"),
        ];

        Self { rules }
    }

    /// Tokenize the entire input.
    ///
    /// Fails at the first cursor position where no rule matches; there is no
    /// skip-and-continue recovery. Tokens come out in source order with
    /// non-decreasing line numbers.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut cursor = 0;
        let mut line = 1;

        while cursor < source.len() {
            let rest = &source[cursor..];
            let matched = self
                .rules
                .iter()
                .find_map(|rule| rule.pattern.find(rest).map(|m| (rule, m)));

            match matched {
                Some((rule, m)) => {
                    match rule.action {
                        RuleAction::Emit(kind) => tokens.push(Token {
                            kind,
                            lexeme: m.as_str().to_string(),
                            line,
                        }),
                        RuleAction::Newline => line += 1,
                        RuleAction::Skip => {}
                    }
                    cursor += m.end();
                }
                None => {
                    // The loop guard keeps `rest` non-empty here.
                    let character = rest.chars().next().unwrap_or_default();
                    return Err(Error::UnexpectedCharacter {
                        position: cursor,
                        character,
                    });
                }
            }
        }

        Ok(tokens)
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}
