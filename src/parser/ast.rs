//! AST node definitions for the Parcel front end

/// AST nodes produced by the parser.
///
/// A single closed enum covers the whole tree; every parser rule returns
/// exactly one variant and consumers match exhaustively. Number values keep
/// their source lexeme and string expressions keep their surrounding quotes.
/// Nodes are immutable once returned from their producing rule.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Top-level sequence of statements.
    Program { body: Vec<AstNode> },

    // Statements
    VariableDeclaration {
        name: String,
        value: Box<AstNode>,
    },
    IfStatement {
        condition: Box<AstNode>,
        body: Vec<AstNode>,
        elif_branch: Option<Box<AstNode>>,
        else_branch: Option<Box<AstNode>>,
    },
    ElifStatement {
        condition: Box<AstNode>,
        body: Vec<AstNode>,
    },
    ElseStatement {
        body: Vec<AstNode>,
    },
    FunctionDeclaration {
        name: String,
        parameters: Option<Vec<String>>,
        body: Vec<AstNode>,
    },
    FunctionCall {
        name: String,
        arguments: Option<Vec<AstNode>>,
    },
    WhileLoop {
        condition: Box<AstNode>,
        body: Vec<AstNode>,
    },
    PrintStatement {
        expressions: Vec<AstNode>,
    },

    // Expressions
    Identifier {
        name: String,
    },
    Number {
        value: String,
    },
    StringExpression {
        value: String,
    },
    /// Left-deep binary chain; left/right are Number, Identifier, or another
    /// NumberExpression.
    NumberExpression {
        left: Box<AstNode>,
        operator: String,
        right: Box<AstNode>,
    },
    /// `left comp_op right`, no chaining.
    Condition {
        left: Box<AstNode>,
        operator: String,
        right: Box<AstNode>,
    },
}
