//! # Parcel front end
//!
//! parcel-lang turns source text in the Parcel teaching language into a
//! validated AST and a resolved symbol table, and separately offers a
//! grammar-analysis utility computing FIRST/FOLLOW sets for a declarative
//! context-free grammar.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser (+ SymbolTable) → AST + finalized SymbolTable
//! ```
//!
//! 1. [`parser::lexer`] — ordered-rule regex tokenizer with line tracking.
//! 2. [`parser`] — recursive descent over the token stream, populating and
//!    querying the symbol table as declarations and references appear.
//! 3. [`symbols`] — the scope stack: innermost-first lookup, shadowing
//!    across scopes, rejection of same-scope redefinition.
//! 4. [`grammar`] — FIRST/FOLLOW fixed-point analysis over a declarative
//!    grammar; a sibling tool that never runs at parse time.
//!
//! Everything is single-threaded and synchronous; a parse runs to completion
//! or to its first fatal [`Error`].
//!
//! ## The Parcel language
//!
//! Declarations `x be ( 5 ) ;`, conditionals `check`/`alsocheck`/`other`,
//! functions `make`/`deliver`, loops `repeat`, output `show`, comments `#`.

pub mod error;
pub mod grammar;
pub mod parser;
pub mod symbols;

pub use error::{Error, Result};

use parser::ast::AstNode;
use parser::parse::Parser;
use symbols::SymbolTable;

/// Tokenize and parse `source`, returning the program AST and the finalized
/// symbol table.
pub fn analyze(source: &str) -> Result<(AstNode, SymbolTable)> {
    let mut parser = Parser::from_source(source)?;
    let program = parser.parse_program()?;
    Ok((program, parser.into_symbols()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_full_program() {
        let source = "\
total be ( 0 ) ;
count be ( 3 ) ;
make tally ( step ) {
    show ( step ) ;
}
repeat ( total < count ) {
    deliver tally ( total ) ;
}
show ( \"done\" , total ) ;
";
        let (program, symbols) = analyze(source).unwrap();

        let AstNode::Program { body } = &program else {
            panic!("expected a program node");
        };
        assert_eq!(body.len(), 5);

        let tally = symbols.global().get("tally").unwrap();
        assert_eq!(tally.declaration_line, 3);
        assert_eq!(tally.usage_lines, vec![7]);

        let total = symbols.global().get("total").unwrap();
        assert_eq!(total.declaration_line, 1);
        // repeat condition (line 6) and the show on line 9; the argument to
        // `deliver tally ( total )` on line 7 also resolves.
        assert_eq!(total.usage_lines, vec![6, 7, 9]);
    }

    #[test]
    fn test_analyze_propagates_lex_errors() {
        let err = analyze("x be ( 5 ) ; ?").unwrap_err();

        assert!(matches!(err, Error::UnexpectedCharacter { .. }));
    }
}
