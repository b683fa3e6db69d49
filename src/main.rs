// Parcel: front-end driver for the Parcel teaching language

use std::fs;
use std::path::Path;
use std::process;

use rustc_hash::FxHashSet;
use tracing_subscriber::EnvFilter;

use parcel_lang::grammar::{self, AnalysisSets, Grammar};
use parcel_lang::parser::lexer::{Lexer, TokenKind};
use parcel_lang::parser::parse::Parser;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("parcel");

    match args.get(1).map(|s| s.as_str()) {
        Some("--grammar") => print_grammar_analysis(),
        Some(path) => run_front_end(path),
        None => {
            eprintln!("Error: No input file provided");
            eprintln!();
            eprintln!("Usage: {} <file.parcel>", program_name);
            eprintln!("       {} --grammar", program_name);
            eprintln!();
            eprintln!("The second form prints FIRST/FOLLOW sets of the Parcel grammar.");
            process::exit(1);
        }
    }
}

/// Tokenize and parse one source file, printing tokens, AST, and the
/// finalized symbol table.
fn run_front_end(path: &str) {
    if !Path::new(path).exists() {
        eprintln!("Error: File '{}' not found", path);
        process::exit(1);
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: Failed to read '{}': {}", path, err);
            process::exit(1);
        }
    };

    eprintln!("Parsing {}...", path);

    let tokens = match Lexer::new().tokenize(&source) {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("Syntax error: {}", err);
            process::exit(1);
        }
    };

    println!("Tokens:");
    for token in &tokens {
        println!("  {}", token);
    }
    let unique_kinds: FxHashSet<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    println!();
    println!("Unique token kinds: {}", unique_kinds.len());

    let mut parser = Parser::new(tokens);
    let program = match parser.parse_program() {
        Ok(program) => program,
        Err(err) => {
            eprintln!("Syntax error: {}", err);
            process::exit(1);
        }
    };
    let symbols = parser.into_symbols();

    println!();
    println!("AST:");
    println!("{:#?}", program);
    println!();
    println!("Symbol table:");
    print!("{}", symbols);
}

/// Print FIRST and FOLLOW sets of the built-in Parcel grammar.
fn print_grammar_analysis() {
    let grammar = Grammar::parcel();
    let first = grammar::first_sets(&grammar);
    let follow = grammar::follow_sets(&grammar, &first);

    println!("FIRST sets:");
    print_sets(&grammar, &first);
    println!();
    println!("FOLLOW sets:");
    print_sets(&grammar, &follow);
}

fn print_sets(grammar: &Grammar, sets: &AnalysisSets) {
    for non_terminal in grammar.non_terminals() {
        if let Some(set) = sets.get(non_terminal) {
            let mut items: Vec<&str> = set.iter().map(String::as_str).collect();
            items.sort_unstable();
            println!("  {} = {{{}}}", non_terminal, items.join(", "));
        }
    }
}
