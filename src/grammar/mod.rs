//! FIRST/FOLLOW analysis over a declarative context-free grammar
//!
//! This module is a sibling tool to the parser: it never touches tokens or
//! ASTs, only a static [`Grammar`] description (non-terminal → alternative
//! productions). [`first_sets`] is a memoized recursion with an explicit
//! in-progress guard; [`follow_sets`] is a monotone fixed-point loop that
//! terminates because every pass only grows finite sets over a finite
//! alphabet. Both are deterministic: re-running them on an unchanged grammar
//! yields identical sets.
//!
//! A symbol is a non-terminal exactly when the grammar has productions for
//! it; everything else is a terminal. Two sentinel symbols are fixed:
//! [`EPSILON`] for the empty production and [`END_MARKER`] for end of input.

use rustc_hash::{FxHashMap, FxHashSet};

/// Sentinel symbol for the empty production.
pub const EPSILON: &str = "epsilon";

/// End-of-input marker; seeds the start symbol's FOLLOW set.
pub const END_MARKER: &str = "$";

/// A set of grammar symbols (terminals, plus the sentinels where allowed).
pub type SymbolSet = FxHashSet<String>;

/// FIRST or FOLLOW sets keyed by non-terminal.
pub type AnalysisSets = FxHashMap<String, SymbolSet>;

/// A context-free grammar: ordered non-terminals, each with an ordered list
/// of productions, each production a sequence of symbols.
#[derive(Debug, Clone)]
pub struct Grammar {
    start: String,
    order: Vec<String>,
    productions: FxHashMap<String, Vec<Vec<String>>>,
}

impl Grammar {
    /// An empty grammar with the given start symbol.
    pub fn new(start: &str) -> Self {
        Self {
            start: start.to_string(),
            order: Vec::new(),
            productions: FxHashMap::default(),
        }
    }

    /// Append one production for `non_terminal`. First call for a name also
    /// registers it as a non-terminal.
    pub fn add_production(&mut self, non_terminal: &str, symbols: &[&str]) {
        let entry = self
            .productions
            .entry(non_terminal.to_string())
            .or_insert_with(|| {
                self.order.push(non_terminal.to_string());
                Vec::new()
            });
        entry.push(symbols.iter().map(|s| s.to_string()).collect());
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    /// Non-terminals in registration order.
    pub fn non_terminals(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.productions.contains_key(symbol)
    }

    /// Productions of `non_terminal`, empty for terminals.
    pub fn productions_of(&self, non_terminal: &str) -> &[Vec<String>] {
        self.productions
            .get(non_terminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The surface grammar of Parcel itself, in LL(1)-friendly form with the
    /// repetition constructs expanded into tail non-terminals. Terminals are
    /// token category names and literal punctuation.
    pub fn parcel() -> Self {
        let mut g = Grammar::new("program");

        g.add_production("program", &["statement_list"]);
        g.add_production("statement_list", &["statement", "statement_list"]);
        g.add_production("statement_list", &[EPSILON]);

        g.add_production("statement", &["variable_declaration"]);
        g.add_production("statement", &["if_statement"]);
        g.add_production("statement", &["function_declaration"]);
        g.add_production("statement", &["function_call"]);
        g.add_production("statement", &["while_loop"]);
        g.add_production("statement", &["print_statement"]);

        g.add_production(
            "variable_declaration",
            &["identifier", "be", "(", "expression", ")", ";"],
        );

        g.add_production("expression", &["identifier"]);
        g.add_production("expression", &["number_expression"]);
        g.add_production("expression", &["string"]);
        g.add_production("number_expression", &["factor", "operator_tail"]);
        g.add_production("operator_tail", &["operator", "factor", "operator_tail"]);
        g.add_production("operator_tail", &[EPSILON]);
        g.add_production("factor", &["number"]);
        g.add_production("factor", &["identifier"]);

        g.add_production("condition", &["expression", "comp_op", "expression"]);

        g.add_production(
            "if_statement",
            &[
                "check",
                "(",
                "condition",
                ")",
                "{",
                "statement_list",
                "}",
                "elif_statement",
                "else_statement",
            ],
        );
        g.add_production(
            "elif_statement",
            &[
                "alsocheck",
                "(",
                "condition",
                ")",
                "{",
                "statement_list",
                "}",
            ],
        );
        g.add_production("elif_statement", &[EPSILON]);
        g.add_production("else_statement", &["other", "{", "statement_list", "}"]);
        g.add_production("else_statement", &[EPSILON]);

        g.add_production(
            "function_declaration",
            &[
                "make",
                "identifier",
                "function_signature",
                "{",
                "statement_list",
                "}",
            ],
        );
        g.add_production("function_signature", &["(", "parameter_list", ")"]);
        g.add_production("function_signature", &[EPSILON]);
        g.add_production("parameter_list", &["identifier", "parameter_tail"]);
        g.add_production("parameter_list", &[EPSILON]);
        g.add_production("parameter_tail", &[",", "identifier", "parameter_tail"]);
        g.add_production("parameter_tail", &[EPSILON]);

        g.add_production(
            "function_call",
            &["deliver", "identifier", "call_arguments", ";"],
        );
        g.add_production("call_arguments", &["(", "argument_list", ")"]);
        g.add_production("call_arguments", &[EPSILON]);
        g.add_production("argument_list", &["expression", "argument_tail"]);
        g.add_production("argument_list", &[EPSILON]);
        g.add_production("argument_tail", &[",", "expression", "argument_tail"]);
        g.add_production("argument_tail", &[EPSILON]);

        g.add_production(
            "while_loop",
            &[
                "repeat",
                "(",
                "condition",
                ")",
                "{",
                "statement",
                "statement_list",
                "}",
            ],
        );

        g.add_production(
            "print_statement",
            &["show", "(", "expression", "print_tail", ")", ";"],
        );
        g.add_production("print_tail", &[",", "expression", "print_tail"]);
        g.add_production("print_tail", &[EPSILON]);

        g
    }
}

/// Compute FIRST sets for every non-terminal of `grammar`.
pub fn first_sets(grammar: &Grammar) -> AnalysisSets {
    let mut memo = AnalysisSets::default();
    let mut in_progress = FxHashSet::default();

    for non_terminal in grammar.non_terminals() {
        first_of(grammar, non_terminal, &mut memo, &mut in_progress);
    }

    memo
}

/// FIRST of one symbol. Terminals (and the epsilon sentinel) are their own
/// FIRST set; non-terminals union their productions, walking each production
/// left to right and stopping at the first non-nullable symbol. A symbol
/// whose computation is already in progress contributes nothing, which
/// bounds the recursion on self-referential grammars. Results reached while
/// another computation is still in progress may be truncated by that cut, so
/// only guard-free results are memoized; every symbol still gets an exact
/// set from its own top-level call in [`first_sets`].
fn first_of(
    grammar: &Grammar,
    symbol: &str,
    memo: &mut AnalysisSets,
    in_progress: &mut FxHashSet<String>,
) -> SymbolSet {
    if let Some(cached) = memo.get(symbol) {
        return cached.clone();
    }
    if !grammar.is_non_terminal(symbol) {
        let mut set = SymbolSet::default();
        set.insert(symbol.to_string());
        return set;
    }
    if !in_progress.insert(symbol.to_string()) {
        return SymbolSet::default();
    }

    let mut result = SymbolSet::default();
    for production in grammar.productions_of(symbol) {
        let mut all_nullable = true;
        for item in production {
            let item_first = first_of(grammar, item, memo, in_progress);
            let nullable = item_first.contains(EPSILON);
            result.extend(item_first.into_iter().filter(|s| s != EPSILON));
            if !nullable {
                all_nullable = false;
                break;
            }
        }
        if all_nullable {
            result.insert(EPSILON.to_string());
        }
    }

    in_progress.remove(symbol);
    if in_progress.is_empty() {
        memo.insert(symbol.to_string(), result.clone());
    }
    result
}

/// Compute FOLLOW sets for every non-terminal, given the grammar's FIRST
/// sets. The start symbol's FOLLOW set is seeded with [`END_MARKER`]; passes
/// repeat until no set changes.
pub fn follow_sets(grammar: &Grammar, first: &AnalysisSets) -> AnalysisSets {
    let mut follow: AnalysisSets = grammar
        .non_terminals()
        .map(|nt| (nt.to_string(), SymbolSet::default()))
        .collect();
    if let Some(start) = follow.get_mut(grammar.start()) {
        start.insert(END_MARKER.to_string());
    }

    loop {
        let mut changed = false;

        for owner in grammar.non_terminals() {
            for production in grammar.productions_of(owner) {
                for (index, symbol) in production.iter().enumerate() {
                    if !grammar.is_non_terminal(symbol) {
                        continue;
                    }

                    let mut additions = SymbolSet::default();
                    match production.get(index + 1) {
                        Some(next) if grammar.is_non_terminal(next) => {
                            if let Some(next_first) = first.get(next) {
                                additions
                                    .extend(next_first.iter().filter(|s| *s != EPSILON).cloned());
                                if next_first.contains(EPSILON) {
                                    if let Some(owner_follow) = follow.get(owner) {
                                        additions.extend(owner_follow.iter().cloned());
                                    }
                                }
                            }
                        }
                        // FOLLOW sets never contain epsilon: a trailing
                        // epsilon sentinel behaves like end of production.
                        Some(next) if next == EPSILON => {
                            if let Some(owner_follow) = follow.get(owner) {
                                additions.extend(owner_follow.iter().cloned());
                            }
                        }
                        Some(next) => {
                            additions.insert(next.clone());
                        }
                        None => {
                            if let Some(owner_follow) = follow.get(owner) {
                                additions.extend(owner_follow.iter().cloned());
                            }
                        }
                    }

                    if let Some(set) = follow.get_mut(symbol) {
                        for item in additions {
                            changed |= set.insert(item);
                        }
                    }
                }
            }
        }

        if !changed {
            break;
        }
    }

    follow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> SymbolSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_epsilon_only_non_terminal() {
        let mut g = Grammar::new("start");
        g.add_production("start", &["b", "empty"]);
        g.add_production("empty", &[EPSILON]);

        let first = first_sets(&g);
        assert_eq!(first["empty"], set(&[EPSILON]));
        assert_eq!(first["start"], set(&["b"]));
    }

    #[test]
    fn test_follow_of_start_contains_end_marker() {
        let mut g = Grammar::new("start");
        g.add_production("start", &["a"]);

        let first = first_sets(&g);
        let follow = follow_sets(&g, &first);
        assert!(follow["start"].contains(END_MARKER));
    }

    #[test]
    fn test_nullable_neighbor_propagates_follow() {
        // start -> b_part empty ; the nullable tail hands the owner's FOLLOW
        // to the symbol before it.
        let mut g = Grammar::new("start");
        g.add_production("start", &["b_part", "empty"]);
        g.add_production("b_part", &["b"]);
        g.add_production("empty", &[EPSILON]);

        let first = first_sets(&g);
        let follow = follow_sets(&g, &first);

        assert_eq!(follow["empty"], set(&[END_MARKER]));
        assert!(follow["empty"].is_subset(&follow["b_part"]));
        assert!(!follow["b_part"].contains(EPSILON));
    }

    #[test]
    fn test_left_recursion_terminates() {
        let mut g = Grammar::new("expr");
        g.add_production("expr", &["expr", "+", "term"]);
        g.add_production("expr", &["term"]);
        g.add_production("term", &["num"]);

        let first = first_sets(&g);
        assert_eq!(first["expr"], set(&["num"]));

        let follow = follow_sets(&g, &first);
        assert_eq!(follow["expr"], set(&[END_MARKER, "+"]));
    }

    #[test]
    fn test_mutually_recursive_first_sets() {
        // a and b each reach the other; the cut while computing a must not
        // leave a truncated set cached for b.
        let mut g = Grammar::new("a");
        g.add_production("a", &["b", "x"]);
        g.add_production("a", &["d"]);
        g.add_production("b", &["a", "y"]);

        let first = first_sets(&g);
        assert_eq!(first["a"], set(&["d"]));
        assert_eq!(first["b"], set(&["d"]));
    }

    #[test]
    fn test_first_through_nullable_prefix() {
        let mut g = Grammar::new("s");
        g.add_production("s", &["opt", "c"]);
        g.add_production("opt", &["a"]);
        g.add_production("opt", &[EPSILON]);

        let first = first_sets(&g);
        assert_eq!(first["opt"], set(&["a", EPSILON]));
        assert_eq!(first["s"], set(&["a", "c"]));
    }

    #[test]
    fn test_idempotent_and_deterministic() {
        let g = Grammar::parcel();
        let first_a = first_sets(&g);
        let first_b = first_sets(&g);
        assert_eq!(first_a, first_b);

        let follow_a = follow_sets(&g, &first_a);
        let follow_b = follow_sets(&g, &first_b);
        assert_eq!(follow_a, follow_b);
    }

    #[test]
    fn test_parcel_grammar_analysis() {
        let g = Grammar::parcel();
        let first = first_sets(&g);
        let follow = follow_sets(&g, &first);

        assert_eq!(
            first["statement"],
            set(&["identifier", "check", "make", "deliver", "repeat", "show"])
        );
        // statement_list is nullable, so FIRST(program) also holds epsilon.
        assert!(first["program"].contains(EPSILON));
        assert!(first["program"].contains("check"));

        assert_eq!(follow["program"], set(&[END_MARKER]));
        // A statement list is always followed by a closing brace or the end
        // of input.
        assert_eq!(follow["statement_list"], set(&["}", END_MARKER]));
        assert!(follow["condition"].contains(")"));
    }
}
