//! Scoped symbol table
//!
//! This module provides the name-resolution state the parser threads through
//! a single parse:
//! - [`SymbolTable`]: a stack of scopes, innermost last
//! - [`Scope`]: name → entry map with insertion order preserved
//! - [`SymbolEntry`]: declaration metadata plus recorded usage lines
//!
//! Lookup walks the stack innermost to outermost, so inner declarations
//! shadow outer ones. Redefinition within one scope is rejected. Popped
//! scopes are retired rather than dropped, so the finalized table still
//! reports every declaration the parse saw.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::parser::ast::AstNode;

/// Declaration payload of a symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolData {
    /// A `be` declaration. `value` is `None` for function parameters, which
    /// are bound at call time and carry no initializer.
    Variable { value: Option<AstNode> },
    /// A `make` declaration.
    Function {
        parameters: Option<Vec<String>>,
        body: Vec<AstNode>,
    },
}

/// One declared name: payload, declaration line, and every line that
/// referenced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub name: String,
    pub data: SymbolData,
    pub declaration_line: usize,
    pub usage_lines: Vec<usize>,
}

impl fmt::Display for SymbolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.data {
            SymbolData::Variable { value: Some(_) } => "variable",
            SymbolData::Variable { value: None } => "parameter",
            SymbolData::Function { .. } => "function",
        };
        write!(
            f,
            "[{}] {}, declared on line {}, used on lines {:?}",
            self.name, kind, self.declaration_line, self.usage_lines
        )
    }
}

/// A single lexical scope.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    entries: FxHashMap<String, SymbolEntry>,
    insertion_order: Vec<String>,
}

impl Scope {
    /// Look up an entry by name in this scope only.
    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.get(name)
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.entries.get(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stack of scopes owned by one parse invocation.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    active: Vec<Scope>,
    retired: Vec<Scope>,
}

impl SymbolTable {
    /// A table with only the global scope.
    pub fn new() -> Self {
        Self {
            active: vec![Scope::default()],
            retired: Vec::new(),
        }
    }

    /// Enter a new innermost scope.
    pub fn push_scope(&mut self) {
        self.active.push(Scope::default());
    }

    /// Leave the innermost scope. Its entries become invisible to further
    /// lookups but are retained for reporting. The global scope is never
    /// popped.
    pub fn pop_scope(&mut self) {
        if self.active.len() > 1 {
            if let Some(scope) = self.active.pop() {
                self.retired.push(scope);
            }
        }
    }

    /// Number of currently active scopes (1 = global only).
    pub fn depth(&self) -> usize {
        self.active.len()
    }

    /// Insert `name` into the innermost scope.
    ///
    /// Shadowing an outer scope is allowed; redefining within the same scope
    /// is a [`Error::DuplicateSymbol`].
    pub fn define(&mut self, name: &str, data: SymbolData, declaration_line: usize) -> Result<()> {
        let depth = self.active.len() - 1;
        let scope = self
            .active
            .last_mut()
            .expect("the global scope is always present");

        if scope.entries.contains_key(name) {
            return Err(Error::DuplicateSymbol {
                name: name.to_string(),
                depth,
            });
        }

        scope.insertion_order.push(name.to_string());
        scope.entries.insert(
            name.to_string(),
            SymbolEntry {
                name: name.to_string(),
                data,
                declaration_line,
                usage_lines: Vec::new(),
            },
        );
        Ok(())
    }

    /// Resolve `name` against the active scopes, innermost first, recording
    /// `usage_line` on the entry that matches.
    pub fn resolve(&mut self, name: &str, usage_line: usize) -> Result<&SymbolEntry> {
        if let Some(index) = self
            .active
            .iter()
            .rposition(|scope| scope.entries.contains_key(name))
        {
            if let Some(entry) = self.active[index].entries.get_mut(name) {
                entry.usage_lines.push(usage_line);
                return Ok(&*entry);
            }
        }
        Err(Error::UndefinedSymbol {
            name: name.to_string(),
            line: usage_line,
        })
    }

    /// All scopes the parse produced: active ones outermost-first, then
    /// retired ones in the order they were popped.
    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.active.iter().chain(self.retired.iter())
    }

    /// The global (outermost) scope.
    pub fn global(&self) -> &Scope {
        &self.active[0]
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, scope) in self.scopes().enumerate() {
            writeln!(f, "scope {}:", index)?;
            for entry in scope.entries() {
                writeln!(f, "  {}", entry)?;
            }
        }
        Ok(())
    }
}
