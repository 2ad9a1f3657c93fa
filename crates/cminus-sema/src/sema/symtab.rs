//! Symbol table and scope management
//!
//! Scopes live in a flat, append-only registry and refer to their parent by
//! [`ScopeId`]. Each scope hashes names into a fixed number of buckets; a
//! bucket is a chain of symbols, most recently inserted first.

use crate::ast::Type;

/// Number of hash buckets per scope
pub const BUCKET_COUNT: usize = 211;

/// Power of two used as the multiplier in [`hash`]
const SHIFT: u32 = 4;

/// Bucket index for `name`
pub fn hash(name: &str) -> usize {
    name.bytes()
        .fold(0, |acc, b| ((acc << SHIFT) + usize::from(b)) % BUCKET_COUNT)
}

/// Index of a scope in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a symbol in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a scope belongs to, seen from a statement inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enclosing<T = SymbolId> {
    Function(T),
    /// The function's name was already taken by a non-function, which the
    /// builder has reported
    Redefined,
    TopLevel,
}

impl<T> Enclosing<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Enclosing<U> {
        match self {
            Enclosing::Function(owner) => Enclosing::Function(f(owner)),
            Enclosing::Redefined => Enclosing::Redefined,
            Enclosing::TopLevel => Enclosing::TopLevel,
        }
    }
}

/// A declared name within one scope
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    /// Declaration line first, then every recorded reference
    pub lines: Vec<u32>,
    pub slot: usize,
    /// Parameter types, in declaration order (functions only)
    pub params: Vec<Type>,
    pub scope: ScopeId,
}

impl Symbol {
    /// Earliest recorded line (the declaration)
    pub fn first_line(&self) -> u32 {
        self.lines.first().copied().unwrap_or(0)
    }
}

/// A named lexical region
#[derive(Debug)]
pub struct Scope {
    pub name: String,
    pub parent: Option<ScopeId>,
    buckets: Vec<Vec<SymbolId>>,
}

impl Scope {
    fn new(name: String, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            parent,
            buckets: vec![Vec::new(); BUCKET_COUNT],
        }
    }

    /// Chain for `bucket`, most recent insert first
    pub fn chain(&self, bucket: usize) -> impl Iterator<Item = SymbolId> + '_ {
        self.buckets[bucket].iter().rev().copied()
    }
}

/// Stack frame for an active scope
#[derive(Debug, Clone, Copy)]
struct Frame {
    scope: ScopeId,
    next_slot: usize,
}

/// Registry of every scope and symbol of one compilation unit, plus the
/// scope stack used while the builder pass runs.
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
    stack: Vec<Frame>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope nested in the current top of stack (or a root scope
    /// when the stack is empty) and make it the new top.
    pub fn push(&mut self, name: impl Into<String>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        let parent = self.top();
        self.scopes.push(Scope::new(name.into(), parent));
        self.stack.push(Frame { scope: id, next_slot: 0 });
        id
    }

    /// Innermost active scope
    pub fn top(&self) -> Option<ScopeId> {
        self.stack.last().map(|frame| frame.scope)
    }

    /// Leave the innermost scope; the scope itself stays in the registry
    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Number of active scopes
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Drop every stack frame once the builder pass is over
    pub fn discard_stack(&mut self) {
        self.stack.clear();
    }

    /// Declare `name` in `scope`, taking the next slot of the top frame.
    ///
    /// If the name already exists in `scope` itself the table is left
    /// unchanged and the existing symbol is returned as the error.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: Type,
        lineno: u32,
    ) -> Result<SymbolId, SymbolId> {
        if let Some(existing) = self.lookup_local(scope, name) {
            return Err(existing);
        }

        let slot = match self.stack.last_mut() {
            Some(frame) => {
                let slot = frame.next_slot;
                frame.next_slot += 1;
                slot
            }
            None => 0,
        };

        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            name: name.to_string(),
            ty,
            lines: vec![lineno],
            slot,
            params: Vec::new(),
            scope,
        });
        self.scopes[scope.index()].buckets[hash(name)].push(id);
        Ok(id)
    }

    /// Find `name` in `scope` only, ignoring its ancestors
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes[scope.index()]
            .chain(hash(name))
            .find(|id| self.symbols[id.index()].name == name)
    }

    /// Find the nearest declaration of `name`, walking from `scope` outwards
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(sym) = self.lookup_local(id, name) {
                return Some(sym);
            }
            current = self.scopes[id.index()].parent;
        }
        None
    }

    /// Append a line at which the symbol is referenced
    pub fn record_reference(&mut self, symbol: SymbolId, lineno: u32) {
        self.symbols[symbol.index()].lines.push(lineno);
    }

    /// Append a parameter type to a function symbol
    pub fn add_parameter(&mut self, function: SymbolId, ty: Type) {
        self.symbols[function.index()].params.push(ty);
    }

    /// Function owning `scope`. Walks outward; at each scope the scope's own
    /// name is looked up in its parent, and a non-function hit moves on to the
    /// parent instead of ending the search.
    pub fn enclosing_function(&self, scope: ScopeId) -> Enclosing {
        let mut shadowed = false;
        let mut current = self.scope(scope);

        while let Some(parent) = current.parent {
            match self.lookup_local(parent, &current.name) {
                Some(id) if self.symbol(id).ty.is_function() => {
                    return Enclosing::Function(id);
                }
                Some(_) => shadowed = true,
                None => {}
            }
            current = self.scope(parent);
        }

        if shadowed {
            Enclosing::Redefined
        } else {
            Enclosing::TopLevel
        }
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    /// Every scope, in creation order
    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, scope)| (ScopeId(i as u32), scope))
    }

    /// Symbols of `scope` by bucket index, then chain order
    pub fn symbols_in(&self, scope: ScopeId) -> impl Iterator<Item = &Symbol> {
        let scope = self.scope(scope);
        (0..BUCKET_COUNT)
            .flat_map(move |bucket| scope.chain(bucket))
            .map(move |id| self.symbol(id))
    }

    /// Scope registered under `name`, first match in creation order
    pub fn find_scope(&self, name: &str) -> Option<ScopeId> {
        self.scopes()
            .find(|(_, scope)| scope.name == name)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_shift_scheme() {
        assert_eq!(hash(""), 0);
        // 'a' = 97
        assert_eq!(hash("a"), 97);
        // ((97 << 4) + 98) % 211 = 1650 % 211 = 173
        assert_eq!(hash("ab"), 173);
        assert!(hash("a_rather_long_identifier") < BUCKET_COUNT);
    }

    #[test]
    fn test_push_links_parent_and_pop_keeps_scope() {
        let mut table = SymbolTable::new();
        assert_eq!(table.top(), None);

        let global = table.push("global");
        let inner = table.push("main");
        assert_eq!(table.scope(inner).parent, Some(global));
        assert_eq!(table.scope(global).parent, None);
        assert_eq!(table.top(), Some(inner));

        table.pop();
        assert_eq!(table.top(), Some(global));
        assert_eq!(table.scopes().count(), 2);
        assert_eq!(table.find_scope("main"), Some(inner));
    }

    #[test]
    fn test_pop_on_empty_stack_is_noop() {
        let mut table = SymbolTable::new();
        table.pop();
        assert_eq!(table.depth(), 0);
    }

    #[test]
    fn test_slots_are_per_scope() {
        let mut table = SymbolTable::new();
        let global = table.push("global");
        let a = table.declare(global, "a", Type::Int, 1).unwrap();
        let b = table.declare(global, "b", Type::Int, 2).unwrap();

        let inner = table.push("f");
        let c = table.declare(inner, "c", Type::Int, 3).unwrap();

        assert_eq!(table.symbol(a).slot, 0);
        assert_eq!(table.symbol(b).slot, 1);
        assert_eq!(table.symbol(c).slot, 0);
    }

    #[test]
    fn test_redeclare_keeps_first() {
        let mut table = SymbolTable::new();
        let global = table.push("global");
        let first = table.declare(global, "x", Type::Int, 1).unwrap();
        let again = table.declare(global, "x", Type::IntArray, 7);

        assert_eq!(again, Err(first));
        let sym = table.symbol(first);
        assert_eq!(sym.ty, Type::Int);
        assert_eq!(sym.lines, vec![1]);
        assert_eq!(sym.slot, 0);
        assert_eq!(table.symbols_in(global).count(), 1);

        // a failed declaration does not consume a slot
        let y = table.declare(global, "y", Type::Int, 8).unwrap();
        assert_eq!(table.symbol(y).slot, 1);
    }

    #[test]
    fn test_lookup_shadowing() {
        let mut table = SymbolTable::new();
        let global = table.push("global");
        let outer = table.declare(global, "x", Type::Int, 1).unwrap();
        let inner_scope = table.push("f");
        let inner = table.declare(inner_scope, "x", Type::IntArray, 2).unwrap();

        assert_eq!(table.lookup(inner_scope, "x"), Some(inner));
        assert_eq!(table.lookup(global, "x"), Some(outer));
        assert_eq!(table.lookup_local(inner_scope, "y"), None);

        table.declare(global, "y", Type::Int, 3).unwrap();
        assert!(table.lookup(inner_scope, "y").is_some());
        assert_eq!(table.lookup_local(inner_scope, "y"), None);
    }

    #[test]
    fn test_colliding_names_chain_most_recent_first() {
        // "a" hashes to 97; find another name in the same bucket
        let other = (b'a'..=b'z')
            .flat_map(|x| (b'a'..=b'z').map(move |y| format!("{}{}", x as char, y as char)))
            .find(|n| hash(n) == hash("a"))
            .unwrap();

        let mut table = SymbolTable::new();
        let global = table.push("global");
        let first = table.declare(global, "a", Type::Int, 1).unwrap();
        let second = table.declare(global, &other, Type::Int, 2).unwrap();

        let chain: Vec<SymbolId> = table.scope(global).chain(hash("a")).collect();
        assert_eq!(chain, vec![second, first]);
        assert_eq!(table.lookup(global, "a"), Some(first));
        assert_eq!(table.lookup(global, &other), Some(second));
    }

    #[test]
    fn test_references_and_parameters_append_in_order() {
        let mut table = SymbolTable::new();
        let global = table.push("global");
        let f = table.declare(global, "f", Type::IntFunction, 3).unwrap();

        table.record_reference(f, 9);
        table.record_reference(f, 5);
        table.record_reference(f, 9);
        table.add_parameter(f, Type::Int);
        table.add_parameter(f, Type::IntArray);

        let sym = table.symbol(f);
        assert_eq!(sym.lines, vec![3, 9, 5, 9]);
        assert_eq!(sym.first_line(), 3);
        assert_eq!(sym.params, vec![Type::Int, Type::IntArray]);
    }

    #[test]
    fn test_enclosing_function() {
        let mut table = SymbolTable::new();
        let global = table.push("global");
        let f = table.declare(global, "f", Type::VoidFunction, 1).unwrap();
        let body = table.push("f");
        let nested = table.push("f");

        assert_eq!(table.enclosing_function(body), Enclosing::Function(f));
        assert_eq!(table.enclosing_function(nested), Enclosing::Function(f));
        assert_eq!(table.enclosing_function(global), Enclosing::TopLevel);
    }

    #[test]
    fn test_enclosing_function_skips_local_shadowing_function_name() {
        // int f(void) { int f; { ... } }
        let mut table = SymbolTable::new();
        let global = table.push("global");
        let f = table.declare(global, "f", Type::IntFunction, 1).unwrap();
        let body = table.push("f");
        table.declare(body, "f", Type::Int, 2).unwrap();
        let nested = table.push("f");

        assert_eq!(table.enclosing_function(nested), Enclosing::Function(f));
    }

    #[test]
    fn test_enclosing_function_name_taken_by_variable() {
        // int f; int f(int a) { ... }
        let mut table = SymbolTable::new();
        let global = table.push("global");
        table.declare(global, "f", Type::Int, 1).unwrap();
        let body = table.push("f");

        assert_eq!(table.enclosing_function(body), Enclosing::Redefined);
    }
}
