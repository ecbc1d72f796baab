use crate::compiler::ast::Type;

use super::symbol_table::{Symbol, SymbolKind, SymbolTable};
use super::SemanticError;

/// Index of a scope within the [`ScopeStack`] arena.
pub type ScopeId = usize;

struct Scope {
    symbols: SymbolTable,
    parent: Option<ScopeId>,
}

/// All scopes live in one arena and refer to their parent by index, so
/// inner scopes can outlive the traversal that created them and lookups
/// never chase owning pointers.  Scope 0 is the global scope.
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> ScopeStack {
        ScopeStack {
            scopes: vec![Scope {
                symbols: SymbolTable::new(),
                parent: None,
            }],
        }
    }

    pub fn global() -> ScopeId {
        0
    }

    /// Create a new scope whose lookups fall through to `parent`.
    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            symbols: SymbolTable::new(),
            parent: Some(parent),
        });
        self.scopes.len() - 1
    }

    pub fn add(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: Type,
        kind: SymbolKind,
    ) -> Result<(), SemanticError> {
        self.scopes[scope].symbols.add(name, ty, kind)
    }

    /// Resolve a name starting at `scope` and walking outward through
    /// the parent chain.
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = &self.scopes[id];
            if let Some(sym) = s.symbols.get(name) {
                return Some(sym);
            }
            current = s.parent;
        }
        None
    }

    /// Resolve a name in `scope` alone, without falling through to any
    /// enclosing scope.
    pub fn get_local(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.scopes[scope].symbols.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_scope_shadows_outer() {
        let mut stack = ScopeStack::new();
        stack
            .add(ScopeStack::global(), "x", Type::Int, SymbolKind::Global)
            .unwrap();
        let inner = stack.push_scope(ScopeStack::global());
        stack.add(inner, "x", Type::Bool, SymbolKind::Local).unwrap();

        assert_eq!(stack.get(inner, "x").unwrap().ty, Type::Bool);
        assert_eq!(stack.get(ScopeStack::global(), "x").unwrap().ty, Type::Int);
    }

    #[test]
    fn test_lookup_falls_through_to_parent() {
        let mut stack = ScopeStack::new();
        stack
            .add(ScopeStack::global(), "g", Type::Int, SymbolKind::Global)
            .unwrap();
        let inner = stack.push_scope(ScopeStack::global());

        assert_eq!(stack.get(inner, "g").unwrap().kind, SymbolKind::Global);
        assert!(stack.get_local(inner, "g").is_none());
        assert!(stack.get(inner, "missing").is_none());
    }

    #[test]
    fn test_sibling_scopes_are_independent() {
        let mut stack = ScopeStack::new();
        let a = stack.push_scope(ScopeStack::global());
        let b = stack.push_scope(ScopeStack::global());
        stack.add(a, "x", Type::Int, SymbolKind::Local).unwrap();

        assert!(stack.get(a, "x").is_some());
        assert!(stack.get(b, "x").is_none());
    }
}
