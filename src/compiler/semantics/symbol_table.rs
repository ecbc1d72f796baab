use crate::compiler::ast::Type;

use super::SemanticError;

/// Where a variable was declared.  Duplicate detection reports a
/// different error per kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SymbolKind {
    Global,
    Parameter,
    Local,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn new(name: &str, ty: Type, kind: SymbolKind) -> Symbol {
        Symbol {
            name: name.into(),
            ty,
            kind,
        }
    }
}

/// The set of symbols declared in one scope.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolTable {
    sym: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable { sym: vec![] }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.sym.iter().find(|s| s.name == name)
    }

    /// Add a symbol to the table.  Fails if a symbol with the same name
    /// is already declared in this table.
    pub fn add(&mut self, name: &str, ty: Type, kind: SymbolKind) -> Result<(), SemanticError> {
        if self.get(name).is_some() {
            let err = match kind {
                SymbolKind::Global => SemanticError::DuplicateGlobal(name.into()),
                SymbolKind::Parameter => SemanticError::DuplicateParameter(name.into()),
                SymbolKind::Local => SemanticError::DuplicateLocal(name.into()),
            };
            Err(err)
        } else {
            self.sym.push(Symbol::new(name, ty, kind));
            Ok(())
        }
    }
}
