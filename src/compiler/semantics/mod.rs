/*
 * Handles semantic analysis of a syntax tree.  This includes:
 * 1. Registering structs, globals, and functions and rejecting duplicate
 *    or undefined names.
 * 2. Type checking: determining the type of every expression and making
 *    sure that the types match any type restrictions.
 * 3. Validating the entry-point signature and the trailing-return rule.
 *
 * The analyzer never aborts early: it walks the whole tree once and
 * accumulates every diagnostic it finds, so the user sees as many
 * problems as possible per run.  An empty diagnostic list certifies the
 * tree as safe to hand to the code generator.
 */
mod error;
mod stack;
mod symbol_table;

pub mod type_checker;

pub use error::SemanticError;
pub use stack::{ScopeId, ScopeStack};
pub use symbol_table::{Symbol, SymbolKind, SymbolTable};

use super::CompilerError;

/// A single semantic finding: what went wrong and the source line it
/// went wrong on.
pub type Diagnostic = CompilerError<SemanticError>;
