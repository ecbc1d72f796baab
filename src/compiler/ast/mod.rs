/*!
Data-only node shapes for the Mini language syntax tree.  The external
front end constructs these (the `minic` driver accepts them as a JSON
dump) and the backend passes consume them; nothing in this module is
computed.  Every syntactic category is a closed enum, so each pass
dispatches with an exhaustive match.
*/
mod expression;
mod function;
mod statement;
mod structdef;
mod ty;

pub use expression::{BinaryOperator, Expression, UnaryOperator};
pub use function::{Declaration, FunctionDef};
pub use statement::{LValue, Statement};
pub use structdef::StructDef;
pub use ty::Type;

use serde::{Deserialize, Serialize};

/// The name of the designated entry-point function.
pub const MAIN_FN: &str = "main";

/// A complete Mini program: struct declarations, global variable
/// declarations, and function definitions, each in source order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub structs: Vec<StructDef>,
    pub globals: Vec<Declaration>,
    pub functions: Vec<FunctionDef>,
}

impl Program {
    pub fn new(
        structs: Vec<StructDef>,
        globals: Vec<Declaration>,
        functions: Vec<FunctionDef>,
    ) -> Program {
        Program {
            structs,
            globals,
            functions,
        }
    }
}
