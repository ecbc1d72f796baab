use serde::{Deserialize, Serialize};

use super::statement::Statement;
use super::ty::Type;

/// A named, typed declaration.  The same shape serves global variables,
/// struct fields, function parameters, and function locals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub line: u32,
    pub name: String,
    pub ty: Type,
}

impl Declaration {
    pub fn new(line: u32, name: &str, ty: Type) -> Declaration {
        Declaration {
            line,
            name: name.into(),
            ty,
        }
    }
}

/// A function definition.  Parameters and locals are declared separately
/// but merge into one function-local scope: a parameter and a local with
/// the same name collide.  `ret_ty` is `Type::Void` for functions that
/// return nothing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub line: u32,
    pub name: String,
    pub params: Vec<Declaration>,
    pub ret_ty: Type,
    pub locals: Vec<Declaration>,
    pub body: Vec<Statement>,
}

impl FunctionDef {
    pub fn new(
        line: u32,
        name: &str,
        params: Vec<Declaration>,
        ret_ty: Type,
        locals: Vec<Declaration>,
        body: Vec<Statement>,
    ) -> FunctionDef {
        FunctionDef {
            line,
            name: name.into(),
            params,
            ret_ty,
            locals,
            body,
        }
    }
}
