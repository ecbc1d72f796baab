use serde::{Deserialize, Serialize};

use super::expression::Expression;

/// The closed set of Mini statements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Block {
        line: u32,
        statements: Vec<Statement>,
    },
    Assignment {
        line: u32,
        target: LValue,
        source: Expression,
    },
    Conditional {
        line: u32,
        guard: Expression,
        then_block: Box<Statement>,
        else_block: Option<Box<Statement>>,
    },
    While {
        line: u32,
        guard: Expression,
        body: Box<Statement>,
    },
    Delete {
        line: u32,
        expr: Expression,
    },
    Invocation {
        line: u32,
        expr: Expression,
    },
    Print {
        line: u32,
        expr: Expression,
    },
    Println {
        line: u32,
        expr: Expression,
    },
    Return {
        line: u32,
        expr: Expression,
    },
    ReturnEmpty {
        line: u32,
    },
}

impl Statement {
    pub fn line(&self) -> u32 {
        use Statement::*;
        match self {
            Block { line, .. }
            | Assignment { line, .. }
            | Conditional { line, .. }
            | While { line, .. }
            | Delete { line, .. }
            | Invocation { line, .. }
            | Print { line, .. }
            | Println { line, .. }
            | Return { line, .. }
            | ReturnEmpty { line } => *line,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(
            self,
            Statement::Return { .. } | Statement::ReturnEmpty { .. }
        )
    }
}

/// The closed set of assignment targets: a plain variable or a struct
/// field reached through one or more dot accesses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LValue {
    Id {
        line: u32,
        id: String,
    },
    Dot {
        line: u32,
        left: Box<LValue>,
        field: String,
    },
}

impl LValue {
    pub fn line(&self) -> u32 {
        match self {
            LValue::Id { line, .. } | LValue::Dot { line, .. } => *line,
        }
    }
}
