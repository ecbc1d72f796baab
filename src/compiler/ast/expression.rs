use serde::{Deserialize, Serialize};

/// The closed set of Mini expressions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Integer {
        line: u32,
        value: i32,
    },
    True {
        line: u32,
    },
    False {
        line: u32,
    },
    Null {
        line: u32,
    },
    Read {
        line: u32,
    },
    Identifier {
        line: u32,
        id: String,
    },
    Dot {
        line: u32,
        left: Box<Expression>,
        field: String,
    },
    Unary {
        line: u32,
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        line: u32,
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Call {
        line: u32,
        name: String,
        args: Vec<Expression>,
    },
    New {
        line: u32,
        name: String,
    },
}

impl Expression {
    pub fn line(&self) -> u32 {
        use Expression::*;
        match self {
            Integer { line, .. }
            | True { line }
            | False { line }
            | Null { line }
            | Read { line }
            | Identifier { line, .. }
            | Dot { line, .. }
            | Unary { line, .. }
            | Binary { line, .. }
            | Call { line, .. }
            | New { line, .. } => *line,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Ls,
    LsEq,
    Gr,
    GrEq,
    Eq,
    NEq,
    BAnd,
    BOr,
}

impl BinaryOperator {
    pub fn is_arithmetic(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, Add | Sub | Mul | Div)
    }

    pub fn is_relational(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, Ls | LsEq | Gr | GrEq)
    }

    pub fn is_equality(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, Eq | NEq)
    }

    pub fn is_logical(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, BAnd | BOr)
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        use BinaryOperator::*;
        match self {
            Add => f.write_str("+"),
            Sub => f.write_str("-"),
            Mul => f.write_str("*"),
            Div => f.write_str("/"),
            Ls => f.write_str("<"),
            LsEq => f.write_str("<="),
            Gr => f.write_str(">"),
            GrEq => f.write_str(">="),
            Eq => f.write_str("=="),
            NEq => f.write_str("!="),
            BAnd => f.write_str("&&"),
            BOr => f.write_str("||"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            UnaryOperator::Negate => f.write_str("-"),
            UnaryOperator::Not => f.write_str("!"),
        }
    }
}
