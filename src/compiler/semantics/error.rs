use crate::compiler::ast::{BinaryOperator, Type, UnaryOperator};

/// Errors generated during semantic analysis of a compilation unit.
#[derive(Clone, Debug, PartialEq)]
pub enum SemanticError {
    DuplicateStruct(String),
    DuplicateField(String),
    DuplicateGlobal(String),
    DuplicateFunction(String),
    DuplicateParameter(String),
    DuplicateLocal(String),
    UndefinedStruct(String),
    UndefinedVariable(String),
    UndefinedFunction(String),
    UndefinedField(String, String),
    AssignmentMismatch(Type, Type),
    CondExpectedBool(Type),
    OpExpectedInt(BinaryOperator),
    OpExpectedBool(BinaryOperator),
    EqualityMismatch(Type, Type),
    NullComparedToNonStruct(Type),
    UnaryExpectedInt(UnaryOperator, Type),
    UnaryExpectedBool(UnaryOperator, Type),
    DotExpectedStruct(Type),
    DeleteExpectedStruct(Type),
    PrintExpectedInt(Type),
    WrongNumberOfArgs(String, usize, usize),
    ArgNullToNonStruct(String, usize),
    ArgTypeMismatch(String, usize, Type, Type),
    ReturnTypeMismatch(Type, Type),
    ReturnValueFromVoid,
    ReturnValueRequired(Type),
    MissingReturn(String),
    MainNotFound,
    MainInvalidParams,
    MainInvalidType,
}

impl std::fmt::Display for SemanticError {
    /// Turn a SemanticError into a human readable message.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SemanticError::*;
        match self {
            DuplicateStruct(name) => write!(f, "Duplicate struct '{}'", name),
            DuplicateField(name) => write!(f, "Duplicate field '{}'", name),
            DuplicateGlobal(name) => write!(f, "Duplicate global '{}'", name),
            DuplicateFunction(name) => write!(f, "Duplicate function '{}'", name),
            DuplicateParameter(name) => write!(f, "Duplicate parameter '{}'", name),
            DuplicateLocal(name) => write!(f, "Duplicate local '{}'", name),
            UndefinedStruct(name) => write!(f, "Undefined struct '{}'", name),
            UndefinedVariable(name) => write!(f, "Undefined variable '{}'", name),
            UndefinedFunction(name) => write!(f, "Undefined function '{}'", name),
            UndefinedField(st, field) => {
                write!(f, "Struct {} has no field '{}'", st, field)
            }
            AssignmentMismatch(expected, actual) => write!(
                f,
                "Assignment expected {} but got {}",
                expected, actual
            ),
            CondExpectedBool(actual) => {
                write!(f, "Condition must be a bool, but got {}", actual)
            }
            OpExpectedInt(op) => write!(f, "{} requires int operands", op),
            OpExpectedBool(op) => write!(f, "{} requires bool operands", op),
            EqualityMismatch(l, r) => {
                write!(f, "Equality requires matching types, got {} and {}", l, r)
            }
            NullComparedToNonStruct(ty) => {
                write!(f, "Cannot compare null with non-struct {}", ty)
            }
            UnaryExpectedInt(op, ty) => write!(f, "{} expected int but found {}", op, ty),
            UnaryExpectedBool(op, ty) => write!(f, "{} expected bool but found {}", op, ty),
            DotExpectedStruct(ty) => {
                write!(f, "Dot operator requires a struct, but got {}", ty)
            }
            DeleteExpectedStruct(ty) => {
                write!(f, "delete requires a struct, but got {}", ty)
            }
            PrintExpectedInt(ty) => write!(f, "print requires an int, but got {}", ty),
            WrongNumberOfArgs(name, expected, actual) => write!(
                f,
                "Wrong number of arguments to '{}': expected {} but got {}",
                name, expected, actual
            ),
            ArgNullToNonStruct(name, pos) => write!(
                f,
                "Cannot pass null for non-struct parameter {} of '{}'",
                pos, name
            ),
            ArgTypeMismatch(name, pos, expected, actual) => write!(
                f,
                "Parameter {} of '{}' expected {} but got {}",
                pos, name, expected, actual
            ),
            ReturnTypeMismatch(expected, actual) => write!(
                f,
                "Return expected {} but got {}",
                expected, actual
            ),
            ReturnValueFromVoid => f.write_str("Void function cannot return a value"),
            ReturnValueRequired(expected) => {
                write!(f, "Non-void function must return {}", expected)
            }
            MissingReturn(name) => write!(f, "Missing return statement in '{}'", name),
            MainNotFound => f.write_str("main() function is missing"),
            MainInvalidParams => f.write_str("main() function takes no arguments"),
            MainInvalidType => f.write_str("main() must return an int"),
        }
    }
}
