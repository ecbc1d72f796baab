use serde::{Deserialize, Serialize};

/// The type of a Mini value.  One shared model is used by both the
/// semantic analyzer and the code generator: an accepted program must
/// never be mis-generated, so the two passes cannot disagree on what a
/// type means.
///
/// `Null` is the type of the `null` literal only; it never appears in a
/// declaration.  Struct values are always heap references, so a
/// struct-typed variable or field occupies one machine word.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Type {
    Int,
    Bool,
    Void,
    Struct(String),
    Null,
}

impl Type {
    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct(_))
    }

    /// Whether a value of type `source` may be assigned to (or passed
    /// for, or returned as) a target of type `self`.  Types are nominal:
    /// each kind is compatible only with itself, except that `null` is
    /// accepted wherever a struct is expected.
    pub fn assignable_from(&self, source: &Type) -> bool {
        match (self, source) {
            (Type::Struct(_), Type::Null) => true,
            _ => self == source,
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::Bool => f.write_str("bool"),
            Type::Void => f.write_str("void"),
            Type::Struct(name) => write!(f, "struct {}", name),
            Type::Null => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_types_match_only_themselves() {
        for (target, source, expected) in vec![
            (Type::Int, Type::Int, true),
            (Type::Bool, Type::Bool, true),
            (Type::Int, Type::Bool, false),
            (Type::Bool, Type::Int, false),
            (Type::Int, Type::Null, false),
            (Type::Bool, Type::Null, false),
        ] {
            assert_eq!(target.assignable_from(&source), expected);
        }
    }

    #[test]
    fn test_struct_types_are_nominal() {
        let a = Type::Struct("A".into());
        let b = Type::Struct("B".into());
        assert!(a.assignable_from(&a));
        assert!(!a.assignable_from(&b));
        assert!(a.assignable_from(&Type::Null));
        assert!(!Type::Null.assignable_from(&a));
    }
}
