use serde::{Deserialize, Serialize};

use super::function::Declaration;

/// A struct declaration: a name and an ordered list of fields.  A field
/// whose type names a struct is a reference (one word), never an inline
/// embedding, which is what makes self-referential definitions such as a
/// linked-list node representable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    pub line: u32,
    pub name: String,
    pub fields: Vec<Declaration>,
}

impl StructDef {
    pub fn new(line: u32, name: &str, fields: Vec<Declaration>) -> StructDef {
        StructDef {
            line,
            name: name.into(),
            fields,
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&Declaration> {
        self.fields.iter().find(|f| f.name == name)
    }
}
