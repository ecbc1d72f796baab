use std::collections::HashMap;

use log::debug;

use crate::compiler::ast::{Program, Type};

use super::WORD_SIZE;

/// Resolved placement of one field within its struct's allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub ty: Type,
    pub offset: i32,
}

/// The complete layout of one struct: its total allocation size and
/// the placement of each field, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct StructLayout {
    pub name: String,
    pub size: i32,
    pub fields: Vec<FieldInfo>,
}

impl StructLayout {
    pub fn field_offset(&self, field: &str) -> Option<i32> {
        self.fields.iter().find(|f| f.name == field).map(|f| f.offset)
    }
}

/// Layouts for every struct in a program.
pub struct StructTable {
    layouts: HashMap<String, StructLayout>,
}

impl StructTable {
    /// Compute the layout of every struct in `program`.  The program
    /// must already have passed semantic analysis; field types that
    /// name a struct are references and so take one word like any
    /// other field.
    pub fn from_program(program: &Program) -> StructTable {
        let mut layouts = HashMap::new();
        for sd in &program.structs {
            let mut fields = vec![];
            let mut offset = 0;
            for field in &sd.fields {
                fields.push(FieldInfo {
                    name: field.name.clone(),
                    ty: field.ty.clone(),
                    offset,
                });
                offset += WORD_SIZE;
            }
            debug!("Struct {} occupies {} bytes", sd.name, offset);
            layouts.insert(
                sd.name.clone(),
                StructLayout {
                    name: sd.name.clone(),
                    size: offset,
                    fields,
                },
            );
        }
        StructTable { layouts }
    }

    pub fn get(&self, name: &str) -> Option<&StructLayout> {
        self.layouts.get(name)
    }

    /// Allocation size of a struct in bytes.  Unknown names fall back
    /// to one word so a caller holding a stale name still allocates
    /// something addressable.
    pub fn size_of(&self, name: &str) -> i32 {
        self.layouts.get(name).map_or(WORD_SIZE, |l| l.size)
    }
}

impl std::fmt::Display for StructTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.layouts.keys().collect();
        names.sort();
        for name in names {
            let layout = &self.layouts[name];
            writeln!(f, "{} ({} bytes)", layout.name, layout.size)?;
            for field in &layout.fields {
                writeln!(f, "  +{} {}: {}", field.offset, field.name, field.ty)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ast::{Declaration, StructDef};

    fn node_program() -> Program {
        Program::new(
            vec![StructDef::new(
                1,
                "Node",
                vec![
                    Declaration::new(1, "value", Type::Int),
                    Declaration::new(2, "flag", Type::Bool),
                    Declaration::new(3, "next", Type::Struct("Node".into())),
                ],
            )],
            vec![],
            vec![],
        )
    }

    #[test]
    fn test_fields_are_word_spaced_in_declaration_order() {
        let table = StructTable::from_program(&node_program());
        let layout = table.get("Node").unwrap();
        assert_eq!(layout.size, 12);
        assert_eq!(layout.field_offset("value"), Some(0));
        assert_eq!(layout.field_offset("flag"), Some(4));
        assert_eq!(layout.field_offset("next"), Some(8));
        assert_eq!(layout.field_offset("missing"), None);
    }

    #[test]
    fn test_size_of_unknown_struct_is_one_word() {
        let table = StructTable::from_program(&node_program());
        assert_eq!(table.size_of("Node"), 12);
        assert_eq!(table.size_of("Ghost"), WORD_SIZE);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let program = node_program();
        let a = StructTable::from_program(&program);
        let b = StructTable::from_program(&program);
        assert_eq!(a.get("Node"), b.get("Node"));
    }
}
