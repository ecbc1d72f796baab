/*!
Memory layout for the Mini back end.  Computes, from an analyzed
syntax tree, where every struct field lives relative to the start of
its heap allocation, and how many bytes each struct occupies.  Layout
is purely a function of declaration order: fields are laid out in the
order written, one word each.
*/
mod struct_table;

pub use struct_table::{FieldInfo, StructLayout, StructTable};

/// Size in bytes of every Mini value: ints, bools, and struct
/// references all occupy one 32-bit word.
pub const WORD_SIZE: i32 = 4;
