/*!
RISC-V code generation.  Converts an analyzed Mini syntax tree into a
textual RV32 assembly module targeting the course runtime (`exit`,
`sbrk`, `print_int`, `print_char` from `berkeley_utils.s`, `read_int`
from `read_int.s`).

The generator is a straight tree walk with a single accumulator
register.  It assumes the tree has already been certified by the
semantic analyzer; the only failures it can hit are resolution gaps,
and those emit a marked placeholder instead of aborting so the rest of
the module still comes out.
*/
mod assembly;
mod codegen;
mod registers;

pub use assembly::{Assembly, Inst};
pub use codegen::CodeGen;
pub use registers::Reg;
