use super::registers::Reg;

/// One line of the output module.  Instructions are indented, labels
/// and directives sit in column zero, comments carry placeholder and
/// annotation text.
#[derive(Clone, Debug, PartialEq)]
pub enum Assembly {
    Directive(String),
    Label(String),
    Inst(Inst),
    Comment(String),
    Blank,
}

/// The instruction subset the generator emits.  Loads and stores are
/// `(register, offset, base)` to read like the assembly they print.
#[derive(Clone, Debug, PartialEq)]
pub enum Inst {
    Li(Reg, i32),
    LiChar(Reg, char),
    La(Reg, String),
    Lw(Reg, i32, Reg),
    Sw(Reg, i32, Reg),
    Mv(Reg, Reg),
    Addi(Reg, Reg, i32),
    Add(Reg, Reg, Reg),
    Sub(Reg, Reg, Reg),
    Mul(Reg, Reg, Reg),
    Div(Reg, Reg, Reg),
    Slt(Reg, Reg, Reg),
    And(Reg, Reg, Reg),
    Or(Reg, Reg, Reg),
    Xori(Reg, Reg, i32),
    Seqz(Reg, Reg),
    Snez(Reg, Reg),
    Neg(Reg, Reg),
    Beq(Reg, Reg, String),
    J(String),
    Jal(String),
    Jr(Reg),
}

impl std::fmt::Display for Inst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Inst::*;
        match self {
            Li(rd, imm) => write!(f, "li {}, {}", rd, imm),
            LiChar(rd, '\n') => write!(f, "li {}, '\\n'", rd),
            LiChar(rd, c) => write!(f, "li {}, '{}'", rd, c),
            La(rd, label) => write!(f, "la {}, {}", rd, label),
            Lw(rd, offset, base) => write!(f, "lw {}, {}({})", rd, offset, base),
            Sw(rs, offset, base) => write!(f, "sw {}, {}({})", rs, offset, base),
            Mv(rd, rs) => write!(f, "mv {}, {}", rd, rs),
            Addi(rd, rs, imm) => write!(f, "addi {}, {}, {}", rd, rs, imm),
            Add(rd, a, b) => write!(f, "add {}, {}, {}", rd, a, b),
            Sub(rd, a, b) => write!(f, "sub {}, {}, {}", rd, a, b),
            Mul(rd, a, b) => write!(f, "mul {}, {}, {}", rd, a, b),
            Div(rd, a, b) => write!(f, "div {}, {}, {}", rd, a, b),
            Slt(rd, a, b) => write!(f, "slt {}, {}, {}", rd, a, b),
            And(rd, a, b) => write!(f, "and {}, {}, {}", rd, a, b),
            Or(rd, a, b) => write!(f, "or {}, {}, {}", rd, a, b),
            Xori(rd, rs, imm) => write!(f, "xori {}, {}, {}", rd, rs, imm),
            Seqz(rd, rs) => write!(f, "seqz {}, {}", rd, rs),
            Snez(rd, rs) => write!(f, "snez {}, {}", rd, rs),
            Neg(rd, rs) => write!(f, "neg {}, {}", rd, rs),
            Beq(a, b, label) => write!(f, "beq {}, {}, {}", a, b, label),
            J(label) => write!(f, "j {}", label),
            Jal(label) => write!(f, "jal {}", label),
            Jr(rs) => write!(f, "jr {}", rs),
        }
    }
}

impl std::fmt::Display for Assembly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Assembly::Directive(text) => f.write_str(text),
            Assembly::Label(label) => write!(f, "{}:", label),
            Assembly::Inst(inst) => write!(f, "    {}", inst),
            Assembly::Comment(text) => write!(f, "    # {}", text),
            Assembly::Blank => Ok(()),
        }
    }
}
