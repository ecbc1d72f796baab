/// The RV32 registers the generator allocates.  `T0` is the expression
/// accumulator, `T1` a secondary operand, `T2` holds a struct pointer
/// across a field access, and `A(n)` carries arguments and results.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reg {
    Zero,
    Ra,
    Sp,
    Fp,
    T0,
    T1,
    T2,
    A(u8),
}

impl std::fmt::Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reg::Zero => f.write_str("zero"),
            Reg::Ra => f.write_str("ra"),
            Reg::Sp => f.write_str("sp"),
            Reg::Fp => f.write_str("fp"),
            Reg::T0 => f.write_str("t0"),
            Reg::T1 => f.write_str("t1"),
            Reg::T2 => f.write_str("t2"),
            Reg::A(n) => write!(f, "a{}", n),
        }
    }
}
