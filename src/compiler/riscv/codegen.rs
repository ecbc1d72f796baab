/*
 * Tree-walking code generator.  Every expression leaves its value in
 * the accumulator t0; binary operators spill the left operand to a
 * scratch stack word while the right side is computed.  Each function
 * owns one frame: saved ra/fp, then one word per parameter and local
 * at -4, -8, ... from fp.  Return statements carry their own complete
 * epilogue, so control never falls through one.
 */
use std::collections::HashMap;
use std::io;

use log::debug;

use crate::compiler::ast::{
    BinaryOperator, Expression, FunctionDef, LValue, Program, Statement, Type, UnaryOperator,
    MAIN_FN,
};
use crate::compiler::memory::{StructTable, WORD_SIZE};

use super::assembly::{Assembly, Inst};
use super::registers::Reg;

pub struct CodeGen<'a> {
    output: Vec<Assembly>,
    label_counter: u32,
    structs: &'a StructTable,
    globals: HashMap<String, String>,
    locals: HashMap<String, i32>,
    global_types: HashMap<String, Type>,
    local_types: HashMap<String, Type>,
    current_function: String,
    frame_size: i32,
    uses_read: bool,
}

impl<'a> CodeGen<'a> {
    /// Generate a complete assembly module for `program`.  The tree
    /// must already have passed semantic analysis.
    pub fn compile(program: &Program, structs: &'a StructTable) -> CodeGen<'a> {
        let mut cg = CodeGen {
            output: vec![],
            label_counter: 0,
            structs,
            globals: HashMap::new(),
            locals: HashMap::new(),
            global_types: HashMap::new(),
            local_types: HashMap::new(),
            current_function: String::new(),
            frame_size: 0,
            uses_read: uses_read(program),
        };
        cg.program(program);
        cg
    }

    /// The finished module as text.
    pub fn text(&self) -> String {
        let lines: Vec<String> = self.output.iter().map(|line| line.to_string()).collect();
        lines.join("\n")
    }

    pub fn print(&self, w: &mut dyn io::Write) -> io::Result<()> {
        for line in &self.output {
            writeln!(w, "{}", line)?;
        }
        Ok(())
    }

    fn emit(&mut self, inst: Inst) {
        self.output.push(Assembly::Inst(inst));
    }

    fn label(&mut self, prefix: &str) -> String {
        let label = format!("{}{}", prefix, self.label_counter);
        self.label_counter += 1;
        label
    }

    fn program(&mut self, program: &Program) {
        self.output.push(Assembly::Directive(".globl main".into()));
        // berkeley_utils must come first; read_int depends on it.
        self.output
            .push(Assembly::Directive(".import berkeley_utils.s".into()));
        if self.uses_read {
            self.output
                .push(Assembly::Directive(".import read_int.s".into()));
        }

        self.output.push(Assembly::Blank);
        self.output.push(Assembly::Directive(".data".into()));
        if self.uses_read {
            self.output
                .push(Assembly::Directive("input_file_ptr: .space 4".into()));
        }
        for g in &program.globals {
            let label = format!("global_{}", g.name);
            self.output
                .push(Assembly::Directive(format!("{}: .space {}", label, WORD_SIZE)));
            self.globals.insert(g.name.clone(), label);
            self.global_types.insert(g.name.clone(), g.ty.clone());
        }

        self.output.push(Assembly::Blank);
        self.output.push(Assembly::Directive(".text".into()));
        self.output.push(Assembly::Blank);

        for fun in &program.functions {
            self.function(fun);
        }
    }

    fn function(&mut self, fun: &FunctionDef) {
        debug!("Generating {}", fun.name);
        self.current_function = fun.name.clone();
        self.locals.clear();
        self.local_types.clear();

        self.output.push(Assembly::Label(fun.name.clone()));
        self.emit(Inst::Addi(Reg::Sp, Reg::Sp, -8));
        self.emit(Inst::Sw(Reg::Ra, 4, Reg::Sp));
        self.emit(Inst::Sw(Reg::Fp, 0, Reg::Sp));
        self.emit(Inst::Addi(Reg::Fp, Reg::Sp, 0));

        if fun.name == MAIN_FN && self.uses_read {
            // The loader passes argv in a1; slot 1 is the input file
            // handle.
            self.output
                .push(Assembly::Comment("Save input filename".into()));
            self.emit(Inst::Lw(Reg::T0, 4, Reg::A(1)));
            self.emit(Inst::La(Reg::T1, "input_file_ptr".into()));
            self.emit(Inst::Sw(Reg::T0, 0, Reg::T1));
        }

        let mut offset = 0;
        for decl in fun.params.iter().chain(fun.locals.iter()) {
            offset -= WORD_SIZE;
            self.locals.insert(decl.name.clone(), offset);
            self.local_types.insert(decl.name.clone(), decl.ty.clone());
        }
        self.frame_size = -offset;

        if self.frame_size > 0 {
            self.emit(Inst::Addi(Reg::Sp, Reg::Sp, -self.frame_size));
        }
        for (i, param) in fun.params.iter().enumerate().take(8) {
            let off = self.locals[&param.name];
            self.emit(Inst::Sw(Reg::A(i as u8), off, Reg::Fp));
        }

        for stm in &fun.body {
            self.statement(stm);
        }

        // Safety net for bodies that do not end in a return; analysis
        // only lets Void functions fall off the end.
        if !fun.body.last().map_or(false, |s| s.is_return()) {
            self.output.push(Assembly::Comment("Implicit return".into()));
            self.epilogue();
            if fun.name == MAIN_FN {
                self.emit(Inst::Li(Reg::A(0), 0));
                self.emit(Inst::Jal("exit".into()));
            } else {
                self.emit(Inst::Jr(Reg::Ra));
            }
        }

        self.output.push(Assembly::Blank);
        self.current_function.clear();
    }

    /// Unwind the current frame: locals, then saved fp/ra.  The caller
    /// appends the actual transfer of control.
    fn epilogue(&mut self) {
        if self.frame_size > 0 {
            self.emit(Inst::Addi(Reg::Sp, Reg::Sp, self.frame_size));
        }
        self.emit(Inst::Lw(Reg::Fp, 0, Reg::Sp));
        self.emit(Inst::Lw(Reg::Ra, 4, Reg::Sp));
        self.emit(Inst::Addi(Reg::Sp, Reg::Sp, 8));
    }

    fn statement(&mut self, stm: &Statement) {
        match stm {
            Statement::Block { statements, .. } => {
                for s in statements {
                    self.statement(s);
                }
            }
            Statement::Assignment { target, source, .. } => {
                self.expression(source);
                self.emit(Inst::Mv(Reg::T1, Reg::T0));
                self.lvalue_address(target);
                self.emit(Inst::Sw(Reg::T1, 0, Reg::T0));
            }
            Statement::Conditional {
                guard,
                then_block,
                else_block,
                ..
            } => {
                let else_label = self.label("else");
                let end_label = self.label("endif");

                self.expression(guard);
                self.emit(Inst::Beq(Reg::T0, Reg::Zero, else_label.clone()));
                self.statement(then_block);
                self.emit(Inst::J(end_label.clone()));
                self.output.push(Assembly::Label(else_label));
                if let Some(els) = else_block {
                    self.statement(els);
                }
                self.output.push(Assembly::Label(end_label));
            }
            Statement::While { guard, body, .. } => {
                let start_label = self.label("while_start");
                let end_label = self.label("while_end");

                self.output.push(Assembly::Label(start_label.clone()));
                self.expression(guard);
                self.emit(Inst::Beq(Reg::T0, Reg::Zero, end_label.clone()));
                self.statement(body);
                self.emit(Inst::J(start_label));
                self.output.push(Assembly::Label(end_label));
            }
            Statement::Delete { expr, .. } => {
                // The bump allocator never reclaims; evaluate for
                // effect only.
                self.expression(expr);
            }
            Statement::Invocation { expr, .. } => {
                self.expression(expr);
            }
            Statement::Print { expr, .. } => {
                self.expression(expr);
                self.emit(Inst::Mv(Reg::A(0), Reg::T0));
                self.emit(Inst::Jal("print_int".into()));
            }
            Statement::Println { expr, .. } => {
                self.expression(expr);
                self.emit(Inst::Mv(Reg::A(0), Reg::T0));
                self.emit(Inst::Jal("print_int".into()));
                self.emit(Inst::LiChar(Reg::A(0), '\n'));
                self.emit(Inst::Jal("print_char".into()));
            }
            Statement::Return { expr, .. } => {
                self.expression(expr);
                self.emit(Inst::Mv(Reg::A(0), Reg::T0));
                self.epilogue();
                if self.current_function == MAIN_FN {
                    self.emit(Inst::Jal("exit".into()));
                } else {
                    self.emit(Inst::Jr(Reg::Ra));
                }
            }
            Statement::ReturnEmpty { .. } => {
                self.epilogue();
                if self.current_function == MAIN_FN {
                    self.emit(Inst::Li(Reg::A(0), 0));
                    self.emit(Inst::Jal("exit".into()));
                } else {
                    self.emit(Inst::Jr(Reg::Ra));
                }
            }
        }
    }

    fn expression(&mut self, exp: &Expression) {
        match exp {
            Expression::Integer { value, .. } => self.emit(Inst::Li(Reg::T0, *value)),
            Expression::True { .. } => self.emit(Inst::Li(Reg::T0, 1)),
            Expression::False { .. } | Expression::Null { .. } => {
                self.emit(Inst::Li(Reg::T0, 0))
            }
            Expression::Read { .. } => {
                self.emit(Inst::La(Reg::T0, "input_file_ptr".into()));
                self.emit(Inst::Lw(Reg::A(0), 0, Reg::T0));
                self.emit(Inst::Jal("read_int".into()));
                self.emit(Inst::Mv(Reg::T0, Reg::A(0)));
            }
            Expression::Identifier { id, .. } => self.load_variable(id),
            Expression::Dot { left, field, .. } => self.field_read(left, field),
            Expression::Unary { op, operand, .. } => {
                self.expression(operand);
                match op {
                    UnaryOperator::Negate => self.emit(Inst::Neg(Reg::T0, Reg::T0)),
                    UnaryOperator::Not => self.emit(Inst::Seqz(Reg::T0, Reg::T0)),
                }
            }
            Expression::Binary {
                op, left, right, ..
            } => {
                self.expression(left);
                self.emit(Inst::Addi(Reg::Sp, Reg::Sp, -WORD_SIZE));
                self.emit(Inst::Sw(Reg::T0, 0, Reg::Sp));
                self.expression(right);
                self.emit(Inst::Mv(Reg::T1, Reg::T0));
                self.emit(Inst::Lw(Reg::T0, 0, Reg::Sp));
                self.emit(Inst::Addi(Reg::Sp, Reg::Sp, WORD_SIZE));
                self.binary_op(*op);
            }
            Expression::Call { name, args, .. } => self.call(name, args),
            Expression::New { name, .. } => {
                let size = self.structs.size_of(name);
                self.emit(Inst::Li(Reg::A(0), size));
                self.emit(Inst::Jal("sbrk".into()));
                self.emit(Inst::Mv(Reg::T0, Reg::A(0)));
            }
        }
    }

    /// Combine t0 (left) and t1 (right) into t0.
    fn binary_op(&mut self, op: BinaryOperator) {
        use BinaryOperator::*;
        match op {
            Add => self.emit(Inst::Add(Reg::T0, Reg::T0, Reg::T1)),
            Sub => self.emit(Inst::Sub(Reg::T0, Reg::T0, Reg::T1)),
            Mul => self.emit(Inst::Mul(Reg::T0, Reg::T0, Reg::T1)),
            Div => self.emit(Inst::Div(Reg::T0, Reg::T0, Reg::T1)),
            Ls => self.emit(Inst::Slt(Reg::T0, Reg::T0, Reg::T1)),
            Gr => self.emit(Inst::Slt(Reg::T0, Reg::T1, Reg::T0)),
            LsEq => {
                self.emit(Inst::Slt(Reg::T0, Reg::T1, Reg::T0));
                self.emit(Inst::Xori(Reg::T0, Reg::T0, 1));
            }
            GrEq => {
                self.emit(Inst::Slt(Reg::T0, Reg::T0, Reg::T1));
                self.emit(Inst::Xori(Reg::T0, Reg::T0, 1));
            }
            Eq => {
                self.emit(Inst::Sub(Reg::T0, Reg::T0, Reg::T1));
                self.emit(Inst::Seqz(Reg::T0, Reg::T0));
            }
            NEq => {
                self.emit(Inst::Sub(Reg::T0, Reg::T0, Reg::T1));
                self.emit(Inst::Snez(Reg::T0, Reg::T0));
            }
            BAnd => {
                self.emit(Inst::And(Reg::T0, Reg::T0, Reg::T1));
                self.emit(Inst::Snez(Reg::T0, Reg::T0));
            }
            BOr => {
                self.emit(Inst::Or(Reg::T0, Reg::T0, Reg::T1));
                self.emit(Inst::Snez(Reg::T0, Reg::T0));
            }
        }
    }

    fn load_variable(&mut self, name: &str) {
        if let Some(&offset) = self.locals.get(name) {
            self.emit(Inst::Lw(Reg::T0, offset, Reg::Fp));
        } else if let Some(label) = self.globals.get(name).cloned() {
            self.emit(Inst::La(Reg::T1, label));
            self.emit(Inst::Lw(Reg::T0, 0, Reg::T1));
        } else {
            self.output
                .push(Assembly::Comment(format!("ERROR: Unknown variable {}", name)));
            self.emit(Inst::Li(Reg::T0, 0));
        }
    }

    fn field_read(&mut self, base: &Expression, field: &str) {
        self.expression(base);
        self.emit(Inst::Mv(Reg::T2, Reg::T0));

        match self.field_offset_of(base, field) {
            FieldOffset::Known(offset) => {
                self.emit(Inst::Lw(Reg::T0, offset, Reg::T2));
            }
            FieldOffset::NoSuchField(struct_name) => {
                self.output.push(Assembly::Comment(format!(
                    "ERROR: Field {} not found in struct {}",
                    field, struct_name
                )));
                self.emit(Inst::Li(Reg::T0, 0));
            }
            FieldOffset::UnknownBase => {
                // Offset of a field reached through a chained dot is
                // not tracked; fall back to the first slot.
                self.output.push(Assembly::Comment(format!(
                    "Load field {} (unknown struct type)",
                    field
                )));
                self.emit(Inst::Lw(Reg::T0, 0, Reg::T2));
            }
        }
    }

    /// Field offset via the static type of the base.  Only a direct
    /// variable base resolves; chained dots do not carry a type here.
    fn field_offset_of(&self, base: &Expression, field: &str) -> FieldOffset {
        let name = match base {
            Expression::Identifier { id, .. } => id,
            _ => return FieldOffset::UnknownBase,
        };
        match self.static_struct_of(name) {
            Some(struct_name) => match self
                .structs
                .get(&struct_name)
                .and_then(|layout| layout.field_offset(field))
            {
                Some(offset) => FieldOffset::Known(offset),
                None => FieldOffset::NoSuchField(struct_name),
            },
            None => FieldOffset::UnknownBase,
        }
    }

    fn static_struct_of(&self, name: &str) -> Option<String> {
        let ty = self
            .local_types
            .get(name)
            .or_else(|| self.global_types.get(name))?;
        match ty {
            Type::Struct(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn call(&mut self, name: &str, args: &[Expression]) {
        // Arguments are staged through a stack buffer so an argument
        // expression containing its own call cannot clobber a0..a7
        // mid-sequence.
        let buffer = args.len() as i32 * WORD_SIZE;
        if buffer > 0 {
            self.emit(Inst::Addi(Reg::Sp, Reg::Sp, -buffer));
        }
        for (i, arg) in args.iter().enumerate() {
            self.expression(arg);
            self.emit(Inst::Sw(Reg::T0, i as i32 * WORD_SIZE, Reg::Sp));
        }
        for i in 0..args.len() {
            if i < 8 {
                self.emit(Inst::Lw(Reg::A(i as u8), i as i32 * WORD_SIZE, Reg::Sp));
            } else {
                self.output.push(Assembly::Comment(format!(
                    "ERROR: argument {} of call to {} exceeds the eight-register limit",
                    i, name
                )));
            }
        }
        if buffer > 0 {
            self.emit(Inst::Addi(Reg::Sp, Reg::Sp, buffer));
        }
        self.emit(Inst::Jal(name.into()));
        self.emit(Inst::Mv(Reg::T0, Reg::A(0)));
    }

    /// Leave the address of `lv` in t0.
    fn lvalue_address(&mut self, lv: &LValue) {
        match lv {
            LValue::Id { id, .. } => {
                if let Some(&offset) = self.locals.get(id) {
                    self.emit(Inst::Addi(Reg::T0, Reg::Fp, offset));
                } else if let Some(label) = self.globals.get(id).cloned() {
                    self.emit(Inst::La(Reg::T0, label));
                } else {
                    self.output
                        .push(Assembly::Comment(format!("ERROR: Unknown variable {}", id)));
                    self.emit(Inst::Li(Reg::T0, 0));
                }
            }
            LValue::Dot { left, field, .. } => {
                // The base is a pointer value, not an address: load it.
                match left.as_ref() {
                    LValue::Id { id, .. } => {
                        if let Some(&offset) = self.locals.get(id) {
                            self.emit(Inst::Lw(Reg::T0, offset, Reg::Fp));
                        } else if let Some(label) = self.globals.get(id).cloned() {
                            self.emit(Inst::La(Reg::T1, label));
                            self.emit(Inst::Lw(Reg::T0, 0, Reg::T1));
                        } else {
                            self.output.push(Assembly::Comment(format!(
                                "ERROR: Unknown variable {}",
                                id
                            )));
                            self.emit(Inst::Li(Reg::T0, 0));
                        }
                    }
                    nested => self.lvalue_address(nested),
                }

                if let LValue::Id { id, .. } = left.as_ref() {
                    if let Some(struct_name) = self.static_struct_of(id) {
                        if let Some(offset) = self
                            .structs
                            .get(&struct_name)
                            .and_then(|layout| layout.field_offset(field))
                        {
                            self.emit(Inst::Addi(Reg::T0, Reg::T0, offset));
                            return;
                        }
                    }
                }
                self.output.push(Assembly::Comment(format!(
                    "ERROR: Field {} address (offset unknown)",
                    field
                )));
            }
        }
    }
}

enum FieldOffset {
    Known(i32),
    NoSuchField(String),
    UnknownBase,
}

/// Whole-program scan for `read` expressions; decides the `read_int`
/// import and the `input_file_ptr` data slot.
fn uses_read(program: &Program) -> bool {
    program
        .functions
        .iter()
        .any(|f| f.body.iter().any(statement_reads))
}

fn statement_reads(stm: &Statement) -> bool {
    match stm {
        Statement::Block { statements, .. } => statements.iter().any(statement_reads),
        Statement::Assignment { source, .. } => expression_reads(source),
        Statement::Conditional {
            guard,
            then_block,
            else_block,
            ..
        } => {
            expression_reads(guard)
                || statement_reads(then_block)
                || else_block.as_ref().map_or(false, |e| statement_reads(e))
        }
        Statement::While { guard, body, .. } => {
            expression_reads(guard) || statement_reads(body)
        }
        Statement::Delete { expr, .. }
        | Statement::Invocation { expr, .. }
        | Statement::Print { expr, .. }
        | Statement::Println { expr, .. }
        | Statement::Return { expr, .. } => expression_reads(expr),
        Statement::ReturnEmpty { .. } => false,
    }
}

fn expression_reads(exp: &Expression) -> bool {
    match exp {
        Expression::Read { .. } => true,
        Expression::Dot { left, .. } => expression_reads(left),
        Expression::Unary { operand, .. } => expression_reads(operand),
        Expression::Binary { left, right, .. } => {
            expression_reads(left) || expression_reads(right)
        }
        Expression::Call { args, .. } => args.iter().any(expression_reads),
        Expression::Integer { .. }
        | Expression::True { .. }
        | Expression::False { .. }
        | Expression::Null { .. }
        | Expression::Identifier { .. }
        | Expression::New { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ast::{Declaration, Program, StructDef};

    fn int_lit(value: i32) -> Expression {
        Expression::Integer { line: 1, value }
    }

    fn id(name: &str) -> Expression {
        Expression::Identifier {
            line: 1,
            id: name.into(),
        }
    }

    fn assign(target: &str, source: Expression) -> Statement {
        Statement::Assignment {
            line: 1,
            target: LValue::Id {
                line: 1,
                id: target.into(),
            },
            source,
        }
    }

    fn ret(expr: Expression) -> Statement {
        Statement::Return { line: 1, expr }
    }

    fn main_fn(locals: Vec<Declaration>, body: Vec<Statement>) -> FunctionDef {
        FunctionDef::new(1, MAIN_FN, vec![], Type::Int, locals, body)
    }

    fn generate(program: Program) -> String {
        let table = StructTable::from_program(&program);
        CodeGen::compile(&program, &table).text()
    }

    #[test]
    fn test_global_assignment() {
        let text = generate(Program::new(
            vec![],
            vec![Declaration::new(1, "total", Type::Int)],
            vec![main_fn(vec![], vec![assign("total", int_lit(3)), ret(int_lit(0))])],
        ));
        assert!(text.contains("global_total: .space 4"));
        assert!(text.contains("li t0, 3"));
        assert!(text.contains("mv t1, t0"));
        assert!(text.contains("la t0, global_total"));
        assert!(text.contains("sw t1, 0(t0)"));
    }

    #[test]
    fn test_prologue_frame_and_main_exit() {
        let text = generate(Program::new(
            vec![],
            vec![],
            vec![main_fn(
                vec![Declaration::new(1, "x", Type::Int)],
                vec![assign("x", int_lit(1)), ret(id("x"))],
            )],
        ));
        assert!(text.contains("main:"));
        assert!(text.contains("addi sp, sp, -8\n    sw ra, 4(sp)\n    sw fp, 0(sp)\n    addi fp, sp, 0"));
        // One word reserved for the local, released by the epilogue.
        assert!(text.contains("addi sp, sp, -4"));
        assert!(text.contains("addi sp, sp, 4\n    lw fp, 0(sp)\n    lw ra, 4(sp)\n    addi sp, sp, 8\n    jal exit"));
    }

    #[test]
    fn test_non_main_returns_through_ra() {
        let f = FunctionDef::new(
            1,
            "f",
            vec![Declaration::new(1, "a", Type::Int)],
            Type::Int,
            vec![],
            vec![ret(id("a"))],
        );
        let text = generate(Program::new(
            vec![],
            vec![],
            vec![f, main_fn(vec![], vec![ret(int_lit(0))])],
        ));
        // Parameter spilled to its frame slot on entry.
        assert!(text.contains("sw a0, -4(fp)"));
        assert!(text.contains("lw t0, -4(fp)"));
        assert!(text.contains("jr ra"));
    }

    #[test]
    fn test_operator_selection() {
        for (op, expected) in vec![
            (BinaryOperator::Add, "add t0, t0, t1"),
            (BinaryOperator::Sub, "sub t0, t0, t1"),
            (BinaryOperator::Mul, "mul t0, t0, t1"),
            (BinaryOperator::Div, "div t0, t0, t1"),
            (BinaryOperator::Ls, "slt t0, t0, t1"),
            (BinaryOperator::Gr, "slt t0, t1, t0"),
            (BinaryOperator::LsEq, "slt t0, t1, t0\n    xori t0, t0, 1"),
            (BinaryOperator::GrEq, "slt t0, t0, t1\n    xori t0, t0, 1"),
            (BinaryOperator::Eq, "sub t0, t0, t1\n    seqz t0, t0"),
            (BinaryOperator::NEq, "sub t0, t0, t1\n    snez t0, t0"),
            (BinaryOperator::BAnd, "and t0, t0, t1\n    snez t0, t0"),
            (BinaryOperator::BOr, "or t0, t0, t1\n    snez t0, t0"),
        ] {
            let text = generate(Program::new(
                vec![],
                vec![Declaration::new(1, "g", Type::Int)],
                vec![main_fn(
                    vec![],
                    vec![
                        assign(
                            "g",
                            Expression::Binary {
                                line: 1,
                                op,
                                left: Box::new(int_lit(1)),
                                right: Box::new(int_lit(2)),
                            },
                        ),
                        ret(int_lit(0)),
                    ],
                )],
            ));
            assert!(text.contains(expected), "{:?}: {}", op, text);
        }
    }

    #[test]
    fn test_binary_spills_left_operand() {
        let text = generate(Program::new(
            vec![],
            vec![Declaration::new(1, "g", Type::Int)],
            vec![main_fn(
                vec![],
                vec![
                    assign(
                        "g",
                        Expression::Binary {
                            line: 1,
                            op: BinaryOperator::Sub,
                            left: Box::new(int_lit(7)),
                            right: Box::new(int_lit(2)),
                        },
                    ),
                    ret(int_lit(0)),
                ],
            )],
        ));
        let expected = "li t0, 7\n    addi sp, sp, -4\n    sw t0, 0(sp)\n    li t0, 2\n    mv t1, t0\n    lw t0, 0(sp)\n    addi sp, sp, 4\n    sub t0, t0, t1";
        assert!(text.contains(expected), "{}", text);
    }

    #[test]
    fn test_labels_never_repeat() {
        let cond = |line: u32| Statement::Conditional {
            line,
            guard: Expression::True { line },
            then_block: Box::new(Statement::Block {
                line,
                statements: vec![],
            }),
            else_block: None,
        };
        let text = generate(Program::new(
            vec![],
            vec![],
            vec![main_fn(vec![], vec![cond(1), cond(2), ret(int_lit(0))])],
        ));
        assert!(text.contains("beq t0, zero, else0"));
        assert!(text.contains("else0:"));
        assert!(text.contains("endif1:"));
        assert!(text.contains("beq t0, zero, else2"));
        assert!(text.contains("else2:"));
        assert!(text.contains("endif3:"));
    }

    #[test]
    fn test_while_loop_shape() {
        let text = generate(Program::new(
            vec![],
            vec![],
            vec![main_fn(
                vec![],
                vec![
                    Statement::While {
                        line: 1,
                        guard: Expression::False { line: 1 },
                        body: Box::new(Statement::Block {
                            line: 1,
                            statements: vec![],
                        }),
                    },
                    ret(int_lit(0)),
                ],
            )],
        ));
        assert!(text.contains("while_start0:"));
        assert!(text.contains("beq t0, zero, while_end1"));
        assert!(text.contains("j while_start0"));
        assert!(text.contains("while_end1:"));
    }

    #[test]
    fn test_call_stages_arguments_through_stack() {
        let f = FunctionDef::new(
            1,
            "f",
            vec![
                Declaration::new(1, "a", Type::Int),
                Declaration::new(1, "b", Type::Int),
            ],
            Type::Int,
            vec![],
            vec![ret(id("a"))],
        );
        let text = generate(Program::new(
            vec![],
            vec![Declaration::new(1, "g", Type::Int)],
            vec![
                f,
                main_fn(
                    vec![],
                    vec![
                        assign(
                            "g",
                            Expression::Call {
                                line: 1,
                                name: "f".into(),
                                args: vec![int_lit(1), int_lit(2)],
                            },
                        ),
                        ret(int_lit(0)),
                    ],
                ),
            ],
        ));
        assert!(text.contains("addi sp, sp, -8\n    li t0, 1\n    sw t0, 0(sp)\n    li t0, 2\n    sw t0, 4(sp)\n    lw a0, 0(sp)\n    lw a1, 4(sp)\n    addi sp, sp, 8\n    jal f\n    mv t0, a0"), "{}", text);
    }

    #[test]
    fn test_excess_arguments_get_placeholder() {
        let params: Vec<Declaration> = (0..9)
            .map(|i| Declaration::new(1, &format!("p{}", i), Type::Int))
            .collect();
        let f = FunctionDef::new(1, "wide", params, Type::Int, vec![], vec![ret(id("p0"))]);
        let text = generate(Program::new(
            vec![],
            vec![Declaration::new(1, "g", Type::Int)],
            vec![
                f,
                main_fn(
                    vec![],
                    vec![
                        assign(
                            "g",
                            Expression::Call {
                                line: 1,
                                name: "wide".into(),
                                args: (0..9).map(int_lit).collect(),
                            },
                        ),
                        ret(int_lit(0)),
                    ],
                ),
            ],
        ));
        assert!(text.contains("lw a7, 28(sp)"));
        assert!(text
            .contains("# ERROR: argument 8 of call to wide exceeds the eight-register limit"));
    }

    #[test]
    fn test_new_allocates_struct_size() {
        let node = StructDef::new(
            1,
            "Node",
            vec![
                Declaration::new(1, "value", Type::Int),
                Declaration::new(1, "flag", Type::Bool),
                Declaration::new(1, "next", Type::Struct("Node".into())),
            ],
        );
        let text = generate(Program::new(
            vec![node],
            vec![],
            vec![main_fn(
                vec![Declaration::new(1, "n", Type::Struct("Node".into()))],
                vec![
                    assign(
                        "n",
                        Expression::New {
                            line: 1,
                            name: "Node".into(),
                        },
                    ),
                    ret(int_lit(0)),
                ],
            )],
        ));
        assert!(text.contains("li a0, 12\n    jal sbrk\n    mv t0, a0"));
    }

    #[test]
    fn test_field_read_uses_layout_offset() {
        let node = StructDef::new(
            1,
            "Node",
            vec![
                Declaration::new(1, "value", Type::Int),
                Declaration::new(1, "next", Type::Struct("Node".into())),
            ],
        );
        let text = generate(Program::new(
            vec![node],
            vec![Declaration::new(1, "g", Type::Int)],
            vec![main_fn(
                vec![Declaration::new(1, "n", Type::Struct("Node".into()))],
                vec![
                    assign(
                        "g",
                        Expression::Dot {
                            line: 1,
                            left: Box::new(id("n")),
                            field: "next".into(),
                        },
                    ),
                    ret(int_lit(0)),
                ],
            )],
        ));
        assert!(text.contains("mv t2, t0\n    lw t0, 4(t2)"), "{}", text);
    }

    #[test]
    fn test_chained_dot_falls_back_to_first_slot() {
        let node = StructDef::new(
            1,
            "Node",
            vec![
                Declaration::new(1, "value", Type::Int),
                Declaration::new(1, "next", Type::Struct("Node".into())),
            ],
        );
        let text = generate(Program::new(
            vec![node],
            vec![Declaration::new(1, "g", Type::Int)],
            vec![main_fn(
                vec![Declaration::new(1, "n", Type::Struct("Node".into()))],
                vec![
                    assign(
                        "g",
                        Expression::Dot {
                            line: 1,
                            left: Box::new(Expression::Dot {
                                line: 1,
                                left: Box::new(id("n")),
                                field: "next".into(),
                            }),
                            field: "value".into(),
                        },
                    ),
                    ret(int_lit(0)),
                ],
            )],
        ));
        assert!(text.contains("# Load field value (unknown struct type)\n    lw t0, 0(t2)"));
    }

    #[test]
    fn test_field_assignment_adds_offset_to_pointer() {
        let node = StructDef::new(
            1,
            "Node",
            vec![
                Declaration::new(1, "value", Type::Int),
                Declaration::new(1, "next", Type::Struct("Node".into())),
            ],
        );
        let text = generate(Program::new(
            vec![node],
            vec![],
            vec![main_fn(
                vec![Declaration::new(1, "n", Type::Struct("Node".into()))],
                vec![
                    Statement::Assignment {
                        line: 1,
                        target: LValue::Dot {
                            line: 1,
                            left: Box::new(LValue::Id {
                                line: 1,
                                id: "n".into(),
                            }),
                            field: "next".into(),
                        },
                        source: Expression::Null { line: 1 },
                    },
                    ret(int_lit(0)),
                ],
            )],
        ));
        assert!(
            text.contains("lw t0, -4(fp)\n    addi t0, t0, 4\n    sw t1, 0(t0)"),
            "{}",
            text
        );
    }

    #[test]
    fn test_read_wires_up_runtime_support() {
        let text = generate(Program::new(
            vec![],
            vec![Declaration::new(1, "g", Type::Int)],
            vec![main_fn(
                vec![],
                vec![assign("g", Expression::Read { line: 1 }), ret(int_lit(0))],
            )],
        ));
        assert!(text.contains(".import read_int.s"));
        assert!(text.contains("input_file_ptr: .space 4"));
        // main's prologue captures the input handle passed in a1.
        assert!(text.contains("lw t0, 4(a1)\n    la t1, input_file_ptr\n    sw t0, 0(t1)"));
        assert!(text.contains("la t0, input_file_ptr\n    lw a0, 0(t0)\n    jal read_int\n    mv t0, a0"));
    }

    #[test]
    fn test_no_read_no_import() {
        let text = generate(Program::new(
            vec![],
            vec![],
            vec![main_fn(vec![], vec![ret(int_lit(0))])],
        ));
        assert!(!text.contains("read_int"));
        assert!(!text.contains("input_file_ptr"));
        assert!(text.contains(".import berkeley_utils.s"));
    }

    #[test]
    fn test_println_prints_value_then_newline() {
        let text = generate(Program::new(
            vec![],
            vec![],
            vec![main_fn(
                vec![],
                vec![
                    Statement::Println {
                        line: 1,
                        expr: int_lit(42),
                    },
                    ret(int_lit(0)),
                ],
            )],
        ));
        assert!(text.contains("li t0, 42\n    mv a0, t0\n    jal print_int\n    li a0, '\\n'\n    jal print_char"));
    }

    #[test]
    fn test_delete_evaluates_operand_and_frees_nothing() {
        let s = StructDef::new(1, "S", vec![Declaration::new(1, "f", Type::Int)]);
        let text = generate(Program::new(
            vec![s],
            vec![],
            vec![main_fn(
                vec![Declaration::new(1, "p", Type::Struct("S".into()))],
                vec![
                    Statement::Delete {
                        line: 2,
                        expr: id("p"),
                    },
                    ret(int_lit(0)),
                ],
            )],
        ));
        // The pointer is loaded and then simply discarded.
        assert!(text.contains("lw t0, -4(fp)"));
        assert!(!text.contains("free"));
        // sbrk only ever appears for `new`.
        assert!(!text.contains("sbrk"));
    }

    #[test]
    fn test_unknown_variable_gets_placeholder() {
        let text = generate(Program::new(
            vec![],
            vec![Declaration::new(1, "g", Type::Int)],
            vec![main_fn(
                vec![],
                vec![assign("g", id("ghost")), ret(int_lit(0))],
            )],
        ));
        assert!(text.contains("# ERROR: Unknown variable ghost\n    li t0, 0"));
    }

    #[test]
    fn test_void_function_falls_through_implicit_return() {
        let f = FunctionDef::new(1, "noop", vec![], Type::Void, vec![], vec![]);
        let text = generate(Program::new(
            vec![],
            vec![],
            vec![f, main_fn(vec![], vec![ret(int_lit(0))])],
        ));
        assert!(text.contains("# Implicit return\n    lw fp, 0(sp)\n    lw ra, 4(sp)\n    addi sp, sp, 8\n    jr ra"));
    }
}
