/*
 * Walks a full syntax tree and accumulates every semantic diagnostic it
 * can find.  Type errors inside an expression poison that expression:
 * its type becomes unknown and enclosing constructs stay silent about
 * it, so one mistake produces one diagnostic instead of a cascade.
 *
 * The checker also performs the one tree rewrite the back end relies
 * on: conditionals whose else branch is an empty block are rewritten to
 * have no else branch at all, so the code generator never emits a jump
 * to a label that labels nothing.
 */
use std::collections::HashMap;

use log::debug;

use crate::compiler::ast::{
    BinaryOperator, Declaration, Expression, FunctionDef, LValue, Program, Statement, StructDef,
    Type, UnaryOperator, MAIN_FN,
};

use super::stack::{ScopeId, ScopeStack};
use super::symbol_table::SymbolKind;
use super::{Diagnostic, SemanticError};

/// The signature a call site is checked against.
#[derive(Clone, Debug)]
struct FunSig {
    line: u32,
    params: Vec<Declaration>,
    ret_ty: Type,
}

pub struct TypeChecker {
    structs: HashMap<String, StructDef>,
    funs: HashMap<String, FunSig>,
    stack: ScopeStack,
    scope: ScopeId,
    ret_ty: Type,
    diagnostics: Vec<Diagnostic>,
}

impl TypeChecker {
    /// Analyze `program` and return every diagnostic found.  An empty
    /// result certifies the tree for code generation.  Empty else
    /// branches are pruned from the tree as a side effect.
    pub fn check(program: &mut Program) -> Vec<Diagnostic> {
        let mut checker = TypeChecker {
            structs: HashMap::new(),
            funs: HashMap::new(),
            stack: ScopeStack::new(),
            scope: ScopeStack::global(),
            ret_ty: Type::Void,
            diagnostics: vec![],
        };

        checker.register_structs(&program.structs);
        checker.register_globals(&program.globals);
        checker.register_functions(&program.functions);
        for fun in program.functions.iter_mut() {
            checker.function(fun);
        }
        checker.check_main();

        debug!(
            "Semantic analysis finished with {} diagnostic(s)",
            checker.diagnostics.len()
        );
        checker.diagnostics
    }

    fn report(&mut self, line: u32, err: SemanticError) {
        self.diagnostics.push(Diagnostic::new(line, err));
    }

    /*
     * Registration.  Structs are registered in source order, so a field
     * may refer to any struct declared above it or to the struct being
     * declared, but never to one declared further down.
     */

    fn register_structs(&mut self, structs: &[StructDef]) {
        for sd in structs {
            // A duplicate definition is not registered, but its fields
            // are still checked like any other declaration's.
            let duplicate = self.structs.contains_key(&sd.name);
            if duplicate {
                self.report(sd.line, SemanticError::DuplicateStruct(sd.name.clone()));
            }
            let mut seen: Vec<&str> = vec![];
            for field in &sd.fields {
                if seen.contains(&field.name.as_str()) {
                    self.report(field.line, SemanticError::DuplicateField(field.name.clone()));
                } else {
                    seen.push(&field.name);
                }
                if let Type::Struct(name) = &field.ty {
                    if name != &sd.name && !self.structs.contains_key(name) {
                        self.report(field.line, SemanticError::UndefinedStruct(name.clone()));
                    }
                }
            }
            if !duplicate {
                self.structs.insert(sd.name.clone(), sd.clone());
            }
        }
    }

    fn register_globals(&mut self, globals: &[Declaration]) {
        for g in globals {
            self.check_declared_type(&g.ty, g.line);
            if let Err(err) = self.stack.add(
                ScopeStack::global(),
                &g.name,
                g.ty.clone(),
                SymbolKind::Global,
            ) {
                self.report(g.line, err);
            }
        }
    }

    fn register_functions(&mut self, functions: &[FunctionDef]) {
        for f in functions {
            if self.funs.contains_key(&f.name) {
                self.report(f.line, SemanticError::DuplicateFunction(f.name.clone()));
                continue;
            }
            for p in &f.params {
                self.check_declared_type(&p.ty, p.line);
            }
            if let Type::Struct(name) = &f.ret_ty {
                if !self.structs.contains_key(name) {
                    self.report(f.line, SemanticError::UndefinedStruct(name.clone()));
                }
            }
            self.funs.insert(
                f.name.clone(),
                FunSig {
                    line: f.line,
                    params: f.params.clone(),
                    ret_ty: f.ret_ty.clone(),
                },
            );
        }
    }

    /// Validate a type written in a declaration.  The error is reported
    /// here, at the declaration, and nowhere else: the symbol is still
    /// entered with its written type, so uses of the variable do not
    /// re-report it.
    fn check_declared_type(&mut self, ty: &Type, line: u32) {
        if let Type::Struct(name) = ty {
            if !self.structs.contains_key(name) {
                self.report(line, SemanticError::UndefinedStruct(name.clone()));
            }
        }
    }

    fn check_main(&mut self) {
        match self.funs.get(MAIN_FN) {
            None => self.report(0, SemanticError::MainNotFound),
            Some(sig) => {
                let (line, nparams, ret_ty) = (sig.line, sig.params.len(), sig.ret_ty.clone());
                if nparams != 0 {
                    self.report(line, SemanticError::MainInvalidParams);
                }
                if ret_ty != Type::Int {
                    self.report(line, SemanticError::MainInvalidType);
                }
            }
        }
    }

    /*
     * Function bodies.  Each function gets one fresh scope chained to
     * the global scope; parameters and locals land in that single scope
     * and so collide with each other but shadow globals.
     */

    fn function(&mut self, fun: &mut FunctionDef) {
        debug!("Checking function {}", fun.name);
        self.scope = self.stack.push_scope(ScopeStack::global());
        self.ret_ty = fun.ret_ty.clone();

        for p in &fun.params {
            if let Err(err) =
                self.stack
                    .add(self.scope, &p.name, p.ty.clone(), SymbolKind::Parameter)
            {
                self.report(p.line, err);
            }
        }
        for l in &fun.locals {
            self.check_declared_type(&l.ty, l.line);
            if let Err(err) = self
                .stack
                .add(self.scope, &l.name, l.ty.clone(), SymbolKind::Local)
            {
                self.report(l.line, err);
            }
        }

        for stm in fun.body.iter_mut() {
            self.statement(stm);
        }

        if fun.ret_ty != Type::Void && !fun.body.last().map_or(false, |s| s.is_return()) {
            self.report(fun.line, SemanticError::MissingReturn(fun.name.clone()));
        }
    }

    fn statement(&mut self, stm: &mut Statement) {
        match stm {
            Statement::Block { statements, .. } => {
                for s in statements.iter_mut() {
                    self.statement(s);
                }
            }
            Statement::Assignment {
                line,
                target,
                source,
            } => {
                let line = *line;
                let target_ty = self.lvalue(target);
                let source_ty = self.expression(source);
                if let (Some(t), Some(s)) = (target_ty, source_ty) {
                    if !t.assignable_from(&s) {
                        self.report(line, SemanticError::AssignmentMismatch(t, s));
                    }
                }
            }
            Statement::Conditional {
                guard,
                then_block,
                else_block,
                ..
            } => {
                self.guard(guard);
                self.statement(then_block);
                if let Some(els) = else_block {
                    self.statement(els);
                }
                let empty = matches!(
                    else_block.as_deref(),
                    Some(Statement::Block { statements, .. }) if statements.is_empty()
                );
                if empty {
                    *else_block = None;
                }
            }
            Statement::While { guard, body, .. } => {
                self.guard(guard);
                self.statement(body);
            }
            Statement::Delete { line, expr } => {
                let line = *line;
                if let Some(ty) = self.expression(expr) {
                    if !ty.is_struct() {
                        self.report(line, SemanticError::DeleteExpectedStruct(ty));
                    }
                }
            }
            Statement::Invocation { expr, .. } => {
                self.expression(expr);
            }
            Statement::Print { line, expr } | Statement::Println { line, expr } => {
                let line = *line;
                if let Some(ty) = self.expression(expr) {
                    if ty != Type::Int {
                        self.report(line, SemanticError::PrintExpectedInt(ty));
                    }
                }
            }
            Statement::Return { line, expr } => {
                let line = *line;
                let expected = self.ret_ty.clone();
                let actual = self.expression(expr);
                if expected == Type::Void {
                    self.report(line, SemanticError::ReturnValueFromVoid);
                } else if let Some(actual) = actual {
                    if !expected.assignable_from(&actual) {
                        self.report(line, SemanticError::ReturnTypeMismatch(expected, actual));
                    }
                }
            }
            Statement::ReturnEmpty { line } => {
                if self.ret_ty != Type::Void {
                    let expected = self.ret_ty.clone();
                    self.report(*line, SemanticError::ReturnValueRequired(expected));
                }
            }
        }
    }

    fn guard(&mut self, guard: &Expression) {
        let line = guard.line();
        if let Some(ty) = self.expression(guard) {
            if ty != Type::Bool {
                self.report(line, SemanticError::CondExpectedBool(ty));
            }
        }
    }

    /*
     * Expression typing.  `None` means the type could not be determined
     * because a diagnostic was already reported inside the expression;
     * callers treat `None` as "assume it would have been fine".
     */

    fn expression(&mut self, exp: &Expression) -> Option<Type> {
        match exp {
            Expression::Integer { .. } => Some(Type::Int),
            Expression::True { .. } | Expression::False { .. } => Some(Type::Bool),
            Expression::Null { .. } => Some(Type::Null),
            Expression::Read { .. } => Some(Type::Int),
            Expression::Identifier { line, id } => match self.stack.get(self.scope, id) {
                Some(sym) => Some(sym.ty.clone()),
                None => {
                    self.report(*line, SemanticError::UndefinedVariable(id.clone()));
                    None
                }
            },
            Expression::Dot { line, left, field } => {
                let left_ty = self.expression(left)?;
                self.field_type(*line, &left_ty, field)
            }
            Expression::Unary { line, op, operand } => {
                let ty = self.expression(operand)?;
                self.unary(*line, *op, ty)
            }
            Expression::Binary {
                line,
                op,
                left,
                right,
            } => {
                let lt = self.expression(left);
                let rt = self.expression(right);
                self.binary(*line, *op, lt, rt)
            }
            Expression::Call { line, name, args } => self.call(*line, name, args),
            Expression::New { line, name } => {
                if self.structs.contains_key(name) {
                    Some(Type::Struct(name.clone()))
                } else {
                    self.report(*line, SemanticError::UndefinedStruct(name.clone()));
                    None
                }
            }
        }
    }

    fn lvalue(&mut self, lv: &LValue) -> Option<Type> {
        match lv {
            LValue::Id { line, id } => match self.stack.get(self.scope, id) {
                Some(sym) => Some(sym.ty.clone()),
                None => {
                    self.report(*line, SemanticError::UndefinedVariable(id.clone()));
                    None
                }
            },
            LValue::Dot { line, left, field } => {
                let left_ty = self.lvalue(left)?;
                self.field_type(*line, &left_ty, field)
            }
        }
    }

    /// Type of `base.field` given the already-computed type of `base`.
    fn field_type(&mut self, line: u32, base: &Type, field: &str) -> Option<Type> {
        match base {
            Type::Struct(name) => {
                // An unregistered struct type was already reported at
                // its declaration.
                let sd = self.structs.get(name)?;
                match sd.get_field(field) {
                    Some(decl) => Some(decl.ty.clone()),
                    None => {
                        self.report(
                            line,
                            SemanticError::UndefinedField(name.clone(), field.into()),
                        );
                        None
                    }
                }
            }
            other => {
                self.report(line, SemanticError::DotExpectedStruct(other.clone()));
                None
            }
        }
    }

    fn unary(&mut self, line: u32, op: UnaryOperator, ty: Type) -> Option<Type> {
        match op {
            UnaryOperator::Negate => {
                if ty != Type::Int {
                    self.report(line, SemanticError::UnaryExpectedInt(op, ty));
                }
                Some(Type::Int)
            }
            UnaryOperator::Not => {
                if ty != Type::Bool {
                    self.report(line, SemanticError::UnaryExpectedBool(op, ty));
                }
                Some(Type::Bool)
            }
        }
    }

    fn binary(
        &mut self,
        line: u32,
        op: BinaryOperator,
        lt: Option<Type>,
        rt: Option<Type>,
    ) -> Option<Type> {
        // A failed operand poisons the whole expression: no operator
        // check runs and no type comes out.
        let (lt, rt) = match (lt, rt) {
            (Some(l), Some(r)) => (l, r),
            _ => return None,
        };

        if op.is_arithmetic() {
            if lt != Type::Int || rt != Type::Int {
                self.report(line, SemanticError::OpExpectedInt(op));
            }
            Some(Type::Int)
        } else if op.is_relational() {
            if lt != Type::Int || rt != Type::Int {
                self.report(line, SemanticError::OpExpectedInt(op));
            }
            Some(Type::Bool)
        } else if op.is_logical() {
            if lt != Type::Bool || rt != Type::Bool {
                self.report(line, SemanticError::OpExpectedBool(op));
            }
            Some(Type::Bool)
        } else {
            self.equality(line, lt, rt);
            Some(Type::Bool)
        }
    }

    /// `==` and `!=`.  Null may be compared with any struct value (in
    /// either position); otherwise the two sides must have the same
    /// type.
    fn equality(&mut self, line: u32, lt: Type, rt: Type) {
        match (&lt, &rt) {
            (Type::Null, other) | (other, Type::Null) => {
                if !other.is_struct() {
                    let other = (*other).clone();
                    self.report(line, SemanticError::NullComparedToNonStruct(other));
                }
            }
            _ => {
                if lt != rt {
                    self.report(line, SemanticError::EqualityMismatch(lt, rt));
                }
            }
        }
    }

    fn call(&mut self, line: u32, name: &str, args: &[Expression]) -> Option<Type> {
        let sig = match self.funs.get(name) {
            Some(sig) => sig.clone(),
            None => {
                self.report(line, SemanticError::UndefinedFunction(name.into()));
                // Still type the arguments so mistakes inside them are
                // not hidden by the bad call.
                for a in args {
                    self.expression(a);
                }
                return None;
            }
        };

        if args.len() != sig.params.len() {
            self.report(
                line,
                SemanticError::WrongNumberOfArgs(name.into(), sig.params.len(), args.len()),
            );
        }
        for (pos, (param, arg)) in sig.params.iter().zip(args.iter()).enumerate() {
            let arg_ty = match self.expression(arg) {
                Some(ty) => ty,
                None => continue,
            };
            if arg_ty == Type::Null && !param.ty.is_struct() {
                self.report(line, SemanticError::ArgNullToNonStruct(name.into(), pos));
            } else if !param.ty.assignable_from(&arg_ty) {
                self.report(
                    line,
                    SemanticError::ArgTypeMismatch(name.into(), pos, param.ty.clone(), arg_ty),
                );
            }
        }
        // Extra arguments beyond the declared parameters still get
        // typed for their own diagnostics.
        for a in args.iter().skip(sig.params.len()) {
            self.expression(a);
        }

        Some(sig.ret_ty)
    }
}
