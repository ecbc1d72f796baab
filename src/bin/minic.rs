extern crate log;
extern crate simplelog;

use std::fs::File;

use mini_lang::compiler::ast::Program;
use mini_lang::compiler::memory::StructTable;
use mini_lang::compiler::riscv::CodeGen;
use mini_lang::compiler::semantics::type_checker::TypeChecker;
use mini_lang::*;

fn main() -> Result<(), i32> {
    let config = configure_cli().get_matches();

    if let Some(level) = get_log_level(&config) {
        configure_logging(level).expect("Failed to configure logger.")
    }

    let input = config
        .value_of("input")
        .expect("Expected an input syntax tree to compile");
    let file = match File::open(input) {
        Ok(f) => f,
        Err(err) => {
            eprintln!("Could not open {}: {}", input, err);
            return Err(ERR_READ_AST);
        }
    };
    let mut program: Program = match serde_json::from_reader(file) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("Could not read syntax tree from {}: {}", input, err);
            return Err(ERR_READ_AST);
        }
    };

    let stop_stage = get_stage(&config).unwrap();

    let diagnostics = TypeChecker::check(&mut program);
    if !diagnostics.is_empty() {
        let errs: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();
        print_errs(&errs);
        eprintln!("{} semantic error(s)", errs.len());
        return Err(ERR_SEMANTIC);
    }

    if stop_stage == Some(Stage::Semantic) {
        return Ok(());
    }

    let struct_table = StructTable::from_program(&program);
    let codegen = CodeGen::compile(&program, &struct_table);

    let output = config
        .value_of("output")
        .expect("Expected an output file name");
    let mut out = match File::create(output) {
        Ok(f) => f,
        Err(err) => {
            eprintln!("Could not create {}: {}", output, err);
            return Err(ERR_WRITE);
        }
    };
    if let Err(err) = codegen.print(&mut out) {
        eprintln!("Could not write {}: {}", output, err);
        return Err(ERR_WRITE);
    }

    Ok(())
}
