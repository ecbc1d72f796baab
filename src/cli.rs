use std::str::FromStr;

use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

// Exit Codes for different types of errors
pub const ERR_SEMANTIC: i32 = 1;
pub const ERR_READ_AST: i32 = 2;
pub const ERR_WRITE: i32 = 3;

pub fn print_errs(errs: &[String]) {
    for e in errs {
        println!("{}", e);
    }
}

pub fn configure_cli() -> clap::App<'static, 'static> {
    let app = App::new("Mini Compiler")
        .version("0.1.0")
        .author("Erich Ess")
        .about("Compiles Mini language syntax trees into RISC-V assembly for the course runtime")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .required(true)
                .help("JSON dump of the syntax tree produced by the front end"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(true)
                .help("Name of the output file that the assembly will be written to"),
        )
        .arg(
            Arg::with_name("stage")
                .long("stage")
                .possible_values(&["semantic", "codegen"])
                .takes_value(true)
                .help("Stop the compiler after the given stage completes"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log each pass of the compiler as it runs"),
        );
    app
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stage {
    Semantic,
    Codegen,
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semantic" => Ok(Stage::Semantic),
            "codegen" => Ok(Stage::Codegen),
            _ => Err(format!("Unknown compiler stage: {}", s)),
        }
    }
}

pub fn get_stage(args: &ArgMatches) -> Result<Option<Stage>, String> {
    args.value_of("stage").map(Stage::from_str).transpose()
}

pub fn get_log_level(args: &ArgMatches) -> Option<LevelFilter> {
    if args.is_present("verbose") {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}

pub fn configure_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
}
