#![allow(dead_code)]

pub mod cli;
pub mod compiler;

pub use cli::*;
pub use compiler::{compile, semantics::type_checker::TypeChecker};
