//! Crate root: wires together the compilation pipeline.
//!
//! The stages are intentionally small and composable so they can be evolved
//! independently:
//! - `matchers` recognises the line shapes of the grammar.
//! - `variable`, `instruction` and `block` model the parsed program.
//! - `parser` owns all syntactic knowledge and returns the program structure.
//! - `codegen` lowers the parsed program into x86-64 AT&T assembly.
//! - `error` centralises the diagnostics raised by the other modules.

use log::debug;

pub mod block;
pub mod error;
pub mod instruction;
pub mod matchers;
pub mod parser;
pub mod variable;

mod codegen;

pub use error::{CompileError, CompileResult};

/// Compile source text into an AT&T assembly listing.
pub fn compile(source: &str) -> CompileResult<String> {
  let lines = normalize(source);
  debug!("normalized {} source lines", lines.len());

  let program = parser::parse(&lines)?;
  debug!(
    "parsed {} blocks, {} static and {} stack variables",
    program.blocks().len(),
    program.static_variables().len(),
    program.stack_variables().len()
  );

  Ok(codegen::generate(&program))
}

/// Trim each line and collapse interior whitespace runs to single spaces.
fn normalize(source: &str) -> Vec<String> {
  source
    .lines()
    .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
    .collect()
}
