//! Diagnostics raised while compiling a source program.
//!
//! Every error is fatal: the compiler stops at the first violation and
//! produces no output. Each variant carries the offending line text or the
//! line index (0-based) so a failure can be traced back to the source.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  #[snafu(display("variables can only be declared at the top of the file (line {index}: {line})"))]
  DeclarationOrder { line: String, index: usize },

  #[snafu(display("string literal for {name} must be a quoted value: {value}"))]
  InvalidStringLiteral { name: String, value: String },

  #[snafu(display("invalid number literal for {name}: {value}"))]
  InvalidNumberLiteral { name: String, value: String },

  #[snafu(display("unknown variable type {type_name} at line {index}"))]
  UnknownVariableType { type_name: String, index: usize },

  #[snafu(display("invalid block syntax at line {index}: {line}"))]
  InvalidBlockSyntax { line: String, index: usize },

  #[snafu(display("block left unclosed"))]
  UnclosedBlock,

  #[snafu(display("block \"start\" not found"))]
  MissingStartBlock,

  #[snafu(display("invalid instruction: {line}"))]
  UnknownInstruction { line: String },

  #[snafu(display("invalid compute instruction: {line}"))]
  InvalidComputeSyntax { line: String },

  #[snafu(display("unknown operator {operator} in: {line}"))]
  UnknownOperator { operator: char, line: String },

  #[snafu(display("unknown variable {name}"))]
  UnknownVariable { name: String },

  #[snafu(display("invalid end for do loop: {line}"))]
  InvalidDoClose { line: String },

  #[snafu(display("invalid number of iterations for do loop: {count}"))]
  InvalidRepeatCount { count: String },

  #[snafu(display("unrecognized instruction at line {index}: {line}"))]
  UnrecognizedInstruction { line: String, index: usize },
}
