//! Assembly listing generation.
//!
//! The emitter walks the parsed program read-only: a fixed text-section
//! prologue, one push per stack variable, every block's fragment in source
//! order, the process-exit sequence, then the data section with a length
//! symbol per string variable.

use crate::parser::Program;
use crate::variable::Literal;

/// Serialize the whole program into its final assembly text.
pub fn generate(program: &Program) -> String {
  let mut asm = String::new();

  asm.push_str(".text\n");
  asm.push_str(".global  _start\n");
  asm.push('\n');
  asm.push_str("stdout = 1\n");
  asm.push('\n');
  asm.push_str("_start:\n");
  asm.push('\n');

  asm.push_str("mov %rsp, %rbp\n");
  for variable in program.stack_variables() {
    if let Literal::Number(value) = &variable.literal {
      asm.push_str(&format!("push ${value}\n"));
    }
  }
  asm.push_str(&format!("mov ${}, %r8\n", program.stack_variables().len()));
  asm.push('\n');

  for block in program.blocks() {
    block.render(&mut asm);
  }

  asm.push('\n');
  asm.push_str("mov    $0,%rdi\n");
  asm.push_str("mov    $60,%rax\n");
  asm.push_str("syscall\n");
  asm.push('\n');

  asm.push_str(".data\n");
  for variable in program.static_variables() {
    if let Literal::Text(text) = &variable.literal {
      asm.push_str(&format!("{}: .ascii \"{text}\"\n", variable.name));
      asm.push_str(&format!(".set {}_len , {}\n", variable.name, variable.length));
    }
  }

  asm
}
