//! Named instruction sequences.
//!
//! A block owns its instructions in execution order. While the most recent
//! instruction is still open it consumes every incoming line as a
//! continuation; otherwise the line starts a new instruction.

use crate::error::CompileResult;
use crate::instruction::Instruction;
use crate::variable::Variable;

/// A named, ordered run of instructions compiled as one contiguous fragment.
#[derive(Debug, Clone)]
pub struct Block {
  name: String,
  instructions: Vec<Instruction>,
}

impl Block {
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      instructions: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn instructions(&self) -> &[Instruction] {
    &self.instructions
  }

  /// Route a line into the block: a still-open trailing instruction takes it
  /// as a continuation, anything else starts a new instruction.
  pub fn add_instruction(&mut self, line: &str, variables: &[Variable]) -> CompileResult<()> {
    if let Some(last) = self.instructions.last_mut()
      && last.is_open()
    {
      return last.append_part(line, variables);
    }

    let instruction = Instruction::build(line, variables)?;
    self.instructions.push(instruction);
    Ok(())
  }

  /// Concatenate every instruction's fragment in order.
  pub fn render(&self, asm: &mut String) {
    for instruction in &self.instructions {
      instruction.render(asm);
    }
  }
}
