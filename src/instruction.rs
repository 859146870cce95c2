//! The instruction set: one variant per source instruction.
//!
//! Operands are resolved against the variable table at construction time, so
//! a built instruction carries finished operand text and rendering is pure.
//! The `do` loop is the only multi-line construct: it stays open while its
//! nested lines accumulate and refuses continuation lines once closed.

use std::mem;

use crate::block::Block;
use crate::error::{CompileError, CompileResult};
use crate::matchers;
use crate::variable::Variable;

/// One executable source instruction, ready to render.
#[derive(Debug, Clone)]
pub enum Instruction {
  PrintString {
    name: String,
  },
  PrintNumber {
    operand: String,
  },
  Compute {
    lhs: String,
    rhs: String,
    opcode: &'static str,
    result: &'static str,
    dest: String,
  },
  Repeat(Repeat),
}

/// State machine for the multi-line `do` loop.
#[derive(Debug, Clone)]
pub enum Repeat {
  Open { depth: isize, body: Block },
  Closed { body: Block, times: usize },
}

impl Instruction {
  /// Dispatch on the leading keyword and construct the matching variant.
  pub fn build(line: &str, variables: &[Variable]) -> CompileResult<Self> {
    let Some((keyword, payload)) = matchers::instruction_head(line) else {
      return Err(CompileError::UnknownInstruction {
        line: line.to_string(),
      });
    };

    match keyword {
      "prints" => Ok(Self::PrintString {
        name: payload.trim().to_string(),
      }),
      "printn" => Ok(Self::PrintNumber {
        operand: resolve_operand(payload.trim(), variables),
      }),
      "compute" => Self::compute(line, payload, variables),
      "do" => Ok(Self::Repeat(Repeat::open())),
      _ => Err(CompileError::UnknownInstruction {
        line: line.to_string(),
      }),
    }
  }

  fn compute(line: &str, payload: &str, variables: &[Variable]) -> CompileResult<Self> {
    let Some((lhs, operator, rhs, dest)) = matchers::compute_parts(payload) else {
      return Err(CompileError::InvalidComputeSyntax {
        line: line.to_string(),
      });
    };

    let dest = variables
      .iter()
      .find(|v| v.name == dest)
      .map(Variable::address)
      .ok_or_else(|| CompileError::UnknownVariable {
        name: dest.to_string(),
      })?;

    // The language binds `/` to the multiply instruction and `*` to the
    // divide instruction; existing programs depend on the mapping.
    let (opcode, result) = match operator {
      '+' => ("add %rax, %rbx", "%rbx"),
      '-' => ("sub %rbx, %rax", "%rax"),
      '/' => ("mul %rbx", "%rax"),
      '*' => ("div %rbx", "%rax"),
      _ => {
        return Err(CompileError::UnknownOperator {
          operator,
          line: line.to_string(),
        });
      }
    };

    Ok(Self::Compute {
      lhs: resolve_operand(lhs, variables),
      rhs: resolve_operand(rhs, variables),
      opcode,
      result,
      dest,
    })
  }

  /// True while the instruction still accepts continuation lines.
  pub fn is_open(&self) -> bool {
    matches!(self, Self::Repeat(Repeat::Open { .. }))
  }

  /// Feed a continuation line to an open `do` loop. Single-line variants
  /// ignore continuations.
  pub fn append_part(&mut self, line: &str, variables: &[Variable]) -> CompileResult<()> {
    match self {
      Self::Repeat(repeat) => repeat.append_part(line, variables),
      _ => Ok(()),
    }
  }

  /// Append this instruction's assembly fragment to `asm`. Every emitted
  /// line is newline-terminated so fragments concatenate cleanly.
  pub fn render(&self, asm: &mut String) {
    match self {
      Self::PrintString { name } => {
        asm.push_str(&format!("mov    ${name}_len,%rdx\n"));
        asm.push_str(&format!("mov    ${name},%rsi\n"));
        asm.push_str("mov    $stdout,%rdi\n");
        asm.push_str("mov    $1,%rax\n");
        asm.push_str("syscall\n");
      }
      Self::PrintNumber { operand } => {
        asm.push_str(&format!("push   {operand}\n"));
        asm.push_str("add    $48, (%rsp)\n");
        asm.push_str("mov    $1,%rdx\n");
        asm.push_str("mov    %rsp,%rsi\n");
        asm.push_str("mov    $stdout,%rdi\n");
        asm.push_str("mov    $1,%rax\n");
        asm.push_str("syscall\n");
      }
      Self::Compute {
        lhs,
        rhs,
        opcode,
        result,
        dest,
      } => {
        asm.push_str(&format!("mov {lhs}, %rax\n"));
        asm.push_str(&format!("mov {rhs}, %rbx\n"));
        asm.push_str(&format!("{opcode}\n"));
        asm.push_str(&format!("mov {result}, {dest}\n"));
      }
      Self::Repeat(repeat) => repeat.render(asm),
    }
  }
}

impl Repeat {
  /// A freshly opened loop; the `do` line's parenthesis is already unmatched.
  fn open() -> Self {
    Self::Open {
      depth: 1,
      body: Block::new("do"),
    }
  }

  fn append_part(&mut self, line: &str, variables: &[Variable]) -> CompileResult<()> {
    let Self::Open { depth, body } = self else {
      return Ok(());
    };

    *depth += matchers::paren_delta(line);
    if *depth == 0 {
      let Some(digits) = matchers::do_close(line) else {
        return Err(CompileError::InvalidDoClose {
          line: line.to_string(),
        });
      };
      let times = digits
        .parse::<usize>()
        .map_err(|_| CompileError::InvalidRepeatCount {
          count: digits.to_string(),
        })?;
      let body = mem::replace(body, Block::new("do"));
      *self = Self::Closed { body, times };
      return Ok(());
    }

    body.add_instruction(line, variables)
  }

  fn render(&self, asm: &mut String) {
    match self {
      Self::Closed { body, times } => {
        let mut fragment = String::new();
        body.render(&mut fragment);
        for _ in 0..*times {
          asm.push_str(&fragment);
        }
      }
      Self::Open { .. } => unreachable!("rendering a do loop that was never closed"),
    }
  }
}

/// A name that matches a declared variable resolves to its address; anything
/// else is emitted as an immediate.
fn resolve_operand(token: &str, variables: &[Variable]) -> String {
  variables
    .iter()
    .find(|v| v.name == token)
    .map(Variable::address)
    .unwrap_or_else(|| format!("${token}"))
}
