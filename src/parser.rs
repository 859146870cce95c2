//! The two-phase, line-driven parse state machine.
//!
//! A program is a run of declarations followed by a run of blocks. The
//! parser walks the normalized lines once, trying the rule matchers in a
//! fixed order per line and tracking bracket depth for nested loops. All
//! scan state is local to the `parse` call; the returned `Program` is
//! immutable.

use crate::block::Block;
use crate::error::{CompileError, CompileResult};
use crate::matchers;
use crate::variable::Variable;

/// Parsed program: the two variable tables and the top-level blocks.
#[derive(Debug, Clone)]
pub struct Program {
  static_variables: Vec<Variable>,
  stack_variables: Vec<Variable>,
  blocks: Vec<Block>,
}

impl Program {
  /// `string` declarations, in declaration order.
  pub fn static_variables(&self) -> &[Variable] {
    &self.static_variables
  }

  /// `number` declarations, in declaration order.
  pub fn stack_variables(&self) -> &[Variable] {
    &self.stack_variables
  }

  /// Top-level blocks, in the order they appear in the source.
  pub fn blocks(&self) -> &[Block] {
    &self.blocks
  }

  /// Combined lookup list used for operand resolution: static variables
  /// first, then stack variables, so a name declared in both classes
  /// resolves to the static one.
  pub fn variables(&self) -> impl Iterator<Item = &Variable> {
    self.static_variables.iter().chain(self.stack_variables.iter())
  }
}

/// The block currently being filled, with its unmatched bracket count.
struct OpenBlock {
  block: Block,
  depth: isize,
}

/// Parse normalized source lines into a `Program`.
pub fn parse(lines: &[String]) -> CompileResult<Program> {
  let mut static_variables: Vec<Variable> = Vec::new();
  let mut stack_variables: Vec<Variable> = Vec::new();
  let mut blocks: Vec<Block> = Vec::new();
  let mut lookup: Vec<Variable> = Vec::new();
  let mut current: Option<OpenBlock> = None;
  let mut in_declaration_space = true;

  for (index, line) in lines.iter().enumerate() {
    if matchers::is_blank(line) || matchers::is_comment(line) {
      continue;
    }

    if let Some((type_name, name, value)) = matchers::declaration(line) {
      if !in_declaration_space {
        return Err(CompileError::DeclarationOrder {
          line: line.clone(),
          index,
        });
      }
      match type_name {
        "string" => {
          let variable = Variable::string(name, value, static_variables.len())?;
          static_variables.push(variable);
        }
        "number" => {
          let variable = Variable::number(name, value, stack_variables.len())?;
          stack_variables.push(variable);
        }
        _ => {
          return Err(CompileError::UnknownVariableType {
            type_name: type_name.to_string(),
            index,
          });
        }
      }
      continue;
    }

    if current.is_none() && matchers::looks_like_block_open(line) {
      if in_declaration_space {
        // The variable table is complete from here on; freeze the lookup
        // list instructions resolve against.
        in_declaration_space = false;
        lookup = static_variables
          .iter()
          .chain(stack_variables.iter())
          .cloned()
          .collect();
      }
      let Some(name) = matchers::block_open(line) else {
        return Err(CompileError::InvalidBlockSyntax {
          line: line.clone(),
          index,
        });
      };
      current = Some(OpenBlock {
        block: Block::new(name),
        depth: 1,
      });
      continue;
    }

    if let Some(mut open) = current.take() {
      // A `)` at depth 1 closes the block; the rest of the line is ignored.
      if open.depth == 1 && line.contains(')') {
        blocks.push(open.block);
        continue;
      }
      open.depth += matchers::paren_delta(line);
      open.block.add_instruction(line, &lookup)?;
      current = Some(open);
      continue;
    }

    return Err(CompileError::UnrecognizedInstruction {
      line: line.clone(),
      index,
    });
  }

  if current.is_some() {
    return Err(CompileError::UnclosedBlock);
  }
  if blocks.iter().filter(|block| block.name() == "start").count() != 1 {
    return Err(CompileError::MissingStartBlock);
  }

  Ok(Program {
    static_variables,
    stack_variables,
    blocks,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lines(source: &[&str]) -> Vec<String> {
    source.iter().map(|line| line.to_string()).collect()
  }

  fn render_block(block: &Block) -> String {
    let mut asm = String::new();
    block.render(&mut asm);
    asm
  }

  #[test]
  fn printn_references_the_stack_slot_of_a_declared_number() {
    let program = parse(&lines(&["declare number n 5", "start (", "printn n", ")"]))
      .expect("valid program");
    let rendered = render_block(&program.blocks()[0]);
    assert!(rendered.contains("push   -8(%rbp)\n"));
    assert!(!rendered.contains("push   $n"));
  }

  #[test]
  fn declaration_after_a_block_is_rejected() {
    let result = parse(&lines(&[
      "start (",
      "printn 1",
      ")",
      "declare number n 5",
    ]));
    assert!(matches!(result, Err(CompileError::DeclarationOrder { .. })));
  }

  #[test]
  fn unknown_declaration_type_is_rejected() {
    let result = parse(&lines(&["declare float f 1", "start (", "printn 1", ")"]));
    assert!(matches!(
      result,
      Err(CompileError::UnknownVariableType { type_name, .. }) if type_name == "float"
    ));
  }

  #[test]
  fn bad_literal_in_a_declaration_is_rejected() {
    let result = parse(&lines(&["declare number n five", "start (", ")"]));
    assert!(matches!(
      result,
      Err(CompileError::InvalidNumberLiteral { .. })
    ));
  }

  #[test]
  fn block_name_must_be_space_separated_from_the_bracket() {
    let result = parse(&lines(&["start(", "printn 1", ")"]));
    assert!(matches!(
      result,
      Err(CompileError::InvalidBlockSyntax { .. })
    ));
  }

  #[test]
  fn unterminated_block_is_detected_at_end_of_input() {
    let result = parse(&lines(&["start (", "printn 1"]));
    assert!(matches!(result, Err(CompileError::UnclosedBlock)));
  }

  #[test]
  fn unbalanced_do_content_leaves_the_block_unclosed() {
    // The stray `(` keeps the loop's depth above zero, so no closing line
    // ever matches and the scan runs off the end of the input.
    let result = parse(&lines(&["start (", "do (", "printn ("]));
    assert!(matches!(result, Err(CompileError::UnclosedBlock)));
  }

  #[test]
  fn malformed_do_close_surfaces_through_the_parser() {
    let result = parse(&lines(&["start (", "do (", "printn 1", ")"]));
    assert!(matches!(result, Err(CompileError::InvalidDoClose { .. })));
  }

  #[test]
  fn missing_start_block_is_rejected() {
    let result = parse(&lines(&["main (", "printn 1", ")"]));
    assert!(matches!(result, Err(CompileError::MissingStartBlock)));
  }

  #[test]
  fn duplicate_start_blocks_are_rejected() {
    let result = parse(&lines(&[
      "start (",
      "printn 1",
      ")",
      "start (",
      "printn 2",
      ")",
    ]));
    assert!(matches!(result, Err(CompileError::MissingStartBlock)));
  }

  #[test]
  fn instructions_outside_a_block_are_rejected() {
    let result = parse(&lines(&["prints msg", "start (", ")"]));
    assert!(matches!(
      result,
      Err(CompileError::UnrecognizedInstruction { index: 0, .. })
    ));
  }

  #[test]
  fn comments_and_blank_lines_are_skipped() {
    let program = parse(&lines(&[
      "! a comment",
      "",
      "declare number n 5",
      "  ! another comment",
      "start (",
      "printn n",
      ")",
    ]))
    .expect("valid program");
    assert_eq!(program.blocks().len(), 1);
    assert_eq!(program.stack_variables().len(), 1);
  }

  #[test]
  fn indices_count_per_storage_class() {
    let program = parse(&lines(&[
      "declare string a \"x\"",
      "declare number one 1",
      "declare string b \"y\"",
      "declare number two 2",
      "start (",
      "printn one",
      ")",
    ]))
    .expect("valid program");

    assert_eq!(program.static_variables()[1].index, 1);
    assert_eq!(program.stack_variables()[0].address(), "-8(%rbp)");
    assert_eq!(program.stack_variables()[1].address(), "-16(%rbp)");
  }

  #[test]
  fn static_variables_shadow_stack_variables() {
    let program = parse(&lines(&[
      "declare string s \"hi\"",
      "declare number s 5",
      "start (",
      "printn s",
      ")",
    ]))
    .expect("valid program");

    let first = program.variables().next().expect("declared variable");
    assert_eq!(first.address(), "s");
    let rendered = render_block(&program.blocks()[0]);
    assert!(rendered.contains("push   s\n"));
  }

  #[test]
  fn repeat_loops_parse_through_the_block_machinery() {
    let program = parse(&lines(&[
      "start (",
      "do (",
      "printn 1",
      ") 2 times",
      ")",
    ]))
    .expect("valid program");

    let rendered = render_block(&program.blocks()[0]);
    assert_eq!(rendered.matches("push   $1\n").count(), 2);
  }

  #[test]
  fn extra_text_on_a_closing_line_is_ignored() {
    let program = parse(&lines(&["start (", "printn 1", ") trailing"])).expect("valid program");
    assert_eq!(program.blocks().len(), 1);
  }

  #[test]
  fn blocks_keep_their_source_order() {
    let program = parse(&lines(&[
      "init (",
      "printn 1",
      ")",
      "start (",
      "printn 2",
      ")",
    ]))
    .expect("valid program");

    assert_eq!(program.blocks()[0].name(), "init");
    assert_eq!(program.blocks()[1].name(), "start");
  }
}
