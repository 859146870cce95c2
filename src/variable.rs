//! Declared variables and their two storage classes.
//!
//! A `string` declaration lives in the data section and is addressed by its
//! own label; a `number` declaration lives in a stack slot addressed relative
//! to the frame base. Each class numbers its slots independently, starting at
//! zero, in declaration order.

use crate::error::{CompileError, CompileResult};

/// Literal payload of a declaration, one per storage class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
  Text(String),
  Number(i64),
}

/// A declared name bound to its literal, storage index and derived length.
#[derive(Debug, Clone)]
pub struct Variable {
  pub name: String,
  pub literal: Literal,
  pub index: usize,
  pub length: usize,
}

impl Variable {
  /// Build a static `string` variable from its quoted literal.
  pub fn string(name: &str, raw: &str, index: usize) -> CompileResult<Self> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < 2 {
      return Err(CompileError::InvalidStringLiteral {
        name: name.to_string(),
        value: raw.to_string(),
      });
    }

    // Strip the surrounding quote marks; the quote characters themselves are
    // not validated.
    let mut chars = trimmed.chars();
    chars.next();
    chars.next_back();
    let text = chars.as_str().to_string();

    // Backslashes mark escapes and are excluded from the emitted length
    // symbol.
    let length = text.chars().count() - text.chars().filter(|&c| c == '\\').count();

    Ok(Self {
      name: name.to_string(),
      literal: Literal::Text(text),
      index,
      length,
    })
  }

  /// Build a stack `number` variable from its integer literal.
  pub fn number(name: &str, raw: &str, index: usize) -> CompileResult<Self> {
    let value =
      raw
        .trim()
        .parse::<i64>()
        .map_err(|_| CompileError::InvalidNumberLiteral {
          name: name.to_string(),
          value: raw.to_string(),
        })?;
    let length = value.to_string().len();

    Ok(Self {
      name: name.to_string(),
      literal: Literal::Number(value),
      index,
      length,
    })
  }

  /// Operand text for this variable: a frame-slot offset for numbers, the
  /// data-section label for strings.
  pub fn address(&self) -> String {
    match self.literal {
      Literal::Number(_) => format!("-{}(%rbp)", (self.index + 1) * 8),
      Literal::Text(_) => self.name.clone(),
    }
  }
}
