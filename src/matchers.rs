//! Line-shape recognition for the parser's rule chain.
//!
//! The grammar is line-oriented, so instead of a token stream there is a
//! small set of predicates and extractors over one normalized line. Each
//! matcher either rejects the line or hands back the captured pieces; the
//! parser tries them in a fixed order and the first hit wins.

fn is_word(b: u8) -> bool {
  b.is_ascii_alphanumeric() || b == b'_'
}

/// Split a leading run of word characters off the front of `s`.
fn split_word(s: &str) -> Option<(&str, &str)> {
  let end = s
    .bytes()
    .position(|b| !is_word(b))
    .unwrap_or(s.len());
  if end == 0 {
    return None;
  }
  Some((&s[..end], &s[end..]))
}

/// Skip at least one whitespace character.
fn skip_space(s: &str) -> Option<&str> {
  let rest = s.trim_start();
  if rest.len() == s.len() {
    return None;
  }
  Some(rest)
}

/// True when the line contains nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
  line.trim().is_empty()
}

/// True when the first non-space character is the comment marker `!`.
pub fn is_comment(line: &str) -> bool {
  line.trim_start().starts_with('!')
}

/// Match `declare <type> <name> <value>`, yielding the three payload fields.
/// The value runs to the end of the line and may contain anything.
pub fn declaration(line: &str) -> Option<(&str, &str, &str)> {
  let rest = line.trim_start().strip_prefix("declare")?;
  let rest = skip_space(rest)?;
  let (type_name, rest) = split_word(rest)?;
  let rest = skip_space(rest)?;
  let (name, rest) = split_word(rest)?;
  let rest = skip_space(rest)?;
  if rest.is_empty() {
    return None;
  }
  Some((type_name, name, rest))
}

/// Loose test for an identifier followed by `(` anywhere in the line. This
/// only decides that a block is starting; `block_open` extracts the name.
pub fn looks_like_block_open(line: &str) -> bool {
  let bytes = line.as_bytes();
  for (i, &b) in bytes.iter().enumerate() {
    if b != b'(' {
      continue;
    }
    let mut j = i;
    while j > 0 && bytes[j - 1] == b' ' {
      j -= 1;
    }
    if j > 0 && is_word(bytes[j - 1]) {
      return true;
    }
  }
  false
}

/// Strict block-open shape: the name, at least one space, a line-ending `(`.
pub fn block_open(line: &str) -> Option<&str> {
  let (name, rest) = split_word(line)?;
  let rest = skip_space(rest)?;
  if rest == "(" { Some(name) } else { None }
}

/// Split an instruction line into its letters-only keyword and raw payload.
pub fn instruction_head(line: &str) -> Option<(&str, &str)> {
  let rest = line.trim_start();
  let end = rest
    .bytes()
    .position(|b| !b.is_ascii_alphabetic())
    .unwrap_or(rest.len());
  if end == 0 {
    return None;
  }
  Some((&rest[..end], &rest[end..]))
}

/// Compute payload shape: `<op1> <operator> <op2> into <dest>`. The operator
/// is any single non-word character; the table in `Instruction` decides
/// whether it is one the language knows.
pub fn compute_parts(payload: &str) -> Option<(&str, char, &str, &str)> {
  let rest = payload.trim_start();
  let (lhs, rest) = split_word(rest)?;
  let rest = skip_space(rest)?;
  let mut chars = rest.chars();
  let operator = chars.next()?;
  if operator.is_alphanumeric() || operator == '_' || operator.is_whitespace() {
    return None;
  }
  let rest = skip_space(chars.as_str())?;
  let (rhs, rest) = split_word(rest)?;
  let rest = skip_space(rest)?;
  let rest = rest.strip_prefix("into")?;
  let rest = skip_space(rest)?;
  let (dest, rest) = split_word(rest)?;
  if !rest.trim_start().is_empty() {
    return None;
  }
  Some((lhs, operator, rhs, dest))
}

/// Closing line of a repeat: `) <count> time|times`. Returns the digits.
pub fn do_close(line: &str) -> Option<&str> {
  let rest = line.trim_start().strip_prefix(')')?;
  let rest = rest.trim_start();
  let end = rest
    .bytes()
    .position(|b| !b.is_ascii_digit())
    .unwrap_or(rest.len());
  if end == 0 {
    return None;
  }
  let digits = &rest[..end];
  let rest = skip_space(&rest[end..])?;
  let rest = rest.strip_prefix("time")?;
  let rest = rest.strip_prefix('s').unwrap_or(rest);
  if !rest.trim_start().is_empty() {
    return None;
  }
  Some(digits)
}

/// Net bracket-depth change for a line: every `(` occurrence counts up,
/// every `)` occurrence counts down.
pub fn paren_delta(line: &str) -> isize {
  let opens = line.bytes().filter(|&b| b == b'(').count() as isize;
  let closes = line.bytes().filter(|&b| b == b')').count() as isize;
  opens - closes
}
