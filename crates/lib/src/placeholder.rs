//! Placeholder parsing and substitution for command templates.
//!
//! Converter commands are written before the paths they operate on are
//! final (with atomic outputs the recipe writes to a staging file whose name
//! is only chosen at update time). Placeholders in program names and
//! arguments are substituted right before a command runs.
//!
//! # Placeholder Formats
//!
//! - `$${out}` - the path the recipe must write
//! - `$${in}` - the path of the first input
//! - `$${in:N}` - the path of the input at index N
//! - `$${inputs}` - every input path, as separate arguments (whole argument only)
//!
//! # Shell Variables
//!
//! Single `$` characters pass through unchanged, so arguments like `$HOME`
//! reach the program verbatim.
//!
//! # Escaping
//!
//! Use `$$$` before `{` to produce a literal `$${` sequence.
//!
//! # Example
//!
//! ```
//! use ndmake_lib::placeholder::{parse, Segment, Placeholder};
//!
//! let segments = parse("--export-png=$${out}").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Literal("--export-png=".to_string()),
//!     Segment::Placeholder(Placeholder::Out),
//! ]);
//! ```

use thiserror::Error;

/// A parsed placeholder reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
  /// `$${out}` - the output path
  Out,

  /// `$${in}` or `$${in:N}` - the input at index N
  Input(usize),

  /// `$${inputs}` - all inputs, one argument each
  Inputs,
}

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no placeholders)
  Literal(String),

  /// A placeholder to be resolved
  Placeholder(Placeholder),
}

/// Errors that can occur during placeholder parsing or resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
  #[error("unclosed placeholder at position {0}")]
  Unclosed(usize),

  #[error("unknown placeholder type: {0}")]
  UnknownType(String),

  #[error("invalid input index: {0}")]
  InvalidInputIndex(String),

  #[error("unresolved input: index {index} (have {count})")]
  UnresolvedInput { index: usize, count: usize },

  #[error("$${{inputs}} must be used as a whole argument")]
  InputsNotWhole,
}

/// Trait for resolving placeholder values when a command is rendered.
pub trait Resolver {
  /// Resolve the output path.
  fn resolve_out(&self) -> Result<&str, PlaceholderError>;

  /// Resolve an input path by index.
  fn resolve_input(&self, index: usize) -> Result<&str, PlaceholderError>;
}

/// Parse a string containing placeholders into segments.
///
/// # Errors
///
/// Returns an error if a placeholder is malformed (unclosed, unknown type, bad index).
pub fn parse(input: &str) -> Result<Vec<Segment>, PlaceholderError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    if ch != '$' {
      literal.push(ch);
      continue;
    }

    match chars.peek() {
      Some((_, '$')) => {
        chars.next();

        match chars.peek() {
          Some((_, '$')) => {
            chars.next();

            if let Some((_, '{')) = chars.peek() {
              // $$${ -> literal $${
              literal.push_str("$${");
              chars.next();
            } else {
              literal.push_str("$$$");
            }
          }
          Some((_, '{')) => {
            chars.next();

            if !literal.is_empty() {
              segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }

            let mut content = String::new();
            let mut found_close = false;

            for (_, c) in chars.by_ref() {
              if c == '}' {
                found_close = true;
                break;
              }
              content.push(c);
            }

            if !found_close {
              return Err(PlaceholderError::Unclosed(pos));
            }

            segments.push(Segment::Placeholder(parse_placeholder_content(&content)?));
          }
          _ => literal.push_str("$$"),
        }
      }
      _ => literal.push('$'),
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Parse the content inside a placeholder (everything between `$${` and `}`).
fn parse_placeholder_content(content: &str) -> Result<Placeholder, PlaceholderError> {
  match content {
    "out" => return Ok(Placeholder::Out),
    "in" => return Ok(Placeholder::Input(0)),
    "inputs" => return Ok(Placeholder::Inputs),
    _ => {}
  }

  match content.split_once(':') {
    Some(("in", index)) => index
      .parse::<usize>()
      .map(Placeholder::Input)
      .map_err(|_| PlaceholderError::InvalidInputIndex(index.to_string())),
    Some((kind, _)) => Err(PlaceholderError::UnknownType(kind.to_string())),
    None => Err(PlaceholderError::UnknownType(content.to_string())),
  }
}

/// Returns true if the parsed segments are exactly one `$${inputs}` placeholder.
pub fn is_whole_inputs(segments: &[Segment]) -> bool {
  matches!(segments, [Segment::Placeholder(Placeholder::Inputs)])
}

/// Substitute all placeholders in a string using the provided resolver.
///
/// # Errors
///
/// Returns an error if parsing fails, if any placeholder cannot be resolved,
/// or if `$${inputs}` appears inside a larger string.
pub fn substitute(input: &str, resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let segments = parse(input)?;
  substitute_segments(&segments, resolver)
}

/// Substitute placeholders in pre-parsed segments.
pub fn substitute_segments(segments: &[Segment], resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let mut result = String::new();

  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Placeholder(Placeholder::Out) => result.push_str(resolver.resolve_out()?),
      Segment::Placeholder(Placeholder::Input(index)) => result.push_str(resolver.resolve_input(*index)?),
      Segment::Placeholder(Placeholder::Inputs) => return Err(PlaceholderError::InputsNotWhole),
    }
  }

  Ok(result)
}
