//! Template placeholder parsing and substitution.
//!
//! Setup templates are written once and filled in by the outer build system
//! before the resolver runs. This module understands the two token kinds that
//! appear in them, so a template can be rendered without that build system
//! and so a config can be checked for tokens that were never filled in.
//!
//! # Placeholder Formats
//!
//! - `@NAME@` - a configure-time variable (`NAME` is an identifier)
//! - `$<TARGET_FILE:name>` - the built file of target `name`
//!
//! # Pass-through
//!
//! An `@` that does not open a well-formed `@NAME@` token is kept as literal
//! text, as is a `$` not followed by `<`. Runtime markers such as
//! `$ORIGIN/../../` therefore survive substitution unchanged.
//!
//! # Example
//!
//! ```
//! use dbe_build_lib::placeholder::{parse, Segment, Placeholder};
//!
//! let segments = parse("@CMAKE_SOURCE_DIR@/ThirdParty").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Placeholder(Placeholder::Var("CMAKE_SOURCE_DIR".to_string())),
//!     Segment::Literal("/ThirdParty".to_string()),
//! ]);
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

/// A parsed placeholder reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
  /// `@NAME@` - configure-time variable
  Var(String),

  /// `$<TARGET_FILE:name>` - built file of a target
  TargetFile(String),
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
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum PlaceholderError {
  #[error("unclosed generator expression at position {0}")]
  Unclosed(usize),

  #[error("unknown generator expression: {0}")]
  UnknownType(String),

  #[error("malformed generator expression: {0}")]
  Malformed(String),

  #[error("unresolved variable: @{0}@")]
  UnresolvedVar(String),

  #[error("unresolved target file: {0}")]
  UnresolvedTarget(String),
}

/// Trait for resolving placeholder values during rendering.
pub trait Resolver {
  /// Resolve a configure-time variable by name.
  fn resolve_var(&self, name: &str) -> Result<&str, PlaceholderError>;

  /// Resolve the built file of a target.
  fn resolve_target_file(&self, target: &str) -> Result<&str, PlaceholderError>;
}

/// Map-backed resolver used by the `render` command and tests.
#[derive(Debug, Clone, Default)]
pub struct VarResolver {
  vars: BTreeMap<String, String>,
  targets: BTreeMap<String, String>,
}

impl VarResolver {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.vars.insert(name.into(), value.into());
    self
  }

  pub fn with_target(mut self, target: impl Into<String>, file: impl Into<String>) -> Self {
    self.targets.insert(target.into(), file.into());
    self
  }
}

impl Resolver for VarResolver {
  fn resolve_var(&self, name: &str) -> Result<&str, PlaceholderError> {
    self
      .vars
      .get(name)
      .map(|s| s.as_str())
      .ok_or_else(|| PlaceholderError::UnresolvedVar(name.to_string()))
  }

  fn resolve_target_file(&self, target: &str) -> Result<&str, PlaceholderError> {
    self
      .targets
      .get(target)
      .map(|s| s.as_str())
      .ok_or_else(|| PlaceholderError::UnresolvedTarget(target.to_string()))
  }
}

fn is_ident_start(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a string containing placeholders into segments.
///
/// # Errors
///
/// Returns an error if a `$<...>` generator expression is unclosed, malformed,
/// or of a kind other than `TARGET_FILE`.
pub fn parse(input: &str) -> Result<Vec<Segment>, PlaceholderError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    match ch {
      '@' => {
        let mut name = String::new();
        if chars.peek().is_some_and(|&(_, c)| is_ident_start(c)) {
          while let Some(&(_, c)) = chars.peek() {
            if !is_ident_char(c) {
              break;
            }
            name.push(c);
            chars.next();
          }
        }

        if !name.is_empty() && chars.peek().is_some_and(|&(_, c)| c == '@') {
          chars.next(); // closing @
          if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
          }
          segments.push(Segment::Placeholder(Placeholder::Var(name)));
        } else {
          // Not a token; the closing @ (if any) may open the next one
          literal.push('@');
          literal.push_str(&name);
        }
      }
      '$' if chars.peek().is_some_and(|&(_, c)| c == '<') => {
        chars.next(); // consume the <

        let mut content = String::new();
        let mut found_close = false;
        for (_, c) in chars.by_ref() {
          if c == '>' {
            found_close = true;
            break;
          }
          content.push(c);
        }

        if !found_close {
          return Err(PlaceholderError::Unclosed(pos));
        }

        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(parse_generator_expression(&content)?));
      }
      _ => literal.push(ch),
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Parse the content of a generator expression (everything between `$<` and `>`).
fn parse_generator_expression(content: &str) -> Result<Placeholder, PlaceholderError> {
  let (kind, target) = content
    .split_once(':')
    .ok_or_else(|| PlaceholderError::Malformed(format!("missing colon in '{content}'")))?;

  match kind {
    "TARGET_FILE" if target.is_empty() => Err(PlaceholderError::Malformed(format!(
      "missing target name in '{content}'"
    ))),
    "TARGET_FILE" => Ok(Placeholder::TargetFile(target.to_string())),
    _ => Err(PlaceholderError::UnknownType(kind.to_string())),
  }
}

/// Returns true if `input` still carries a token the outer build system should
/// have substituted. Malformed generator expressions count as unsubstituted.
pub fn contains_placeholders(input: &str) -> bool {
  match parse(input) {
    Ok(segments) => segments.iter().any(|s| matches!(s, Segment::Placeholder(_))),
    Err(_) => true,
  }
}

/// Substitute all placeholders in a string using the provided resolver.
///
/// # Errors
///
/// Returns an error if parsing fails or if any placeholder cannot be resolved.
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
      Segment::Placeholder(p) => {
        let value = match p {
          Placeholder::Var(name) => resolver.resolve_var(name)?,
          Placeholder::TargetFile(target) => resolver.resolve_target_file(target)?,
        };
        result.push_str(value);
      }
    }
  }

  Ok(result)
}
