//! Placeholder parsing and substitution for late-bound toolchain paths.
//!
//! The gem library path is only known once bundler has installed the
//! document toolchain, but renderer extension flags are configured up front.
//! Those flags may therefore reference values that are substituted after
//! provisioning.
//!
//! # Placeholder Formats
//!
//! - `$${root}` - the project root
//! - `$${toolchain:lib}` - the installed gem library directory
//! - `$${toolchain:bin}` - the installed gem binary directory
//!
//! # Example
//!
//! ```
//! use docsmith_lib::placeholder::{parse, Placeholder, Segment, ToolchainPath};
//!
//! let segments = parse("$${toolchain:lib}/asciidoctor-sail/lib").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Placeholder(Placeholder::Toolchain(ToolchainPath::Lib)),
//!     Segment::Literal("/asciidoctor-sail/lib".to_string()),
//! ]);
//! ```

use thiserror::Error;

/// Which resolved toolchain directory a placeholder refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainPath {
  Lib,
  Bin,
}

/// A parsed placeholder reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
  /// `$${root}`
  Root,
  /// `$${toolchain:lib}` or `$${toolchain:bin}`
  Toolchain(ToolchainPath),
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

  #[error("unknown placeholder: {0}")]
  Unknown(String),

  #[error("toolchain path not resolved yet: {0:?}")]
  Unresolved(ToolchainPath),
}

/// Source of placeholder values.
pub trait Resolver {
  fn resolve_root(&self) -> Result<&str, PlaceholderError>;

  fn resolve_toolchain(&self, path: ToolchainPath) -> Result<&str, PlaceholderError>;
}

/// Opening of every placeholder; the reference runs to the next `}`.
const OPEN: &str = "$${";

/// Parse a string containing placeholders into segments.
///
/// Text that does not start a placeholder, including lone `$` characters,
/// is kept as a literal.
pub fn parse(input: &str) -> Result<Vec<Segment>, PlaceholderError> {
  let mut segments = Vec::new();
  let mut rest = input;
  let mut offset = 0;

  while let Some(start) = rest.find(OPEN) {
    if start > 0 {
      segments.push(Segment::Literal(rest[..start].to_string()));
    }

    let reference = &rest[start + OPEN.len()..];
    let end = reference.find('}').ok_or(PlaceholderError::Unclosed(offset + start))?;
    segments.push(Segment::Placeholder(parse_placeholder_content(&reference[..end])?));

    let consumed = start + OPEN.len() + end + 1;
    offset += consumed;
    rest = &rest[consumed..];
  }

  if !rest.is_empty() {
    segments.push(Segment::Literal(rest.to_string()));
  }

  Ok(segments)
}

fn parse_placeholder_content(content: &str) -> Result<Placeholder, PlaceholderError> {
  match content {
    "root" => Ok(Placeholder::Root),
    "toolchain:lib" => Ok(Placeholder::Toolchain(ToolchainPath::Lib)),
    "toolchain:bin" => Ok(Placeholder::Toolchain(ToolchainPath::Bin)),
    other => Err(PlaceholderError::Unknown(other.to_string())),
  }
}

/// Substitute all placeholders in a string using the provided resolver.
pub fn substitute(input: &str, resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let segments = parse(input)?;
  let mut result = String::with_capacity(input.len());

  for segment in &segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Placeholder(Placeholder::Root) => result.push_str(resolver.resolve_root()?),
      Segment::Placeholder(Placeholder::Toolchain(path)) => result.push_str(resolver.resolve_toolchain(*path)?),
    }
  }

  Ok(result)
}
