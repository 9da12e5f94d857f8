//! Build targets and release profiles.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Error parsing a target or profile name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("unknown build target '{0}' (expected all, pdf, html, epub or tags)")]
  UnknownTarget(String),

  #[error("unknown release profile '{0}' (expected draft, intermediate or official)")]
  UnknownProfile(String),
}

/// An output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
  Pdf,
  Html,
  Epub,
  /// Machine-readable index of normative tags, as JSON.
  Tags,
}

impl BuildTarget {
  /// Every target, in the order an "all" build runs them. The tag index is
  /// last.
  pub const BUILD_ORDER: [BuildTarget; 4] = [Self::Pdf, Self::Epub, Self::Html, Self::Tags];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Pdf => "pdf",
      Self::Html => "html",
      Self::Epub => "epub",
      Self::Tags => "tags",
    }
  }

  /// Filename of the artifact produced for a document called `name`.
  pub fn artifact_name(&self, name: &str) -> String {
    match self {
      Self::Pdf => format!("{name}.pdf"),
      Self::Html => format!("{name}.html"),
      Self::Epub => format!("{name}.epub"),
      Self::Tags => format!("{name}-norm-tags.json"),
    }
  }

  /// Renderer command for this target.
  pub fn base_command(&self) -> &'static [&'static str] {
    match self {
      Self::Pdf => &["bundle", "exec", "asciidoctor-pdf"],
      Self::Html => &["bundle", "exec", "asciidoctor"],
      Self::Epub => &["bundle", "exec", "asciidoctor-epub3"],
      Self::Tags => &[
        "bundle",
        "exec",
        "asciidoctor",
        "--backend",
        "tags",
        "--require=./docs-resources/converters/tags.rb",
      ],
    }
  }

  /// Flags only this target receives, placed right after the base command.
  pub fn extra_args(&self) -> &'static [&'static str] {
    match self {
      Self::Tags => &[
        "-a",
        "tags-match-prefix=norm:",
        "-a",
        "tags-output-suffix=-norm-tags.json",
      ],
      _ => &[],
    }
  }
}

impl fmt::Display for BuildTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for BuildTarget {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pdf" => Ok(Self::Pdf),
      "html" => Ok(Self::Html),
      "epub" => Ok(Self::Epub),
      "tags" | "json" => Ok(Self::Tags),
      other => Err(ParseError::UnknownTarget(other.to_string())),
    }
  }
}

/// Which targets one invocation builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetSelection {
  #[default]
  All,
  Only(BuildTarget),
}

impl TargetSelection {
  /// The selected targets in build order.
  pub fn targets(&self) -> Vec<BuildTarget> {
    match self {
      Self::All => BuildTarget::BUILD_ORDER.to_vec(),
      Self::Only(target) => vec![*target],
    }
  }
}

impl FromStr for TargetSelection {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "all" => Ok(Self::All),
      other => other.parse().map(Self::Only),
    }
  }
}

impl fmt::Display for TargetSelection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => write!(f, "all"),
      Self::Only(target) => write!(f, "{target}"),
    }
  }
}

/// Release flavour of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseProfile {
  #[default]
  Draft,
  Intermediate,
  Official,
}

impl ReleaseProfile {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Draft => "draft",
      Self::Intermediate => "intermediate",
      Self::Official => "official",
    }
  }

  /// Only drafts carry a watermark.
  pub fn has_watermark(&self) -> bool {
    matches!(self, Self::Draft)
  }

  /// Human-readable remark printed with the revision.
  pub fn description(&self) -> &'static str {
    match self {
      Self::Draft => "DRAFT---NOT AN OFFICIAL RELEASE",
      Self::Intermediate => "Intermediate Release",
      Self::Official => "Official Release",
    }
  }

  /// Revision label: the build date (`YYYYMMDD`) for drafts, the release
  /// version otherwise.
  pub fn revision_label(&self, version: &str, today: NaiveDate) -> String {
    match self {
      Self::Draft => today.format("%Y%m%d").to_string(),
      Self::Intermediate | Self::Official => version.to_string(),
    }
  }
}

impl fmt::Display for ReleaseProfile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for ReleaseProfile {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "draft" => Ok(Self::Draft),
      "intermediate" => Ok(Self::Intermediate),
      "official" => Ok(Self::Official),
      other => Err(ParseError::UnknownProfile(other.to_string())),
    }
  }
}
