//! The option set shared by every render invocation.

use std::path::Path;

use chrono::NaiveDate;

use super::ReleaseProfile;
use crate::config::RenderConfig;
use crate::consts::WORKSPACE_OUTPUT_DIR;

/// Attribute names with special meaning to the orchestrator.
pub const WATERMARK_ATTRIBUTE: &str = "draft-watermark";
pub const REVISION_ATTRIBUTE: &str = "revnumber";
pub const DESCRIPTION_ATTRIBUTE: &str = "revremark";

/// One renderer option. Each variant expands to discrete argv tokens, so
/// values containing spaces need no quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOption {
  /// A bare flag such as `--trace` or `--failure-level=WARN`.
  Flag(String),
  /// `-a name` or `-a name=value`.
  Attribute { name: String, value: Option<String> },
  /// `-D dir`, relative to the renderer's working directory.
  DestinationDir(String),
  /// `--require=library`.
  Require(String),
}

impl RenderOption {
  pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self::Attribute {
      name: name.into(),
      value: Some(value.into()),
    }
  }

  pub fn switch(name: impl Into<String>) -> Self {
    Self::Attribute {
      name: name.into(),
      value: None,
    }
  }

  pub fn to_args(&self) -> Vec<String> {
    match self {
      Self::Flag(flag) => vec![flag.clone()],
      Self::Attribute { name, value: None } => vec!["-a".to_string(), name.clone()],
      Self::Attribute { name, value: Some(value) } => vec!["-a".to_string(), format!("{name}={value}")],
      Self::DestinationDir(dir) => vec!["-D".to_string(), dir.clone()],
      Self::Require(lib) => vec![format!("--require={lib}")],
    }
  }
}

/// Ordered renderer options: the shared set from configuration followed by
/// the release profile's watermark, revision and description.
///
/// Built once per [`DocumentBuilder`](super::DocumentBuilder) and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
  options: Vec<RenderOption>,
}

impl BuildOptions {
  pub fn new(render: &RenderConfig, root: &Path, profile: ReleaseProfile, version: &str, today: NaiveDate) -> Self {
    let mut options = Vec::new();

    if render.trace {
      options.push(RenderOption::Flag("--trace".to_string()));
    }
    if render.compress {
      options.push(RenderOption::switch("compress"));
    }
    options.push(RenderOption::attribute("mathematical-format", &render.math_format));
    options.push(RenderOption::attribute("pdf-fontsdir", &render.fonts_dir));
    options.push(RenderOption::attribute("pdf-theme", &render.theme));
    options.push(RenderOption::attribute("docinfo", &render.docinfo));
    options.push(RenderOption::DestinationDir(WORKSPACE_OUTPUT_DIR.to_string()));

    let bibliography = if render.bibliography.is_absolute() {
      render.bibliography.clone()
    } else {
      root.join(&render.bibliography)
    };
    options.push(RenderOption::attribute("bibtex-file", bibliography.display().to_string()));
    options.push(RenderOption::Flag(format!("--failure-level={}", render.failure_level)));

    if profile.has_watermark() {
      options.push(RenderOption::switch(WATERMARK_ATTRIBUTE));
    }
    options.push(RenderOption::attribute(
      REVISION_ATTRIBUTE,
      profile.revision_label(version, today),
    ));
    options.push(RenderOption::attribute(DESCRIPTION_ATTRIBUTE, profile.description()));

    Self { options }
  }

  /// Every value given for attribute `name`, in order. A switch yields `None`.
  pub fn attribute_values(&self, name: &str) -> Vec<Option<&str>> {
    self
      .options
      .iter()
      .filter_map(|option| match option {
        RenderOption::Attribute { name: n, value } if n == name => Some(value.as_deref()),
        _ => None,
      })
      .collect()
  }

  pub fn to_args(&self) -> Vec<String> {
    self.options.iter().flat_map(RenderOption::to_args).collect()
  }
}
