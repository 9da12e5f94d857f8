//! Pipeline stages and their allowed transitions.

use std::fmt;

use serde::Serialize;

use super::PipelineError;

/// A step of a build run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
  Inspect,
  Provision,
  Prepare,
  Build,
  Finalize,
  Complete,
}

impl Stage {
  /// The only stage this one may move to.
  pub fn successor(self) -> Option<Stage> {
    match self {
      Self::Inspect => Some(Self::Provision),
      Self::Provision => Some(Self::Prepare),
      Self::Prepare => Some(Self::Build),
      Self::Build => Some(Self::Finalize),
      Self::Finalize => Some(Self::Complete),
      Self::Complete => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Inspect => "inspect",
      Self::Provision => "provision",
      Self::Prepare => "prepare",
      Self::Build => "build",
      Self::Finalize => "finalize",
      Self::Complete => "complete",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "stage", rename_all = "lowercase")]
pub enum PipelineState {
  At(Stage),
  /// Terminal: the run failed during this stage.
  Failed(Stage),
}

impl Default for PipelineState {
  fn default() -> Self {
    Self::At(Stage::Inspect)
  }
}

impl PipelineState {
  pub fn stage(&self) -> Stage {
    match self {
      Self::At(stage) | Self::Failed(stage) => *stage,
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Failed(_) | Self::At(Stage::Complete))
  }

  /// Move to `next`, which must be the current stage's successor.
  pub fn advance(&mut self, next: Stage) -> Result<(), PipelineError> {
    match *self {
      Self::At(current) if current.successor() == Some(next) => {
        *self = Self::At(next);
        Ok(())
      }
      from => Err(PipelineError::StageSkipped { from, to: next }),
    }
  }

  /// Mark the current stage as failed. Failing twice keeps the first stage.
  pub fn fail(&mut self) {
    *self = Self::Failed(self.stage());
  }
}

impl fmt::Display for PipelineState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::At(stage) => write!(f, "{stage}"),
      Self::Failed(stage) => write!(f, "failed during {stage}"),
    }
  }
}
