//! Render invocation for a single target.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use super::{BuildOptions, BuildTarget, RenderOption};
use crate::config::DocumentConfig;
use crate::consts::SOURCE_DIR;
use crate::env::EnvOverlay;
use crate::exec::{ExecError, Invocation, Runner};

/// Errors that can occur while rendering a target.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error("failed to build {target}: {source}")]
  Render {
    target: BuildTarget,
    #[source]
    source: ExecError,
  },
}

impl BuildError {
  pub fn target(&self) -> BuildTarget {
    match self {
      Self::Render { target, .. } => *target,
    }
  }
}

/// Assembles and runs renderer invocations.
///
/// One builder serves every target of a run; only the working directory and
/// the target-specific head of the command line differ between targets.
pub struct DocumentBuilder<'a, R: Runner> {
  runner: &'a R,
  options: BuildOptions,
  requires: Vec<RenderOption>,
  env: EnvOverlay,
  source: String,
  verbose: bool,
}

impl<'a, R: Runner> DocumentBuilder<'a, R> {
  /// `requires` are toolchain extensions with placeholders already
  /// substituted. `env` is the toolchain overlay; `LANG` is added from the
  /// document locale.
  pub fn new(
    runner: &'a R,
    document: &DocumentConfig,
    options: BuildOptions,
    requires: &[String],
    env: &EnvOverlay,
    verbose: bool,
  ) -> Self {
    Self {
      runner,
      options,
      requires: requires.iter().cloned().map(RenderOption::Require).collect(),
      env: env.with_var("LANG", &document.locale),
      source: format!("{SOURCE_DIR}/{}", document.source),
      verbose,
    }
  }

  /// The renderer invocation for `target`, run from `workspace`.
  pub fn command_for(&self, target: BuildTarget, workspace: &Path) -> Invocation {
    let base = target.base_command();

    Invocation::new(base[0])
      .args(base[1..].iter().copied())
      .args(target.extra_args().iter().copied())
      .args(self.options.to_args())
      .args(self.requires.iter().flat_map(RenderOption::to_args))
      .arg(&self.source)
      .cwd(workspace)
      .env(&self.env)
      .verbose(self.verbose)
  }

  /// Render `target` once inside `workspace`.
  ///
  /// Success means the renderer exited zero; the artifact itself is not
  /// inspected.
  pub async fn build(&self, target: BuildTarget, workspace: &Path) -> Result<(), BuildError> {
    let invocation = self.command_for(target, workspace);

    info!(target = %target, workspace = %workspace.display(), "building");
    debug!(cmd = %invocation, "render command");

    self
      .runner
      .run(&invocation)
      .await
      .map_err(|source| BuildError::Render { target, source })?;

    info!(target = %target, "build finished");
    Ok(())
  }
}
