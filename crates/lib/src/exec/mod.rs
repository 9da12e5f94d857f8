//! External process execution.
//!
//! Every external tool (package managers, bundler, the version manager, the
//! renderers) is reached through a [`Runner`]. An [`Invocation`] carries the
//! complete context of one call: argv, working directory and environment
//! overlay. Nothing here changes the orchestrator's own working directory or
//! environment.

mod runner;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::env::EnvOverlay;

pub use runner::SystemRunner;

/// Errors that can occur while running an external process.
#[derive(Debug, Error)]
pub enum ExecError {
  /// The program could not be started (usually not installed).
  #[error("failed to start {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The program ran and exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}{}", stderr_suffix(stderr))]
  Failed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },
}

fn stderr_suffix(stderr: &str) -> String {
  let trimmed = stderr.trim();
  if trimmed.is_empty() {
    String::new()
  } else {
    format!("\n{trimmed}")
  }
}

impl ExecError {
  /// True when the program itself was not found.
  pub fn is_not_found(&self) -> bool {
    matches!(self, ExecError::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
  }
}

/// Output of a successful process run.
///
/// When output is streamed to the terminal, `stdout` and `stderr` are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
  pub stdout: String,
  pub stderr: String,
}

/// How a child's output is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
  /// Capture stdout and stderr; stderr is attached to failures.
  #[default]
  Capture,
  /// Let the child write directly to the terminal. Its stdout is sent to
  /// stderr, so stdout only ever carries docsmith's own results.
  Inherit,
}

/// One external process call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
  pub env: EnvOverlay,
  pub output: OutputMode,
}

impl Invocation {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      env: EnvOverlay::default(),
      output: OutputMode::Capture,
    }
  }

  /// Run `script` through the platform shell.
  pub fn shell(script: impl Into<String>) -> Self {
    let (shell, flag) = shell_program();
    Self::new(shell).arg(flag).arg(script)
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn env(mut self, overlay: &EnvOverlay) -> Self {
    self.env = overlay.clone();
    self
  }

  /// Stream output to the terminal when `verbose`, capture it otherwise.
  pub fn verbose(mut self, verbose: bool) -> Self {
    self.output = if verbose { OutputMode::Inherit } else { OutputMode::Capture };
    self
  }

  pub fn working_dir(&self) -> Option<&Path> {
    self.cwd.as_deref()
  }

  /// The full command line, quoted for display.
  pub fn command_line(&self) -> String {
    let mut words = Vec::with_capacity(self.args.len() + 1);
    words.push(self.program.as_str());
    words.extend(self.args.iter().map(String::as_str));
    shell_words::join(words)
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.command_line())
  }
}

/// Shell used for bootstrap snippets.
///
/// Always `/bin/sh` rather than `$SHELL`, so interactive profiles are not
/// sourced.
fn shell_program() -> (&'static str, &'static str) {
  #[cfg(unix)]
  {
    ("/bin/sh", "-c")
  }

  #[cfg(windows)]
  {
    ("cmd.exe", "/C")
  }
}

/// Executes invocations.
///
/// The production implementation is [`SystemRunner`]; tests substitute a
/// recording runner.
#[allow(async_fn_in_trait)]
pub trait Runner {
  /// Run the invocation to completion.
  ///
  /// Returns `Err(ExecError::Failed)` on a non-zero exit.
  async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecError>;

  /// Run the invocation and report only whether it succeeded.
  async fn probe(&self, invocation: &Invocation) -> bool {
    self.run(invocation).await.is_ok()
  }
}

impl<R: Runner> Runner for &R {
  async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecError> {
    (**self).run(invocation).await
  }
}
