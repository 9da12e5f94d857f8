//! Test utilities for docsmith-lib.
//!
//! Cross-platform shell helpers for tests that spawn real processes, and a
//! recording [`Runner`] for tests that must not.

use std::path::Path;
use std::sync::Mutex;

use crate::exec::{ExecError, Invocation, ProcessOutput, Runner};

/// Returns an invocation that runs a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> Invocation {
  Invocation::new("/bin/sh").args(["-c", script])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> Invocation {
  Invocation::new("cmd.exe").args(["/C", script])
}

/// Returns an invocation that echoes an environment variable.
#[cfg(unix)]
pub fn echo_env(var: &str) -> Invocation {
  shell_cmd(&format!("echo \"${}\"", var))
}

#[cfg(windows)]
pub fn echo_env(var: &str) -> Invocation {
  shell_cmd(&format!("echo %{}%", var))
}

type Responder = Box<dyn Fn(&Invocation) -> Result<ProcessOutput, ExecError> + Send + Sync>;

/// Runner that records every invocation and answers from a closure.
pub struct RecordingRunner {
  calls: Mutex<Vec<Invocation>>,
  responder: Responder,
}

impl RecordingRunner {
  pub fn new<F>(responder: F) -> Self
  where
    F: Fn(&Invocation) -> Result<ProcessOutput, ExecError> + Send + Sync + 'static,
  {
    Self {
      calls: Mutex::new(Vec::new()),
      responder: Box::new(responder),
    }
  }

  /// A runner for which every command succeeds with empty output.
  pub fn succeeding() -> Self {
    Self::new(|_| Ok(ProcessOutput::default()))
  }

  pub fn calls(&self) -> Vec<Invocation> {
    self.calls.lock().unwrap().clone()
  }

  /// Recorded invocations rendered as command lines.
  pub fn command_lines(&self) -> Vec<String> {
    self.calls().iter().map(Invocation::command_line).collect()
  }

  /// True if any recorded invocation's command line starts with `prefix`.
  pub fn ran(&self, prefix: &str) -> bool {
    self.command_lines().iter().any(|line| line.starts_with(prefix))
  }
}

impl Runner for RecordingRunner {
  async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecError> {
    self.calls.lock().unwrap().push(invocation.clone());
    (self.responder)(invocation)
  }
}

/// Successful output with the given stdout.
pub fn stdout(text: &str) -> Result<ProcessOutput, ExecError> {
  Ok(ProcessOutput {
    stdout: text.to_string(),
    stderr: String::new(),
  })
}

/// A non-zero exit for `invocation`.
pub fn failed(invocation: &Invocation, stderr: &str) -> Result<ProcessOutput, ExecError> {
  Err(ExecError::Failed {
    cmd: invocation.command_line(),
    code: Some(1),
    stderr: stderr.to_string(),
  })
}

/// A program that is not installed.
pub fn not_found(invocation: &Invocation) -> Result<ProcessOutput, ExecError> {
  Err(ExecError::Spawn {
    program: invocation.program.clone(),
    source: std::io::Error::from(std::io::ErrorKind::NotFound),
  })
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, content).unwrap();
}
