//! Explicit environment overlays for child processes.
//!
//! Provisioning discovers directories that later steps need on `PATH` (gem
//! binaries, the Node version manager, `node_modules/.bin`) and variables such
//! as `RUBYLIB`. Rather than mutating the orchestrator's own environment, each
//! step returns a new [`EnvOverlay`] that is handed to every invocation that
//! needs it. The parent environment is inherited and the overlay is applied on
//! top of it when the child is spawned.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

use tokio::process::Command;
use tracing::warn;

/// Immutable set of environment changes applied to a child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
  /// Directories prepended to `PATH`, highest precedence first.
  path_prefix: Vec<PathBuf>,
  vars: BTreeMap<String, String>,
}

impl EnvOverlay {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns a copy with `dir` prepended to `PATH`, ahead of every prefix
  /// already present.
  pub fn with_path_prefix(&self, dir: impl Into<PathBuf>) -> Self {
    let dir = dir.into();
    let mut next = self.clone();
    next.path_prefix.retain(|p| p != &dir);
    next.path_prefix.insert(0, dir);
    next
  }

  /// Returns a copy with `key` set to `value`.
  pub fn with_var(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
    let mut next = self.clone();
    next.vars.insert(key.into(), value.into());
    next
  }

  pub fn path_prefix(&self) -> &[PathBuf] {
    &self.path_prefix
  }

  pub fn var(&self, key: &str) -> Option<&str> {
    self.vars.get(key).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.path_prefix.is_empty() && self.vars.is_empty()
  }

  /// Compute the `PATH` a child should see, given the parent's value.
  ///
  /// Returns `None` when the overlay adds nothing, meaning the inherited
  /// value is used unchanged. An entry containing the separator cannot be
  /// joined; the overlay's `PATH` is then dropped with a warning.
  pub fn path_value(&self, inherited: Option<OsString>) -> Option<OsString> {
    if self.path_prefix.is_empty() {
      return None;
    }

    let inherited: Vec<PathBuf> = inherited
      .map(|value| std::env::split_paths(&value).collect())
      .unwrap_or_default();

    let entries = self.path_prefix.iter().cloned().chain(inherited);
    match std::env::join_paths(entries) {
      Ok(value) => Some(value),
      Err(e) => {
        warn!(
          prefix = ?self.path_prefix,
          error = %e,
          "cannot extend PATH, a directory contains the path separator; tools it provides will not be found"
        );
        None
      }
    }
  }

  /// Apply the overlay to a command about to be spawned.
  ///
  /// On Unix the child's `PATH` is also used to locate the program itself.
  pub fn apply(&self, command: &mut Command) {
    if let Some(path) = self.path_value(std::env::var_os("PATH")) {
      command.env("PATH", path);
    }
    for (key, value) in &self.vars {
      command.env(key, value);
    }
  }
}
