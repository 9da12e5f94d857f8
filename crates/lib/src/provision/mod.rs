//! Dependency provisioning.
//!
//! Makes sure everything the renderers need is present before any workspace
//! is touched: system packages through the host package manager, the Node
//! runtime used by the diagram renderer, and the bundler-managed document
//! toolchain. Every step is fail-fast; the first error aborts the run.
//!
//! Steps never modify the orchestrator's own environment. Each one takes the
//! current [`EnvOverlay`] and returns an extended copy.

mod runtime;
mod system;
mod toolchain;

use std::path::PathBuf;

use thiserror::Error;

use crate::config::Project;
use crate::exec::{ExecError, Runner};
use crate::placeholder::PlaceholderError;
use crate::platform::{PackageManager, is_elevated};

pub use toolchain::DocumentToolchain;

/// Errors that can occur while provisioning dependencies.
#[derive(Debug, Error)]
pub enum ProvisionError {
  #[error("failed to install {} package(s) with {manager}: {source}", packages.len())]
  Install {
    manager: PackageManager,
    packages: Vec<String>,
    #[source]
    source: ExecError,
  },

  #[error("failed to install the node version manager: {0}")]
  Bootstrap(#[source] ExecError),

  #[error("cannot locate the node version manager: set dependencies.node.fnm_dir or HOME")]
  NoVersionManagerHome,

  #[error("failed to install node {version}: {source}")]
  NodeInstall {
    version: String,
    #[source]
    source: ExecError,
  },

  #[error("node {version} is still unavailable after installation")]
  NodeUnavailable { version: String },

  #[error("package manifest not found: {}", path.display())]
  MissingManifest { path: PathBuf },

  #[error("npm install failed: {0}")]
  NpmInstall(#[source] ExecError),

  #[error("bundler is not available; install it with the system packages first")]
  BundlerUnavailable,

  #[error("Gemfile not found: {}", path.display())]
  MissingGemfile { path: PathBuf },

  #[error("bundle {step} failed: {source}")]
  Bundle {
    step: &'static str,
    #[source]
    source: ExecError,
  },

  #[error("could not determine the ruby ABI version: {0}")]
  RubyVersion(String),

  #[error("invalid toolchain extension '{value}': {source}")]
  Extension {
    value: String,
    #[source]
    source: PlaceholderError,
  },
}

/// Drives every provisioning step for one project.
pub struct Provisioner<'a, R: Runner> {
  project: &'a Project,
  runner: &'a R,
  verbose: bool,
  elevated: bool,
}

impl<'a, R: Runner> Provisioner<'a, R> {
  pub fn new(project: &'a Project, runner: &'a R, verbose: bool) -> Self {
    Self {
      project,
      runner,
      verbose,
      elevated: is_elevated(),
    }
  }

  /// Override privilege detection for install commands.
  pub fn elevated(mut self, elevated: bool) -> Self {
    self.elevated = elevated;
    self
  }
}
