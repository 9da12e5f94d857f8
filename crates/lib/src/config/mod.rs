//! Project configuration.
//!
//! Every field has a default matching the manual this tool was built for, so
//! a project without a `docsmith.toml` builds out of the box. A config file at
//! the project root may override any subset of fields; relative paths are
//! resolved against the project root.

mod defaults;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{ASSETS_DIR, CONFIG_FILENAME, RESOURCES_DIR, SOURCE_DIR};
use crate::platform::PackageManager;

/// Errors that can occur while loading the project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("invalid config {}: {source}", path.display())]
  Parse { path: PathBuf, source: toml::de::Error },

  #[error("project root {} is not a directory", path.display())]
  NotADirectory { path: PathBuf },
}

/// Complete configuration for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub document: DocumentConfig,
  pub render: RenderConfig,
  pub dependencies: DependencySpec,
  pub diagrams: DiagramConfig,
}

/// What is being built and where it goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
  /// Base name of every produced artifact.
  pub name: String,
  /// Entry document, relative to `src/`.
  pub source: String,
  /// Revision label for intermediate and official releases.
  pub version: String,
  /// Value of `LANG` for every render invocation.
  pub locale: String,
  pub build_dir: PathBuf,
  /// Files that must exist before building. A missing one triggers a
  /// submodule checkout.
  pub required_resources: Vec<PathBuf>,
}

/// Options shared by every render invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
  pub trace: bool,
  pub compress: bool,
  pub math_format: String,
  pub fonts_dir: String,
  pub theme: String,
  pub docinfo: String,
  pub bibliography: PathBuf,
  pub failure_level: String,
  /// Toolchain extensions passed to every renderer. May contain
  /// `$${toolchain:lib}`, `$${toolchain:bin}` and `$${root}` placeholders.
  pub requires: Vec<String>,
}

/// Static description of everything provisioning has to make available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DependencySpec {
  pub packages: PackageLists,
  pub ruby: RubyToolchain,
  pub node: NodeRuntime,
}

/// Required system packages, per package manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageLists {
  pub apt: Vec<String>,
  pub dnf: Vec<String>,
  pub pacman: Vec<String>,
}

impl PackageLists {
  pub fn for_manager(&self, manager: PackageManager) -> &[String] {
    match manager {
      PackageManager::Apt => &self.apt,
      PackageManager::Dnf => &self.dnf,
      PackageManager::Pacman => &self.pacman,
    }
  }
}

/// Bundler-managed document toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RubyToolchain {
  pub gemfile: PathBuf,
  /// Project-local gem install path, never system-global.
  pub install_path: PathBuf,
}

/// Node runtime used by the diagram renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeRuntime {
  /// Shell snippet that installs the version manager.
  pub bootstrap: String,
  pub version: String,
  pub manifest: PathBuf,
  pub bin_path: PathBuf,
  /// Version manager home. Defaults to `$HOME/.local/share/fnm`.
  pub fnm_dir: Option<PathBuf>,
}

/// Diagram regeneration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramConfig {
  pub source_dir: PathBuf,
  pub output_dir: PathBuf,
  pub extension: String,
  pub marker: String,
  pub renderer: String,
}

/// A loaded configuration anchored at a project root.
#[derive(Debug, Clone)]
pub struct Project {
  root: PathBuf,
  pub config: Config,
}

impl Project {
  /// Create a project from an explicit configuration.
  pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
    Self {
      root: root.into(),
      config,
    }
  }

  /// Load the project at `root`, reading `docsmith.toml` when present.
  pub fn load(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let root = root.into();
    if !root.is_dir() {
      return Err(ConfigError::NotADirectory { path: root });
    }

    let path = root.join(CONFIG_FILENAME);
    let config = if path.exists() {
      debug!(path = %path.display(), "loading project config");
      let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
      })?;
      toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?
    } else {
      debug!(root = %root.display(), "no project config, using defaults");
      Config::default()
    };

    Ok(Self { root, config })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Resolve a configured path against the project root.
  pub fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }

  pub fn build_dir(&self) -> PathBuf {
    self.resolve(&self.config.document.build_dir)
  }

  pub fn source_dir(&self) -> PathBuf {
    self.root.join(SOURCE_DIR)
  }

  pub fn resources_dir(&self) -> PathBuf {
    self.root.join(RESOURCES_DIR)
  }

  pub fn assets_dir(&self) -> PathBuf {
    self.root.join(ASSETS_DIR)
  }
}
