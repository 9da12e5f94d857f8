//! Bundler-managed document toolchain.

use std::path::PathBuf;

use tracing::{debug, info};

use super::{ProvisionError, Provisioner};
use crate::env::EnvOverlay;
use crate::exec::{Invocation, Runner};
use crate::placeholder::{self, PlaceholderError, Resolver, ToolchainPath};

const RUBY_VERSION_SCRIPT: &str = r#"print RbConfig::CONFIG["ruby_version"]"#;

/// The installed document toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentToolchain {
  /// Overlay with the gem binaries on `PATH` and `RUBYLIB` set.
  pub env: EnvOverlay,
  pub bin: PathBuf,
  pub lib: PathBuf,
  /// Renderer extensions with every placeholder substituted.
  pub requires: Vec<String>,
}

struct InstalledPaths {
  root: String,
  bin: String,
  lib: String,
}

impl Resolver for InstalledPaths {
  fn resolve_root(&self) -> Result<&str, PlaceholderError> {
    Ok(self.root.as_str())
  }

  fn resolve_toolchain(&self, path: ToolchainPath) -> Result<&str, PlaceholderError> {
    Ok(match path {
      ToolchainPath::Lib => self.lib.as_str(),
      ToolchainPath::Bin => self.bin.as_str(),
    })
  }
}

impl<R: Runner> Provisioner<'_, R> {
  /// Install the gems named by the project's Gemfile into the project-local
  /// install path and resolve the paths renderers need.
  pub async fn ensure_document_toolchain(&self, overlay: &EnvOverlay) -> Result<DocumentToolchain, ProvisionError> {
    let ruby = &self.project.config.dependencies.ruby;
    let root = self.project.root();

    let gemfile = self.project.resolve(&ruby.gemfile);
    if !gemfile.is_file() {
      return Err(ProvisionError::MissingGemfile { path: gemfile });
    }
    let env = overlay.with_var("BUNDLE_GEMFILE", gemfile.display().to_string());

    let version = Invocation::new("bundle").arg("--version").cwd(root).env(&env);
    if !self.runner.probe(&version).await {
      return Err(ProvisionError::BundlerUnavailable);
    }

    let install_path = self.project.resolve(&ruby.install_path);
    let configure = Invocation::new("bundle")
      .args(["config", "set", "--local", "path"])
      .arg(install_path.display().to_string())
      .cwd(root)
      .env(&env);
    self
      .runner
      .run(&configure)
      .await
      .map_err(|source| ProvisionError::Bundle { step: "config", source })?;

    info!(path = %install_path.display(), "installing document toolchain");
    let install = Invocation::new("bundle")
      .arg("install")
      .cwd(root)
      .env(&env)
      .verbose(self.verbose);
    self
      .runner
      .run(&install)
      .await
      .map_err(|source| ProvisionError::Bundle { step: "install", source })?;

    let abi = self.ruby_abi_version(&env).await?;
    let base = install_path.join("ruby").join(&abi);
    let bin = base.join("bin");
    let lib = base.join("gems");
    debug!(abi = %abi, bin = %bin.display(), lib = %lib.display(), "resolved toolchain paths");

    let resolver = InstalledPaths {
      root: root.display().to_string(),
      bin: bin.display().to_string(),
      lib: lib.display().to_string(),
    };
    let requires = self
      .project
      .config
      .render
      .requires
      .iter()
      .map(|value| {
        placeholder::substitute(value, &resolver).map_err(|source| ProvisionError::Extension {
          value: value.clone(),
          source,
        })
      })
      .collect::<Result<Vec<_>, _>>()?;

    let env = env
      .with_path_prefix(&bin)
      .with_var("RUBYLIB", lib.display().to_string());

    Ok(DocumentToolchain { env, bin, lib, requires })
  }

  async fn ruby_abi_version(&self, env: &EnvOverlay) -> Result<String, ProvisionError> {
    let query = Invocation::new("ruby").args(["-e", RUBY_VERSION_SCRIPT]).env(env);
    let output = self
      .runner
      .run(&query)
      .await
      .map_err(|e| ProvisionError::RubyVersion(e.to_string()))?;

    let abi = output.stdout.trim();
    if abi.is_empty() {
      return Err(ProvisionError::RubyVersion("ruby printed no version".to_string()));
    }
    Ok(abi.to_string())
  }
}
