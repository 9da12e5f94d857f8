//! Node runtime for the diagram renderer.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{ProvisionError, Provisioner};
use crate::env::EnvOverlay;
use crate::exec::{Invocation, Runner};

/// Version manager home relative to `$HOME` when not configured.
const DEFAULT_FNM_DIR: &str = ".local/share/fnm";

impl<R: Runner> Provisioner<'_, R> {
  /// Make `node` and the project's node packages available.
  ///
  /// When `node` is missing, the version manager is bootstrapped and the
  /// configured version installed and made default. Returns `overlay`
  /// extended with the runtime and the project's package binaries.
  pub async fn ensure_render_runtime(&self, overlay: &EnvOverlay) -> Result<EnvOverlay, ProvisionError> {
    let node = &self.project.config.dependencies.node;
    let mut env = overlay.clone();

    if self.probe_node(&env).await {
      info!("node runtime present");
    } else {
      warn!(version = %node.version, "node not found, installing through fnm");
      env = self.install_node(&env).await?;
    }

    let manifest = self.project.resolve(&node.manifest);
    if !manifest.is_file() {
      return Err(ProvisionError::MissingManifest { path: manifest });
    }

    info!(manifest = %manifest.display(), "installing node packages");
    let npm = Invocation::new("npm")
      .arg("install")
      .cwd(self.project.root())
      .env(&env)
      .verbose(self.verbose);
    self.runner.run(&npm).await.map_err(ProvisionError::NpmInstall)?;

    Ok(env.with_path_prefix(self.project.resolve(&node.bin_path)))
  }

  async fn probe_node(&self, env: &EnvOverlay) -> bool {
    self
      .runner
      .probe(&Invocation::new("node").arg("--version").env(env))
      .await
  }

  async fn install_node(&self, overlay: &EnvOverlay) -> Result<EnvOverlay, ProvisionError> {
    let node = &self.project.config.dependencies.node;

    let fnm_dir = self.fnm_dir()?;
    let env = overlay
      .with_path_prefix(&fnm_dir)
      .with_var("FNM_DIR", fnm_dir.display().to_string());

    let bootstrap = Invocation::shell(bootstrap_script(&node.bootstrap, &fnm_dir))
      .env(&env)
      .verbose(self.verbose);
    self.runner.run(&bootstrap).await.map_err(ProvisionError::Bootstrap)?;

    for step in ["install", "default"] {
      let invocation = Invocation::new("fnm")
        .args([step, node.version.as_str()])
        .env(&env)
        .verbose(self.verbose);
      self
        .runner
        .run(&invocation)
        .await
        .map_err(|source| ProvisionError::NodeInstall {
          version: node.version.clone(),
          source,
        })?;
    }

    let env = env.with_path_prefix(fnm_dir.join("aliases").join("default").join("bin"));
    if !self.probe_node(&env).await {
      return Err(ProvisionError::NodeUnavailable {
        version: node.version.clone(),
      });
    }

    info!(version = %node.version, "installed node");
    Ok(env)
  }

  fn fnm_dir(&self) -> Result<PathBuf, ProvisionError> {
    if let Some(dir) = &self.project.config.dependencies.node.fnm_dir {
      return Ok(self.project.resolve(dir));
    }
    std::env::var_os("HOME")
      .map(|home| PathBuf::from(home).join(DEFAULT_FNM_DIR))
      .ok_or(ProvisionError::NoVersionManagerHome)
  }
}

/// The configured bootstrap script, told where to install the version
/// manager so that the install and the later lookup agree.
fn bootstrap_script(script: &str, fnm_dir: &Path) -> String {
  let dir = fnm_dir.to_string_lossy();
  format!("{} --install-dir {}", script.trim_end(), shell_words::quote(&dir))
}
