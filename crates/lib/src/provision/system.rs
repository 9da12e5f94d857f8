//! System package installation.

use tracing::{debug, info};

use super::{ProvisionError, Provisioner};
use crate::exec::Runner;
use crate::platform::{PackageManager, is_package_installed};

impl<R: Runner> Provisioner<'_, R> {
  /// Required packages for `manager` that are not installed yet, in
  /// configuration order.
  pub async fn missing_packages(&self, manager: PackageManager) -> Vec<String> {
    let mut missing = Vec::new();
    for package in self.project.config.dependencies.packages.for_manager(manager) {
      if is_package_installed(self.runner, manager, package).await {
        debug!(package = %package, "package already installed");
      } else {
        missing.push(package.clone());
      }
    }
    missing
  }

  /// Install every missing required package in one batch.
  ///
  /// Returns the packages that were installed, which is empty when nothing
  /// was missing.
  pub async fn ensure_system_packages(&self, manager: PackageManager) -> Result<Vec<String>, ProvisionError> {
    let missing = self.missing_packages(manager).await;
    if missing.is_empty() {
      info!(manager = %manager, "all system packages present");
      return Ok(missing);
    }

    info!(manager = %manager, count = missing.len(), packages = ?missing, "installing system packages");
    let invocation = manager.install_invocation(&missing, self.elevated).verbose(self.verbose);

    self
      .runner
      .run(&invocation)
      .await
      .map_err(|source| ProvisionError::Install {
        manager,
        packages: missing.clone(),
        source,
      })?;

    Ok(missing)
  }
}
