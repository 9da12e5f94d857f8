//! Entry points besides the full build.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::PipelineError;
use crate::config::Project;
use crate::diagram;
use crate::env::EnvOverlay;
use crate::exec::Runner;
use crate::platform::os::OsRelease;
use crate::platform::{PackageManager, is_elevated};
use crate::provision::Provisioner;
use crate::workspace::{self, CleanReport};

/// Remove the project's build directory. Nothing is provisioned.
pub fn clean(project: &Project) -> Result<CleanReport, PipelineError> {
  Ok(workspace::clean(&project.build_dir())?)
}

/// Regenerate every diagram image.
///
/// Only the Node runtime is provisioned; system packages and the document
/// toolchain are left alone.
pub async fn diagrams(project: &Project, runner: &impl Runner, verbose: bool) -> Result<Vec<PathBuf>, PipelineError> {
  let runtime = Provisioner::new(project, runner, verbose)
    .ensure_render_runtime(&EnvOverlay::new())
    .await?;

  let written = diagram::regenerate(runner, project, &runtime, verbose).await?;
  info!(count = written.len(), "diagrams regenerated");
  Ok(written)
}

/// Read-only view of the host as provisioning would see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
  pub distribution: Option<String>,
  pub package_manager: Option<PackageManager>,
  pub elevated: bool,
  pub build_dir: PathBuf,
  /// Required packages not installed yet. Empty when the package manager is
  /// unknown.
  pub missing_packages: Vec<String>,
}

/// Inspect the host identified by `os_release` without changing anything.
pub async fn status(project: &Project, runner: &impl Runner, os_release: &Path) -> StatusReport {
  let release = OsRelease::read(os_release);
  let package_manager = release.as_ref().and_then(PackageManager::from_os_release);

  let missing_packages = match package_manager {
    Some(manager) => Provisioner::new(project, runner, false).missing_packages(manager).await,
    None => Vec::new(),
  };

  StatusReport {
    distribution: release.map(|r| r.pretty_name.unwrap_or(r.id)),
    package_manager,
    elevated: is_elevated(),
    build_dir: project.build_dir(),
    missing_packages,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Config;
  use crate::util::testutil::{RecordingRunner, failed, stdout, write_file};
  use tempfile::TempDir;

  #[test]
  fn clean_provisions_nothing() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("build/openrisc-manual.pdf"), "%PDF");
    let project = Project::new(temp.path(), Config::default());

    let report = clean(&project).unwrap();

    assert!(report.existed);
    assert!(!temp.path().join("build").exists());
  }

  #[tokio::test]
  async fn diagrams_provision_only_the_runtime() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("package.json"), "{}");
    write_file(
      &temp.path().join("assets/images/wavedrom/edn/x.edn"),
      "....\n{signal: []}\n....\n",
    );
    let project = Project::new(temp.path(), Config::default());
    let runner = RecordingRunner::succeeding();

    let written = diagrams(&project, &runner, false).await.unwrap();

    assert_eq!(written, vec![temp.path().join("assets/images/wavedrom/svg/x.svg")]);
    assert!(runner.ran("node --version"));
    assert!(runner.ran("npm install"));
    assert!(runner.ran("wavedrom-cli -i"));
    assert!(!runner.ran("dpkg"));
    assert!(!runner.ran("bundle"));

    let render = runner.calls().into_iter().find(|inv| inv.program == "wavedrom-cli").unwrap();
    assert_eq!(render.env.path_prefix()[0], temp.path().join("node_modules/.bin"));
  }

  #[tokio::test]
  async fn status_lists_missing_packages() {
    let temp = TempDir::new().unwrap();
    let os_release = temp.path().join("os-release");
    write_file(&os_release, "ID=fedora\nPRETTY_NAME=\"Fedora Linux 41\"\n");
    let mut config = Config::default();
    config.dependencies.packages.dnf = vec!["ruby".to_string(), "graphviz".to_string()];
    let project = Project::new(temp.path(), config);
    let runner = RecordingRunner::new(|inv| {
      if inv.args[1] == "ruby" {
        stdout("ruby-3.3.5-1.fc41.x86_64")
      } else {
        failed(inv, "package graphviz is not installed")
      }
    });

    let report = status(&project, &runner, &os_release).await;

    assert_eq!(report.distribution.as_deref(), Some("Fedora Linux 41"));
    assert_eq!(report.package_manager, Some(PackageManager::Dnf));
    assert_eq!(report.missing_packages, vec!["graphviz"]);
    assert!(runner.command_lines().iter().all(|line| line.starts_with("rpm -q")));
  }

  #[tokio::test]
  async fn status_on_unknown_host_runs_nothing() {
    let temp = TempDir::new().unwrap();
    let project = Project::new(temp.path(), Config::default());
    let runner = RecordingRunner::succeeding();

    let report = status(&project, &runner, &temp.path().join("absent")).await;

    assert_eq!(report.distribution, None);
    assert_eq!(report.package_manager, None);
    assert!(report.missing_packages.is_empty());
    assert!(runner.calls().is_empty());
  }
}
