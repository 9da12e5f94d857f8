//! Build orchestration.
//!
//! A [`Pipeline`] drives one build run through its [`Stage`]s: inspect the
//! host, provision dependencies, prepare workspaces, render each target and
//! promote the artifacts. Stages only ever advance to their immediate
//! successor; any error moves the run to a terminal failed state.
//!
//! When a target fails to render, the remaining targets are not built.
//! Targets that already rendered successfully are still promoted and their
//! workspaces removed, while the failed target's workspace is kept for
//! inspection.

mod state;
mod tasks;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::build::{BuildError, BuildOptions, BuildTarget, DocumentBuilder, ReleaseProfile, TargetSelection};
use crate::config::{ConfigError, Project};
use crate::diagram::DiagramError;
use crate::env::EnvOverlay;
use crate::exec::{ExecError, Invocation, Runner};
use crate::platform::os::OS_RELEASE_PATH;
use crate::platform::{PackageManager, PlatformError, require_package_manager_at};
use crate::provision::{ProvisionError, Provisioner};
use crate::workspace::{PromotedArtifact, WorkspaceError, WorkspaceManager};

pub use state::{PipelineState, Stage};
pub use tasks::{StatusReport, clean, diagrams, status};

/// Errors that can end a run.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Platform(#[from] PlatformError),

  #[error(transparent)]
  Provision(#[from] ProvisionError),

  #[error(transparent)]
  Workspace(#[from] WorkspaceError),

  #[error(transparent)]
  Diagram(#[from] DiagramError),

  #[error(transparent)]
  Build(#[from] BuildError),

  #[error("cannot move from {from} to {to}")]
  StageSkipped { from: PipelineState, to: Stage },

  #[error("required resource missing: {} (clone with --recurse-submodules)", path.display())]
  MissingResource { path: PathBuf },

  #[error("failed to check out submodules: {0}")]
  Submodule(#[source] ExecError),
}

/// What to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildRequest {
  pub selection: TargetSelection,
  pub profile: ReleaseProfile,
  /// Stream external tool output instead of capturing it.
  pub verbose: bool,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
  pub profile: ReleaseProfile,
  pub revision: String,
  pub package_manager: PackageManager,
  pub installed_packages: Vec<String>,
  /// Whether the submodule checkout had to run.
  pub fetched_resources: bool,
  pub artifacts: Vec<PromotedArtifact>,
}

/// One build run over a project.
pub struct Pipeline<'a, R: Runner> {
  project: &'a Project,
  runner: &'a R,
  os_release: PathBuf,
  today: NaiveDate,
  state: PipelineState,
}

impl<'a, R: Runner> Pipeline<'a, R> {
  pub fn new(project: &'a Project, runner: &'a R) -> Self {
    Self {
      project,
      runner,
      os_release: PathBuf::from(OS_RELEASE_PATH),
      today: Local::now().date_naive(),
      state: PipelineState::default(),
    }
  }

  /// Read the host identification from `path` instead of `/etc/os-release`.
  pub fn os_release(mut self, path: impl Into<PathBuf>) -> Self {
    self.os_release = path.into();
    self
  }

  /// Date used for draft revision labels.
  pub fn today(mut self, today: NaiveDate) -> Self {
    self.today = today;
    self
  }

  pub fn state(&self) -> PipelineState {
    self.state
  }

  /// Execute every stage for `request`.
  pub async fn run(&mut self, request: &BuildRequest) -> Result<BuildReport, PipelineError> {
    let result = self.run_stages(request).await;
    if let Err(e) = &result {
      self.state.fail();
      error!(state = %self.state, error = %e, "build run failed");
    }
    result
  }

  async fn run_stages(&mut self, request: &BuildRequest) -> Result<BuildReport, PipelineError> {
    let document = &self.project.config.document;
    let targets = request.selection.targets();
    info!(
      document = %document.name,
      selection = %request.selection,
      profile = %request.profile,
      "starting build"
    );

    let manager = require_package_manager_at(&self.os_release)?;
    info!(manager = %manager, "detected package manager");

    self.state.advance(Stage::Provision)?;
    let provisioner = Provisioner::new(self.project, self.runner, request.verbose);
    let installed_packages = provisioner.ensure_system_packages(manager).await?;
    let runtime = provisioner.ensure_render_runtime(&EnvOverlay::new()).await?;
    let toolchain = provisioner.ensure_document_toolchain(&runtime).await?;

    self.state.advance(Stage::Prepare)?;
    let fetched_resources = self.ensure_resources(request.verbose).await?;
    let mut workspaces = WorkspaceManager::new(self.project);
    let mut prepared = Vec::with_capacity(targets.len());
    for &target in &targets {
      prepared.push((target, workspaces.ensure(target)?));
    }

    self.state.advance(Stage::Build)?;
    let options = BuildOptions::new(
      &self.project.config.render,
      self.project.root(),
      request.profile,
      &document.version,
      self.today,
    );
    let builder = DocumentBuilder::new(
      self.runner,
      document,
      options,
      &toolchain.requires,
      &toolchain.env,
      request.verbose,
    );

    let mut built = Vec::with_capacity(prepared.len());
    let mut failure = None;
    for (target, workspace) in &prepared {
      match builder.build(*target, workspace).await {
        Ok(()) => built.push(*target),
        Err(e) => {
          failure = Some(e);
          break;
        }
      }
    }

    if let Some(e) = failure {
      self.finalize_partial(&mut workspaces, &built, e.target());
      return Err(e.into());
    }

    self.state.advance(Stage::Finalize)?;
    let report = workspaces.finalize(&built)?;

    self.state.advance(Stage::Complete)?;
    info!(count = report.promoted.len(), "build complete");

    Ok(BuildReport {
      profile: request.profile,
      revision: request.profile.revision_label(&document.version, self.today),
      package_manager: manager,
      installed_packages,
      fetched_resources,
      artifacts: report.promoted,
    })
  }

  /// Promote what did render before a failure.
  fn finalize_partial(&self, workspaces: &mut WorkspaceManager, built: &[BuildTarget], failed: BuildTarget) {
    if !built.is_empty() {
      match workspaces.finalize(built) {
        Ok(report) => info!(count = report.promoted.len(), "promoted artifacts built before the failure"),
        Err(e) => error!(error = %e, "failed to promote artifacts built before the failure"),
      }
    }
    warn!(
      target = %failed,
      workspace = %workspaces.workspace_path(failed).display(),
      "workspace kept for inspection"
    );
  }

  /// Make sure every required resource exists, checking out submodules once
  /// if one is missing. Returns whether a checkout ran.
  async fn ensure_resources(&self, verbose: bool) -> Result<bool, PipelineError> {
    let required: Vec<PathBuf> = self
      .project
      .config
      .document
      .required_resources
      .iter()
      .map(|path| self.project.resolve(path))
      .collect();

    let Some(missing) = first_missing(&required) else {
      return Ok(false);
    };

    warn!(
      path = %missing.display(),
      "required resource missing; the repository must be cloned with --recurse-submodules"
    );
    info!("checking out submodules via 'git submodule update --init --recursive'");

    let checkout = Invocation::new("git")
      .args(["submodule", "update", "--init", "--recursive"])
      .cwd(self.project.root())
      .verbose(verbose);
    self.runner.run(&checkout).await.map_err(PipelineError::Submodule)?;

    if let Some(missing) = first_missing(&required) {
      return Err(PipelineError::MissingResource {
        path: missing.to_path_buf(),
      });
    }
    Ok(true)
  }
}

fn first_missing(paths: &[PathBuf]) -> Option<&Path> {
  paths.iter().find(|path| !path.exists()).map(PathBuf::as_path)
}
