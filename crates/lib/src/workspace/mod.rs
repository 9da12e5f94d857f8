//! Per-target working directories.
//!
//! Every target renders inside its own `<build_dir>/<artifact>.workdir`
//! directory. The project's source, resource and asset trees are symlinked
//! in, so renderers that write next to their inputs never touch the project
//! itself, and the renderer's private `build/` output stays isolated per
//! target. Finished artifacts are promoted into the build directory and the
//! workspace is removed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::build::BuildTarget;
use crate::config::Project;
use crate::consts::{ASSETS_DIR, RESOURCES_DIR, SOURCE_DIR, WORKSPACE_OUTPUT_DIR, WORKSPACE_SUFFIX};
use crate::util::fs::{copy_with_metadata, dir_size, symlink_dir};

/// Errors that can occur while managing workspaces.
#[derive(Debug, Error)]
pub enum WorkspaceError {
  #[error("failed to create {}: {source}", path.display())]
  Create {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to link {} -> {}: {source}", link.display(), target.display())]
  Link {
    link: PathBuf,
    target: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("no workspace for {target} at {}", path.display())]
  WorkspaceMissing { target: BuildTarget, path: PathBuf },

  #[error("{target} produced no artifact at {}", path.display())]
  ArtifactMissing { target: BuildTarget, path: PathBuf },

  #[error("failed to promote {}: {source}", path.display())]
  Promote {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to remove {}: {source}", path.display())]
  Remove {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// One artifact copied into the build directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotedArtifact {
  pub target: BuildTarget,
  pub path: PathBuf,
  pub bytes: u64,
}

/// Outcome of [`WorkspaceManager::finalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FinalizeReport {
  pub promoted: Vec<PromotedArtifact>,
}

/// Outcome of [`clean`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanReport {
  pub path: PathBuf,
  pub existed: bool,
  pub bytes_freed: u64,
}

/// Creates, tracks and retires per-target workspaces.
#[derive(Debug)]
pub struct WorkspaceManager {
  /// Project trees linked into every workspace, as (link name, target).
  linked: [(&'static str, PathBuf); 3],
  build_dir: PathBuf,
  document: String,
  workspaces: BTreeMap<BuildTarget, PathBuf>,
}

impl WorkspaceManager {
  pub fn new(project: &Project) -> Self {
    Self {
      linked: [
        (SOURCE_DIR, project.source_dir()),
        (RESOURCES_DIR, project.resources_dir()),
        (ASSETS_DIR, project.assets_dir()),
      ],
      build_dir: project.build_dir(),
      document: project.config.document.name.clone(),
      workspaces: BTreeMap::new(),
    }
  }

  /// Where the workspace for `target` lives, whether or not it exists.
  pub fn workspace_path(&self, target: BuildTarget) -> PathBuf {
    self
      .build_dir
      .join(format!("{}{WORKSPACE_SUFFIX}", target.artifact_name(&self.document)))
  }

  /// Workspaces created or reused by this manager, by target.
  pub fn workspaces(&self) -> &BTreeMap<BuildTarget, PathBuf> {
    &self.workspaces
  }

  /// Make sure the workspace for `target` exists and return its path.
  ///
  /// An existing workspace is reused as-is, without relinking.
  pub fn ensure(&mut self, target: BuildTarget) -> Result<PathBuf, WorkspaceError> {
    let path = self.workspace_path(target);

    if path.is_dir() {
      info!(target = %target, path = %path.display(), "reusing workspace");
    } else {
      fs::create_dir_all(&path).map_err(|source| WorkspaceError::Create {
        path: path.clone(),
        source,
      })?;

      for (name, link_target) in &self.linked {
        let link = path.join(name);
        symlink_dir(link_target, &link).map_err(|source| WorkspaceError::Link {
          link,
          target: link_target.clone(),
          source,
        })?;
      }
      info!(target = %target, path = %path.display(), "created workspace");
    }

    self.workspaces.insert(target, path.clone());
    Ok(path)
  }

  /// Promote each target's artifact into the build directory and remove its
  /// workspace.
  ///
  /// Every workspace and artifact is checked before anything is copied, so a
  /// missing one leaves the build directory untouched.
  pub fn finalize(&mut self, targets: &[BuildTarget]) -> Result<FinalizeReport, WorkspaceError> {
    let mut pending = Vec::with_capacity(targets.len());

    for &target in targets {
      let workspace = self.workspace_path(target);
      if !workspace.is_dir() {
        return Err(WorkspaceError::WorkspaceMissing {
          target,
          path: workspace,
        });
      }

      let artifact = target.artifact_name(&self.document);
      let produced = workspace.join(WORKSPACE_OUTPUT_DIR).join(&artifact);
      if !produced.is_file() {
        return Err(WorkspaceError::ArtifactMissing { target, path: produced });
      }
      pending.push((target, workspace, produced, self.build_dir.join(artifact)));
    }

    let mut report = FinalizeReport::default();
    for (target, workspace, produced, destination) in pending {
      let bytes = copy_with_metadata(&produced, &destination).map_err(|source| WorkspaceError::Promote {
        path: destination.clone(),
        source,
      })?;
      debug!(target = %target, path = %destination.display(), bytes, "promoted artifact");

      // remove_dir_all unlinks symlinks without descending into them
      fs::remove_dir_all(&workspace).map_err(|source| WorkspaceError::Remove {
        path: workspace.clone(),
        source,
      })?;
      self.workspaces.remove(&target);

      info!(target = %target, path = %destination.display(), "artifact ready");
      report.promoted.push(PromotedArtifact {
        target,
        path: destination,
        bytes,
      });
    }

    Ok(report)
  }
}

/// Remove the build directory and everything in it.
///
/// A build directory that does not exist is not an error.
pub fn clean(build_dir: &Path) -> Result<CleanReport, WorkspaceError> {
  if !build_dir.exists() {
    debug!(path = %build_dir.display(), "build directory absent, nothing to clean");
    return Ok(CleanReport {
      path: build_dir.to_path_buf(),
      existed: false,
      bytes_freed: 0,
    });
  }

  let bytes_freed = dir_size(build_dir);
  fs::remove_dir_all(build_dir).map_err(|source| WorkspaceError::Remove {
    path: build_dir.to_path_buf(),
    source,
  })?;
  info!(path = %build_dir.display(), bytes_freed, "removed build directory");

  Ok(CleanReport {
    path: build_dir.to_path_buf(),
    existed: true,
    bytes_freed,
  })
}
