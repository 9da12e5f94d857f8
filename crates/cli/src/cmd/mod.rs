mod build;
mod clean;
mod diagrams;
mod status;

use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::warn;

use docsmith_lib::config::Project;

pub use build::{BuildArgs, cmd_build};
pub use clean::cmd_clean;
pub use diagrams::cmd_diagrams;
pub use status::cmd_status;

fn load_project(root: &Path) -> Result<Project> {
  Project::load(root).context("Failed to load project")
}

/// Version flags given on the command line.
#[derive(Debug, Default)]
pub struct VersionOverrides {
  pub doc_version: Option<String>,
  pub node_version: Option<String>,
}

impl VersionOverrides {
  /// Flags win over `docsmith.toml`, which wins over the built-in defaults.
  fn apply(self, project: &mut Project) {
    if let Some(version) = self.doc_version {
      project.config.document.version = version;
    }
    if let Some(version) = self.node_version {
      project.config.dependencies.node.version = version;
    }
  }
}

/// Load the project at `root` with the command-line overrides applied.
fn load_project_with(root: &Path, overrides: VersionOverrides) -> Result<Project> {
  let mut project = load_project(root)?;
  overrides.apply(&mut project);
  Ok(project)
}

/// Drive `future` on a fresh runtime until it finishes or Ctrl-C arrives.
///
/// On interrupt the future is dropped, which kills running children and
/// removes any temporary files it owns.
fn block_on_interruptible<T>(future: impl Future<Output = Result<T>>) -> Result<T> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

  rt.block_on(async {
    tokio::select! {
      result = future => result,
      _ = tokio::signal::ctrl_c() => {
        warn!("interrupted, cleaning up");
        bail!("Interrupted")
      }
    }
  })
}
