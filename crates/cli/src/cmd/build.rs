//! Implementation of the `docsmith build` command.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use docsmith_lib::build::{ReleaseProfile, TargetSelection};
use docsmith_lib::exec::SystemRunner;
use docsmith_lib::pipeline::{BuildRequest, Pipeline};

use super::{VersionOverrides, block_on_interruptible, load_project_with};
use crate::output::{OutputFormat, format_duration, print_artifact, print_json, print_stat, print_success};

/// Build arguments after CLI parsing.
#[derive(Debug)]
pub struct BuildArgs {
  pub selection: TargetSelection,
  pub profile: ReleaseProfile,
  pub versions: VersionOverrides,
}

/// Provision everything, render the selected targets and promote the
/// artifacts into the build directory.
pub fn cmd_build(root: &Path, args: BuildArgs, verbose: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let project = load_project_with(root, args.versions)?;

  let request = BuildRequest {
    selection: args.selection,
    profile: args.profile,
    verbose,
  };
  let runner = SystemRunner;
  let mut pipeline = Pipeline::new(&project, &runner);

  let report = block_on_interruptible(async { pipeline.run(&request).await.context("Build failed") })?;

  if output.is_json() {
    print_json(&report)?;
    return Ok(());
  }

  println!();
  print_success(&format!(
    "Built {} ({} release, revision {})",
    request.selection, report.profile, report.revision
  ));
  for artifact in &report.artifacts {
    print_artifact(&artifact.path.display().to_string(), artifact.bytes);
  }
  if !report.installed_packages.is_empty() {
    print_stat("Installed packages", &report.installed_packages.join(" "));
  }
  if report.fetched_resources {
    print_stat("Submodules", "checked out");
  }
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
