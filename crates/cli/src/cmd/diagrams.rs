//! Implementation of the `docsmith diagrams` command.
//!
//! Regenerates the waveform images only; the document is not built and no
//! system packages are touched.

use std::path::Path;

use anyhow::{Context, Result};

use docsmith_lib::exec::SystemRunner;
use docsmith_lib::pipeline;

use super::{VersionOverrides, block_on_interruptible, load_project_with};
use crate::output::{self, OutputFormat, print_info, print_json, print_success};

pub fn cmd_diagrams(root: &Path, node_version: Option<String>, verbose: bool, output: OutputFormat) -> Result<()> {
  let overrides = VersionOverrides {
    doc_version: None,
    node_version,
  };
  let project = load_project_with(root, overrides)?;

  let written = block_on_interruptible(async {
    pipeline::diagrams(&project, &SystemRunner, verbose)
      .await
      .context("Diagram regeneration failed")
  })?;

  if output.is_json() {
    print_json(&serde_json::json!({ "images": written }))?;
  } else if written.is_empty() {
    print_info("No diagram sources found");
  } else {
    print_success(&format!("Regenerated {} diagram(s)", written.len()));
    for image in &written {
      println!("  {} {}", output::symbols::ARROW, image.display());
    }
  }

  Ok(())
}
