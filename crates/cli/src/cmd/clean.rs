use std::path::Path;

use anyhow::Result;

use docsmith_lib::pipeline;

use super::load_project;
use crate::output::{OutputFormat, format_bytes, print_info, print_json, print_stat, print_success};

pub fn cmd_clean(root: &Path, output: OutputFormat) -> Result<()> {
  let project = load_project(root)?;
  let report = pipeline::clean(&project)?;

  if output.is_json() {
    print_json(&report)?;
  } else if report.existed {
    print_success(&format!("Removed {}", report.path.display()));
    print_stat("Space freed", &format_bytes(report.bytes_freed));
  } else {
    print_info("Nothing to clean");
  }

  Ok(())
}
