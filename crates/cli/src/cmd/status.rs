//! Status command implementation.
//!
//! Shows what provisioning would find on this host without changing it.

use std::path::Path;

use anyhow::Result;

use docsmith_lib::exec::SystemRunner;
use docsmith_lib::pipeline;
use docsmith_lib::platform::os::OS_RELEASE_PATH;

use super::{block_on_interruptible, load_project};
use crate::output::{self, OutputFormat, print_json, print_stat, print_success, print_warning};

pub fn cmd_status(root: &Path, output: OutputFormat) -> Result<()> {
  let project = load_project(root)?;
  let report = block_on_interruptible(async {
    Ok(pipeline::status(&project, &SystemRunner, Path::new(OS_RELEASE_PATH)).await)
  })?;

  if output.is_json() {
    return print_json(&report);
  }

  print_stat("Distribution", report.distribution.as_deref().unwrap_or("unknown"));
  print_stat(
    "Package manager",
    report.package_manager.map(|m| m.as_str()).unwrap_or("none"),
  );
  print_stat("Elevated", if report.elevated { "yes" } else { "no" });
  print_stat("Build directory", &report.build_dir.display().to_string());
  println!();

  if report.package_manager.is_none() {
    print_warning("Unsupported distribution: builds cannot provision system packages");
  } else if report.missing_packages.is_empty() {
    print_success("All system packages installed");
  } else {
    print_warning(&format!("{} system package(s) missing", report.missing_packages.len()));
    for package in &report.missing_packages {
      println!("  {} {}", output::symbols::INFO, package);
    }
  }

  Ok(())
}
