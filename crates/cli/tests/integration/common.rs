//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// A diagram source with a valid body.
pub const VALID_DIAGRAM: &str = "Clock\n....\n{signal: [{name: 'clk', wave: 'p...'}]}\n....\n";

/// Isolated project checkout.
///
/// Each test gets its own temporary project root plus a `bin/` directory of
/// stand-in tools that is put in front of `PATH`.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create a project skeleton with the linked trees and manifests.
  pub fn project() -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    env.write_file("src/openrisc-manual.adoc", "= OpenRISC Manual\n");
    env.write_file("docs-resources/global-config.adoc", ":doctype: book\n");
    env.write_file("assets/resource/openrisc.bib", "");
    env.write_file("package.json", "{}\n");
    env.write_file("Gemfile", "source 'https://rubygems.org'\n");
    env
  }

  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Install an executable stand-in for `name` into the fake tool directory.
  #[cfg(unix)]
  pub fn fake_tool(&self, name: &str, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = self.bin_dir().join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  /// Stand-ins for the node runtime and the diagram renderer. The renderer
  /// copies its input to the output path.
  #[cfg(unix)]
  pub fn fake_node_runtime(&self) {
    self.fake_tool("node", "echo v20.11.0");
    self.fake_tool("npm", "exit 0");
    self.fake_tool("wavedrom-cli", "cp \"$2\" \"$4\"");
  }

  pub fn bin_dir(&self) -> PathBuf {
    let p = self.temp.path().join(".fake-bin");
    std::fs::create_dir_all(&p).unwrap();
    p
  }

  pub fn exists(&self, relative_path: &str) -> bool {
    self.temp.path().join(relative_path).exists()
  }

  pub fn read(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative_path)).unwrap()
  }

  /// Get a Command for the docsmith binary, run from the project root with
  /// the fake tools first on `PATH`.
  pub fn docsmith_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("docsmith");
    cmd.current_dir(self.root());
    cmd.env("PATH", prepend_path(&self.bin_dir()));
    cmd.env("RUST_LOG", "warn");
    cmd
  }
}

fn prepend_path(dir: &Path) -> std::ffi::OsString {
  let inherited = std::env::var_os("PATH").unwrap_or_default();
  let entries = std::iter::once(dir.to_path_buf()).chain(std::env::split_paths(&inherited));
  std::env::join_paths(entries).unwrap()
}
