//! Package database queries and batched installs.

use tracing::debug;

use super::PackageManager;
use crate::exec::{Invocation, ProcessOutput, Runner};

impl PackageManager {
  /// The command that asks the package database about `package`.
  pub fn query_invocation(&self, package: &str) -> Invocation {
    match self {
      Self::Apt => Invocation::new("dpkg").args(["-s", package]),
      Self::Dnf => Invocation::new("rpm").args(["-q", package]),
      Self::Pacman => Invocation::new("pacman").args(["-Qi", package]),
    }
  }

  /// The command that installs every package in `packages` in one batch.
  ///
  /// Prefixed with `sudo` unless already running as root.
  pub fn install_invocation(&self, packages: &[String], elevated: bool) -> Invocation {
    let base: &[&str] = match self {
      Self::Apt => &["apt-get", "install", "-y"],
      Self::Dnf => &["dnf", "install", "-y"],
      Self::Pacman => &["pacman", "-S", "--noconfirm", "--needed"],
    };

    let invocation = if elevated {
      Invocation::new(base[0]).args(base[1..].iter().copied())
    } else {
      Invocation::new("sudo").args(base.iter().copied())
    };
    invocation.args(packages.iter().cloned())
  }

  /// Whether a successful query output really means "installed".
  ///
  /// `dpkg -s` succeeds for packages that were removed but not purged, so
  /// its status line has to be checked.
  fn confirms_installed(&self, output: &ProcessOutput) -> bool {
    match self {
      Self::Apt => output.stdout.contains("Status: install ok installed"),
      Self::Dnf | Self::Pacman => true,
    }
  }
}

/// Whether `package` is installed.
///
/// A failing query (absent package, or the package manager itself failing)
/// is reported as "not installed" rather than as an error.
pub async fn is_package_installed(runner: &impl Runner, manager: PackageManager, package: &str) -> bool {
  match runner.run(&manager.query_invocation(package)).await {
    Ok(output) => manager.confirms_installed(&output),
    Err(e) => {
      debug!(package, error = %e, "package query failed, treating as not installed");
      false
    }
  }
}
