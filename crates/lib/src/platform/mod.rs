//! Host inspection.
//!
//! Detects which package manager the host uses and whether individual
//! packages are already installed. Only a closed set of Linux families is
//! recognised; everything else is reported as unknown and provisioning
//! refuses to continue.

pub mod os;
mod packages;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use os::OsRelease;

pub use packages::is_package_installed;

/// Errors that can occur while inspecting the host.
#[derive(Debug, Error)]
pub enum PlatformError {
  /// The distribution is unknown or `os-release` could not be read.
  #[error("unsupported distribution (see {}); supported families are debian, fedora and arch", path.display())]
  UnsupportedDistribution { path: PathBuf },
}

/// Package managers the provisioner knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
  /// Debian, Ubuntu and derivatives.
  Apt,
  /// Fedora, RHEL, CentOS and derivatives.
  Dnf,
  /// Arch Linux and derivatives.
  Pacman,
}

impl PackageManager {
  /// Map an OS identification to its package manager family.
  pub fn from_os_release(release: &OsRelease) -> Option<Self> {
    release.family().find_map(|id| match id {
      "debian" | "ubuntu" => Some(Self::Apt),
      "fedora" | "rhel" | "centos" => Some(Self::Dnf),
      "arch" => Some(Self::Pacman),
      _ => None,
    })
  }

  /// Returns the lowercase identifier for this package manager
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Apt => "apt",
      Self::Dnf => "dnf",
      Self::Pacman => "pacman",
    }
  }
}

impl fmt::Display for PackageManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Detect the host package manager from the os-release file at `path`.
///
/// Returns `None` for unsupported or unidentifiable hosts.
pub fn detect_package_manager_at(path: &Path) -> Option<PackageManager> {
  let release = OsRelease::read(path)?;
  let manager = PackageManager::from_os_release(&release);
  debug!(id = %release.id, manager = ?manager, "detected distribution");
  manager
}

/// Like [`detect_package_manager_at`], failing on unsupported hosts.
pub fn require_package_manager_at(path: &Path) -> Result<PackageManager, PlatformError> {
  detect_package_manager_at(path).ok_or_else(|| PlatformError::UnsupportedDistribution {
    path: path.to_path_buf(),
  })
}

/// Whether the current process runs with root privileges.
#[cfg(unix)]
pub fn is_elevated() -> bool {
  rustix::process::geteuid().is_root()
}

#[cfg(not(unix))]
pub fn is_elevated() -> bool {
  false
}
