//! Filesystem helpers.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Total size in bytes of regular files under `path`.
///
/// Symlinks are not followed, so trees linked into a workspace are not
/// counted.
pub fn dir_size(path: &Path) -> u64 {
  WalkDir::new(path)
    .follow_links(false)
    .into_iter()
    .filter_map(|e| e.ok())
    .filter(|e| e.file_type().is_file())
    .filter_map(|e| e.metadata().ok())
    .map(|m| m.len())
    .sum()
}

/// Copy a file, preserving permissions and access/modification times.
pub fn copy_with_metadata(src: &Path, dst: &Path) -> io::Result<u64> {
  let bytes = fs::copy(src, dst)?;

  let metadata = fs::metadata(src)?;
  let mut times = FileTimes::new();
  if let Ok(modified) = metadata.modified() {
    times = times.set_modified(modified);
  }
  if let Ok(accessed) = metadata.accessed() {
    times = times.set_accessed(accessed);
  }
  File::options().write(true).open(dst)?.set_times(times)?;

  Ok(bytes)
}

/// Create a directory symlink.
#[cfg(unix)]
pub fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
  std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
pub fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
  std::os::windows::fs::symlink_dir(target, link)
}
