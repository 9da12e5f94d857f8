//! `/etc/os-release` parsing.

use std::path::Path;

/// Default location of the OS identification file.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// The identification fields relevant to package manager detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
  pub id: String,
  pub id_like: Vec<String>,
  pub pretty_name: Option<String>,
}

impl OsRelease {
  /// Parse the `KEY=value` format, ignoring comments and unknown keys.
  pub fn parse(content: &str) -> Self {
    let mut release = OsRelease::default();

    for line in content.lines() {
      let line = line.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }
      let Some((key, value)) = line.split_once('=') else {
        continue;
      };
      let value = unquote(value.trim());

      match key.trim() {
        "ID" => release.id = value.to_lowercase(),
        "ID_LIKE" => release.id_like = value.split_whitespace().map(str::to_lowercase).collect(),
        "PRETTY_NAME" => release.pretty_name = Some(value.to_string()),
        _ => {}
      }
    }

    release
  }

  /// Read and parse the file at `path`. Returns `None` if it can't be read.
  pub fn read(path: &Path) -> Option<Self> {
    std::fs::read_to_string(path).ok().map(|content| Self::parse(&content))
  }

  /// `ID` followed by every `ID_LIKE` entry, most specific first.
  pub fn family(&self) -> impl Iterator<Item = &str> {
    std::iter::once(self.id.as_str())
      .chain(self.id_like.iter().map(String::as_str))
      .filter(|s| !s.is_empty())
  }
}

fn unquote(value: &str) -> &str {
  value
    .strip_prefix('"')
    .and_then(|v| v.strip_suffix('"'))
    .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
    .unwrap_or(value)
}
