//! Timing diagram regeneration.
//!
//! Diagram sources keep their wavedrom body between two marker lines, with
//! free text around it. The body is cut out into a temporary file that the
//! external renderer turns into `<output_dir>/<stem>.svg`.
//!
//! Every source is parsed before the first render, so one malformed file
//! fails the run without producing any image. Temporary files are owned by
//! [`NamedTempFile`] and disappear when dropped, including when the future
//! driving [`regenerate`] is cancelled.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Project;
use crate::consts::APP_NAME;
use crate::env::EnvOverlay;
use crate::exec::{ExecError, Invocation, Runner};

/// Why a diagram body could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
  #[error("expected exactly two '{marker}' marker lines, found {found}")]
  MarkerCount { marker: String, found: usize },

  #[error("nothing between the marker lines")]
  EmptyBody,
}

/// Errors that can occur while regenerating diagrams.
#[derive(Debug, Error)]
pub enum DiagramError {
  #[error("diagram source directory not found: {}", path.display())]
  SourceDirMissing { path: PathBuf },

  #[error("failed to scan {}: {source}", path.display())]
  Scan {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed diagram {}: {source}", path.display())]
  Malformed {
    path: PathBuf,
    #[source]
    source: ExtractError,
  },

  #[error("failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to render {}: {source}", path.display())]
  Render {
    path: PathBuf,
    #[source]
    source: ExecError,
  },
}

/// Return the text strictly between the two `marker` lines of `text`.
///
/// The marker must occupy a whole line (a trailing `\r` is ignored) and
/// appear exactly twice. The returned body excludes both marker lines and
/// the line break before the closing marker.
pub fn extract<'a>(text: &'a str, marker: &str) -> Result<&'a str, ExtractError> {
  let mut markers = Vec::new();
  let mut offset = 0;

  for line in text.split_inclusive('\n') {
    let content = line.trim_end_matches('\n').trim_end_matches('\r');
    if content == marker {
      markers.push((offset, offset + line.len()));
    }
    offset += line.len();
  }

  let &[(_, body_start), (body_end, _)] = markers.as_slice() else {
    return Err(ExtractError::MarkerCount {
      marker: marker.to_string(),
      found: markers.len(),
    });
  };

  let body = text[body_start..body_end]
    .strip_suffix('\n')
    .map(|b| b.strip_suffix('\r').unwrap_or(b))
    .unwrap_or(&text[body_start..body_end]);

  if body.trim().is_empty() {
    return Err(ExtractError::EmptyBody);
  }
  Ok(body)
}

struct DiagramSource {
  path: PathBuf,
  output: PathBuf,
  body: String,
}

/// Regenerate every diagram image of `project`.
///
/// `overlay` must make the renderer resolvable. Returns the written images
/// in source order.
pub async fn regenerate(
  runner: &impl Runner,
  project: &Project,
  overlay: &EnvOverlay,
  verbose: bool,
) -> Result<Vec<PathBuf>, DiagramError> {
  let config = &project.config.diagrams;
  let source_dir = project.resolve(&config.source_dir);
  let output_dir = project.resolve(&config.output_dir);

  let sources = collect_sources(&source_dir, &output_dir, &config.extension, &config.marker)?;
  if sources.is_empty() {
    warn!(dir = %source_dir.display(), "no diagram sources found");
    return Ok(Vec::new());
  }
  info!(count = sources.len(), dir = %source_dir.display(), "regenerating diagrams");

  fs::create_dir_all(&output_dir).map_err(|source| DiagramError::Write {
    path: output_dir.clone(),
    source,
  })?;

  let suffix = format!(".{}", config.extension);
  let mut written = Vec::with_capacity(sources.len());

  for diagram in sources {
    let scratch = write_scratch(&diagram.body, &suffix)?;

    let invocation = Invocation::new(&config.renderer)
      .arg("-i")
      .arg(scratch.path().display().to_string())
      .arg("-s")
      .arg(diagram.output.display().to_string())
      .env(overlay)
      .verbose(verbose);

    debug!(source = %diagram.path.display(), cmd = %invocation, "rendering diagram");
    runner.run(&invocation).await.map_err(|source| DiagramError::Render {
      path: diagram.output.clone(),
      source,
    })?;

    info!(image = %diagram.output.display(), "diagram updated");
    written.push(diagram.output);
  }

  Ok(written)
}

/// Read and parse every source with `extension` directly inside `dir`, in
/// filename order.
fn collect_sources(dir: &Path, output_dir: &Path, extension: &str, marker: &str) -> Result<Vec<DiagramSource>, DiagramError> {
  if !dir.is_dir() {
    return Err(DiagramError::SourceDirMissing { path: dir.to_path_buf() });
  }

  let mut sources = Vec::new();
  for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
    let entry = entry.map_err(|source| DiagramError::Scan {
      path: dir.to_path_buf(),
      source,
    })?;
    let path = entry.path();
    if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != extension) {
      continue;
    }

    let text = fs::read_to_string(path).map_err(|source| DiagramError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let body = extract(&text, marker).map_err(|source| DiagramError::Malformed {
      path: path.to_path_buf(),
      source,
    })?;

    let Some(stem) = path.file_stem() else {
      continue;
    };
    let mut image = PathBuf::from(stem);
    image.set_extension("svg");

    sources.push(DiagramSource {
      path: path.to_path_buf(),
      output: output_dir.join(image),
      body: body.to_string(),
    });
  }

  Ok(sources)
}

fn write_scratch(body: &str, suffix: &str) -> Result<NamedTempFile, DiagramError> {
  let write_err = |source| DiagramError::Write {
    path: std::env::temp_dir(),
    source,
  };

  let mut scratch = tempfile::Builder::new()
    .prefix(&format!("{APP_NAME}-diagram-"))
    .suffix(suffix)
    .tempfile()
    .map_err(write_err)?;
  scratch.write_all(body.as_bytes()).map_err(write_err)?;
  scratch.flush().map_err(write_err)?;
  Ok(scratch)
}
