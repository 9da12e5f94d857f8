//! Terminal output for docsmith commands.
//!
//! Status lines go to stdout, warnings and errors to stderr. With
//! `-o json` commands print their report instead.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{AnsiColors, OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

const SIZE_UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Human-readable size in binary units, one decimal above bytes.
pub fn format_bytes(bytes: u64) -> String {
  if bytes < 1024 {
    return format!("{bytes} B");
  }

  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit + 1 < SIZE_UNITS.len() {
    value /= 1024.0;
    unit += 1;
  }
  format!("{value:.1} {}", SIZE_UNITS[unit])
}

/// Wall-clock duration of a command: `850ms`, `12.40s` or `3m 7s`.
pub fn format_duration(duration: Duration) -> String {
  match duration.as_secs() {
    0 => format!("{}ms", duration.subsec_millis()),
    secs @ 1..60 => format!("{secs}.{:02}s", duration.subsec_millis() / 10),
    secs => format!("{}m {}s", secs / 60, secs % 60),
  }
}

/// `<symbol> <message>`, colored only when the stream is a terminal.
fn status_line(stream: Stream, symbol: &str, color: AnsiColors, message: &str, color_message: bool) -> String {
  let symbol = symbol.if_supports_color(stream, |s| s.color(color)).to_string();
  if color_message {
    format!("{symbol} {}", message.if_supports_color(stream, |m| m.color(color)))
  } else {
    format!("{symbol} {message}")
  }
}

pub fn print_success(message: &str) {
  println!(
    "{}",
    status_line(Stream::Stdout, symbols::SUCCESS, AnsiColors::Green, message, false)
  );
}

pub fn print_info(message: &str) {
  println!(
    "{}",
    status_line(Stream::Stdout, symbols::INFO, AnsiColors::Blue, message, false)
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{}",
    status_line(Stream::Stderr, symbols::WARNING, AnsiColors::Yellow, message, true)
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{}",
    status_line(Stream::Stderr, symbols::ERROR, AnsiColors::Red, message, true)
  );
}

/// Indented `label: value` line under a status line.
pub fn print_stat(label: &str, value: &str) {
  println!("  {}: {value}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()));
}

/// One line per produced file: `  → path (size)`.
pub fn print_artifact(path: &str, bytes: u64) {
  let size = format!("({})", format_bytes(bytes));
  println!(
    "  {} {path} {}",
    symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
    size.if_supports_color(Stream::Stdout, |s| s.dimmed())
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
  println!("{json}");
  Ok(())
}
