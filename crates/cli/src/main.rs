mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use docsmith_lib::build::{BuildTarget, ReleaseProfile, TargetSelection};

use crate::cmd::{BuildArgs, VersionOverrides};
use crate::output::{OutputFormat, print_error};

/// Build the manual as PDF, HTML, EPUB and a JSON tag index
#[derive(Parser)]
#[command(name = "docsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Stream external tool output and enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Project root (default: current directory)
  #[arg(short = 'C', long, global = true)]
  root: Option<PathBuf>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Provision dependencies and render the document
  Build {
    /// Which output to build
    #[arg(value_enum, default_value_t = TargetArg::All)]
    target: TargetArg,

    /// Release flavour
    #[arg(long, value_enum, default_value_t = ProfileArg::Draft)]
    release_type: ProfileArg,

    /// Document version used for intermediate and official releases
    #[arg(long)]
    doc_version: Option<String>,

    /// Node version installed when node is missing
    #[arg(long)]
    node_version: Option<String>,
  },

  /// Remove the build directory
  Clean,

  /// Regenerate timing diagram images
  Diagrams {
    /// Node version installed when node is missing
    #[arg(long)]
    node_version: Option<String>,
  },

  /// Show the detected platform and missing system packages
  Status,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
  All,
  Pdf,
  Html,
  Epub,
  #[value(alias = "json")]
  Tags,
}

impl From<TargetArg> for TargetSelection {
  fn from(arg: TargetArg) -> Self {
    match arg {
      TargetArg::All => TargetSelection::All,
      TargetArg::Pdf => TargetSelection::Only(BuildTarget::Pdf),
      TargetArg::Html => TargetSelection::Only(BuildTarget::Html),
      TargetArg::Epub => TargetSelection::Only(BuildTarget::Epub),
      TargetArg::Tags => TargetSelection::Only(BuildTarget::Tags),
    }
  }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileArg {
  Draft,
  Intermediate,
  Official,
}

impl From<ProfileArg> for ReleaseProfile {
  fn from(arg: ProfileArg) -> Self {
    match arg {
      ProfileArg::Draft => ReleaseProfile::Draft,
      ProfileArg::Intermediate => ReleaseProfile::Intermediate,
      ProfileArg::Official => ReleaseProfile::Official,
    }
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let root = project_root(cli.root)?;

  match cli.command {
    Commands::Build {
      target,
      release_type,
      doc_version,
      node_version,
    } => cmd::cmd_build(
      &root,
      BuildArgs {
        selection: target.into(),
        profile: release_type.into(),
        versions: VersionOverrides {
          doc_version,
          node_version,
        },
      },
      cli.verbose,
      cli.output,
    ),
    Commands::Clean => cmd::cmd_clean(&root, cli.output),
    Commands::Diagrams { node_version } => cmd::cmd_diagrams(&root, node_version, cli.verbose, cli.output),
    Commands::Status => cmd::cmd_status(&root, cli.output),
  }
}

fn project_root(root: Option<PathBuf>) -> Result<PathBuf> {
  let root = match root {
    Some(root) => root,
    None => std::env::current_dir().context("Failed to determine current directory")?,
  };
  dunce::canonicalize(&root).with_context(|| format!("Project root not found: {}", root.display()))
}
