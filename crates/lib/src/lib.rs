//! docsmith-lib: orchestration engine for multi-format document builds.
//!
//! This crate turns one AsciiDoc source tree into several rendered outputs:
//! - `platform`: host inspection (package manager, installed packages)
//! - `provision`: system packages plus the Ruby and Node toolchains
//! - `workspace`: per-target working directories and artifact promotion
//! - `build`: render command assembly and execution per target
//! - `diagram`: waveform diagram regeneration from embedded sources
//! - `pipeline`: the staged driver tying the above together

pub mod build;
pub mod config;
pub mod consts;
pub mod diagram;
pub mod env;
pub mod exec;
pub mod pipeline;
pub mod placeholder;
pub mod platform;
pub mod provision;
pub mod util;
pub mod workspace;
