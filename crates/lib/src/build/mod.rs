//! Multi-format document builds.
//!
//! A [`DocumentBuilder`] owns the option set for one invocation and turns a
//! [`BuildTarget`] plus its workspace into a single renderer process.

mod execute;
mod options;
mod types;

pub use execute::{BuildError, DocumentBuilder};
pub use options::{BuildOptions, RenderOption};
pub use types::{BuildTarget, ParseError, ReleaseProfile, TargetSelection};
