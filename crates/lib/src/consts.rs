/// Application name, used to prefix scratch files.
pub const APP_NAME: &str = "docsmith";

/// Optional project configuration file, looked up at the project root.
pub const CONFIG_FILENAME: &str = "docsmith.toml";

/// Suffix appended to an artifact filename to name its workspace directory.
pub const WORKSPACE_SUFFIX: &str = ".workdir";

/// Output directory the renderer writes into, relative to a workspace.
pub const WORKSPACE_OUTPUT_DIR: &str = "build";

/// Project trees linked into every workspace, by directory name.
pub const SOURCE_DIR: &str = "src";
pub const RESOURCES_DIR: &str = "docs-resources";
pub const ASSETS_DIR: &str = "assets";
