//! Config path resolution
//!
//! Handles resolving the project directory and the paths beneath it.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Environment variable overriding the project directory
pub const PROJECT_DIR_ENV: &str = "RSBRIDGE_PROJECT_DIR";

/// Returns the project directory.
///
/// Taken from `RSBRIDGE_PROJECT_DIR` when set, otherwise the directory
/// containing the running executable.
pub fn project_dir() -> ConfigResult<PathBuf> {
    if let Some(dir) = std::env::var_os(PROJECT_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    let exe = std::env::current_exe().map_err(ConfigError::Io)?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the bridge config path.
///
/// Path: `<project>/Config/rsbridge.toml`
pub fn config_path() -> ConfigResult<PathBuf> {
    Ok(project_dir()?.join("Config").join("rsbridge.toml"))
}

/// Returns the content directory holding the schema file.
///
/// Path: `<project>/Content`
pub fn content_dir() -> ConfigResult<PathBuf> {
    Ok(project_dir()?.join("Content"))
}
