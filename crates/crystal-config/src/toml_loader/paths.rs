//! Where the config file lives, and writing the documented default.

use std::path::{Path, PathBuf};

use crystal_common::ConfigError;

use super::template::default_config_toml;

/// Environment variable naming a config file to use instead of the
/// platform default.
pub const CONFIG_PATH_ENV: &str = "CRYSTAL_CONFIG";

/// `$CRYSTAL_CONFIG` when set, else `<config dir>/crystal/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("crystal").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented default config to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_error = |what: &str, at: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("{what} {}: {e}", at.display()))
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error("cannot create", parent, e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| io_error("cannot write", path, e))?;

    tracing::info!("Wrote default config to {}", path.display());
    Ok(())
}
