//! Reading and parsing config files.

use std::io::ErrorKind;
use std::path::Path;

use crystal_common::ConfigError;

use crate::schema::CrystalConfig;

use super::paths::{create_default_config, default_config_path};

/// Parse TOML text. Missing sections and fields take their defaults.
pub fn parse_config(content: &str) -> Result<CrystalConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Read and parse `path`. Does not validate.
///
/// Relative `[scene]` paths are resolved against the file's directory so a
/// config can sit next to its assets.
pub fn load_from_path(path: &Path) -> Result<CrystalConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("{}: {e}", path.display())),
    })?;

    let mut config = parse_config(&content).map_err(|e| match e {
        ConfigError::ParseError(msg) => ConfigError::ParseError(format!("{}: {msg}", path.display())),
        other => other,
    })?;
    if let Some(dir) = path.parent() {
        config.scene.resolve_relative_to(dir);
    }

    tracing::info!("Config loaded from {}", path.display());
    Ok(config)
}

/// Load the default config file, writing a documented one first if absent.
pub fn load_default() -> Result<CrystalConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(CrystalConfig::default())
        }
        result => result,
    }
}
