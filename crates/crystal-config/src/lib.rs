//! Crystal renderer configuration system.
//!
//! Provides TOML-based configuration with full validation. All config
//! sections use defaults so partial configs work out of the box. The
//! loaded config is immutable for the lifetime of the process.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use crystal_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{CrystalConfig, CONFIG_SCHEMA_VERSION};

use crystal_common::ConfigError;
use std::path::Path;

/// Load and validate the config.
///
/// Reads `path` when given, otherwise `config.toml` from the OS config
/// directory (creating a documented default there if none exists).
pub fn load_config(path: Option<&Path>) -> Result<CrystalConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &CrystalConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
