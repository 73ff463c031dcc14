//! Full configuration validation.
//!
//! Validates numeric ranges, camera planes, light counts and color
//! channels. Each domain has its own submodule; this orchestrator calls
//! them all and collects errors into a single `ConfigError`.

mod effects;
mod helpers;
mod scene;

#[cfg(test)]
mod tests;

use crate::schema::CrystalConfig;
use crystal_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CrystalConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    scene::validate_window(&mut errors, config);
    scene::validate_camera(&mut errors, config);
    scene::validate_lighting(&mut errors, config);
    scene::validate_material(&mut errors, config);
    effects::validate_effects(&mut errors, config);
    effects::validate_bloom(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
