//! Configuration schema types for the crystal renderer.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults the renderer was tuned with.

mod camera;
mod effects;
mod lighting;
mod material;
mod system;
mod window;

pub use camera::*;
pub use effects::*;
pub use lighting::*;
pub use material::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Every value is read once at startup and stays fixed for the lifetime
/// of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct CrystalConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub material: MaterialConfig,
    pub effects: EffectsConfig,
    pub bloom: BloomConfig,
    pub animation: AnimationConfig,
    pub scene: SceneConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_correct_window() {
        let config = CrystalConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.title, "Swarovski Crystal");
        assert!(config.window.vsync);
    }

    #[test]
    fn default_config_has_correct_camera() {
        let config = CrystalConfig::default();
        assert_eq!(config.camera.position, [0.0, 0.0, 5.0]);
        assert_eq!(config.camera.target, [0.0, 0.0, 0.0]);
        assert_eq!(config.camera.up, [0.0, 1.0, 0.0]);
        assert!((config.camera.fov_degrees - 45.0).abs() < f32::EPSILON);
        assert!((config.camera.near - 0.1).abs() < f32::EPSILON);
        assert!((config.camera.far - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn default_config_has_two_lights() {
        let config = CrystalConfig::default();
        assert_eq!(config.lighting.lights.len(), 2);
        assert_eq!(config.lighting.lights[0].position, [3.0, 3.0, 5.0]);
        assert_eq!(config.lighting.lights[0].color, [1.0, 1.0, 1.0]);
        assert_eq!(config.lighting.lights[1].position, [-3.0, 3.0, 5.0]);
        assert_eq!(config.lighting.lights[1].color, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn default_config_has_correct_material() {
        let config = CrystalConfig::default();
        assert_eq!(config.material.crystal_color, [0.9, 0.9, 1.0]);
        assert!((config.material.refraction_index - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn default_config_has_correct_effects() {
        let config = CrystalConfig::default();
        assert!((config.effects.fresnel.power - 5.0).abs() < f32::EPSILON);
        assert!((config.effects.dispersion.strength - 0.05).abs() < f32::EPSILON);
        assert!((config.effects.specular.strength - 0.8).abs() < f32::EPSILON);
        assert!((config.effects.glitter.density - 100.0).abs() < f32::EPSILON);
        assert!(config.effects.environment_mapping.enabled);
    }

    #[test]
    fn default_config_has_correct_bloom() {
        let config = CrystalConfig::default();
        assert!(config.bloom.enabled);
        assert!((config.bloom.threshold - 0.8).abs() < f32::EPSILON);
        assert!((config.bloom.intensity - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn default_config_has_correct_animation() {
        let config = CrystalConfig::default();
        assert!((config.animation.rotation_speed - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: CrystalConfig = toml::from_str(
            r#"
[effects.fresnel]
power = 3.0

[[lighting.lights]]
position = [0.0, 5.0, 0.0]
color = [1.0, 0.8, 0.6]
"#,
        )
        .unwrap();
        assert!((config.effects.fresnel.power - 3.0).abs() < f32::EPSILON);
        assert!(config.effects.fresnel.enabled);
        assert_eq!(config.lighting.lights.len(), 1);
        assert_eq!(config.lighting.lights[0].color, [1.0, 0.8, 0.6]);
        assert_eq!(config.window.width, 800);
    }
}
