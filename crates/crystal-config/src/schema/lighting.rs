//! Point light configuration.

use serde::{Deserialize, Serialize};

/// Number of light slots the built-in specular shader declares.
pub const MAX_LIGHTS: usize = 4;

/// A single point light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    /// Linear RGB, each channel 0.0-1.0.
    pub color: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0],
        }
    }
}

/// Lights used by the specular effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Between 1 and [`MAX_LIGHTS`] entries.
    pub lights: Vec<LightConfig>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            lights: vec![
                LightConfig {
                    position: [3.0, 3.0, 5.0],
                    color: [1.0, 1.0, 1.0],
                },
                LightConfig {
                    position: [-3.0, 3.0, 5.0],
                    color: [0.5, 0.5, 0.5],
                },
            ],
        }
    }
}
