//! Crystal material configuration.

use serde::{Deserialize, Serialize};

/// Surface parameters shared by every effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Base tint of the crystal body (linear RGB).
    pub crystal_color: [f32; 3],
    /// Index of refraction (valid range: 1.0-3.0).
    pub refraction_index: f32,
    /// Output alpha of the crystal surface (valid range: 0.0-1.0).
    pub alpha: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            crystal_color: [0.9, 0.9, 1.0],
            refraction_index: 1.5,
            alpha: 0.85,
        }
    }
}
