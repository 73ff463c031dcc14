//! Shader effect configuration types.
//!
//! Each built-in effect can be toggled individually. Disabled effects are
//! left out of the composed shader entirely.

use serde::{Deserialize, Serialize};

/// Fresnel reflectance rim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FresnelConfig {
    pub enabled: bool,
    /// Fresnel exponent (valid range: 0.1-20.0).
    pub power: f32,
}

impl Default for FresnelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            power: 5.0,
        }
    }
}

/// Cubemap reflection/refraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentMappingConfig {
    pub enabled: bool,
}

impl Default for EnvironmentMappingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Chromatic dispersion (per-channel refraction offset).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispersionConfig {
    pub enabled: bool,
    /// Spread between red and blue refraction (valid range: 0.0-1.0).
    pub strength: f32,
}

impl Default for DispersionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strength: 0.05,
        }
    }
}

/// Blinn-Phong highlights from the configured lights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecularConfig {
    pub enabled: bool,
    /// Highlight multiplier (valid range: 0.0-10.0).
    pub strength: f32,
}

impl Default for SpecularConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strength: 0.8,
        }
    }
}

/// Animated sparkle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlitterConfig {
    pub enabled: bool,
    /// Sparkle cells per unit (valid range: 1.0-10000.0).
    pub density: f32,
}

impl Default for GlitterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            density: 100.0,
        }
    }
}

/// All surface effects, in the order they accumulate into the final color.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct EffectsConfig {
    pub fresnel: FresnelConfig,
    pub environment_mapping: EnvironmentMappingConfig,
    pub dispersion: DispersionConfig,
    pub specular: SpecularConfig,
    pub glitter: GlitterConfig,
}

/// Screen-space bloom applied after the crystal pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    /// When false the post pass only copies the scene to the screen.
    pub enabled: bool,
    /// Luminance above which pixels bloom (valid range: 0.0-1.0).
    pub threshold: f32,
    /// Bloom brightness multiplier (valid range: 0.0-5.0).
    pub intensity: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.8,
            intensity: 0.3,
        }
    }
}
