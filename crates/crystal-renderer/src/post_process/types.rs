//! Bloom settings and uniforms.

use crystal_config::CrystalConfig;

use crate::effects::{FrameContext, UniformBinder};
use crate::gpu::{GpuBackend, RenderError};
use crate::shader::UniformWriter;

/// Bloom configuration captured at renderer creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    /// When false the pass still runs but adds no bloom.
    pub enabled: bool,
    /// Luminance above which pixels contribute to bloom.
    pub threshold: f32,
    /// Bloom brightness multiplier.
    pub intensity: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.8,
            intensity: 0.3,
        }
    }
}

impl BloomSettings {
    pub fn from_config(config: &CrystalConfig) -> Self {
        Self {
            enabled: config.bloom.enabled,
            threshold: config.bloom.threshold.clamp(0.0, 1.0),
            intensity: config.bloom.intensity.max(0.0),
        }
    }

    /// Intensity actually uploaded: zero when bloom is off.
    pub fn effective_intensity(&self) -> f32 {
        if self.enabled {
            self.intensity
        } else {
            0.0
        }
    }
}

/// Uniform binder for the post pass's bloom shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomEffect {
    pub settings: BloomSettings,
}

impl UniformBinder for BloomEffect {
    fn bind_uniforms<B: GpuBackend>(
        &self,
        writer: &mut UniformWriter<'_, B>,
        frame: &FrameContext<B::Texture>,
    ) -> Result<(), RenderError> {
        writer.set_f32("bloomThreshold", self.settings.threshold);
        writer.set_f32("bloomIntensity", self.settings.effective_intensity());
        writer.set_vec2("texelSize", frame.viewport.texel_size());
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bloom_settings_default() {
        let s = BloomSettings::default();
        assert!(s.enabled);
        assert!((s.threshold - 0.8).abs() < f32::EPSILON);
        assert!((s.intensity - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn bloom_settings_from_default_config() {
        let s = BloomSettings::from_config(&CrystalConfig::default());
        assert_eq!(s, BloomSettings::default());
    }

    #[test]
    fn bloom_settings_disabled_zeroes_intensity() {
        let mut config = CrystalConfig::default();
        config.bloom.enabled = false;
        let s = BloomSettings::from_config(&config);
        assert!(!s.enabled);
        assert_eq!(s.effective_intensity(), 0.0);
    }

    #[test]
    fn bloom_settings_clamps_ranges() {
        let mut config = CrystalConfig::default();
        config.bloom.threshold = 4.0;
        config.bloom.intensity = -1.0;
        let s = BloomSettings::from_config(&config);
        assert_eq!(s.threshold, 1.0);
        assert_eq!(s.intensity, 0.0);
    }
}
