use std::fmt;

use crystal_config::CrystalConfig;

use crate::effects::EffectSet;
use crate::gpu::{PhysicalSize, RenderError};
use crate::post_process::BloomSettings;

/// Lifecycle of a [`CrystalRenderer`](super::CrystalRenderer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    Uninitialized,
    ProgramsReady,
    TornDown,
}

impl fmt::Display for RendererState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RendererState::Uninitialized => "Uninitialized",
            RendererState::ProgramsReady => "ProgramsReady",
            RendererState::TornDown => "TornDown",
        })
    }
}

pub(crate) fn precondition(operation: &'static str, state: impl fmt::Display) -> RenderError {
    RenderError::PreconditionViolation {
        operation,
        state: state.to_string(),
    }
}

/// Immutable snapshot of everything the renderer needs from config.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererSettings {
    pub viewport: PhysicalSize,
    pub camera_position: [f32; 3],
    pub crystal_color: [f32; 3],
    pub refraction_index: f32,
    pub material_alpha: f32,
    pub clear_color: [f32; 4],
    /// Edge length of the procedural sky used when no cubemap is supplied.
    pub environment_size: u32,
    pub effects: EffectSet,
    pub bloom: BloomSettings,
}

impl RendererSettings {
    pub fn from_config(config: &CrystalConfig) -> Self {
        Self {
            viewport: PhysicalSize::new(config.window.width, config.window.height),
            camera_position: config.camera.position,
            crystal_color: config.material.crystal_color,
            refraction_index: config.material.refraction_index,
            material_alpha: config.material.alpha,
            clear_color: [0.02, 0.02, 0.05, 1.0],
            environment_size: 64,
            effects: EffectSet::from_config(config),
            bloom: BloomSettings::from_config(config),
        }
    }
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self::from_config(&CrystalConfig::default())
    }
}
