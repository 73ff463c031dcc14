use crystal_config::CrystalConfig;

use crate::gpu::{GpuBackend, RenderError};
use crate::shader::{EffectDescriptor, ShaderSourceLoader, UniformWriter};

use super::surface::{
    DispersionEffect, EnvironmentMappingEffect, FresnelEffect, GlitterEffect, SpecularEffect,
};
use super::types::{EffectInfo, FrameContext, UniformBinder};

/// One of the built-in surface effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fresnel(FresnelEffect),
    EnvironmentMapping(EnvironmentMappingEffect),
    Dispersion(DispersionEffect),
    Specular(SpecularEffect),
    Glitter(GlitterEffect),
}

impl Effect {
    pub fn info(&self) -> &'static EffectInfo {
        match self {
            Effect::Fresnel(_) => &FresnelEffect::INFO,
            Effect::EnvironmentMapping(_) => &EnvironmentMappingEffect::INFO,
            Effect::Dispersion(_) => &DispersionEffect::INFO,
            Effect::Specular(_) => &SpecularEffect::INFO,
            Effect::Glitter(_) => &GlitterEffect::INFO,
        }
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }
}

impl UniformBinder for Effect {
    fn bind_uniforms<B: GpuBackend>(
        &self,
        writer: &mut UniformWriter<'_, B>,
        frame: &FrameContext<B::Texture>,
    ) -> Result<(), RenderError> {
        match self {
            Effect::Fresnel(e) => e.bind_uniforms(writer, frame),
            Effect::EnvironmentMapping(e) => e.bind_uniforms(writer, frame),
            Effect::Dispersion(e) => e.bind_uniforms(writer, frame),
            Effect::Specular(e) => e.bind_uniforms(writer, frame),
            Effect::Glitter(e) => e.bind_uniforms(writer, frame),
        }
    }
}

/// Ordered effects of the main program.
///
/// Order decides where each effect's `result +=` lands in the merged
/// shader and the order uniforms are bound in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectSet {
    effects: Vec<Effect>,
}

impl EffectSet {
    pub fn new(effects: Vec<Effect>) -> Self {
        Self { effects }
    }

    /// Enabled effects from config, in the fixed order Fresnel,
    /// EnvironmentMapping, Dispersion, Specular, Glitter.
    pub fn from_config(config: &CrystalConfig) -> Self {
        let fx = &config.effects;
        let mut effects = Vec::with_capacity(5);
        if fx.fresnel.enabled {
            effects.push(Effect::Fresnel(FresnelEffect {
                power: fx.fresnel.power,
            }));
        }
        if fx.environment_mapping.enabled {
            effects.push(Effect::EnvironmentMapping(EnvironmentMappingEffect::default()));
        }
        if fx.dispersion.enabled {
            effects.push(Effect::Dispersion(DispersionEffect {
                strength: fx.dispersion.strength,
            }));
        }
        if fx.specular.enabled {
            let lights = &config.lighting.lights;
            effects.push(Effect::Specular(SpecularEffect {
                strength: fx.specular.strength,
                light_positions: lights.iter().map(|l| l.position).collect(),
                light_colors: lights.iter().map(|l| l.color).collect(),
            }));
        }
        if fx.glitter.enabled {
            effects.push(Effect::Glitter(GlitterEffect {
                density: fx.glitter.density,
            }));
        }
        Self { effects }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.effects.iter().map(Effect::name).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.name() == name)
    }

    /// Shader descriptors, in set order, with sources from `loader`.
    pub fn descriptors(&self, loader: &dyn ShaderSourceLoader) -> Vec<EffectDescriptor> {
        self.effects
            .iter()
            .map(|e| e.info().descriptor(loader))
            .collect()
    }

    /// Bind every effect's uniforms in set order, stopping at the first error.
    pub fn bind_all<B: GpuBackend>(
        &self,
        writer: &mut UniformWriter<'_, B>,
        frame: &FrameContext<B::Texture>,
    ) -> Result<(), RenderError> {
        for effect in &self.effects {
            effect.bind_uniforms(writer, frame)?;
        }
        Ok(())
    }
}
