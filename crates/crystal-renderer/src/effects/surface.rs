//! The built-in crystal surface effects.

use crate::gpu::{GpuBackend, RenderError};
use crate::shader::UniformWriter;

use super::types::{EffectInfo, FrameContext, UniformBinder, UniformKind, UniformSpec};

/// Texture unit the environment cubemap is bound to. Unit 0 is left for
/// the post pass's scene texture.
pub const ENVIRONMENT_TEXTURE_UNIT: u32 = 1;

/// Angle-dependent reflectance (Schlick).
#[derive(Debug, Clone, PartialEq)]
pub struct FresnelEffect {
    pub power: f32,
}

impl FresnelEffect {
    pub const INFO: EffectInfo = EffectInfo {
        name: "fresnel",
        fragment_function: "compute_Fresnel",
        vertex_function: None,
        uniforms: &[UniformSpec::new("fresnelPower", UniformKind::Float)],
    };
}

impl UniformBinder for FresnelEffect {
    fn bind_uniforms<B: GpuBackend>(
        &self,
        writer: &mut UniformWriter<'_, B>,
        _frame: &FrameContext<B::Texture>,
    ) -> Result<(), RenderError> {
        writer.set_f32("fresnelPower", self.power);
        Ok(())
    }
}

/// Reflection and refraction of the environment cubemap.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMappingEffect {
    pub texture_unit: u32,
}

impl Default for EnvironmentMappingEffect {
    fn default() -> Self {
        Self {
            texture_unit: ENVIRONMENT_TEXTURE_UNIT,
        }
    }
}

impl EnvironmentMappingEffect {
    pub const INFO: EffectInfo = EffectInfo {
        name: "environment_mapping",
        fragment_function: "compute_EnvironmentMapping",
        vertex_function: None,
        uniforms: &[UniformSpec::new("environmentMap", UniformKind::SamplerCube)],
    };
}

impl UniformBinder for EnvironmentMappingEffect {
    fn bind_uniforms<B: GpuBackend>(
        &self,
        writer: &mut UniformWriter<'_, B>,
        frame: &FrameContext<B::Texture>,
    ) -> Result<(), RenderError> {
        if let Some(texture) = frame.environment_map {
            writer.bind_cubemap(self.texture_unit, texture);
        }
        writer.set_sampler("environmentMap", self.texture_unit);
        Ok(())
    }
}

/// Per-channel refraction offset.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionEffect {
    pub strength: f32,
}

impl DispersionEffect {
    pub const INFO: EffectInfo = EffectInfo {
        name: "dispersion",
        fragment_function: "compute_Dispersion",
        vertex_function: None,
        uniforms: &[UniformSpec::new("dispersionStrength", UniformKind::Float)],
    };
}

impl UniformBinder for DispersionEffect {
    fn bind_uniforms<B: GpuBackend>(
        &self,
        writer: &mut UniformWriter<'_, B>,
        _frame: &FrameContext<B::Texture>,
    ) -> Result<(), RenderError> {
        writer.set_f32("dispersionStrength", self.strength);
        Ok(())
    }
}

/// Blinn-Phong highlights from a fixed set of point lights.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecularEffect {
    pub strength: f32,
    pub light_positions: Vec<[f32; 3]>,
    pub light_colors: Vec<[f32; 3]>,
}

impl SpecularEffect {
    pub const INFO: EffectInfo = EffectInfo {
        name: "specular",
        fragment_function: "compute_Specular",
        vertex_function: None,
        uniforms: &[
            UniformSpec::new("specularStrength", UniformKind::Float),
            UniformSpec::new("lightPositions", UniformKind::Vec3Array),
            UniformSpec::new("lightColors", UniformKind::Vec3Array),
            UniformSpec::new("lightCount", UniformKind::Int),
        ],
    };
}

impl UniformBinder for SpecularEffect {
    /// Fails with [`RenderError::UniformArrayOverflow`] before writing any
    /// light if either list is longer than the shader's array.
    fn bind_uniforms<B: GpuBackend>(
        &self,
        writer: &mut UniformWriter<'_, B>,
        _frame: &FrameContext<B::Texture>,
    ) -> Result<(), RenderError> {
        for (name, values) in [
            ("lightPositions", &self.light_positions),
            ("lightColors", &self.light_colors),
        ] {
            let capacity = writer.array_capacity(name);
            if capacity > 0 && values.len() > capacity {
                return Err(RenderError::UniformArrayOverflow {
                    name: name.to_string(),
                    requested: values.len(),
                    capacity,
                });
            }
        }

        writer.set_f32("specularStrength", self.strength);
        let positions = writer.set_vec3_array("lightPositions", &self.light_positions)?;
        let colors = writer.set_vec3_array("lightColors", &self.light_colors)?;
        writer.set_i32("lightCount", positions.min(colors) as i32);
        Ok(())
    }
}

/// Twinkling sparkle cells seeded in object space.
#[derive(Debug, Clone, PartialEq)]
pub struct GlitterEffect {
    pub density: f32,
}

impl GlitterEffect {
    pub const INFO: EffectInfo = EffectInfo {
        name: "glitter",
        fragment_function: "compute_Glitter",
        vertex_function: Some("vertex_Glitter"),
        uniforms: &[
            UniformSpec::new("glitterDensity", UniformKind::Float),
            UniformSpec::new("time", UniformKind::Float),
        ],
    };
}

impl UniformBinder for GlitterEffect {
    fn bind_uniforms<B: GpuBackend>(
        &self,
        writer: &mut UniformWriter<'_, B>,
        frame: &FrameContext<B::Texture>,
    ) -> Result<(), RenderError> {
        writer.set_f32("glitterDensity", self.density);
        writer.set_f32("time", frame.time);
        Ok(())
    }
}
