//! The per-effect uniform-binding capability.

use crate::gpu::{GpuBackend, PhysicalSize, RenderError};
use crate::shader::{EffectDescriptor, ShaderSourceLoader, UniformWriter};

/// Semantic type of a uniform an effect owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Int,
    Vec3Array,
    SamplerCube,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSpec {
    pub name: &'static str,
    pub kind: UniformKind,
}

impl UniformSpec {
    pub const fn new(name: &'static str, kind: UniformKind) -> Self {
        Self { name, kind }
    }
}

/// Static identity of an effect: where its shaders live, which functions
/// the composer calls, and which uniforms it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectInfo {
    /// Shader directory name.
    pub name: &'static str,
    pub fragment_function: &'static str,
    pub vertex_function: Option<&'static str>,
    pub uniforms: &'static [UniformSpec],
}

impl EffectInfo {
    /// Descriptor with both stages read from `loader`.
    pub fn descriptor(&self, loader: &dyn ShaderSourceLoader) -> EffectDescriptor {
        let mut descriptor = EffectDescriptor::new(self.name, self.fragment_function);
        descriptor.vertex_function = self.vertex_function.map(str::to_string);
        descriptor.load(loader)
    }
}

/// Per-frame values shared by every binder.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<T> {
    /// Seconds on the render clock; never decreases between frames.
    pub time: f32,
    pub environment_map: Option<T>,
    pub viewport: PhysicalSize,
}

/// Writes an effect's uniforms into the currently active program.
///
/// Called once per frame per effect, after the program is activated and
/// before the draw. Implementations only write uniforms and bind textures.
pub trait UniformBinder {
    fn bind_uniforms<B: GpuBackend>(
        &self,
        writer: &mut UniformWriter<'_, B>,
        frame: &FrameContext<B::Texture>,
    ) -> Result<(), RenderError>;
}
