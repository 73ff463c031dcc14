use crate::effects::{FrameContext, UniformBinder};
use crate::gpu::{GpuBackend, PhysicalSize, RenderError, ShaderStage};
use crate::shader::{attribute, EffectComposer, ShaderError, ShaderProgram, ShaderSourceLoader};

use super::types::{BloomEffect, BloomSettings};

/// Shader directory of the post pass.
pub const POST_PROCESSING_SHADER: &str = "post_processing";

/// Texture unit the scene color is sampled from.
pub const SCENE_TEXTURE_UNIT: u32 = 0;

/// Fullscreen bloom pass reading the main pass's render target.
pub struct PostProcessStage<B: GpuBackend> {
    program: ShaderProgram<B>,
    bloom: BloomEffect,
}

impl<B: GpuBackend> PostProcessStage<B> {
    /// Link the post program from `loader`'s `post_processing` sources.
    pub fn new(
        backend: &B,
        loader: &dyn ShaderSourceLoader,
        settings: BloomSettings,
    ) -> Result<Self, ShaderError> {
        let source = EffectComposer::new(
            loader.load(POST_PROCESSING_SHADER, ShaderStage::Vertex),
            loader.load(POST_PROCESSING_SHADER, ShaderStage::Fragment),
        )
        .compose(&[])?;
        let program = ShaderProgram::link(backend, POST_PROCESSING_SHADER, source.clone())
            .map_err(|e| {
                let err = attribute(e, &source, &[]);
                tracing::error!(error = %err, "post-processing program failed to build");
                err
            })?;
        Ok(Self {
            program,
            bloom: BloomEffect { settings },
        })
    }

    /// Draw `scene` to the default framebuffer with bloom applied.
    pub fn run(
        &mut self,
        backend: &B,
        scene: &B::RenderTarget,
        frame: &FrameContext<B::Texture>,
    ) -> Result<(), RenderError> {
        let PhysicalSize { width, height } = frame.viewport;
        backend.bind_render_target(None);
        backend.set_viewport(width, height);
        backend.clear([0.0, 0.0, 0.0, 1.0]);

        let mut writer = self.program.activate(backend);
        writer.bind_render_target_texture(SCENE_TEXTURE_UNIT, scene);
        writer.set_sampler("sceneTexture", SCENE_TEXTURE_UNIT);
        self.bloom.bind_uniforms(&mut writer, frame)?;

        backend.draw_fullscreen();
        Ok(())
    }

    pub fn settings(&self) -> BloomSettings {
        self.bloom.settings
    }

    pub fn program(&self) -> &ShaderProgram<B> {
        &self.program
    }

    pub fn delete(self, backend: &B) {
        self.program.delete(backend);
    }
}
