use crate::effects::FrameContext;
use crate::environment::CubemapFaces;
use crate::gpu::{GpuBackend, PhysicalSize, RenderError};
use crate::mesh::MeshData;
use crate::post_process::PostProcessStage;
use crate::shader::{EffectComposer, ShaderProgram, ShaderSourceLoader};

use super::types::{precondition, RendererSettings, RendererState};

/// Draws the crystal with the configured effects, then the bloom pass.
///
/// Owns the GPU backend and every resource created through it. All calls
/// must come from the thread that owns the backend's context.
pub struct CrystalRenderer<B: GpuBackend> {
    backend: B,
    settings: RendererSettings,
    state: RendererState,
    main: Option<ShaderProgram<B>>,
    post: Option<PostProcessStage<B>>,
    target: Option<B::RenderTarget>,
    mesh: Option<B::Mesh>,
    environment: Option<B::Texture>,
    time: f32,
    frame_rendered: bool,
    frames: u64,
    gpu_errors: usize,
}

impl<B: GpuBackend> CrystalRenderer<B> {
    pub fn new(backend: B, settings: RendererSettings) -> Self {
        Self {
            backend,
            settings,
            state: RendererState::Uninitialized,
            main: None,
            post: None,
            target: None,
            mesh: None,
            environment: None,
            time: 0.0,
            frame_rendered: false,
            frames: 0,
            gpu_errors: 0,
        }
    }

    /// Link the main and post programs and create the off-screen target.
    ///
    /// On failure everything created so far is released and the renderer
    /// stays `Uninitialized`.
    pub fn initialize(&mut self, loader: &dyn ShaderSourceLoader) -> Result<(), RenderError> {
        if self.state != RendererState::Uninitialized {
            return Err(precondition("initialize", self.state));
        }

        if let Err(err) = self.create_resources(loader) {
            tracing::error!(error = %err, "renderer initialization failed");
            self.release_pipeline();
            return Err(err);
        }

        self.state = RendererState::ProgramsReady;
        tracing::info!(
            effects = ?self.settings.effects.names(),
            width = self.settings.viewport.width,
            height = self.settings.viewport.height,
            bloom = self.settings.bloom.enabled,
            "Crystal renderer initialized"
        );
        Ok(())
    }

    fn create_resources(&mut self, loader: &dyn ShaderSourceLoader) -> Result<(), RenderError> {
        let descriptors = self.settings.effects.descriptors(loader);
        let main = EffectComposer::from_loader(loader).build(&self.backend, &descriptors)?;
        self.main = Some(main);

        let post = PostProcessStage::new(&self.backend, loader, self.settings.bloom)?;
        self.post = Some(post);

        let PhysicalSize { width, height } = self.settings.viewport;
        let target = self
            .backend
            .create_render_target(width, height)
            .map_err(RenderError::Gpu)?;
        self.target = Some(target);

        if self.environment.is_none() {
            let sky = CubemapFaces::gradient(self.settings.environment_size);
            let texture = self
                .backend
                .create_cubemap(&sky)
                .map_err(RenderError::Environment)?;
            tracing::debug!(size = sky.size, "using procedural environment map");
            self.environment = Some(texture);
        }
        Ok(())
    }

    /// Upload mesh buffers, replacing any previous model. Allowed before
    /// or after `initialize`.
    pub fn setup_model(&mut self, mesh: &MeshData) -> Result<(), RenderError> {
        if self.state == RendererState::TornDown {
            return Err(precondition("setup_model", self.state));
        }
        mesh.validate().map_err(RenderError::Mesh)?;
        let handle = self.backend.create_mesh(mesh).map_err(RenderError::Mesh)?;
        if let Some(old) = self.mesh.replace(handle) {
            self.backend.delete_mesh(old);
        }
        tracing::info!(
            vertices = mesh.vertices.len(),
            triangles = mesh.triangle_count(),
            "Model uploaded"
        );
        Ok(())
    }

    /// Upload a cubemap for environment mapping, replacing the current one.
    pub fn set_environment_map(&mut self, faces: &CubemapFaces) -> Result<(), RenderError> {
        if self.state == RendererState::TornDown {
            return Err(precondition("set_environment_map", self.state));
        }
        let texture = self
            .backend
            .create_cubemap(faces)
            .map_err(RenderError::Environment)?;
        if let Some(old) = self.environment.replace(texture) {
            self.backend.delete_texture(old);
        }
        tracing::debug!(size = faces.size, "environment map uploaded");
        Ok(())
    }

    /// Draw the model into the off-screen target.
    ///
    /// `time` drives animated effects; a value earlier than the previous
    /// frame's is held at the previous value so the clock never runs
    /// backwards. Before `initialize` this returns
    /// [`RenderError::PreconditionViolation`] without touching the GPU.
    pub fn render(
        &mut self,
        model: &[f32; 16],
        view: &[f32; 16],
        projection: &[f32; 16],
        time: f32,
    ) -> Result<(), RenderError> {
        let state = self.state;
        let (Some(main), Some(target)) = (self.main.as_mut(), self.target.as_ref()) else {
            return Err(precondition("render", state));
        };
        if state != RendererState::ProgramsReady {
            return Err(precondition("render", state));
        }

        self.time = self.time.max(time);
        let settings = &self.settings;
        let viewport = settings.viewport;
        let frame = FrameContext {
            time: self.time,
            environment_map: self.environment,
            viewport,
        };

        // Clearing discards any frame still waiting for post_process.
        self.frame_rendered = false;
        self.backend.bind_render_target(Some(target));
        self.backend.set_viewport(viewport.width, viewport.height);
        self.backend.clear(settings.clear_color);

        let mut writer = main.activate(&self.backend);
        writer.set_mat4("model", model);
        writer.set_mat4("view", view);
        writer.set_mat4("projection", projection);
        writer.set_vec3("cameraPosition", settings.camera_position);
        writer.set_vec3("crystalColor", settings.crystal_color);
        writer.set_f32("refractionIndex", settings.refraction_index);
        writer.set_f32("materialAlpha", settings.material_alpha);
        settings.effects.bind_all(&mut writer, &frame)?;

        match &self.mesh {
            Some(mesh) => self.backend.draw_mesh(mesh),
            None => tracing::trace!("no model uploaded, skipping draw"),
        }

        if self.frames == 0 {
            tracing::info!(
                width = viewport.width,
                height = viewport.height,
                "First frame rendered"
            );
        }
        self.frames += 1;
        self.frame_rendered = true;
        self.drain_gpu_errors("render");
        Ok(())
    }

    /// Run the bloom pass over the last rendered frame onto the screen.
    ///
    /// Requires a `render` since the previous `post_process`.
    pub fn post_process(&mut self) -> Result<(), RenderError> {
        let state = self.state;
        let (Some(post), Some(target)) = (self.post.as_mut(), self.target.as_ref()) else {
            return Err(precondition("post_process", state));
        };
        if state != RendererState::ProgramsReady {
            return Err(precondition("post_process", state));
        }
        if !self.frame_rendered {
            return Err(precondition("post_process", "ProgramsReady (no frame rendered)"));
        }

        let frame = FrameContext {
            time: self.time,
            environment_map: self.environment,
            viewport: self.settings.viewport,
        };
        post.run(&self.backend, target, &frame)?;

        self.frame_rendered = false;
        self.drain_gpu_errors("post_process");
        Ok(())
    }

    /// Follow a window resize. Zero-sized windows (minimised) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if self.state == RendererState::TornDown {
            return Err(precondition("resize", self.state));
        }
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "ignoring zero-sized resize");
            return Ok(());
        }
        if self.settings.viewport == PhysicalSize::new(width, height) {
            return Ok(());
        }

        if self.target.is_some() {
            let target = self
                .backend
                .create_render_target(width, height)
                .map_err(RenderError::Gpu)?;
            if let Some(old) = self.target.replace(target) {
                self.backend.delete_render_target(old);
            }
            // The old target's contents are gone.
            self.frame_rendered = false;
        }
        self.settings.viewport = PhysicalSize::new(width, height);
        tracing::debug!(width, height, "renderer resized");
        Ok(())
    }

    /// Release every GPU resource. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.state == RendererState::TornDown {
            return;
        }
        self.release_pipeline();
        if let Some(mesh) = self.mesh.take() {
            self.backend.delete_mesh(mesh);
        }
        if let Some(texture) = self.environment.take() {
            self.backend.delete_texture(texture);
        }
        self.frame_rendered = false;
        self.state = RendererState::TornDown;
        tracing::info!(frames = self.frames, "Crystal renderer torn down");
    }

    fn release_pipeline(&mut self) {
        if let Some(program) = self.main.take() {
            program.delete(&self.backend);
        }
        if let Some(post) = self.post.take() {
            post.delete(&self.backend);
        }
        if let Some(target) = self.target.take() {
            self.backend.delete_render_target(target);
        }
    }

    fn drain_gpu_errors(&mut self, operation: &'static str) {
        while let Some(error) = self.backend.poll_error() {
            self.gpu_errors += 1;
            tracing::warn!(operation, %error, "GPU reported an error");
        }
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The linked main program, once initialized.
    pub fn main_program(&self) -> Option<&ShaderProgram<B>> {
        self.main.as_ref()
    }

    pub fn post_stage(&self) -> Option<&PostProcessStage<B>> {
        self.post.as_ref()
    }

    /// Render clock value of the last frame.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn has_model(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn has_environment_map(&self) -> bool {
        self.environment.is_some()
    }

    /// GPU errors drained and logged since creation.
    pub fn gpu_error_count(&self) -> usize {
        self.gpu_errors
    }
}
