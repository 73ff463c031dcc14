//! Window, GL context and renderer creation.

use std::num::NonZeroU32;
use std::sync::Arc;

use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, SwapInterval};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crystal_common::CrystalError;
use crystal_renderer::{CrystalRenderer, GlowBackend, RendererSettings};

use crate::scene::renderer_error;

use super::core::{CrystalApp, Graphics};

// =============================================================================
// INITIALIZATION
// =============================================================================

fn window_error(err: impl std::fmt::Display) -> CrystalError {
    CrystalError::Window(err.to_string())
}

/// The config with the most MSAA samples; the first one wins a tie.
fn most_samples<C>(configs: impl Iterator<Item = C>, samples: impl Fn(&C) -> u8) -> Option<C> {
    configs.fold(None, |best: Option<C>, config| match best {
        Some(best) if samples(&best) >= samples(&config) => Some(best),
        _ => Some(config),
    })
}

impl CrystalApp {
    /// Create the window and a GL 3.3 core context, then bring up the
    /// renderer with the loaded model and environment.
    ///
    /// # Panics
    ///
    /// If the display reports no GL configs at all.
    pub(super) fn initialize_graphics(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> Result<Graphics, CrystalError> {
        let window_config = &self.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attrs))
            .build(event_loop, template, |configs| {
                // The picker has to return a config; an empty list means the
                // platform has no usable GL at all.
                most_samples(configs, |config| config.num_samples())
                    .expect("display offered no GL configs")
            })
            .map_err(window_error)?;
        let window = window.ok_or_else(|| window_error("display builder returned no window"))?;

        let raw_handle = window
            .window_handle()
            .map(|handle| handle.as_raw())
            .map_err(window_error)?;
        let display = gl_config.display();
        let context_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_handle));

        // SAFETY: the raw handle belongs to `window`, which outlives the
        // context inside `Graphics`.
        let context = unsafe { display.create_context(&gl_config, &context_attrs) }
            .map_err(window_error)?;
        let surface_attrs = window
            .build_surface_attributes(Default::default())
            .map_err(window_error)?;
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs) }
            .map_err(window_error)?;
        let context = context.make_current(&surface).map_err(window_error)?;

        if window_config.vsync {
            if let Err(e) =
                surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                tracing::warn!("Failed to enable vsync: {e}");
            }
        }

        // SAFETY: the context was made current on this thread above.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        };
        let backend = unsafe { GlowBackend::new(Arc::new(gl)) }.map_err(renderer_error)?;

        let mut settings = RendererSettings::from_config(&self.config);
        let size = window.inner_size();
        if size.width > 0 && size.height > 0 {
            settings.viewport = crystal_renderer::gpu::PhysicalSize::new(size.width, size.height);
        }

        let mut renderer = CrystalRenderer::new(backend, settings);
        renderer
            .initialize(self.loader.as_ref())
            .map_err(renderer_error)?;
        renderer.setup_model(&self.mesh).map_err(renderer_error)?;
        if let Some(faces) = self.environment.take() {
            renderer
                .set_environment_map(&faces)
                .map_err(renderer_error)?;
        }

        tracing::info!(
            width = size.width,
            height = size.height,
            "Window and GL context ready"
        );
        Ok(Graphics {
            renderer,
            surface,
            context,
            window,
        })
    }
}
