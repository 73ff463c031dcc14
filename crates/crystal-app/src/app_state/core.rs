//! CrystalApp struct definition and constructor.

use glutin::context::PossiblyCurrentContext;
use glutin::surface::{Surface, WindowSurface};
use winit::window::Window;

use crystal_config::CrystalConfig;
use crystal_renderer::{
    CrystalRenderer, CubemapFaces, FrameTimer, GlowBackend, MeshData, ShaderSourceLoader,
};

/// Everything tied to the live GL context.
///
/// Field order is drop order: GPU objects go before the surface and
/// context they belong to, and the window goes last.
pub(super) struct Graphics {
    pub(super) renderer: CrystalRenderer<GlowBackend>,
    pub(super) surface: Surface<WindowSurface>,
    pub(super) context: PossiblyCurrentContext,
    pub(super) window: Window,
}

/// Top-level application state.
pub struct CrystalApp {
    pub(super) config: CrystalConfig,
    pub(super) loader: Box<dyn ShaderSourceLoader>,
    pub(super) mesh: MeshData,
    pub(super) environment: Option<CubemapFaces>,

    // Created on `resumed`, dropped on shutdown.
    pub(super) graphics: Option<Graphics>,

    pub(super) timer: FrameTimer,
    pub(super) failed: bool,
}

impl CrystalApp {
    pub fn new(
        config: CrystalConfig,
        loader: Box<dyn ShaderSourceLoader>,
        mesh: MeshData,
        environment: Option<CubemapFaces>,
    ) -> Self {
        Self {
            config,
            loader,
            mesh,
            environment,
            graphics: None,
            timer: FrameTimer::new(),
            failed: false,
        }
    }

    /// True when the loop stopped because of an error.
    pub fn failed(&self) -> bool {
        self.failed
    }
}
