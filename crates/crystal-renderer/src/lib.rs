pub mod effects;
pub mod environment;
pub mod gpu;
pub mod matrix;
pub mod mesh;
pub mod perf;
pub mod post_process;
pub mod renderer;
pub mod shader;

pub use effects::{Effect, EffectSet, UniformBinder};
pub use environment::CubemapFaces;
pub use gpu::{GlowBackend, GpuBackend, HeadlessBackend, RenderError};
pub use mesh::{MeshData, MeshVertex};
pub use perf::FrameTimer;
pub use post_process::{BloomSettings, PostProcessStage};
pub use renderer::{CrystalRenderer, RendererSettings, RendererState};
pub use shader::{
    DirectoryLoader, EffectComposer, EmbeddedLoader, ShaderError, ShaderProgram,
    ShaderSourceLoader,
};
