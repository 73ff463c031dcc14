//! Shader sources, composition and linked programs.
//!
//! Effects contribute GLSL fragments; [`EffectComposer`] pastes them into a
//! base skeleton and links one program. [`ShaderProgram`] owns the linked
//! handle and hands out [`UniformWriter`]s backed by a lazily built
//! [`UniformTable`].

mod composer;
mod descriptor;
mod loader;
mod program;
mod types;
mod uniforms;

pub use composer::*;
pub use descriptor::*;
pub use loader::*;
pub use program::*;
pub use types::*;
pub use uniforms::*;
