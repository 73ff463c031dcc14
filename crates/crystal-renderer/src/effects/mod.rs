//! Crystal surface effects.
//!
//! Each effect owns a GLSL contribution (under `shaders/<name>/`) and the
//! uniforms that contribution declares. Effects never own a GPU program;
//! they are merged into the shared main program and bind their uniforms
//! into it every frame through [`UniformBinder`].

mod set;
mod surface;
mod types;

pub use set::*;
pub use surface::*;
pub use types::*;
