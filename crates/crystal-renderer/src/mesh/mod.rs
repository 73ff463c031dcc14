//! Crystal mesh data: vertex layout, validation, and the procedural gem.
//!
//! Mesh files are parsed outside this crate; the renderer only sees the
//! interleaved vertex and index arrays in [`MeshData`].

mod gem;
mod types;

pub use gem::*;
pub use types::*;
