//! The seam between the renderer and a graphics API.
//!
//! Every call happens on the thread that owns the context. Methods take
//! `&self` because the underlying API is a global state machine; the only
//! "current program" lives inside the backend.

use std::fmt;

use super::types::{ActiveUniform, ProgramBuildError};
use crate::environment::CubemapFaces;
use crate::mesh::MeshData;

pub trait GpuBackend {
    type Program: Copy + PartialEq + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;
    type Mesh: fmt::Debug;
    type Texture: Copy + fmt::Debug;
    type RenderTarget: fmt::Debug;

    /// Compile both stages and link them. Intermediate shader objects are
    /// released whether or not linking succeeds.
    fn create_program(
        &self,
        vertex: &str,
        fragment: &str,
    ) -> Result<Self::Program, ProgramBuildError>;

    /// Linker output for a successfully linked program (usually warnings or empty).
    fn program_info_log(&self, program: Self::Program) -> String;

    fn delete_program(&self, program: Self::Program);

    fn use_program(&self, program: Option<Self::Program>);

    fn active_uniforms(&self, program: Self::Program) -> Vec<ActiveUniform>;

    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    fn set_uniform_1f(&self, location: &Self::UniformLocation, value: f32);
    fn set_uniform_1i(&self, location: &Self::UniformLocation, value: i32);
    fn set_uniform_2f(&self, location: &Self::UniformLocation, value: [f32; 2]);
    fn set_uniform_3f(&self, location: &Self::UniformLocation, value: [f32; 3]);
    fn set_uniform_mat4(&self, location: &Self::UniformLocation, value: &[f32; 16]);

    fn create_mesh(&self, mesh: &MeshData) -> Result<Self::Mesh, String>;
    fn draw_mesh(&self, mesh: &Self::Mesh);
    fn delete_mesh(&self, mesh: Self::Mesh);

    /// Off-screen color + depth target sampled by the post pass.
    fn create_render_target(&self, width: u32, height: u32)
        -> Result<Self::RenderTarget, String>;
    /// `None` binds the window's default framebuffer.
    fn bind_render_target(&self, target: Option<&Self::RenderTarget>);
    fn bind_render_target_texture(&self, unit: u32, target: &Self::RenderTarget);
    fn delete_render_target(&self, target: Self::RenderTarget);

    fn create_cubemap(&self, faces: &CubemapFaces) -> Result<Self::Texture, String>;
    fn bind_cubemap(&self, unit: u32, texture: Self::Texture);
    fn delete_texture(&self, texture: Self::Texture);

    fn set_viewport(&self, width: u32, height: u32);
    /// Clear color and depth of the bound framebuffer.
    fn clear(&self, color: [f32; 4]);
    /// Draw one screen-covering triangle with no vertex inputs.
    fn draw_fullscreen(&self);

    /// Pop the oldest pending driver error, if any.
    fn poll_error(&self) -> Option<String>;
}

