//! OpenGL 3.3 core backend over `glow`.

use std::sync::Arc;

use glow::HasContext;

use super::backend::GpuBackend;
use super::types::{ActiveUniform, ProgramBuildError, ShaderStage};
use crate::environment::CubemapFaces;
use crate::mesh::{MeshData, MeshVertex};

const RGBA8_INTERNAL_FORMAT: i32 = glow::RGBA8 as i32;

fn gl_size(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Vertex array plus its vertex and index buffers.
#[derive(Debug)]
pub struct GlowMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    index_count: i32,
}

/// Framebuffer with a sampled color texture and a depth renderbuffer.
#[derive(Debug)]
pub struct GlowRenderTarget {
    fbo: glow::Framebuffer,
    color: glow::Texture,
    depth: glow::Renderbuffer,
    pub width: u32,
    pub height: u32,
}

/// [`GpuBackend`] over a shared `glow` context.
pub struct GlowBackend {
    gl: Arc<glow::Context>,
    /// Attribute-less VAO for the fullscreen triangle (core profile needs one bound).
    empty_vao: glow::VertexArray,
}

impl GlowBackend {
    /// # Safety
    ///
    /// `gl` must be current on the calling thread, and every later call on
    /// the backend must happen on that thread with the same context current.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Result<Self, String> {
        let empty_vao = gl.create_vertex_array()?;
        gl.enable(glow::TEXTURE_CUBE_MAP_SEAMLESS);
        Ok(Self { gl, empty_vao })
    }

    pub fn context(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    unsafe fn compile_stage(
        &self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<glow::Shader, ProgramBuildError> {
        let gl = &self.gl;
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        let shader = gl
            .create_shader(kind)
            .map_err(|e| ProgramBuildError::compile(stage, format!("create_shader failed: {e}")))?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(ProgramBuildError::compile(stage, log));
        }
        Ok(shader)
    }
}

impl Drop for GlowBackend {
    fn drop(&mut self) {
        unsafe { self.gl.delete_vertex_array(self.empty_vao) };
    }
}

impl GpuBackend for GlowBackend {
    type Program = glow::Program;
    type UniformLocation = glow::UniformLocation;
    type Mesh = GlowMesh;
    type Texture = glow::Texture;
    type RenderTarget = GlowRenderTarget;

    fn create_program(
        &self,
        vertex: &str,
        fragment: &str,
    ) -> Result<glow::Program, ProgramBuildError> {
        let gl = &self.gl;
        unsafe {
            let vs = self.compile_stage(ShaderStage::Vertex, vertex)?;
            let fs = match self.compile_stage(ShaderStage::Fragment, fragment) {
                Ok(fs) => fs,
                Err(e) => {
                    gl.delete_shader(vs);
                    return Err(e);
                }
            };

            let program = match gl.create_program() {
                Ok(p) => p,
                Err(e) => {
                    gl.delete_shader(vs);
                    gl.delete_shader(fs);
                    return Err(ProgramBuildError::link(format!("create_program failed: {e}")));
                }
            };
            gl.attach_shader(program, vs);
            gl.attach_shader(program, fs);
            gl.link_program(program);

            gl.detach_shader(program, vs);
            gl.detach_shader(program, fs);
            gl.delete_shader(vs);
            gl.delete_shader(fs);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(ProgramBuildError::link(log));
            }
            Ok(program)
        }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { self.gl.delete_program(program) };
    }

    fn use_program(&self, program: Option<glow::Program>) {
        unsafe { self.gl.use_program(program) };
    }

    fn active_uniforms(&self, program: glow::Program) -> Vec<ActiveUniform> {
        let gl = &self.gl;
        unsafe {
            (0..gl.get_active_uniforms(program))
                .filter_map(|index| gl.get_active_uniform(program, index))
                .map(|u| ActiveUniform::from_reflection(&u.name, u.size.max(1) as usize))
                .collect()
        }
    }

    fn uniform_location(&self, program: glow::Program, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn set_uniform_1f(&self, location: &glow::UniformLocation, value: f32) {
        unsafe { self.gl.uniform_1_f32(Some(location), value) };
    }

    fn set_uniform_1i(&self, location: &glow::UniformLocation, value: i32) {
        unsafe { self.gl.uniform_1_i32(Some(location), value) };
    }

    fn set_uniform_2f(&self, location: &glow::UniformLocation, value: [f32; 2]) {
        unsafe { self.gl.uniform_2_f32(Some(location), value[0], value[1]) };
    }

    fn set_uniform_3f(&self, location: &glow::UniformLocation, value: [f32; 3]) {
        unsafe {
            self.gl
                .uniform_3_f32(Some(location), value[0], value[1], value[2])
        };
    }

    fn set_uniform_mat4(&self, location: &glow::UniformLocation, value: &[f32; 16]) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(location), false, value)
        };
    }

    fn create_mesh(&self, mesh: &MeshData) -> Result<GlowMesh, String> {
        let gl = &self.gl;
        let index_count = i32::try_from(mesh.indices.len())
            .map_err(|_| format!("{} indices exceed the GL limit", mesh.indices.len()))?;
        unsafe {
            let vao = gl.create_vertex_array()?;
            let vbo = gl.create_buffer()?;
            let ebo = gl.create_buffer()?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.vertices),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.indices),
                glow::STATIC_DRAW,
            );
            for (location, components, offset) in MeshVertex::ATTRIBUTES {
                gl.enable_vertex_attrib_array(location);
                gl.vertex_attrib_pointer_f32(
                    location,
                    components,
                    glow::FLOAT,
                    false,
                    MeshVertex::STRIDE,
                    offset,
                );
            }
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(GlowMesh {
                vao,
                vbo,
                ebo,
                index_count,
            })
        }
    }

    fn draw_mesh(&self, mesh: &GlowMesh) {
        let gl = &self.gl;
        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.bind_vertex_array(Some(mesh.vao));
            gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
            gl.bind_vertex_array(None);
        }
    }

    fn delete_mesh(&self, mesh: GlowMesh) {
        unsafe {
            self.gl.delete_vertex_array(mesh.vao);
            self.gl.delete_buffer(mesh.vbo);
            self.gl.delete_buffer(mesh.ebo);
        }
    }

    fn create_render_target(&self, width: u32, height: u32) -> Result<GlowRenderTarget, String> {
        let gl = &self.gl;
        let (w, h) = (gl_size(width.max(1)), gl_size(height.max(1)));
        unsafe {
            let fbo = gl.create_framebuffer()?;
            let color = gl.create_texture()?;
            let depth = gl.create_renderbuffer()?;

            gl.bind_texture(glow::TEXTURE_2D, Some(color));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                RGBA8_INTERNAL_FORMAT,
                w,
                h,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                None,
            );
            for (param, value) in [
                (glow::TEXTURE_MIN_FILTER, glow::LINEAR),
                (glow::TEXTURE_MAG_FILTER, glow::LINEAR),
                (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
                (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
            ] {
                gl.tex_parameter_i32(glow::TEXTURE_2D, param, value as i32);
            }

            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth));
            gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH_COMPONENT24, w, h);

            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(color),
                0,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth),
            );

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
            gl.bind_texture(glow::TEXTURE_2D, None);

            if status != glow::FRAMEBUFFER_COMPLETE {
                gl.delete_framebuffer(fbo);
                gl.delete_texture(color);
                gl.delete_renderbuffer(depth);
                return Err(format!("framebuffer incomplete: 0x{status:x}"));
            }

            Ok(GlowRenderTarget {
                fbo,
                color,
                depth,
                width,
                height,
            })
        }
    }

    fn bind_render_target(&self, target: Option<&GlowRenderTarget>) {
        unsafe {
            self.gl
                .bind_framebuffer(glow::FRAMEBUFFER, target.map(|t| t.fbo))
        };
    }

    fn bind_render_target_texture(&self, unit: u32, target: &GlowRenderTarget) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(target.color));
        }
    }

    fn delete_render_target(&self, target: GlowRenderTarget) {
        unsafe {
            self.gl.delete_framebuffer(target.fbo);
            self.gl.delete_texture(target.color);
            self.gl.delete_renderbuffer(target.depth);
        }
    }

    fn create_cubemap(&self, faces: &CubemapFaces) -> Result<glow::Texture, String> {
        faces.validate()?;
        let gl = &self.gl;
        let size = gl_size(faces.size);
        unsafe {
            let texture = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(texture));
            for (i, pixels) in faces.faces.iter().enumerate() {
                gl.tex_image_2d(
                    glow::TEXTURE_CUBE_MAP_POSITIVE_X + i as u32,
                    0,
                    RGBA8_INTERNAL_FORMAT,
                    size,
                    size,
                    0,
                    glow::RGBA,
                    glow::UNSIGNED_BYTE,
                    Some(pixels.as_slice()),
                );
            }
            for (param, value) in [
                (glow::TEXTURE_MIN_FILTER, glow::LINEAR),
                (glow::TEXTURE_MAG_FILTER, glow::LINEAR),
                (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
                (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
                (glow::TEXTURE_WRAP_R, glow::CLAMP_TO_EDGE),
            ] {
                gl.tex_parameter_i32(glow::TEXTURE_CUBE_MAP, param, value as i32);
            }
            gl.bind_texture(glow::TEXTURE_CUBE_MAP, None);
            Ok(texture)
        }
    }

    fn bind_cubemap(&self, unit: u32, texture: glow::Texture) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(texture));
        }
    }

    fn delete_texture(&self, texture: glow::Texture) {
        unsafe { self.gl.delete_texture(texture) };
    }

    fn set_viewport(&self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, gl_size(width), gl_size(height)) };
    }

    fn clear(&self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn draw_fullscreen(&self) {
        let gl = &self.gl;
        unsafe {
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::BLEND);
            gl.bind_vertex_array(Some(self.empty_vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
            gl.bind_vertex_array(None);
        }
    }

    fn poll_error(&self) -> Option<String> {
        let code = unsafe { self.gl.get_error() };
        let name = match code {
            glow::NO_ERROR => return None,
            glow::INVALID_ENUM => "GL_INVALID_ENUM",
            glow::INVALID_VALUE => "GL_INVALID_VALUE",
            glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
            glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
            glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
            _ => return Some(format!("GL error 0x{code:x}")),
        };
        Some(name.to_string())
    }
}
