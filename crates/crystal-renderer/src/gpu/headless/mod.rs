//! CPU stand-in for a GL context.
//!
//! Programs are "compiled" by the structural checks in [`glsl`], uniform
//! locations are handed out from parsed declarations, and every uniform
//! write and draw is recorded so callers can inspect what a frame did.
//! Mistakes a driver would flag (writing to a program that is not current,
//! setter/type mismatches, unknown handles) queue a diagnostic for
//! [`GpuBackend::poll_error`] instead of panicking.

mod glsl;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};

use super::backend::GpuBackend;
use super::types::{ActiveUniform, ProgramBuildError, ShaderStage};
use crate::environment::CubemapFaces;
use crate::mesh::MeshData;

use glsl::UniformDecl;

/// Program handle issued by [`HeadlessBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadlessProgram(u32);

/// One element slot of one uniform in one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessLocation {
    program: HeadlessProgram,
    slot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessMesh {
    id: u32,
    index_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessTexture(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessTarget {
    id: u32,
    pub width: u32,
    pub height: u32,
}

/// A value last written to a uniform slot.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Mat4([f32; 16]),
}

impl UniformValue {
    fn accepted_by(&self, glsl_type: &str) -> bool {
        match self {
            UniformValue::Float(_) => glsl_type == "float",
            UniformValue::Int(_) => {
                glsl_type == "int" || glsl_type == "bool" || glsl_type.starts_with("sampler")
            }
            UniformValue::Vec2(_) => glsl_type == "vec2",
            UniformValue::Vec3(_) => glsl_type == "vec3",
            UniformValue::Mat4(_) => glsl_type == "mat4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Mesh { index_count: usize },
    Fullscreen,
}

/// A recorded draw with the state it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub kind: DrawKind,
    pub program: Option<HeadlessProgram>,
    /// `None` is the default framebuffer.
    pub target: Option<u32>,
    pub viewport: (u32, u32),
}

#[derive(Debug)]
struct Slot {
    name: String,
    glsl_type: String,
}

#[derive(Debug)]
struct ProgramRecord {
    uniforms: Vec<UniformDecl>,
    slots: Vec<Slot>,
    values: HashMap<usize, UniformValue>,
}

impl ProgramRecord {
    fn new(uniforms: Vec<UniformDecl>) -> Self {
        let mut slots = Vec::new();
        for u in &uniforms {
            if u.is_array {
                for i in 0..u.array_len {
                    slots.push(Slot {
                        name: format!("{}[{i}]", u.name),
                        glsl_type: u.ty.clone(),
                    });
                }
            } else {
                slots.push(Slot {
                    name: u.name.clone(),
                    glsl_type: u.ty.clone(),
                });
            }
        }
        Self {
            uniforms,
            slots,
            values: HashMap::new(),
        }
    }

    /// GL lookup rules: `name`, `name[i]`, and bare `name` for element 0.
    fn slot_of(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.name == name)
            .or_else(|| {
                let first = format!("{name}[0]");
                self.slots.iter().position(|s| s.name == first)
            })
    }
}

#[derive(Debug, Default)]
struct HeadlessState {
    next_id: u32,
    programs: BTreeMap<HeadlessProgram, ProgramRecord>,
    current_program: Option<HeadlessProgram>,
    meshes: Vec<u32>,
    textures: Vec<u32>,
    targets: Vec<u32>,
    bound_target: Option<u32>,
    viewport: (u32, u32),
    draws: Vec<DrawCall>,
    clears: usize,
    errors: VecDeque<String>,
}

impl HeadlessState {
    fn issue_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Recording GPU backend with no context requirement.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    state: RefCell<HeadlessState>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written to `name` (`time`, `lightPositions[1]`, ...).
    pub fn uniform_value(&self, program: HeadlessProgram, name: &str) -> Option<UniformValue> {
        let state = self.state.borrow();
        let record = state.programs.get(&program)?;
        let slot = record.slot_of(name)?;
        record.values.get(&slot).cloned()
    }

    /// Every written uniform of `program`, keyed by slot name.
    pub fn uniform_snapshot(&self, program: HeadlessProgram) -> BTreeMap<String, UniformValue> {
        let state = self.state.borrow();
        let Some(record) = state.programs.get(&program) else {
            return BTreeMap::new();
        };
        record
            .values
            .iter()
            .map(|(slot, value)| (record.slots[*slot].name.clone(), value.clone()))
            .collect()
    }

    /// Number of element writes recorded for slots whose name starts with `prefix[`.
    pub fn written_elements(&self, program: HeadlessProgram, array: &str) -> usize {
        let prefix = format!("{array}[");
        let state = self.state.borrow();
        state.programs.get(&program).map_or(0, |record| {
            record
                .values
                .keys()
                .filter(|slot| record.slots[**slot].name.starts_with(&prefix))
                .count()
        })
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn clear_count(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn current_program(&self) -> Option<HeadlessProgram> {
        self.state.borrow().current_program
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    /// Meshes, textures and render targets not yet deleted.
    pub fn live_resources(&self) -> usize {
        let state = self.state.borrow();
        state.meshes.len() + state.textures.len() + state.targets.len()
    }

    /// Queue a driver diagnostic, as if the context had raised it.
    pub fn push_error(&self, message: impl Into<String>) {
        self.state.borrow_mut().errors.push_back(message.into());
    }

    fn write(&self, location: &HeadlessLocation, value: UniformValue) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.current_program != Some(location.program) {
            state.errors.push_back(format!(
                "GL_INVALID_OPERATION: uniform write to program {} while {:?} is current",
                location.program.0, state.current_program
            ));
            return;
        }
        let Some(record) = state.programs.get_mut(&location.program) else {
            state
                .errors
                .push_back("GL_INVALID_OPERATION: uniform write to deleted program".into());
            return;
        };
        let slot = &record.slots[location.slot];
        if !value.accepted_by(&slot.glsl_type) {
            let message = format!(
                "GL_INVALID_OPERATION: {value:?} written to `{}' of type {}",
                slot.name, slot.glsl_type
            );
            state.errors.push_back(message);
            return;
        }
        record.values.insert(location.slot, value);
    }

    fn record_draw(&self, kind: DrawKind) {
        let mut state = self.state.borrow_mut();
        let call = DrawCall {
            kind,
            program: state.current_program,
            target: state.bound_target,
            viewport: state.viewport,
        };
        state.draws.push(call);
    }
}

impl GpuBackend for HeadlessBackend {
    type Program = HeadlessProgram;
    type UniformLocation = HeadlessLocation;
    type Mesh = HeadlessMesh;
    type Texture = HeadlessTexture;
    type RenderTarget = HeadlessTarget;

    fn create_program(
        &self,
        vertex: &str,
        fragment: &str,
    ) -> Result<HeadlessProgram, ProgramBuildError> {
        let vs = glsl::compile(vertex)
            .map_err(|log| ProgramBuildError::compile(ShaderStage::Vertex, log))?;
        let fs = glsl::compile(fragment)
            .map_err(|log| ProgramBuildError::compile(ShaderStage::Fragment, log))?;
        glsl::link(&vs, &fs).map_err(ProgramBuildError::link)?;

        let mut uniforms = vs.uniforms;
        for u in fs.uniforms {
            if !uniforms.iter().any(|existing| existing.name == u.name) {
                uniforms.push(u);
            }
        }

        let mut state = self.state.borrow_mut();
        let program = HeadlessProgram(state.issue_id());
        state.programs.insert(program, ProgramRecord::new(uniforms));
        Ok(program)
    }

    fn program_info_log(&self, _program: HeadlessProgram) -> String {
        String::new()
    }

    fn delete_program(&self, program: HeadlessProgram) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        if state.current_program == Some(program) {
            state.current_program = None;
        }
    }

    fn use_program(&self, program: Option<HeadlessProgram>) {
        let mut state = self.state.borrow_mut();
        if let Some(p) = program {
            if !state.programs.contains_key(&p) {
                state
                    .errors
                    .push_back(format!("GL_INVALID_VALUE: no program {}", p.0));
                return;
            }
        }
        state.current_program = program;
    }

    fn active_uniforms(&self, program: HeadlessProgram) -> Vec<ActiveUniform> {
        let state = self.state.borrow();
        state.programs.get(&program).map_or_else(Vec::new, |record| {
            record
                .uniforms
                .iter()
                .map(|u| ActiveUniform {
                    name: u.name.clone(),
                    array_len: u.array_len,
                })
                .collect()
        })
    }

    fn uniform_location(&self, program: HeadlessProgram, name: &str) -> Option<HeadlessLocation> {
        let state = self.state.borrow();
        let slot = state.programs.get(&program)?.slot_of(name)?;
        Some(HeadlessLocation { program, slot })
    }

    fn set_uniform_1f(&self, location: &HeadlessLocation, value: f32) {
        self.write(location, UniformValue::Float(value));
    }

    fn set_uniform_1i(&self, location: &HeadlessLocation, value: i32) {
        self.write(location, UniformValue::Int(value));
    }

    fn set_uniform_2f(&self, location: &HeadlessLocation, value: [f32; 2]) {
        self.write(location, UniformValue::Vec2(value));
    }

    fn set_uniform_3f(&self, location: &HeadlessLocation, value: [f32; 3]) {
        self.write(location, UniformValue::Vec3(value));
    }

    fn set_uniform_mat4(&self, location: &HeadlessLocation, value: &[f32; 16]) {
        self.write(location, UniformValue::Mat4(*value));
    }

    fn create_mesh(&self, mesh: &MeshData) -> Result<HeadlessMesh, String> {
        let mut state = self.state.borrow_mut();
        let id = state.issue_id();
        state.meshes.push(id);
        Ok(HeadlessMesh {
            id,
            index_count: mesh.indices.len(),
        })
    }

    fn draw_mesh(&self, mesh: &HeadlessMesh) {
        if !self.state.borrow().meshes.contains(&mesh.id) {
            self.push_error(format!("GL_INVALID_OPERATION: mesh {} was deleted", mesh.id));
            return;
        }
        self.record_draw(DrawKind::Mesh {
            index_count: mesh.index_count,
        });
    }

    fn delete_mesh(&self, mesh: HeadlessMesh) {
        self.state.borrow_mut().meshes.retain(|id| *id != mesh.id);
    }

    fn create_render_target(&self, width: u32, height: u32) -> Result<HeadlessTarget, String> {
        if width == 0 || height == 0 {
            return Err(format!("framebuffer incomplete: {width}x{height}"));
        }
        let mut state = self.state.borrow_mut();
        let id = state.issue_id();
        state.targets.push(id);
        Ok(HeadlessTarget { id, width, height })
    }

    fn bind_render_target(&self, target: Option<&HeadlessTarget>) {
        self.state.borrow_mut().bound_target = target.map(|t| t.id);
    }

    fn bind_render_target_texture(&self, _unit: u32, target: &HeadlessTarget) {
        if !self.state.borrow().targets.contains(&target.id) {
            self.push_error(format!("GL_INVALID_OPERATION: target {} was deleted", target.id));
        }
    }

    fn delete_render_target(&self, target: HeadlessTarget) {
        let mut state = self.state.borrow_mut();
        state.targets.retain(|id| *id != target.id);
        if state.bound_target == Some(target.id) {
            state.bound_target = None;
        }
    }

    fn create_cubemap(&self, faces: &CubemapFaces) -> Result<HeadlessTexture, String> {
        faces.validate()?;
        let mut state = self.state.borrow_mut();
        let id = state.issue_id();
        state.textures.push(id);
        Ok(HeadlessTexture(id))
    }

    fn bind_cubemap(&self, _unit: u32, texture: HeadlessTexture) {
        if !self.state.borrow().textures.contains(&texture.0) {
            self.push_error(format!("GL_INVALID_OPERATION: texture {} was deleted", texture.0));
        }
    }

    fn delete_texture(&self, texture: HeadlessTexture) {
        self.state.borrow_mut().textures.retain(|id| *id != texture.0);
    }

    fn set_viewport(&self, width: u32, height: u32) {
        self.state.borrow_mut().viewport = (width, height);
    }

    fn clear(&self, _color: [f32; 4]) {
        self.state.borrow_mut().clears += 1;
    }

    fn draw_fullscreen(&self) {
        self.record_draw(DrawKind::Fullscreen);
    }

    fn poll_error(&self) -> Option<String> {
        self.state.borrow_mut().errors.pop_front()
    }
}
