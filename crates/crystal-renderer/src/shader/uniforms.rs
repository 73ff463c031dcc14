//! Cached uniform locations and the writer effects bind through.

use std::collections::HashMap;

use crate::gpu::{GpuBackend, RenderError};

/// Name → location cache for one linked program.
///
/// Filled lazily: the first write to a name asks the backend, every later
/// write is a map lookup by `&str`. Switching to a different program handle
/// (a relink) empties the cache.
pub struct UniformTable<B: GpuBackend> {
    program: Option<B::Program>,
    capacities: Option<HashMap<String, usize>>,
    scalars: HashMap<String, Option<B::UniformLocation>>,
    arrays: HashMap<String, Vec<B::UniformLocation>>,
    lookups: usize,
}

impl<B: GpuBackend> Default for UniformTable<B> {
    fn default() -> Self {
        Self {
            program: None,
            capacities: None,
            scalars: HashMap::new(),
            arrays: HashMap::new(),
            lookups: 0,
        }
    }
}

impl<B: GpuBackend> UniformTable<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the table at `program`, dropping every cached entry if it changed.
    pub fn bind_program(&mut self, program: B::Program) {
        if self.program != Some(program) {
            self.program = Some(program);
            self.capacities = None;
            self.scalars.clear();
            self.arrays.clear();
            self.lookups = 0;
        }
    }

    /// Backend location queries issued for the current program.
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    /// Cached names, scalar and array.
    pub fn len(&self) -> usize {
        self.scalars.len() + self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn scalar(&mut self, backend: &B, name: &str) -> Option<&B::UniformLocation> {
        let program = self.program?;
        if !self.scalars.contains_key(name) {
            self.lookups += 1;
            let location = backend.uniform_location(program, name);
            if location.is_none() {
                tracing::debug!(uniform = name, "uniform not active in program, writes skipped");
            }
            self.scalars.insert(name.to_string(), location);
        }
        self.scalars.get(name).and_then(Option::as_ref)
    }

    fn array_capacity(&mut self, backend: &B, name: &str) -> usize {
        self.array(backend, name).len()
    }

    fn array(&mut self, backend: &B, name: &str) -> &[B::UniformLocation] {
        let Some(program) = self.program else {
            return &[];
        };
        if !self.arrays.contains_key(name) {
            let capacities = self.capacities.get_or_insert_with(|| {
                backend
                    .active_uniforms(program)
                    .into_iter()
                    .map(|u| (u.name, u.array_len))
                    .collect()
            });
            let capacity = capacities.get(name).copied().unwrap_or(0);
            let mut locations = Vec::with_capacity(capacity);
            for index in 0..capacity {
                self.lookups += 1;
                match backend.uniform_location(program, &format!("{name}[{index}]")) {
                    Some(location) => locations.push(location),
                    None => break,
                }
            }
            tracing::debug!(uniform = name, capacity = locations.len(), "resolved uniform array");
            self.arrays.insert(name.to_string(), locations);
        }
        self.arrays.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Uniform writes against the program that is current on the backend.
///
/// Only [`ShaderProgram::activate`](super::ShaderProgram::activate) hands
/// these out, so holding one means its program is bound. Writes to names the
/// program does not declare are skipped and return `false`.
pub struct UniformWriter<'a, B: GpuBackend> {
    backend: &'a B,
    table: &'a mut UniformTable<B>,
}

impl<'a, B: GpuBackend> UniformWriter<'a, B> {
    pub(crate) fn new(backend: &'a B, table: &'a mut UniformTable<B>) -> Self {
        Self { backend, table }
    }

    pub fn backend(&self) -> &B {
        self.backend
    }

    pub fn set_f32(&mut self, name: &str, value: f32) -> bool {
        let backend = self.backend;
        match self.table.scalar(backend, name) {
            Some(location) => {
                backend.set_uniform_1f(location, value);
                true
            }
            None => false,
        }
    }

    pub fn set_i32(&mut self, name: &str, value: i32) -> bool {
        let backend = self.backend;
        match self.table.scalar(backend, name) {
            Some(location) => {
                backend.set_uniform_1i(location, value);
                true
            }
            None => false,
        }
    }

    pub fn set_vec2(&mut self, name: &str, value: [f32; 2]) -> bool {
        let backend = self.backend;
        match self.table.scalar(backend, name) {
            Some(location) => {
                backend.set_uniform_2f(location, value);
                true
            }
            None => false,
        }
    }

    pub fn set_vec3(&mut self, name: &str, value: [f32; 3]) -> bool {
        let backend = self.backend;
        match self.table.scalar(backend, name) {
            Some(location) => {
                backend.set_uniform_3f(location, value);
                true
            }
            None => false,
        }
    }

    pub fn set_mat4(&mut self, name: &str, value: &[f32; 16]) -> bool {
        let backend = self.backend;
        match self.table.scalar(backend, name) {
            Some(location) => {
                backend.set_uniform_mat4(location, value);
                true
            }
            None => false,
        }
    }

    /// Point sampler `name` at texture `unit`.
    pub fn set_sampler(&mut self, name: &str, unit: u32) -> bool {
        self.set_i32(name, unit as i32)
    }

    /// Declared element count of array `name`; 0 when the program lacks it.
    pub fn array_capacity(&mut self, name: &str) -> usize {
        let backend = self.backend;
        self.table.array_capacity(backend, name)
    }

    /// Write `values` to elements `0..values.len()` of array `name`.
    ///
    /// Returns the number of elements written: 0 when the program has no
    /// such array. Supplying more values than the array declares writes
    /// nothing and fails with [`RenderError::UniformArrayOverflow`].
    pub fn set_vec3_array(&mut self, name: &str, values: &[[f32; 3]]) -> Result<usize, RenderError> {
        let backend = self.backend;
        let locations = self.table.array(backend, name);
        if locations.is_empty() {
            return Ok(0);
        }
        if values.len() > locations.len() {
            return Err(RenderError::UniformArrayOverflow {
                name: name.to_string(),
                requested: values.len(),
                capacity: locations.len(),
            });
        }
        for (location, value) in locations.iter().zip(values) {
            backend.set_uniform_3f(location, *value);
        }
        Ok(values.len())
    }

    pub fn bind_cubemap(&mut self, unit: u32, texture: B::Texture) {
        self.backend.bind_cubemap(unit, texture);
    }

    pub fn bind_render_target_texture(&mut self, unit: u32, target: &B::RenderTarget) {
        self.backend.bind_render_target_texture(unit, target);
    }
}
