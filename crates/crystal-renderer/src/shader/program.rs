use std::fmt;

use crate::gpu::{GpuBackend, ProgramBuildError};

use super::types::ComposedSource;
use super::uniforms::{UniformTable, UniformWriter};

/// A linked GPU program and its uniform cache.
///
/// Only constructed from a successful link, so holding one means the
/// program may be bound and drawn with.
pub struct ShaderProgram<B: GpuBackend> {
    label: String,
    handle: B::Program,
    source: ComposedSource,
    link_log: String,
    uniforms: UniformTable<B>,
}

impl<B: GpuBackend> fmt::Debug for ShaderProgram<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("label", &self.label)
            .field("handle", &self.handle)
            .field("digest", &self.source.digest())
            .finish_non_exhaustive()
    }
}

impl<B: GpuBackend> ShaderProgram<B> {
    pub fn link(backend: &B, label: &str, source: ComposedSource) -> Result<Self, ProgramBuildError> {
        let handle = backend.create_program(&source.vertex, &source.fragment)?;
        let link_log = backend.program_info_log(handle);
        log_linked(label, &source, &link_log);
        Ok(Self {
            label: label.to_string(),
            handle,
            source,
            link_log,
            uniforms: UniformTable::new(),
        })
    }

    /// Build `source` and swap it in. The old program is deleted only on
    /// success; the uniform cache is rebuilt on next use.
    pub fn relink(&mut self, backend: &B, source: ComposedSource) -> Result<(), ProgramBuildError> {
        let handle = backend.create_program(&source.vertex, &source.fragment)?;
        backend.delete_program(self.handle);
        self.link_log = backend.program_info_log(handle);
        log_linked(&self.label, &source, &self.link_log);
        self.handle = handle;
        self.source = source;
        Ok(())
    }

    /// Make this the current program and return a writer for its uniforms.
    pub fn activate<'a>(&'a mut self, backend: &'a B) -> UniformWriter<'a, B> {
        backend.use_program(Some(self.handle));
        self.uniforms.bind_program(self.handle);
        UniformWriter::new(backend, &mut self.uniforms)
    }

    pub fn delete(self, backend: &B) {
        backend.delete_program(self.handle);
        tracing::debug!(program = %self.label, "shader program deleted");
    }

    pub fn handle(&self) -> B::Program {
        self.handle
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &ComposedSource {
        &self.source
    }

    pub fn link_log(&self) -> &str {
        &self.link_log
    }

    pub fn uniforms(&self) -> &UniformTable<B> {
        &self.uniforms
    }
}

fn log_linked(label: &str, source: &ComposedSource, link_log: &str) {
    let digest = source.digest();
    tracing::info!(program = label, digest = &digest[..16], "shader program linked");
    if !link_log.trim().is_empty() {
        tracing::warn!(program = label, log = link_log.trim(), "linker reported warnings");
    }
}
