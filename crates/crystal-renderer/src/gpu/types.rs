use std::fmt;

use crate::shader::ShaderError;

/// Errors surfaced by the renderer at runtime.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("{operation}() called in state {state}")]
    PreconditionViolation {
        operation: &'static str,
        state: String,
    },

    #[error("uniform array `{name}` holds {capacity} entries but {requested} were supplied")]
    UniformArrayOverflow {
        name: String,
        requested: usize,
        capacity: usize,
    },

    #[error("gpu error: {0}")]
    Gpu(String),

    #[error("mesh error: {0}")]
    Mesh(String),

    #[error("environment map error: {0}")]
    Environment(String),
}

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

    /// File stem used by the `<effect>/<stage>.glsl` convention.
    pub fn file_stem(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Failure reported by a backend while building a program.
///
/// `stage` is `None` when both stages compiled and linking failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramBuildError {
    pub stage: Option<ShaderStage>,
    pub log: String,
}

impl ProgramBuildError {
    pub fn compile(stage: ShaderStage, log: impl Into<String>) -> Self {
        Self {
            stage: Some(stage),
            log: log.into(),
        }
    }

    pub fn link(log: impl Into<String>) -> Self {
        Self {
            stage: None,
            log: log.into(),
        }
    }
}

/// An active uniform as reported by program reflection.
///
/// `name` never carries a `[0]` suffix; `array_len` is 1 for scalars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUniform {
    pub name: String,
    pub array_len: usize,
}

impl ActiveUniform {
    /// Build from a raw reflection name such as `lightPositions[0]`.
    pub fn from_reflection(raw_name: &str, size: usize) -> Self {
        let name = raw_name.strip_suffix("[0]").unwrap_or(raw_name);
        Self {
            name: name.to_string(),
            array_len: size.max(1),
        }
    }
}

/// Physical pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size in texels of one pixel, `[1/width, 1/height]`.
    pub fn texel_size(self) -> [f32; 2] {
        [
            1.0 / self.width.max(1) as f32,
            1.0 / self.height.max(1) as f32,
        ]
    }
}
