//! Shader composition types: errors and the merged source.

use sha2::{Digest, Sha256};

use crate::gpu::ShaderStage;

/// Failure to compose or build a shader program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile{}:\n{log}", origin(.effect, .line))]
    Compile {
        stage: ShaderStage,
        /// Effect whose contribution contains the first reported line.
        effect: Option<String>,
        /// First line number found in the log, in merged-source numbering.
        line: Option<usize>,
        log: String,
    },

    #[error("program failed to link{}:\n{log}", origin(.effect, &None))]
    Link { effect: Option<String>, log: String },

    #[error("{stage} base shader has no `void main()`")]
    MissingEntryPoint { stage: ShaderStage },

    #[error("{stage} base shader has no `{}` extension point", super::EXTENSION_POINT)]
    MissingExtensionPoint { stage: ShaderStage },

    #[error("{stage} base shader has more than one `{}` extension point", super::EXTENSION_POINT)]
    DuplicateExtensionPoint { stage: ShaderStage },
}

impl ShaderError {
    /// The effect this failure was attributed to, if any.
    pub fn effect(&self) -> Option<&str> {
        match self {
            ShaderError::Compile { effect, .. } | ShaderError::Link { effect, .. } => {
                effect.as_deref()
            }
            _ => None,
        }
    }
}

fn origin(effect: &Option<String>, line: &Option<usize>) -> String {
    match (effect, line) {
        (Some(e), Some(l)) => format!(" in effect `{e}` (line {l})"),
        (Some(e), None) => format!(" in effect `{e}`"),
        (None, Some(l)) => format!(" (line {l})"),
        (None, None) => String::new(),
    }
}

/// Lines `first..=last` of a merged stage came from `effect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpan {
    pub first: usize,
    pub last: usize,
    pub effect: String,
}

/// Merged vertex and fragment source plus where each effect landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedSource {
    pub vertex: String,
    pub fragment: String,
    pub(crate) vertex_spans: Vec<LineSpan>,
    pub(crate) fragment_spans: Vec<LineSpan>,
}

impl ComposedSource {
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }

    pub fn spans(&self, stage: ShaderStage) -> &[LineSpan] {
        match stage {
            ShaderStage::Vertex => &self.vertex_spans,
            ShaderStage::Fragment => &self.fragment_spans,
        }
    }

    /// Effect whose contribution covers 1-based `line` of `stage`.
    pub fn effect_at(&self, stage: ShaderStage, line: usize) -> Option<&str> {
        self.spans(stage)
            .iter()
            .find(|span| (span.first..=span.last).contains(&line))
            .map(|span| span.effect.as_str())
    }

    /// SHA-256 over both stages, lowercase hex.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.vertex.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.fragment.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}
