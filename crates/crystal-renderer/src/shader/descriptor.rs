use crate::gpu::ShaderStage;

use super::loader::ShaderSourceLoader;

/// One effect's contribution to the merged program.
///
/// `fragment_function` is called as `result += <fragment_function>();` at
/// the fragment extension point. `vertex_function`, when declared, is
/// called as a statement at the vertex extension point. Calls are only
/// emitted for stages whose source is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectDescriptor {
    pub name: String,
    pub fragment_function: String,
    pub vertex_function: Option<String>,
    pub vertex_source: String,
    pub fragment_source: String,
}

impl EffectDescriptor {
    pub fn new(name: impl Into<String>, fragment_function: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fragment_function: fragment_function.into(),
            vertex_function: None,
            vertex_source: String::new(),
            fragment_source: String::new(),
        }
    }

    pub fn with_fragment(mut self, source: impl Into<String>) -> Self {
        self.fragment_source = source.into();
        self
    }

    pub fn with_vertex(mut self, function: impl Into<String>, source: impl Into<String>) -> Self {
        self.vertex_function = Some(function.into());
        self.vertex_source = source.into();
        self
    }

    /// Fill both stages from `loader` using the effect's name as the directory.
    pub fn load(mut self, loader: &dyn ShaderSourceLoader) -> Self {
        self.vertex_source = loader.load(&self.name, ShaderStage::Vertex);
        self.fragment_source = loader.load(&self.name, ShaderStage::Fragment);
        self
    }

    pub fn source(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex_source,
            ShaderStage::Fragment => &self.fragment_source,
        }
    }

    /// The statement inserted at `stage`'s extension point, if any.
    pub fn call(&self, stage: ShaderStage) -> Option<String> {
        if self.source(stage).trim().is_empty() {
            return None;
        }
        match stage {
            ShaderStage::Fragment => Some(format!("result += {}();", self.fragment_function)),
            ShaderStage::Vertex => self.vertex_function.as_ref().map(|f| format!("{f}();")),
        }
    }

    /// True when neither stage has any source.
    pub fn is_empty(&self) -> bool {
        self.vertex_source.trim().is_empty() && self.fragment_source.trim().is_empty()
    }
}
