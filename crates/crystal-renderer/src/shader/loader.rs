//! Resolving `<effect>/<stage>` to GLSL text.
//!
//! Loaders never fail. Absent sources come back empty, which the composer
//! treats as "this effect contributes nothing to this stage".

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::gpu::ShaderStage;

pub trait ShaderSourceLoader {
    fn load(&self, effect: &str, stage: ShaderStage) -> String;
}

/// Reads `<root>/<effect>/<stage>.glsl` from disk.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, effect: &str, stage: ShaderStage) -> PathBuf {
        self.root
            .join(effect)
            .join(format!("{}.glsl", stage.file_stem()))
    }
}

impl ShaderSourceLoader for DirectoryLoader {
    fn load(&self, effect: &str, stage: ShaderStage) -> String {
        let path = self.path_for(effect, stage);
        match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no shader source, effect contributes nothing");
                String::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable shader source treated as empty");
                String::new()
            }
        }
    }
}

/// The shaders shipped with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLoader;

impl EmbeddedLoader {
    fn lookup(effect: &str, stage: ShaderStage) -> Option<&'static str> {
        use ShaderStage::{Fragment, Vertex};
        let source = match (effect, stage) {
            ("base", Vertex) => include_str!("../../shaders/base/vertex.glsl"),
            ("base", Fragment) => include_str!("../../shaders/base/fragment.glsl"),
            ("fresnel", Fragment) => include_str!("../../shaders/fresnel/fragment.glsl"),
            ("environment_mapping", Fragment) => {
                include_str!("../../shaders/environment_mapping/fragment.glsl")
            }
            ("dispersion", Fragment) => include_str!("../../shaders/dispersion/fragment.glsl"),
            ("specular", Fragment) => include_str!("../../shaders/specular/fragment.glsl"),
            ("glitter", Vertex) => include_str!("../../shaders/glitter/vertex.glsl"),
            ("glitter", Fragment) => include_str!("../../shaders/glitter/fragment.glsl"),
            ("post_processing", Vertex) => {
                include_str!("../../shaders/post_processing/vertex.glsl")
            }
            ("post_processing", Fragment) => {
                include_str!("../../shaders/post_processing/fragment.glsl")
            }
            _ => return None,
        };
        Some(source)
    }
}

impl ShaderSourceLoader for EmbeddedLoader {
    fn load(&self, effect: &str, stage: ShaderStage) -> String {
        match Self::lookup(effect, stage) {
            Some(source) => source.to_string(),
            None => {
                tracing::debug!(effect, %stage, "no embedded shader source");
                String::new()
            }
        }
    }
}

/// In-memory sources, optionally layered over another loader.
#[derive(Default)]
pub struct MemoryLoader {
    sources: HashMap<(String, ShaderStage), String>,
    fallback: Option<Box<dyn ShaderSourceLoader>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries here win; anything missing is asked of `fallback`.
    pub fn over(fallback: impl ShaderSourceLoader + 'static) -> Self {
        Self {
            sources: HashMap::new(),
            fallback: Some(Box::new(fallback)),
        }
    }

    pub fn with(mut self, effect: &str, stage: ShaderStage, source: impl Into<String>) -> Self {
        self.insert(effect, stage, source);
        self
    }

    pub fn insert(&mut self, effect: &str, stage: ShaderStage, source: impl Into<String>) {
        self.sources
            .insert((effect.to_string(), stage), source.into());
    }
}

impl ShaderSourceLoader for MemoryLoader {
    fn load(&self, effect: &str, stage: ShaderStage) -> String {
        if let Some(source) = self.sources.get(&(effect.to_string(), stage)) {
            return source.clone();
        }
        self.fallback
            .as_ref()
            .map(|loader| loader.load(effect, stage))
            .unwrap_or_default()
    }
}
