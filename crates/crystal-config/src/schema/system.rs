//! Animation, scene asset, and logging configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Model animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Rotation around the Y axis in radians per second.
    pub rotation_speed: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 0.3,
        }
    }
}

/// External assets. Every entry is optional; built-in fallbacks are used
/// when a path is not set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct SceneConfig {
    /// Wavefront OBJ file for the crystal. The procedural gem is used when unset.
    pub model: Option<PathBuf>,
    /// Directory holding `px.png`, `nx.png`, `py.png`, `ny.png`, `pz.png`, `nz.png`.
    pub environment_map: Option<PathBuf>,
    /// Root of a `<effect>/<stage>.glsl` tree replacing the built-in shaders.
    pub shader_dir: Option<PathBuf>,
}

impl SceneConfig {
    /// Make relative asset paths relative to `base` instead of the
    /// working directory.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        for path in [&mut self.model, &mut self.environment_map, &mut self.shader_dir]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The level as a `tracing` filter directive string.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
