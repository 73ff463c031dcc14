//! Window configuration types.

use serde::{Deserialize, Serialize};

/// Window size and presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial width in physical pixels (valid range: 1-16384).
    pub width: u32,
    /// Initial height in physical pixels (valid range: 1-16384).
    pub height: u32,
    pub title: String,
    /// Wait for vertical blank when swapping buffers.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Swarovski Crystal".into(),
            vsync: true,
        }
    }
}

impl WindowConfig {
    /// Width divided by height, guarded against a zero height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
