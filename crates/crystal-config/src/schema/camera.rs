//! Camera configuration types.

use serde::{Deserialize, Serialize};

/// Fixed look-at camera and its perspective projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in degrees (valid range: 1.0-179.0).
    pub fov_degrees: f32,
    /// Near clip plane, must be positive.
    pub near: f32,
    /// Far clip plane, must be greater than `near`.
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}
