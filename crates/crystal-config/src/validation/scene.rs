//! Window, camera, lighting, and material validation.

use crate::schema::{CrystalConfig, MAX_LIGHTS};

use super::helpers::{check_color, check_range};

pub(crate) fn validate_window(errors: &mut Vec<String>, config: &CrystalConfig) {
    check_range(errors, "window.width", config.window.width, 1..=16384);
    check_range(errors, "window.height", config.window.height, 1..=16384);
}

pub(crate) fn validate_camera(errors: &mut Vec<String>, config: &CrystalConfig) {
    let camera = &config.camera;
    check_range(errors, "camera.fov_degrees", camera.fov_degrees, 1.0..=179.0);

    if camera.near <= 0.0 {
        errors.push(format!("camera.near = {} must be positive", camera.near));
    }
    if camera.far <= camera.near {
        errors.push(format!(
            "camera.far = {} must be greater than camera.near = {}",
            camera.far, camera.near
        ));
    }
    if camera.position == camera.target {
        errors.push("camera.position and camera.target must differ".into());
    }
    if camera.up == [0.0, 0.0, 0.0] {
        errors.push("camera.up must not be the zero vector".into());
    }
}

pub(crate) fn validate_lighting(errors: &mut Vec<String>, config: &CrystalConfig) {
    let count = config.lighting.lights.len();
    if count == 0 || count > MAX_LIGHTS {
        errors.push(format!(
            "lighting.lights has {count} entries, expected 1-{MAX_LIGHTS}"
        ));
    }
    for (i, light) in config.lighting.lights.iter().enumerate() {
        check_color(errors, &format!("lighting.lights[{i}].color"), light.color);
    }
}

pub(crate) fn validate_material(errors: &mut Vec<String>, config: &CrystalConfig) {
    check_color(errors, "material.crystal_color", config.material.crystal_color);
    check_range(errors, "material.refraction_index", config.material.refraction_index, 1.0..=3.0);
    check_range(errors, "material.alpha", config.material.alpha, 0.0..=1.0);
}
