//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = CrystalConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_zero_window_width() {
    let mut config = CrystalConfig::default();
    config.window.width = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.width"));
}

#[test]
fn catches_far_before_near() {
    let mut config = CrystalConfig::default();
    config.camera.near = 10.0;
    config.camera.far = 5.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("camera.far"));
}

#[test]
fn catches_non_positive_near() {
    let mut config = CrystalConfig::default();
    config.camera.near = 0.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("camera.near"));
}

#[test]
fn catches_camera_looking_at_itself() {
    let mut config = CrystalConfig::default();
    config.camera.target = config.camera.position;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("camera.position"));
}

#[test]
fn catches_too_many_lights() {
    let mut config = CrystalConfig::default();
    config.lighting.lights = vec![LightConfig::default(); MAX_LIGHTS + 1];
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("lighting.lights"));
}

#[test]
fn catches_no_lights() {
    let mut config = CrystalConfig::default();
    config.lighting.lights.clear();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("lighting.lights has 0 entries"));
}

#[test]
fn catches_light_color_out_of_range() {
    let mut config = CrystalConfig::default();
    config.lighting.lights[1].color = [0.5, 2.0, 0.5];
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("lighting.lights[1].color.g"));
}

#[test]
fn catches_refraction_index_below_vacuum() {
    let mut config = CrystalConfig::default();
    config.material.refraction_index = 0.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("material.refraction_index"));
}

#[test]
fn catches_nan_fresnel_power() {
    let mut config = CrystalConfig::default();
    config.effects.fresnel.power = f32::NAN;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("effects.fresnel.power"));
}

#[test]
fn catches_glitter_density_zero() {
    let mut config = CrystalConfig::default();
    config.effects.glitter.density = 0.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("effects.glitter.density"));
}

#[test]
fn catches_bloom_threshold_above_one() {
    let mut config = CrystalConfig::default();
    config.bloom.threshold = 1.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("bloom.threshold"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = CrystalConfig::default();
    config.bloom.intensity = 10.0;
    config.effects.specular.strength = -1.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("bloom.intensity"));
    assert!(err.contains("effects.specular.strength"));
    assert!(err.contains("; "));
}
