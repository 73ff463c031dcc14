use crystal_config::CrystalConfig;

use super::*;
use crate::effects::{Effect, EffectSet, SpecularEffect};
use crate::environment::CubemapFaces;
use crate::gpu::{DrawKind, GpuBackend, HeadlessBackend, RenderError, ShaderStage, UniformValue};
use crate::matrix::{self, IDENTITY};
use crate::mesh::{generate_gem_mesh, MeshData};
use crate::shader::{EmbeddedLoader, MemoryLoader, ShaderError};

fn renderer(settings: RendererSettings) -> CrystalRenderer<HeadlessBackend> {
    CrystalRenderer::new(HeadlessBackend::new(), settings)
}

fn ready(settings: RendererSettings) -> CrystalRenderer<HeadlessBackend> {
    let mut r = renderer(settings);
    r.initialize(&EmbeddedLoader).unwrap();
    r.setup_model(&generate_gem_mesh(8)).unwrap();
    r
}

fn render_at(r: &mut CrystalRenderer<HeadlessBackend>, time: f32) -> Result<(), RenderError> {
    r.render(&IDENTITY, &IDENTITY, &IDENTITY, time)
}

fn main_value(r: &CrystalRenderer<HeadlessBackend>, name: &str) -> Option<UniformValue> {
    let handle = r.main_program().unwrap().handle();
    r.backend().uniform_value(handle, name)
}

#[test]
fn render_before_initialize_is_rejected_without_gpu_calls() {
    let mut r = renderer(RendererSettings::default());
    r.setup_model(&generate_gem_mesh(8)).unwrap();

    let err = render_at(&mut r, 0.0).unwrap_err();
    assert!(matches!(
        err,
        RenderError::PreconditionViolation {
            operation: "render",
            ..
        }
    ));
    assert_eq!(err.to_string(), "render() called in state Uninitialized");
    assert!(r.backend().draw_calls().is_empty());
    assert_eq!(r.backend().clear_count(), 0);
    assert_eq!(r.backend().current_program(), None);
    assert_eq!(r.frames_rendered(), 0);
}

#[test]
fn post_process_before_initialize_is_rejected() {
    let mut r = renderer(RendererSettings::default());
    let err = r.post_process().unwrap_err();
    assert_eq!(err.to_string(), "post_process() called in state Uninitialized");
    assert!(r.backend().draw_calls().is_empty());
}

#[test]
fn initialize_links_main_and_post_programs() {
    let mut r = renderer(RendererSettings::default());
    assert_eq!(r.state(), RendererState::Uninitialized);

    r.initialize(&EmbeddedLoader).unwrap();

    assert_eq!(r.state(), RendererState::ProgramsReady);
    assert_eq!(r.backend().live_programs(), 2);
    assert!(r.main_program().is_some());
    assert!(r.post_stage().is_some());
    assert!(r.has_environment_map());
    let fragment = r.main_program().unwrap().source().stage(ShaderStage::Fragment);
    assert!(fragment.contains("result += compute_Glitter();"));
}

#[test]
fn initialize_twice_is_rejected() {
    let mut r = renderer(RendererSettings::default());
    r.initialize(&EmbeddedLoader).unwrap();
    let err = r.initialize(&EmbeddedLoader).unwrap_err();
    assert_eq!(err.to_string(), "initialize() called in state ProgramsReady");
    assert_eq!(r.backend().live_programs(), 2);
}

#[test]
fn broken_effect_source_fails_initialize_and_releases_everything() {
    let loader = MemoryLoader::over(EmbeddedLoader).with(
        "fresnel",
        ShaderStage::Fragment,
        "uniform float fresnelPower;\nvec3 compute_Fresnel() {\n    return vec3(fresnelPower);\n",
    );
    let mut r = renderer(RendererSettings::default());

    let err = r.initialize(&loader).unwrap_err();

    match err {
        RenderError::Shader(ShaderError::Compile { stage, effect, .. }) => {
            assert_eq!(stage, ShaderStage::Fragment);
            assert_eq!(effect.as_deref(), Some("fresnel"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(r.state(), RendererState::Uninitialized);
    assert_eq!(r.backend().live_programs(), 0);
    assert_eq!(r.backend().live_resources(), 0);
    assert!(render_at(&mut r, 0.0).is_err());
    assert!(r.backend().draw_calls().is_empty());
}

#[test]
fn broken_post_shader_releases_main_program() {
    let loader = MemoryLoader::over(EmbeddedLoader).with(
        "post_processing",
        ShaderStage::Fragment,
        "#version 330 core\nout vec4 fragColor;\n",
    );
    let mut r = renderer(RendererSettings::default());

    let err = r.initialize(&loader).unwrap_err();

    assert!(matches!(
        err,
        RenderError::Shader(ShaderError::MissingEntryPoint {
            stage: ShaderStage::Fragment
        })
    ));
    assert_eq!(r.backend().live_programs(), 0);
    assert_eq!(r.state(), RendererState::Uninitialized);
}

#[test]
fn one_frame_fills_the_uniform_table() {
    let mut config = CrystalConfig::default();
    config.effects.environment_mapping.enabled = false;
    config.effects.dispersion.enabled = false;
    let mut r = ready(RendererSettings::from_config(&config));

    render_at(&mut r, 2.0).unwrap();

    assert_eq!(main_value(&r, "fresnelPower"), Some(UniformValue::Float(5.0)));
    assert_eq!(main_value(&r, "specularStrength"), Some(UniformValue::Float(0.8)));
    assert_eq!(main_value(&r, "glitterDensity"), Some(UniformValue::Float(100.0)));
    assert_eq!(main_value(&r, "time"), Some(UniformValue::Float(2.0)));
    assert_eq!(main_value(&r, "dispersionStrength"), None);
    assert_eq!(r.gpu_error_count(), 0);
}

#[test]
fn render_writes_matrices_and_material() {
    let mut r = ready(RendererSettings::default());
    let model = matrix::rotate_y(0.5);
    let view = matrix::look_at([0.0, 0.0, 5.0], [0.0; 3], [0.0, 1.0, 0.0]);
    let projection = matrix::perspective(45f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);

    r.render(&model, &view, &projection, 0.0).unwrap();

    assert_eq!(main_value(&r, "model"), Some(UniformValue::Mat4(model)));
    assert_eq!(main_value(&r, "view"), Some(UniformValue::Mat4(view)));
    assert_eq!(main_value(&r, "projection"), Some(UniformValue::Mat4(projection)));
    assert_eq!(
        main_value(&r, "cameraPosition"),
        Some(UniformValue::Vec3([0.0, 0.0, 5.0]))
    );
    assert_eq!(
        main_value(&r, "crystalColor"),
        Some(UniformValue::Vec3([0.9, 0.9, 1.0]))
    );
    assert_eq!(main_value(&r, "refractionIndex"), Some(UniformValue::Float(1.5)));
    assert_eq!(main_value(&r, "environmentMap"), Some(UniformValue::Int(1)));
}

#[test]
fn main_pass_draws_offscreen_before_post_pass_draws_to_screen() {
    let mut r = ready(RendererSettings::default());
    render_at(&mut r, 0.0).unwrap();
    r.post_process().unwrap();

    let main = r.main_program().unwrap().handle();
    let post = r.post_stage().unwrap().program().handle();
    let draws = r.backend().draw_calls();
    assert_eq!(draws.len(), 2);

    assert!(matches!(draws[0].kind, DrawKind::Mesh { index_count } if index_count > 0));
    assert_eq!(draws[0].program, Some(main));
    assert!(draws[0].target.is_some());

    assert_eq!(draws[1].kind, DrawKind::Fullscreen);
    assert_eq!(draws[1].program, Some(post));
    assert_eq!(draws[1].target, None);
    assert_eq!(r.gpu_error_count(), 0);
}

#[test]
fn render_without_model_skips_the_draw() {
    let mut r = renderer(RendererSettings::default());
    r.initialize(&EmbeddedLoader).unwrap();

    render_at(&mut r, 0.0).unwrap();

    assert!(!r.has_model());
    assert!(r.backend().draw_calls().is_empty());
    assert_eq!(r.backend().clear_count(), 1);
    assert_eq!(r.frames_rendered(), 1);
}

#[test]
fn post_process_needs_a_render_every_frame() {
    let mut r = ready(RendererSettings::default());

    let err = r.post_process().unwrap_err();
    assert_eq!(
        err.to_string(),
        "post_process() called in state ProgramsReady (no frame rendered)"
    );

    render_at(&mut r, 0.0).unwrap();
    r.post_process().unwrap();
    assert!(r.post_process().is_err());

    render_at(&mut r, 0.1).unwrap();
    assert!(r.post_process().is_ok());
}

#[test]
fn render_clock_never_runs_backwards() {
    let mut r = ready(RendererSettings::default());
    render_at(&mut r, 3.0).unwrap();
    render_at(&mut r, 1.0).unwrap();

    assert_eq!(r.time(), 3.0);
    assert_eq!(main_value(&r, "time"), Some(UniformValue::Float(3.0)));
}

#[test]
fn oversized_light_list_fails_the_frame_without_drawing() {
    let mut settings = RendererSettings::default();
    settings.effects = EffectSet::new(vec![Effect::Specular(SpecularEffect {
        strength: 0.8,
        light_positions: vec![[1.0, 1.0, 1.0]; 5],
        light_colors: vec![[1.0, 1.0, 1.0]; 5],
    })]);
    let mut r = ready(settings);

    let err = render_at(&mut r, 0.0).unwrap_err();

    assert!(matches!(
        err,
        RenderError::UniformArrayOverflow {
            requested: 5,
            capacity: 4,
            ..
        }
    ));
    assert!(r.backend().draw_calls().is_empty());
    let handle = r.main_program().unwrap().handle();
    assert_eq!(r.backend().written_elements(handle, "lightPositions"), 0);
    assert!(r.post_process().is_err());
}

#[test]
fn single_light_slot_shader_rejects_two_lights() {
    let loader = MemoryLoader::over(EmbeddedLoader).with(
        "specular",
        ShaderStage::Fragment,
        "uniform float specularStrength;
uniform vec3 lightPositions[1];
uniform vec3 lightColors[1];
uniform int lightCount;

vec3 compute_Specular() {
    vec3 total = vec3(0.0);
    for (int i = 0; i < lightCount; ++i) {
        total += lightColors[i] * max(dot(surfaceNormal(), normalize(lightPositions[i])), 0.0);
    }
    return total * specularStrength;
}
",
    );
    let mut r = renderer(RendererSettings::default());
    r.initialize(&loader).unwrap();
    r.setup_model(&generate_gem_mesh(8)).unwrap();

    let err = render_at(&mut r, 0.0).unwrap_err();

    assert!(matches!(
        err,
        RenderError::UniformArrayOverflow {
            requested: 2,
            capacity: 1,
            ..
        }
    ));
    assert!(r.backend().draw_calls().is_empty());
    let handle = r.main_program().unwrap().handle();
    assert_eq!(r.backend().written_elements(handle, "lightPositions"), 0);
    assert_eq!(main_value(&r, "lightCount"), None);
}

#[test]
fn empty_effect_set_still_renders() {
    let mut settings = RendererSettings::default();
    settings.effects = EffectSet::default();
    let mut r = ready(settings);

    render_at(&mut r, 0.0).unwrap();
    r.post_process().unwrap();

    assert_eq!(r.backend().draw_calls().len(), 2);
    assert_eq!(main_value(&r, "fresnelPower"), None);
}

#[test]
fn gpu_errors_are_drained_after_each_pass() {
    let mut r = ready(RendererSettings::default());
    r.backend().push_error("GL_OUT_OF_MEMORY");

    render_at(&mut r, 0.0).unwrap();

    assert_eq!(r.gpu_error_count(), 1);
    assert!(r.backend().poll_error().is_none());
}

#[test]
fn setup_model_replaces_previous_mesh() {
    let mut r = renderer(RendererSettings::default());
    r.setup_model(&generate_gem_mesh(8)).unwrap();
    r.setup_model(&generate_gem_mesh(16)).unwrap();

    assert!(r.has_model());
    assert_eq!(r.backend().live_resources(), 1);
}

#[test]
fn setup_model_rejects_invalid_mesh() {
    let mut r = renderer(RendererSettings::default());
    let mut mesh = generate_gem_mesh(8);
    mesh.indices.push(9999);
    mesh.indices.push(0);
    mesh.indices.push(1);

    let err = r.setup_model(&mesh).unwrap_err();
    assert!(matches!(err, RenderError::Mesh(_)));
    assert!(r.setup_model(&MeshData::default()).is_err());
    assert!(!r.has_model());
    assert_eq!(r.backend().live_resources(), 0);
}

#[test]
fn supplied_environment_map_skips_the_procedural_sky() {
    let mut r = renderer(RendererSettings::default());
    r.set_environment_map(&CubemapFaces::gradient(4)).unwrap();
    assert_eq!(r.backend().live_resources(), 1);

    r.initialize(&EmbeddedLoader).unwrap();

    // Cubemap and render target.
    assert_eq!(r.backend().live_resources(), 2);

    r.set_environment_map(&CubemapFaces::gradient(8)).unwrap();
    assert_eq!(r.backend().live_resources(), 2);
}

#[test]
fn resize_recreates_the_render_target() {
    let mut r = ready(RendererSettings::default());
    let before = r.backend().live_resources();

    r.resize(1024, 768).unwrap();
    r.resize(0, 0).unwrap();
    render_at(&mut r, 0.0).unwrap();
    r.post_process().unwrap();

    assert_eq!(r.settings().viewport, crate::gpu::PhysicalSize::new(1024, 768));
    assert_eq!(r.backend().live_resources(), before);
    let draws = r.backend().draw_calls();
    assert!(draws.iter().all(|d| d.viewport == (1024, 768)));
    assert_eq!(r.gpu_error_count(), 0);
}

#[test]
fn resize_discards_the_pending_frame() {
    let mut r = ready(RendererSettings::default());
    render_at(&mut r, 0.0).unwrap();
    r.resize(640, 480).unwrap();
    assert!(r.post_process().is_err());
}

#[test]
fn teardown_releases_everything_and_is_idempotent() {
    let mut r = ready(RendererSettings::default());
    render_at(&mut r, 0.0).unwrap();

    r.teardown();
    r.teardown();

    assert_eq!(r.state(), RendererState::TornDown);
    assert_eq!(r.backend().live_programs(), 0);
    assert_eq!(r.backend().live_resources(), 0);
    assert!(r.main_program().is_none());

    let draws_before = r.backend().draw_calls().len();
    let err = render_at(&mut r, 1.0).unwrap_err();
    assert_eq!(err.to_string(), "render() called in state TornDown");
    assert!(r.post_process().is_err());
    assert!(r.setup_model(&generate_gem_mesh(8)).is_err());
    assert!(r.resize(10, 10).is_err());
    assert!(r.initialize(&EmbeddedLoader).is_err());
    assert_eq!(r.backend().draw_calls().len(), draws_before);
}

#[test]
fn settings_follow_config() {
    let mut config = CrystalConfig::default();
    config.window.width = 1280;
    config.window.height = 720;
    config.material.refraction_index = 2.4;
    config.bloom.enabled = false;

    let settings = RendererSettings::from_config(&config);

    assert_eq!(settings.viewport, crate::gpu::PhysicalSize::new(1280, 720));
    assert_eq!(settings.refraction_index, 2.4);
    assert!(!settings.bloom.enabled);
    assert_eq!(settings.effects.len(), 5);
}

#[test]
fn renderer_state_display() {
    assert_eq!(RendererState::Uninitialized.to_string(), "Uninitialized");
    assert_eq!(RendererState::ProgramsReady.to_string(), "ProgramsReady");
    assert_eq!(RendererState::TornDown.to_string(), "TornDown");
}
