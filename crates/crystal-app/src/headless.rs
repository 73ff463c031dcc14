//! Window-free runs: the `--headless` dry run and `--dump-shaders`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crystal_common::CrystalError;
use crystal_config::CrystalConfig;
use crystal_renderer::gpu::{ShaderStage, UniformValue};
use crystal_renderer::post_process::POST_PROCESSING_SHADER;
use crystal_renderer::shader::ComposedSource;
use crystal_renderer::{
    CrystalRenderer, EffectComposer, HeadlessBackend, RendererSettings, ShaderSourceLoader,
};

use crate::scene;

/// Simulated frame interval of the dry run, in seconds.
const FRAME_INTERVAL: f32 = 1.0 / 60.0;

/// Outcome of a headless run.
#[derive(Debug)]
pub struct HeadlessReport {
    pub frames: u32,
    pub digest: String,
    pub uniforms: BTreeMap<String, UniformValue>,
    pub gpu_errors: usize,
}

impl HeadlessReport {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "frames: {}", self.frames);
        let _ = writeln!(out, "program digest: {}", self.digest);
        let _ = writeln!(out, "gpu errors: {}", self.gpu_errors);
        let _ = writeln!(out, "main program uniforms:");
        for (name, value) in &self.uniforms {
            let _ = writeln!(out, "  {name} = {}", format_value(value));
        }
        out
    }
}

fn format_value(value: &UniformValue) -> String {
    match value {
        UniformValue::Float(v) => format!("{v}"),
        UniformValue::Int(v) => format!("{v}"),
        UniformValue::Vec2(v) => format!("{v:?}"),
        UniformValue::Vec3(v) => format!("{v:?}"),
        UniformValue::Mat4(_) => "mat4".into(),
    }
}

/// Run the full renderer against the recording backend for `frames` frames.
///
/// Any GPU error raised along the way (a uniform written with the wrong
/// type, a write to an inactive program) fails the run.
pub fn run(
    config: &CrystalConfig,
    loader: &dyn ShaderSourceLoader,
    frames: u32,
) -> Result<HeadlessReport, CrystalError> {
    let settings = RendererSettings::from_config(config);
    let mut renderer = CrystalRenderer::new(HeadlessBackend::new(), settings);
    renderer.initialize(loader).map_err(scene::renderer_error)?;
    renderer
        .setup_model(&scene::load_model(config)?)
        .map_err(scene::renderer_error)?;
    if let Some(faces) = scene::load_environment(config)? {
        renderer
            .set_environment_map(&faces)
            .map_err(scene::renderer_error)?;
    }

    let (view, projection) = scene::camera_matrices(config, config.window.aspect_ratio());
    for frame in 0..frames {
        let time = frame as f32 * FRAME_INTERVAL;
        let model = scene::model_matrix(config, time);
        renderer
            .render(&model, &view, &projection, time)
            .map_err(scene::renderer_error)?;
        renderer.post_process().map_err(scene::renderer_error)?;
    }

    let Some(program) = renderer.main_program() else {
        return Err(CrystalError::Renderer("main program missing after initialize".into()));
    };
    let report = HeadlessReport {
        frames,
        digest: program.source().digest(),
        uniforms: renderer.backend().uniform_snapshot(program.handle()),
        gpu_errors: renderer.gpu_error_count(),
    };
    renderer.teardown();
    if report.gpu_errors > 0 {
        return Err(CrystalError::Renderer(format!(
            "{} GPU error(s) while binding uniforms or drawing",
            report.gpu_errors
        )));
    }
    tracing::info!(frames, "Headless run complete");
    Ok(report)
}

/// Merged GLSL of the main and post programs, with section headers.
pub fn dump_shaders(
    config: &CrystalConfig,
    loader: &dyn ShaderSourceLoader,
) -> Result<String, CrystalError> {
    let settings = RendererSettings::from_config(config);
    let descriptors = settings.effects.descriptors(loader);
    let main = EffectComposer::from_loader(loader)
        .compose(&descriptors)
        .map_err(scene::renderer_error)?;
    let post = EffectComposer::new(
        loader.load(POST_PROCESSING_SHADER, ShaderStage::Vertex),
        loader.load(POST_PROCESSING_SHADER, ShaderStage::Fragment),
    )
    .compose(&[])
    .map_err(scene::renderer_error)?;

    let mut out = String::new();
    append_program(&mut out, "main", &main);
    append_program(&mut out, POST_PROCESSING_SHADER, &post);
    Ok(out)
}

fn append_program(out: &mut String, label: &str, source: &ComposedSource) {
    for stage in ShaderStage::ALL {
        let _ = writeln!(out, "// ==== {label} {stage} (sha256 {}) ====", source.digest());
        out.push_str(source.stage(stage));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crystal_renderer::shader::MemoryLoader;
    use crystal_renderer::EmbeddedLoader;

    #[test]
    fn dry_run_reports_configured_uniforms() {
        let config = CrystalConfig::default();
        let report = run(&config, &EmbeddedLoader, 3).unwrap();

        assert_eq!(report.frames, 3);
        assert_eq!(report.gpu_errors, 0);
        assert_eq!(report.digest.len(), 64);
        assert_eq!(report.uniforms.get("fresnelPower"), Some(&UniformValue::Float(5.0)));
        assert_eq!(
            report.uniforms.get("time"),
            Some(&UniformValue::Float(2.0 * FRAME_INTERVAL))
        );
        assert_eq!(report.uniforms.get("lightCount"), Some(&UniformValue::Int(2)));

        let text = report.render_text();
        assert!(text.contains("fresnelPower = 5"));
        assert!(text.contains("model = mat4"));
    }

    #[test]
    fn dry_run_fails_on_broken_shader() {
        let loader = MemoryLoader::over(EmbeddedLoader).with(
            "base",
            ShaderStage::Fragment,
            "#version 330 core\nout vec4 fragColor;\n",
        );
        let err = run(&CrystalConfig::default(), &loader, 1).unwrap_err();
        assert!(matches!(err, CrystalError::Renderer(_)));
    }

    #[test]
    fn dry_run_fails_on_uniform_type_mismatch() {
        let loader = MemoryLoader::over(EmbeddedLoader).with(
            "fresnel",
            ShaderStage::Fragment,
            "uniform int fresnelPower;\n\nvec3 compute_Fresnel() {\n    return crystalColor * float(fresnelPower);\n}\n",
        );
        let err = run(&CrystalConfig::default(), &loader, 2).unwrap_err();
        match err {
            CrystalError::Renderer(message) => assert!(message.contains("GPU error")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_frames_still_initializes() {
        let report = run(&CrystalConfig::default(), &EmbeddedLoader, 0).unwrap();
        assert_eq!(report.frames, 0);
        assert!(report.uniforms.is_empty());
    }

    #[test]
    fn dump_contains_both_programs_in_effect_order() {
        let text = dump_shaders(&CrystalConfig::default(), &EmbeddedLoader).unwrap();

        assert!(text.contains("// ==== main vertex"));
        assert!(text.contains("// ==== main fragment"));
        assert!(text.contains("// ==== post_processing fragment"));
        let fresnel = text.find("result += compute_Fresnel();").unwrap();
        let glitter = text.find("result += compute_Glitter();").unwrap();
        assert!(fresnel < glitter);
    }

    #[test]
    fn dump_respects_disabled_effects() {
        let mut config = CrystalConfig::default();
        config.effects.glitter.enabled = false;
        let text = dump_shaders(&config, &EmbeddedLoader).unwrap();
        assert!(!text.contains("compute_Glitter();"));
        assert!(!text.contains("vertex_Glitter();"));
    }
}
