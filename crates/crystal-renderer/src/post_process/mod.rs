//! Screen-space bloom over the main pass's output.

mod stage;
mod types;

pub use stage::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::FrameContext;
    use crate::gpu::{
        DrawKind, GpuBackend, HeadlessBackend, PhysicalSize, ShaderStage, UniformValue,
    };
    use crate::shader::{EmbeddedLoader, MemoryLoader, ShaderError};

    fn frame() -> FrameContext<crate::gpu::HeadlessTexture> {
        FrameContext {
            time: 0.0,
            environment_map: None,
            viewport: PhysicalSize::new(400, 200),
        }
    }

    #[test]
    fn shipped_post_program_links() {
        let backend = HeadlessBackend::new();
        let stage = PostProcessStage::new(&backend, &EmbeddedLoader, BloomSettings::default());
        assert!(stage.is_ok());
        assert_eq!(backend.live_programs(), 1);
    }

    #[test]
    fn run_draws_fullscreen_to_screen_with_uniforms() {
        let backend = HeadlessBackend::new();
        let mut stage =
            PostProcessStage::new(&backend, &EmbeddedLoader, BloomSettings::default()).unwrap();
        let target = backend.create_render_target(400, 200).unwrap();

        stage.run(&backend, &target, &frame()).unwrap();

        let handle = stage.program().handle();
        let draws = backend.draw_calls();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].kind, DrawKind::Fullscreen);
        assert_eq!(draws[0].target, None);
        assert_eq!(draws[0].program, Some(handle));
        assert_eq!(draws[0].viewport, (400, 200));

        let value = |name: &str| backend.uniform_value(handle, name);
        assert_eq!(value("bloomThreshold"), Some(UniformValue::Float(0.8)));
        assert_eq!(value("bloomIntensity"), Some(UniformValue::Float(0.3)));
        assert_eq!(value("sceneTexture"), Some(UniformValue::Int(0)));
        assert_eq!(
            value("texelSize"),
            Some(UniformValue::Vec2([1.0 / 400.0, 1.0 / 200.0]))
        );
        assert!(backend.poll_error().is_none());
    }

    #[test]
    fn disabled_bloom_uploads_zero_intensity() {
        let backend = HeadlessBackend::new();
        let settings = BloomSettings {
            enabled: false,
            ..BloomSettings::default()
        };
        let mut stage = PostProcessStage::new(&backend, &EmbeddedLoader, settings).unwrap();
        let target = backend.create_render_target(8, 8).unwrap();
        stage.run(&backend, &target, &frame()).unwrap();
        assert_eq!(
            backend.uniform_value(stage.program().handle(), "bloomIntensity"),
            Some(UniformValue::Float(0.0))
        );
    }

    #[test]
    fn missing_post_sources_fail_without_a_program() {
        let backend = HeadlessBackend::new();
        let err = PostProcessStage::new(&backend, &MemoryLoader::new(), BloomSettings::default())
            .err()
            .unwrap();
        assert_eq!(
            err,
            ShaderError::MissingEntryPoint {
                stage: ShaderStage::Vertex
            }
        );
        assert_eq!(backend.live_programs(), 0);
    }

    #[test]
    fn broken_post_fragment_reports_compile_error() {
        let backend = HeadlessBackend::new();
        let loader = MemoryLoader::over(EmbeddedLoader).with(
            POST_PROCESSING_SHADER,
            ShaderStage::Fragment,
            "#version 330 core\nvoid main() {\n",
        );
        let err = PostProcessStage::new(&backend, &loader, BloomSettings::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
        assert_eq!(backend.live_programs(), 0);
        assert!(backend.draw_calls().is_empty());
    }

    #[test]
    fn delete_releases_the_program() {
        let backend = HeadlessBackend::new();
        let stage =
            PostProcessStage::new(&backend, &EmbeddedLoader, BloomSettings::default()).unwrap();
        stage.delete(&backend);
        assert_eq!(backend.live_programs(), 0);
    }
}
