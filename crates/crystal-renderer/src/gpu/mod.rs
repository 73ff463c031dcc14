//! GPU access for the crystal renderer.
//!
//! [`GpuBackend`] is the only way the rest of the crate touches a graphics
//! API. [`GlowBackend`] drives OpenGL 3.3 core; [`HeadlessBackend`] runs the
//! same calls on the CPU and records them.

mod backend;
mod glow_backend;
mod headless;
mod types;

pub use backend::*;
pub use glow_backend::*;
pub use headless::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_violation_display() {
        let err = RenderError::PreconditionViolation {
            operation: "render",
            state: "Uninitialized".into(),
        };
        assert_eq!(err.to_string(), "render() called in state Uninitialized");
    }

    #[test]
    fn uniform_array_overflow_display() {
        let err = RenderError::UniformArrayOverflow {
            name: "lightPositions".into(),
            requested: 6,
            capacity: 4,
        };
        assert_eq!(
            err.to_string(),
            "uniform array `lightPositions` holds 4 entries but 6 were supplied"
        );
    }

    #[test]
    fn gpu_error_display() {
        let err = RenderError::Gpu("GL_INVALID_OPERATION".into());
        assert_eq!(err.to_string(), "gpu error: GL_INVALID_OPERATION");
    }

    #[test]
    fn shader_stage_file_stems() {
        assert_eq!(ShaderStage::Vertex.file_stem(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }

    #[test]
    fn program_build_error_constructors() {
        let compile = ProgramBuildError::compile(ShaderStage::Fragment, "bad");
        assert_eq!(compile.stage, Some(ShaderStage::Fragment));
        let link = ProgramBuildError::link("worse");
        assert_eq!(link.stage, None);
        assert_eq!(link.log, "worse");
    }

    #[test]
    fn active_uniform_strips_array_suffix() {
        let u = ActiveUniform::from_reflection("lightPositions[0]", 4);
        assert_eq!(u.name, "lightPositions");
        assert_eq!(u.array_len, 4);

        let scalar = ActiveUniform::from_reflection("time", 0);
        assert_eq!(scalar.name, "time");
        assert_eq!(scalar.array_len, 1);
    }

    #[test]
    fn physical_size_texel_size() {
        let size = PhysicalSize::new(800, 400);
        assert_eq!(size.texel_size(), [1.0 / 800.0, 1.0 / 400.0]);
        assert_eq!(PhysicalSize::new(0, 0).texel_size(), [1.0, 1.0]);
    }
}
