//! Per-frame rendering.

use std::time::Duration;

use glutin::surface::GlSurface;

use crystal_common::CrystalError;

use crate::scene;

use super::core::CrystalApp;

/// How often the frame rate is logged.
const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(5);

impl CrystalApp {
    /// Render the crystal, run bloom, and present.
    pub(super) fn render_frame(&mut self) -> Result<(), CrystalError> {
        let Some(graphics) = self.graphics.as_mut() else {
            return Ok(());
        };

        let time = self.timer.begin_frame();
        let viewport = graphics.renderer.settings().viewport;
        let aspect = viewport.width as f32 / viewport.height.max(1) as f32;
        let model = scene::model_matrix(&self.config, time);
        let (view, projection) = scene::camera_matrices(&self.config, aspect);

        graphics
            .renderer
            .render(&model, &view, &projection, time)
            .map_err(scene::renderer_error)?;
        graphics
            .renderer
            .post_process()
            .map_err(scene::renderer_error)?;
        graphics
            .surface
            .swap_buffers(&graphics.context)
            .map_err(|e| CrystalError::Window(e.to_string()))?;

        if self.timer.report_due(FPS_REPORT_INTERVAL) {
            tracing::info!(
                "{:.1} fps ({:.2} ms/frame)",
                self.timer.fps(),
                self.timer.frame_time_ms()
            );
        }
        Ok(())
    }
}
