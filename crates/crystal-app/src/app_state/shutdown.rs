//! Graceful shutdown: release GPU resources while the context is current.

use super::core::CrystalApp;

impl CrystalApp {
    pub(super) fn shutdown(&mut self) {
        let Some(mut graphics) = self.graphics.take() else {
            return;
        };
        tracing::info!("Initiating graceful shutdown");
        graphics.renderer.teardown();
        drop(graphics);
        tracing::info!("Shutdown complete");
    }
}
