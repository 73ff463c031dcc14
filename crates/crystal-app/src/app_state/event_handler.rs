//! `ApplicationHandler` implementation for the winit event loop.

use std::num::NonZeroU32;

use glutin::surface::GlSurface;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use super::core::CrystalApp;

impl ApplicationHandler for CrystalApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        match self.initialize_graphics(event_loop) {
            Ok(graphics) => {
                graphics.window.request_redraw();
                self.graphics = Some(graphics);
            }
            Err(e) => {
                tracing::error!("Failed to initialize graphics: {e}");
                self.failed = true;
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                else {
                    return;
                };
                if let Some(graphics) = self.graphics.as_mut() {
                    graphics.surface.resize(&graphics.context, width, height);
                    if let Err(e) = graphics.renderer.resize(size.width, size.height) {
                        tracing::warn!("Resize failed: {e}");
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render_frame() {
                    tracing::error!("Render error: {e}");
                    self.failed = true;
                    self.shutdown();
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Continuous animation.
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }
}
