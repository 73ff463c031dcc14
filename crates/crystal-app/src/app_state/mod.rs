//! Windowed application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the window, the GL context and the crystal renderer.

mod core;
mod event_handler;
mod init;
mod render;
mod shutdown;

pub use core::CrystalApp;
