//! Render backends.
//!
//! A backend owns the drawing context and is created, used and dropped on the
//! render thread only; it never needs to be `Send`. The factory that builds it
//! is sent to the render thread and invoked there, which is what binds the
//! context to that thread.

mod headless;
mod windowed;

use anyhow::Result;

use crate::engine::ViewState;

pub use self::headless::{HeadlessBackend, HeadlessConfig, HeadlessProbe};
pub use self::windowed::WgpuBackend;

/// Drawing context driven by the render thread.
pub trait RenderBackend {
    /// Current drawable size in logical pixels.
    fn surface_size(&self) -> (f32, f32);

    /// Draws the quad at `view` and presents the frame.
    ///
    /// Transient problems (e.g. a lost swapchain) are handled inside and
    /// reported as `Ok`. An `Err` is fatal and stops the engine.
    fn draw(&mut self, view: &ViewState, quad_size: f32) -> Result<()>;
}

/// Builds a backend on the render thread.
pub type BackendFactory = Box<dyn FnOnce() -> Result<Box<dyn RenderBackend>> + Send + 'static>;
