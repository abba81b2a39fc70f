use std::sync::Arc;

use parking_lot::Mutex;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::Viewport;

/// Window size and scale factor as last reported to the event loop.
///
/// Some platforms answer `Window` size queries only on the main thread and
/// block any other caller until it gets there. The host writes here from its
/// `Resized` and `ScaleFactorChanged` handlers; the render thread only reads.
#[derive(Debug, Clone)]
pub struct SurfaceMetrics {
    inner: Arc<Mutex<Metrics>>,
}

/// Snapshot of [`SurfaceMetrics`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Metrics {
    pub size: PhysicalSize<u32>,
    pub scale_factor: f64,
}

impl Metrics {
    /// Logical-pixel drawable area.
    pub fn viewport(&self) -> Viewport {
        Viewport::from_physical(self.size, self.scale_factor)
    }

    pub fn has_area(&self) -> bool {
        self.size.width > 0 && self.size.height > 0
    }
}

impl SurfaceMetrics {
    pub fn new(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Metrics { size, scale_factor })),
        }
    }

    /// Reads the current values from `window`. Call on the event-loop thread.
    pub fn sample(window: &Window) -> Self {
        Self::new(window.inner_size(), window.scale_factor())
    }

    pub fn set_size(&self, size: PhysicalSize<u32>) {
        self.inner.lock().size = size;
    }

    pub fn set_scale_factor(&self, scale_factor: f64) {
        self.inner.lock().scale_factor = scale_factor;
    }

    pub fn get(&self) -> Metrics {
        *self.inner.lock()
    }
}
