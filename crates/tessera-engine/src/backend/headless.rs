use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;

use crate::engine::ViewState;

use super::{BackendFactory, RenderBackend};

/// Surface parameters for the headless backend.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub width: f32,
    pub height: f32,

    /// Sleep after each "present", standing in for vsync.
    ///
    /// `None` spins as fast as the loop allows.
    pub frame_interval: Option<Duration>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            frame_interval: Some(Duration::from_millis(16)),
        }
    }
}

/// Backend without a display. Records what it would have drawn.
pub struct HeadlessBackend {
    config: HeadlessConfig,
    probe: HeadlessProbe,
}

/// Read-only view into a running [`HeadlessBackend`], usable from any thread.
#[derive(Clone, Default)]
pub struct HeadlessProbe {
    inner: Arc<ProbeInner>,
}

#[derive(Default)]
struct ProbeInner {
    frames: AtomicU64,
    last_view: Mutex<Option<ViewState>>,
}

impl HeadlessProbe {
    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.inner.frames.load(Ordering::Acquire)
    }

    /// View used by the most recent frame.
    pub fn last_view(&self) -> Option<ViewState> {
        *self.inner.last_view.lock()
    }
}

impl HeadlessBackend {
    pub fn new(config: HeadlessConfig) -> (Self, HeadlessProbe) {
        let probe = HeadlessProbe::default();
        let backend = Self {
            config,
            probe: probe.clone(),
        };
        (backend, probe)
    }

    /// Factory for [`RenderEngine::spawn`](crate::engine::RenderEngine::spawn).
    pub fn factory(config: HeadlessConfig) -> (BackendFactory, HeadlessProbe) {
        let (backend, probe) = Self::new(config);
        let factory: BackendFactory = Box::new(move || -> Result<Box<dyn RenderBackend>> {
            log::debug!(
                "headless backend {}x{} created",
                backend.config.width,
                backend.config.height
            );
            Ok(Box::new(backend) as Box<dyn RenderBackend>)
        });
        (factory, probe)
    }
}

impl RenderBackend for HeadlessBackend {
    fn surface_size(&self) -> (f32, f32) {
        (self.config.width, self.config.height)
    }

    fn draw(&mut self, view: &ViewState, _quad_size: f32) -> Result<()> {
        *self.probe.inner.last_view.lock() = Some(*view);
        self.probe.inner.frames.fetch_add(1, Ordering::AcqRel);

        match self.config.frame_interval {
            Some(interval) => thread::sleep(interval),
            None => thread::yield_now(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_records_frame_and_view() {
        let (mut backend, probe) = HeadlessBackend::new(HeadlessConfig {
            frame_interval: None,
            ..HeadlessConfig::default()
        });
        assert_eq!(probe.frames(), 0);
        assert_eq!(probe.last_view(), None);

        backend.draw(&ViewState::new(3.0, 4.0), 100.0).unwrap();
        backend.draw(&ViewState::new(5.0, 6.0), 100.0).unwrap();

        assert_eq!(probe.frames(), 2);
        assert_eq!(probe.last_view(), Some(ViewState::new(5.0, 6.0)));
        assert_eq!(backend.surface_size(), (640.0, 480.0));
    }
}
