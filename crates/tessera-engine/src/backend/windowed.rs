use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use winit::window::Window;

use crate::device::{Gpu, GpuInit, GpuSurface, SurfaceErrorAction, SurfaceMetrics};
use crate::engine::ViewState;
use crate::paint::Color;
use crate::render::{Quad, QuadRenderer};

use super::{BackendFactory, RenderBackend};

/// Pause between polls while the window has no drawable area.
const MINIMIZED_POLL: Duration = Duration::from_millis(50);

/// Draws the quad into a window through wgpu.
pub struct WgpuBackend {
    gpu: Gpu,
    quad: QuadRenderer,
    clear: Color,
}

impl WgpuBackend {
    /// Opens the GPU device. Blocks on adapter/device acquisition.
    pub fn new(target: GpuSurface, metrics: SurfaceMetrics, init: GpuInit) -> Result<Self> {
        let gpu = pollster::block_on(Gpu::new(target, metrics, init))
            .context("GPU initialization failed")?;

        log::info!("wgpu backend ready: {}x{}", gpu.size().width, gpu.size().height);

        Ok(Self {
            gpu,
            quad: QuadRenderer::new(),
            clear: Color::BLACK,
        })
    }

    /// Factory for [`RenderEngine::spawn`](crate::engine::RenderEngine::spawn).
    ///
    /// Call on the event-loop thread: the wgpu surface is created here. The
    /// render thread then reads the window size only from `metrics`.
    pub fn factory(
        window: Arc<Window>,
        metrics: SurfaceMetrics,
        init: GpuInit,
    ) -> Result<BackendFactory> {
        let target = GpuSurface::new(window)?;
        Ok(Box::new(move || -> Result<Box<dyn RenderBackend>> {
            let backend = WgpuBackend::new(target, metrics, init)?;
            Ok(Box::new(backend) as Box<dyn RenderBackend>)
        }))
    }
}

impl RenderBackend for WgpuBackend {
    fn surface_size(&self) -> (f32, f32) {
        let viewport = self.gpu.viewport();
        (viewport.width, viewport.height)
    }

    fn draw(&mut self, view: &ViewState, quad_size: f32) -> Result<()> {
        if !self.gpu.sync_size() {
            thread::sleep(MINIMIZED_POLL);
            return Ok(());
        }

        let mut frame = match self.gpu.acquire() {
            Ok(frame) => frame,
            Err(SurfaceErrorAction::Fatal) => bail!("swapchain out of memory"),
            Err(_) => return Ok(()),
        };

        let viewport = self.gpu.viewport();
        {
            let mut ctx = self.gpu.record(&mut frame, viewport);
            let quad = Quad::demo(view.x, view.y, quad_size);
            self.quad.render(&mut ctx, &quad, self.clear);
        }

        self.gpu.present(frame);
        Ok(())
    }
}
