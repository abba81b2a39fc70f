use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::Viewport;
use crate::render::RenderCtx;

use super::surface::{self, SurfaceErrorAction};
use super::{GpuInit, SurfaceMetrics};

/// wgpu instance and the window surface, created before the render thread
/// takes over.
pub struct GpuSurface {
    window: Arc<Window>,
    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
}

impl GpuSurface {
    /// Call on the event-loop thread: surface creation reads the window's
    /// native handles, which some platforms hand out only there.
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create wgpu surface")?;

        Ok(Self {
            window,
            instance,
            surface,
        })
    }
}

/// wgpu device, queue and the window's swapchain.
///
/// The surface keeps an `Arc` of its window, so the window outlives it no
/// matter which thread releases its handle first. The window is only used
/// for `pre_present_notify`, which never waits on the main thread.
pub struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    metrics: SurfaceMetrics,

    /// Physical size last applied from `metrics`. May be zero while
    /// minimized, in which case `config` keeps the previous non-zero extent.
    size: PhysicalSize<u32>,
}

/// Swapchain image being recorded. Present it with [`Gpu::present`] before
/// acquiring the next one.
pub struct GpuFrame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

impl Gpu {
    /// Opens a device for `target`.
    ///
    /// Drive the future with `pollster::block_on` on the render thread.
    pub async fn new(target: GpuSurface, metrics: SurfaceMetrics, init: GpuInit) -> Result<Self> {
        let GpuSurface {
            window,
            instance,
            surface,
        } = target;

        let size = metrics.get().size;
        anyhow::ensure!(
            size.width > 0 && size.height > 0,
            "cannot create a surface for a {}x{} window",
            size.width,
            size.height
        );

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;

        let info = adapter.get_info();
        log::info!("render adapter: {} ({:?})", info.name, info.backend);

        // A single quad needs nothing beyond the downlevel baseline.
        let required_limits =
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessera device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open wgpu device")?;

        let caps = surface.get_capabilities(&adapter);
        let config = surface::configure_for(&caps, &init, size)?;
        log::debug!(
            "swapchain {:?} {:?} {}x{}",
            config.format,
            config.present_mode,
            config.width,
            config.height
        );
        surface.configure(&device, &config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            metrics,
            size,
        })
    }

    /// Extent the swapchain is configured for. Keeps the last non-zero size
    /// while the window is minimized.
    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    /// Logical-pixel area of the configured swapchain at the current scale.
    pub fn viewport(&self) -> Viewport {
        Viewport::from_physical(self.size(), self.metrics.get().scale_factor)
    }

    /// Follows the size published in [`SurfaceMetrics`], reconfiguring the
    /// swapchain when it changed.
    ///
    /// Returns `false` while the window has no area; nothing can be drawn then.
    pub fn sync_size(&mut self) -> bool {
        let current = self.metrics.get().size;
        if current == self.size {
            return current.width > 0 && current.height > 0;
        }

        self.size = current;
        if current.width == 0 || current.height == 0 {
            return false;
        }

        log::debug!("swapchain resize {}x{}", current.width, current.height);
        self.config.width = current.width;
        self.config.height = current.height;
        self.surface.configure(&self.device, &self.config);
        true
    }

    /// Acquires the next swapchain image.
    ///
    /// A stale swapchain is reconfigured here; the caller only sees the
    /// resulting action.
    pub fn acquire(&self) -> Result<GpuFrame, SurfaceErrorAction> {
        let texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                let action = SurfaceErrorAction::classify(&err);
                log::debug!("surface error {err:?}: {action:?}");
                if action == SurfaceErrorAction::Reconfigure {
                    self.surface.configure(&self.device, &self.config);
                }
                return Err(action);
            }
        };

        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tessera frame encoder"),
            });

        Ok(GpuFrame {
            texture,
            view,
            encoder,
        })
    }

    /// Recording context for `frame`; `viewport` is in logical pixels.
    pub fn record<'a>(&'a self, frame: &'a mut GpuFrame, viewport: Viewport) -> RenderCtx<'a> {
        RenderCtx {
            device: &self.device,
            queue: &self.queue,
            format: self.config.format,
            viewport,
            encoder: &mut frame.encoder,
            color_view: &frame.view,
        }
    }

    /// Submits the recorded work and presents.
    pub fn present(&self, frame: GpuFrame) {
        let GpuFrame {
            texture,
            view,
            encoder,
        } = frame;

        self.queue.submit([encoder.finish()]);
        drop(view);
        self.window.pre_present_notify();
        texture.present();
    }
}
