use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use super::GpuInit;

/// What the render loop does after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The swapchain went stale and must be configured again before the next frame.
    Reconfigure,
    /// Drop this frame and try again next tick.
    SkipFrame,
    /// The engine cannot continue.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn classify(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}

/// Builds the swapchain configuration from what the surface supports.
pub(crate) fn configure_for(
    caps: &wgpu::SurfaceCapabilities,
    init: &GpuInit,
    size: PhysicalSize<u32>,
) -> Result<wgpu::SurfaceConfiguration> {
    let srgb = caps.formats.iter().copied().find(|f| f.is_srgb());
    let format = match (init.prefer_srgb, srgb) {
        (true, Some(f)) => f,
        _ => caps
            .formats
            .first()
            .copied()
            .context("surface reports no texture formats")?,
    };

    // Fifo is the one mode every surface supports.
    let present_mode = if caps.present_modes.contains(&init.present_mode) {
        init.present_mode
    } else {
        log::warn!("{:?} not supported by the surface, using Fifo", init.present_mode);
        wgpu::PresentMode::Fifo
    };

    let alpha_mode = caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode,
        alpha_mode,
        view_formats: Vec::new(),
        desired_maximum_frame_latency: init.frame_latency,
    })
}
