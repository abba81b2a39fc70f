/// Surface and adapter preferences for [`Gpu::new`](super::Gpu::new).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Presentation mode. The default `Fifo` waits for vertical blank and is
    /// the only throttle of the render loop; `Immediate` lets it spin.
    pub present_mode: wgpu::PresentMode,

    /// Pick an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,

    pub power_preference: wgpu::PowerPreference,

    /// Frames the presentation engine may queue ahead.
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            present_mode: wgpu::PresentMode::Fifo,
            prefer_srgb: true,
            power_preference: wgpu::PowerPreference::LowPower,
            frame_latency: 2,
        }
    }
}
