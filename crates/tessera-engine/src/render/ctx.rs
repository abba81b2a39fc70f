use crate::coords::Viewport;

/// One frame being recorded.
///
/// Handed out by [`Gpu::record`](crate::device::Gpu::record). `viewport` is
/// the logical-pixel space quad coordinates are given in.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub format: wgpu::TextureFormat,
    pub viewport: Viewport,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}
