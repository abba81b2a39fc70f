use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::RenderCtx;

/// Quad to draw, in logical pixels.
///
/// Corner colors are ordered top-left, top-right, bottom-right, bottom-left and
/// interpolated bilinearly across the face.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad {
    pub origin: [f32; 2],
    pub size: f32,
    pub corners: [Color; 4],
}

impl Quad {
    /// Red, yellow, magenta and white corners.
    pub fn demo(x: f32, y: f32, size: f32) -> Self {
        Self {
            origin: [x, y],
            size,
            corners: [
                Color::from_straight(1.0, 0.0, 0.0, 1.0),
                Color::from_straight(1.0, 1.0, 0.0, 1.0),
                Color::from_straight(1.0, 0.0, 1.0, 1.0),
                Color::from_straight(1.0, 1.0, 1.0, 1.0),
            ],
        }
    }
}

/// Draws a single [`Quad`] per frame.
///
/// The pipeline is built on first use and rebuilt if the swapchain format
/// changes. All per-frame data travels in one uniform buffer.
#[derive(Default)]
pub struct QuadRenderer {
    pipeline: Option<QuadPipeline>,
}

struct QuadPipeline {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl QuadRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the frame to `clear` and draws `quad` over it.
    pub fn render(&mut self, ctx: &mut RenderCtx<'_>, quad: &Quad, clear: Color) {
        if self.pipeline.as_ref().map(|p| p.format) != Some(ctx.format) {
            log::debug!("building quad pipeline for {:?}", ctx.format);
            self.pipeline = Some(QuadPipeline::new(ctx.device, ctx.format));
        }
        let Some(gpu) = self.pipeline.as_ref() else { return };

        let uniform = QuadUniform::new(ctx.viewport, quad);
        ctx.queue
            .write_buffer(&gpu.uniform, 0, bytemuck::bytes_of(&uniform));

        let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: ctx.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.into()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&gpu.pipeline);
        pass.set_bind_group(0, &gpu.bind_group, &[]);
        pass.draw(0..4, 0..1);
    }
}

impl QuadPipeline {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tessera quad shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera quad bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(QuadUniform::SIZE),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera quad pipeline layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessera quad pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera quad uniform"),
            size: QuadUniform::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera quad bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        Self {
            format,
            pipeline,
            uniform,
            bind_group,
        }
    }
}

/// Mirrors `QuadUniform` in `quad.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadUniform {
    viewport: [f32; 2],
    origin: [f32; 2],
    size: [f32; 2],
    _pad: [f32; 2],
    colors: [[f32; 4]; 4],
}

impl QuadUniform {
    const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    fn new(viewport: Viewport, quad: &Quad) -> Self {
        Self {
            // Guards the shader's divide while the window has no area.
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            origin: quad.origin,
            size: [quad.size, quad.size],
            _pad: [0.0; 2],
            colors: quad.corners.map(|c| [c.r, c.g, c.b, c.a]),
        }
    }
}
