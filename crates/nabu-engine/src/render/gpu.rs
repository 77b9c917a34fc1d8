use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Viewport, ViewTransform};
use crate::geometry::{Attribute, StreamKind};

use super::{BufferSlot, DeviceSurface, Primitive, RenderCtx, DEPTH_STEP};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Smallest vertex buffer ever allocated, in bytes.
const MIN_BUFFER_BYTES: u64 = 256;

/// wgpu implementation of [`DeviceSurface`].
///
/// Owns six vertex buffers (three attributes × fill/stroke), the view
/// uniform, a depth attachment and four pipelines (triangle/line list, with
/// and without the depth test).
///
/// Each `draw` and `clear_depth` is encoded and submitted on its own, so
/// queue writes and draws execute in exactly the order they were issued.
/// Draws go to the color view set with [`set_target`](Self::set_target).
pub struct WgpuSurface {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_format: wgpu::TextureFormat,

    buffers: [GpuBuffer; BufferSlot::COUNT],

    uniform: ViewUniform,
    uniform_dirty: bool,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    /// Indexed by `pipeline_index`.
    pipelines: [wgpu::RenderPipeline; 4],
    depth_test: bool,

    depth: DepthTarget,
    target: Option<wgpu::TextureView>,

    warned_no_target: bool,
}

impl WgpuSurface {
    /// Builds every GPU resource up front.
    ///
    /// Fails on a zero-sized target or a depth-format color target; no
    /// partially initialized surface is ever returned.
    pub fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        let (width, height) = ctx.physical_size;
        anyhow::ensure!(width > 0 && height > 0, "render target has zero size");
        anyhow::ensure!(
            !ctx.surface_format.is_depth_stencil_format(),
            "color target format {:?} is a depth format",
            ctx.surface_format
        );

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("nabu geometry shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/geometry.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("nabu view bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ViewUniform>() as u64),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("nabu geometry pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let make = |primitive, depth_test| {
            create_pipeline(
                ctx.device,
                &shader,
                &pipeline_layout,
                ctx.surface_format,
                primitive,
                depth_test,
            )
        };
        let pipelines = [
            make(Primitive::TriangleList, false),
            make(Primitive::LineList, false),
            make(Primitive::TriangleList, true),
            make(Primitive::LineList, true),
        ];

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("nabu view ubo"),
            size: std::mem::size_of::<ViewUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("nabu view bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        let depth = DepthTarget::new(ctx.device, width, height);

        let mut uniform = ViewUniform::new(ViewTransform::identity(), ctx.viewport);
        if !ctx.viewport.is_valid() {
            log::warn!("invalid initial viewport {:?}; using 1x1", ctx.viewport);
            uniform.viewport = [1.0, 1.0];
        }

        log::debug!(
            "wgpu surface ready: format {:?}, {width}x{height} px",
            ctx.surface_format
        );

        Ok(Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            surface_format: ctx.surface_format,
            buffers: Default::default(),
            uniform,
            uniform_dirty: true,
            ubo,
            bind_group,
            pipelines,
            depth_test: false,
            depth,
            target: None,
            warned_no_target: false,
        })
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Sets the color view subsequent draws render into.
    pub fn set_target(&mut self, view: wgpu::TextureView) {
        self.target = Some(view);
    }

    /// Releases the color view (e.g. before presenting the frame).
    pub fn take_target(&mut self) -> Option<wgpu::TextureView> {
        self.target.take()
    }

    /// Clears the color target to `color` and the depth attachment to far.
    pub fn clear_target(&mut self, color: ColorRgba) {
        if self.target.is_none() {
            self.warn_no_target();
            return;
        }
        let Some(view) = self.target.as_ref() else { return };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("nabu clear encoder"),
            });
        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("nabu clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: color.r as f64,
                            g: color.g as f64,
                            b: color.b as f64,
                            a: color.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(self.depth.attachment(wgpu::LoadOp::Clear(1.0))),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Resizes the depth attachment to match a new physical target size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.depth.size {
            return;
        }
        self.depth = DepthTarget::new(&self.device, width, height);
    }

    fn flush_uniform(&mut self) {
        if self.uniform_dirty {
            self.queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&self.uniform));
            self.uniform_dirty = false;
        }
    }

    fn warn_no_target(&mut self) {
        if !self.warned_no_target {
            log::warn!("WgpuSurface: no color target set; draws are dropped");
            self.warned_no_target = true;
        }
    }
}

impl DeviceSurface for WgpuSurface {
    fn replace(&mut self, slot: BufferSlot, bytes: &[u8], count: usize) {
        debug_assert_eq!(bytes.len(), count * slot.stride(), "replace: byte length mismatch");
        let buf = &mut self.buffers[slot.index()];
        buf.ensure_capacity(&self.device, slot, bytes.len() as u64);
        if let Some(b) = buf.buffer.as_ref() {
            if !bytes.is_empty() {
                self.queue.write_buffer(b, 0, bytes);
            }
        }
        buf.len = bytes.len() as u64;
    }

    fn write(&mut self, slot: BufferSlot, offset: u64, bytes: &[u8]) {
        let buf = &self.buffers[slot.index()];
        let end = offset + bytes.len() as u64;
        let Some(b) = buf.buffer.as_ref().filter(|_| end <= buf.len) else {
            log::warn!(
                "partial write {offset}..{end} outside {slot:?} ({} bytes); ignored",
                buf.len
            );
            return;
        };
        if !bytes.is_empty() {
            self.queue.write_buffer(b, offset, bytes);
        }
    }

    fn draw(&mut self, primitive: Primitive, stream: StreamKind, count: usize) {
        if count == 0 {
            return;
        }
        if self.target.is_none() {
            self.warn_no_target();
            return;
        }
        self.flush_uniform();

        let mut vbos = Vec::with_capacity(Attribute::ALL.len());
        for attr in Attribute::ALL {
            let slot = BufferSlot::new(attr, stream);
            let buf = &self.buffers[slot.index()];
            let bytes = (count * slot.stride()) as u64;
            let Some(b) = buf.buffer.as_ref().filter(|_| bytes <= buf.len) else {
                log::warn!("draw of {count} {stream} vertices exceeds {slot:?} contents; skipped");
                return;
            };
            vbos.push(b.slice(..bytes));
        }

        let Some(view) = self.target.as_ref() else { return };
        let pipeline = &self.pipelines[pipeline_index(primitive, self.depth_test)];

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("nabu draw encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("nabu geometry pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(self.depth.attachment(wgpu::LoadOp::Load)),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            for (i, vbo) in vbos.into_iter().enumerate() {
                rpass.set_vertex_buffer(i as u32, vbo);
            }
            rpass.draw(0..count as u32, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn set_view(&mut self, view: ViewTransform) {
        self.uniform.origin = [view.origin_x, view.origin_y];
        self.uniform.zoom = view.zoom;
        self.uniform_dirty = true;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            log::warn!("ignoring invalid viewport {viewport:?}");
            return;
        }
        self.uniform.viewport = [viewport.width, viewport.height];
        self.uniform_dirty = true;
    }

    fn clear_depth(&mut self) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("nabu depth clear encoder"),
            });
        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("nabu depth clear"),
                color_attachments: &[],
                depth_stencil_attachment: Some(self.depth.attachment(wgpu::LoadOp::Clear(1.0))),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }
}

// ── device buffers ────────────────────────────────────────────────────────

#[derive(Default)]
struct GpuBuffer {
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
    /// Bytes written by the last `replace`.
    len: u64,
}

impl GpuBuffer {
    fn ensure_capacity(&mut self, device: &wgpu::Device, slot: BufferSlot, required: u64) {
        if required <= self.capacity && self.buffer.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(MIN_BUFFER_BYTES);
        log::debug!("{}: growing to {new_cap} bytes", slot.label());

        self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(slot.label()),
            size: new_cap,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.capacity = new_cap;
        self.len = 0;
    }
}

// ── depth attachment ──────────────────────────────────────────────────────

struct DepthTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl DepthTarget {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("nabu depth texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
            size: (width, height),
        }
    }

    fn attachment(&self, load: wgpu::LoadOp<f32>) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.view,
            depth_ops: Some(wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }
    }
}

// ── view uniform ──────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewUniform {
    origin: [f32; 2],
    zoom: f32,
    depth_step: f32,
    viewport: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

impl ViewUniform {
    fn new(view: ViewTransform, viewport: Viewport) -> Self {
        Self {
            origin: [view.origin_x, view.origin_y],
            zoom: view.zoom,
            depth_step: DEPTH_STEP,
            viewport: [viewport.width, viewport.height],
            _pad: [0.0; 2],
        }
    }
}

// ── pipelines ─────────────────────────────────────────────────────────────

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];
const DEPTH_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32];

fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    let layout = |attr: Attribute, attributes: &'static [wgpu::VertexAttribute]| {
        wgpu::VertexBufferLayout {
            array_stride: attr.stride() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    };
    [
        layout(Attribute::Position, &POSITION_ATTRS),
        layout(Attribute::Color, &COLOR_ATTRS),
        layout(Attribute::Depth, &DEPTH_ATTRS),
    ]
}

#[inline]
fn pipeline_index(primitive: Primitive, depth_test: bool) -> usize {
    let p = match primitive {
        Primitive::TriangleList => 0,
        Primitive::LineList => 1,
    };
    if depth_test { 2 + p } else { p }
}

fn create_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    primitive: Primitive,
    depth_test: bool,
) -> wgpu::RenderPipeline {
    use wgpu::PrimitiveTopology::{LineList, TriangleList};

    let (label, topology) = match (primitive, depth_test) {
        (Primitive::TriangleList, false) => ("nabu fill pipeline", TriangleList),
        (Primitive::LineList, false) => ("nabu stroke pipeline", LineList),
        (Primitive::TriangleList, true) => ("nabu fill pipeline (depth)", TriangleList),
        (Primitive::LineList, true) => ("nabu stroke pipeline (depth)", LineList),
    };

    let buffers = vertex_layouts();

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        // Immediate mode keeps the attachment but never tests or writes it.
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_test,
            depth_compare: if depth_test {
                wgpu::CompareFunction::LessEqual
            } else {
                wgpu::CompareFunction::Always
            },
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}
