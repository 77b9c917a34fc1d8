use crate::coords::Viewport;

/// Borrowed device handles plus the size of the frame being drawn.
///
/// Built by [`Gpu::render_ctx`](crate::device::Gpu::render_ctx). A
/// [`WgpuSurface`](super::WgpuSurface) is created from one and fed the sizes
/// of later ones.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Color target size in physical pixels; the depth attachment matches it.
    pub physical_size: (u32, u32),
    /// Same target in logical pixels; drives the viewport uniform.
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        physical_size: (u32, u32),
        viewport: Viewport,
    ) -> Self {
        Self { device, queue, surface_format, physical_size, viewport }
    }
}
