/// One acquired swapchain image.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// frame. Hand it back through [`Gpu::present`](super::Gpu::present).
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}
