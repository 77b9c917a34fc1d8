//! GPU device and window surface.
//!
//! Creates the wgpu instance, adapter, device and queue, configures the
//! window swapchain, and hands out one [`GpuFrame`] per presented frame.
//! Geometry buffers and pipelines live in [`crate::render::WgpuSurface`].

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
