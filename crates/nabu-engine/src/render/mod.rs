//! Device surface: where CPU vertex streams become GPU buffers and draws.
//!
//! The geometry core only talks to [`DeviceSurface`]. Two implementations:
//! - [`WgpuSurface`]: the real GPU binding
//! - [`RecordingSurface`]: a byte-exact CPU mirror that records every call
//!
//! Convention:
//! - stored positions are Y-up logical pixels
//! - the vertex shader applies the view transform, then converts to NDC with
//!   the viewport uniform

mod ctx;
mod gpu;
mod recording;
mod slot;

pub use ctx::RenderCtx;
pub use gpu::WgpuSurface;
pub use recording::{RecordingSurface, SurfaceCall};
pub use slot::{BufferSlot, Primitive, Residency};

use crate::coords::{Viewport, ViewTransform};
use crate::geometry::StreamKind;

/// Depth units per appended vertex, as seen by the depth test.
///
/// Device depth is `1 - depth * DEPTH_STEP`, so later vertices sit closer and
/// win a `LessEqual` comparison.
pub const DEPTH_STEP: f32 = 1.0 / 16_777_216.0;

/// Buffers, uniforms and draw calls the engine writes into.
///
/// Every method completes before returning. In particular a `draw` observes
/// exactly the buffer contents written before it, and nothing written after.
pub trait DeviceSurface {
    /// Replaces the whole buffer with `bytes`, holding `count` vertices of
    /// the slot's stride.
    fn replace(&mut self, slot: BufferSlot, bytes: &[u8], count: usize);

    /// Overwrites `bytes.len()` bytes at `offset`. The range must lie within
    /// the last replacement.
    fn write(&mut self, slot: BufferSlot, offset: u64, bytes: &[u8]);

    /// Draws the first `count` vertices of `stream`'s buffers.
    fn draw(&mut self, primitive: Primitive, stream: StreamKind, count: usize);

    fn set_view(&mut self, view: ViewTransform);

    fn set_viewport(&mut self, viewport: Viewport);

    fn clear_depth(&mut self);

    /// Toggles the `LessEqual` depth test (off means painter's order).
    fn set_depth_test(&mut self, enabled: bool);
}
