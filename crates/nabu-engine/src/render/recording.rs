use crate::coords::{Viewport, ViewTransform};
use crate::geometry::StreamKind;

use super::{BufferSlot, DeviceSurface, Primitive};

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Replace { slot: BufferSlot, count: usize },
    Write { slot: BufferSlot, offset: u64, len: usize },
    Draw { primitive: Primitive, stream: StreamKind, count: usize },
    SetView(ViewTransform),
    SetViewport(Viewport),
    ClearDepth,
    DepthTest(bool),
}

/// CPU device surface.
///
/// Keeps a byte copy of every buffer slot, so callers can check that device
/// contents match the CPU streams, and records the call sequence. Useful for
/// tests and for running the engine headless.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    buffers: [Vec<u8>; BufferSlot::COUNT],
    calls: Vec<SurfaceCall>,
    view: ViewTransform,
    viewport: Viewport,
    depth_test: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current bytes of one slot.
    #[inline]
    pub fn buffer(&self, slot: BufferSlot) -> &[u8] {
        &self.buffers[slot.index()]
    }

    #[inline]
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Returns and forgets the recorded calls. Buffer contents are kept.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Recorded draws in issue order.
    pub fn draws(&self) -> impl Iterator<Item = (Primitive, StreamKind, usize)> + '_ {
        self.calls.iter().filter_map(|c| match *c {
            SurfaceCall::Draw { primitive, stream, count } => Some((primitive, stream, count)),
            _ => None,
        })
    }

    #[inline]
    pub fn view(&self) -> ViewTransform {
        self.view
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn depth_test(&self) -> bool {
        self.depth_test
    }
}

impl DeviceSurface for RecordingSurface {
    fn replace(&mut self, slot: BufferSlot, bytes: &[u8], count: usize) {
        debug_assert_eq!(bytes.len(), count * slot.stride(), "replace: byte length mismatch");
        let buf = &mut self.buffers[slot.index()];
        buf.clear();
        buf.extend_from_slice(bytes);
        self.calls.push(SurfaceCall::Replace { slot, count });
    }

    fn write(&mut self, slot: BufferSlot, offset: u64, bytes: &[u8]) {
        let buf = &mut self.buffers[slot.index()];
        let start = offset as usize;
        let end = start + bytes.len();
        debug_assert!(
            end <= buf.len(),
            "partial write {start}..{end} past the end of {slot:?} ({} bytes)",
            buf.len()
        );
        let Some(dst) = buf.get_mut(start..end) else {
            log::warn!("partial write {start}..{end} outside {slot:?} ({} bytes); ignored", buf.len());
            return;
        };
        dst.copy_from_slice(bytes);
        self.calls.push(SurfaceCall::Write { slot, offset, len: bytes.len() });
    }

    fn draw(&mut self, primitive: Primitive, stream: StreamKind, count: usize) {
        self.calls.push(SurfaceCall::Draw { primitive, stream, count });
    }

    fn set_view(&mut self, view: ViewTransform) {
        self.view = view;
        self.calls.push(SurfaceCall::SetView(view));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.calls.push(SurfaceCall::SetViewport(viewport));
    }

    fn clear_depth(&mut self) {
        self.calls.push(SurfaceCall::ClearDepth);
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
        self.calls.push(SurfaceCall::DepthTest(enabled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Attribute;

    const SLOT: BufferSlot = BufferSlot::new(Attribute::Depth, StreamKind::Fill);

    #[test]
    fn write_patches_in_place() {
        let mut s = RecordingSurface::new();
        s.replace(SLOT, bytemuck::cast_slice(&[0.0f32, 1.0, 2.0]), 3);
        s.write(SLOT, 4, bytemuck::cast_slice(&[9.0f32]));
        assert_eq!(s.buffer(SLOT), bytemuck::cast_slice::<f32, u8>(&[0.0, 9.0, 2.0]));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "past the end")]
    fn write_past_end_panics_in_debug() {
        let mut s = RecordingSurface::new();
        s.replace(SLOT, bytemuck::cast_slice(&[0.0f32]), 1);
        s.write(SLOT, 4, bytemuck::cast_slice(&[1.0f32]));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn write_past_end_is_ignored_in_release() {
        let mut s = RecordingSurface::new();
        s.replace(SLOT, bytemuck::cast_slice(&[0.0f32]), 1);
        s.write(SLOT, 4, bytemuck::cast_slice(&[1.0f32]));
        assert_eq!(s.buffer(SLOT), bytemuck::cast_slice::<f32, u8>(&[0.0]));
        assert!(!s.calls().iter().any(|c| matches!(c, SurfaceCall::Write { .. })));
    }

    #[test]
    fn draws_filters_other_calls() {
        let mut s = RecordingSurface::new();
        s.clear_depth();
        s.draw(Primitive::LineList, StreamKind::Stroke, 4);
        assert_eq!(s.draws().collect::<Vec<_>>(), vec![(Primitive::LineList, StreamKind::Stroke, 4)]);
        assert_eq!(s.take_calls().len(), 2);
        assert!(s.calls().is_empty());
    }
}
