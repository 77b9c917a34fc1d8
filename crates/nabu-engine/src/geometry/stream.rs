use core::ops::Range;

use crate::coords::{ColorRgba, Vec2};

use super::{Attribute, Vertex};

/// Growable parallel-array vertex store.
///
/// Invariant: `positions`, `colors` and `depths` always have the same length.
/// Each array is laid out exactly as the matching device buffer expects, so
/// byte views can be handed to the device surface without repacking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexStream {
    positions: Vec<[f32; 2]>,
    colors: Vec<[f32; 4]>,
    depths: Vec<f32>,
}

impl VertexStream {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn push(&mut self, v: Vertex) {
        self.positions.push(v.position.to_array());
        self.colors.push(v.color.to_array());
        self.depths.push(v.depth);
    }

    /// Drops every vertex at or after `len`. Keeps allocated capacity.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.positions.truncate(len);
        self.colors.truncate(len);
        self.depths.truncate(len);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        Some(Vertex::new(
            Vec2::from_array(*self.positions.get(index)?),
            ColorRgba::from_array(*self.colors.get(index)?),
            *self.depths.get(index)?,
        ))
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 2]] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    #[inline]
    pub fn depths(&self) -> &[f32] {
        &self.depths
    }

    #[inline]
    pub(crate) fn positions_mut(&mut self) -> &mut [[f32; 2]] {
        &mut self.positions
    }

    #[inline]
    pub(crate) fn colors_mut(&mut self) -> &mut [[f32; 4]] {
        &mut self.colors
    }

    /// Raw bytes of one attribute array.
    pub fn attribute_bytes(&self, attr: Attribute) -> &[u8] {
        match attr {
            Attribute::Position => bytemuck::cast_slice(&self.positions),
            Attribute::Color => bytemuck::cast_slice(&self.colors),
            Attribute::Depth => bytemuck::cast_slice(&self.depths),
        }
    }

    /// Byte sub-range of one attribute covering `vertices`.
    ///
    /// `vertices` must lie within `0..len()`.
    pub fn attribute_byte_range(&self, attr: Attribute, vertices: Range<usize>) -> &[u8] {
        let stride = attr.stride();
        &self.attribute_bytes(attr)[vertices.start * stride..vertices.end * stride]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32, depth: f32) -> Vertex {
        Vertex::new(Vec2::new(x, y), ColorRgba::white(), depth)
    }

    #[test]
    fn push_keeps_arrays_parallel() {
        let mut s = VertexStream::new();
        s.push(v(1.0, 2.0, 0.0));
        s.push(v(3.0, 4.0, 1.0));
        assert_eq!(s.len(), 2);
        assert_eq!(s.colors().len(), 2);
        assert_eq!(s.depths(), &[0.0, 1.0]);
        assert_eq!(s.vertex(1), Some(v(3.0, 4.0, 1.0)));
        assert_eq!(s.vertex(2), None);
    }

    #[test]
    fn truncate_shortens_every_array() {
        let mut s = VertexStream::new();
        for i in 0..5 {
            s.push(v(i as f32, 0.0, i as f32));
        }
        s.truncate(2);
        assert_eq!(s.len(), 2);
        assert_eq!(s.colors().len(), 2);
        assert_eq!(s.depths().len(), 2);
    }

    #[test]
    fn byte_range_uses_attribute_stride() {
        let mut s = VertexStream::new();
        for i in 0..4 {
            s.push(v(i as f32, 0.0, i as f32));
        }
        assert_eq!(s.attribute_bytes(Attribute::Position).len(), 4 * 8);
        let depth = s.attribute_byte_range(Attribute::Depth, 1..3);
        assert_eq!(depth, bytemuck::cast_slice::<f32, u8>(&[1.0, 2.0]));
        let pos = s.attribute_byte_range(Attribute::Position, 2..3);
        assert_eq!(pos, bytemuck::cast_slice::<f32, u8>(&[2.0, 0.0]));
    }
}
