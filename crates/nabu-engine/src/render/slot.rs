use crate::geometry::{Attribute, StreamKind};

/// Address of one device buffer: `{Position, Color, Depth} × {Fill, Stroke}`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferSlot {
    pub attribute: Attribute,
    pub stream: StreamKind,
}

impl BufferSlot {
    pub const COUNT: usize = 6;

    pub const ALL: [BufferSlot; Self::COUNT] = [
        BufferSlot::new(Attribute::Position, StreamKind::Fill),
        BufferSlot::new(Attribute::Position, StreamKind::Stroke),
        BufferSlot::new(Attribute::Color, StreamKind::Fill),
        BufferSlot::new(Attribute::Color, StreamKind::Stroke),
        BufferSlot::new(Attribute::Depth, StreamKind::Fill),
        BufferSlot::new(Attribute::Depth, StreamKind::Stroke),
    ];

    #[inline]
    pub const fn new(attribute: Attribute, stream: StreamKind) -> Self {
        Self { attribute, stream }
    }

    /// Index into a `[_; BufferSlot::COUNT]` table; matches `ALL` order.
    #[inline]
    pub const fn index(self) -> usize {
        self.attribute.index() * 2 + self.stream.index()
    }

    #[inline]
    pub const fn stride(self) -> usize {
        self.attribute.stride()
    }

    pub(crate) const fn label(self) -> &'static str {
        match (self.attribute, self.stream) {
            (Attribute::Position, StreamKind::Fill) => "nabu fill position vbo",
            (Attribute::Position, StreamKind::Stroke) => "nabu stroke position vbo",
            (Attribute::Color, StreamKind::Fill) => "nabu fill color vbo",
            (Attribute::Color, StreamKind::Stroke) => "nabu stroke color vbo",
            (Attribute::Depth, StreamKind::Fill) => "nabu fill depth vbo",
            (Attribute::Depth, StreamKind::Stroke) => "nabu stroke depth vbo",
        }
    }
}

/// Primitive topology of a draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Primitive {
    TriangleList,
    LineList,
}

impl Primitive {
    #[inline]
    pub const fn for_stream(stream: StreamKind) -> Self {
        match stream {
            StreamKind::Fill => Primitive::TriangleList,
            StreamKind::Stroke => Primitive::LineList,
        }
    }
}

/// Vertices per stream currently held by the device buffers.
///
/// Partial writes are clipped to this count.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Residency([usize; 2]);

impl Residency {
    #[inline]
    pub const fn new(fill: usize, stroke: usize) -> Self {
        Self([fill, stroke])
    }

    #[inline]
    pub fn get(self, stream: StreamKind) -> usize {
        self.0[stream.index()]
    }

    #[inline]
    pub fn set(&mut self, stream: StreamKind, count: usize) {
        self.0[stream.index()] = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_indices_are_unique_and_match_all() {
        for (i, slot) in BufferSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn primitive_follows_stream() {
        assert_eq!(Primitive::for_stream(StreamKind::Fill), Primitive::TriangleList);
        assert_eq!(Primitive::for_stream(StreamKind::Stroke), Primitive::LineList);
    }
}
