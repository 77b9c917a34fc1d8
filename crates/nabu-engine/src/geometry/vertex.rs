use core::fmt;
use core::str::FromStr;

use crate::coords::{ColorRgba, Vec2};
use crate::error::GeometryError;

/// One appended vertex.
///
/// `position` is in stored (Y-up) space. `depth` is the submission counter at
/// append time.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec2,
    pub color: ColorRgba,
    pub depth: f32,
}

impl Vertex {
    #[inline]
    pub const fn new(position: Vec2, color: ColorRgba, depth: f32) -> Self {
        Self { position, color, depth }
    }
}

/// Which of a path's two streams an operation addresses.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StreamKind {
    /// Triangle list.
    Fill,
    /// Independent line segments.
    Stroke,
}

impl StreamKind {
    pub const ALL: [StreamKind; 2] = [StreamKind::Fill, StreamKind::Stroke];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            StreamKind::Fill => 0,
            StreamKind::Stroke => 1,
        }
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            StreamKind::Fill => "fill",
            StreamKind::Stroke => "stroke",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamKind {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fill" => Ok(StreamKind::Fill),
            "stroke" => Ok(StreamKind::Stroke),
            other => Err(GeometryError::invalid_argument(format!(
                "unknown target {other:?}, expected \"fill\" or \"stroke\""
            ))),
        }
    }
}

/// Per-vertex attribute held in its own parallel array and device buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Attribute {
    Position,
    Color,
    Depth,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Position, Attribute::Color, Attribute::Depth];

    /// Number of `f32` components per vertex.
    #[inline]
    pub const fn components(self) -> usize {
        match self {
            Attribute::Position => 2,
            Attribute::Color => 4,
            Attribute::Depth => 1,
        }
    }

    /// Bytes per vertex.
    #[inline]
    pub const fn stride(self) -> usize {
        self.components() * core::mem::size_of::<f32>()
    }

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Attribute::Position => 0,
            Attribute::Color => 1,
            Attribute::Depth => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_kind_parses_known_tags() {
        assert_eq!("fill".parse::<StreamKind>(), Ok(StreamKind::Fill));
        assert_eq!("stroke".parse::<StreamKind>(), Ok(StreamKind::Stroke));
    }

    #[test]
    fn stream_kind_rejects_unknown_tag() {
        let err = "both".parse::<StreamKind>().unwrap_err();
        assert!(matches!(err, GeometryError::InvalidArgument(_)));
    }

    #[test]
    fn attribute_strides_match_f32_layout() {
        assert_eq!(Attribute::Position.stride(), 8);
        assert_eq!(Attribute::Color.stride(), 16);
        assert_eq!(Attribute::Depth.stride(), 4);
    }
}
