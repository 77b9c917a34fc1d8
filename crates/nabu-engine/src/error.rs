use std::fmt;
use std::ops::Range;

use crate::geometry::{PathId, StreamKind};

/// Errors raised by the geometry core.
///
/// All variants are programmer errors surfaced at the call boundary; none are
/// retried internally.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Bad argument: unknown stream tag, non-finite coordinate, malformed style.
    InvalidArgument(String),
    /// A shape range is reversed or exceeds the stream it addresses.
    InvalidRange {
        stream: StreamKind,
        range: Range<usize>,
        len: usize,
    },
    /// The shape belongs to a path that has since been cleared.
    StaleShape { shape: PathId, current: PathId },
}

impl GeometryError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::InvalidRange { stream, range, len } => write!(
                f,
                "invalid {stream} range {}..{} (stream holds {len} vertices)",
                range.start, range.end
            ),
            Self::StaleShape { shape, current } => write!(
                f,
                "stale shape: it belongs to path {shape}, the active path is {current}"
            ),
        }
    }
}

impl std::error::Error for GeometryError {}

pub type Result<T> = std::result::Result<T, GeometryError>;
