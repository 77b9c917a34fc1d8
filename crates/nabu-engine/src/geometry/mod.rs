//! CPU-side geometry: vertex streams, the path tessellator, and shape handles.
//!
//! Responsibilities:
//! - accumulate fill (triangle list) and stroke (line list) vertices
//! - track commit and shape-claim markers per stream
//! - mutate committed shape ranges in place and patch the matching device bytes

mod path;
mod shape;
mod stream;
mod vertex;

pub use path::{Brush, Path, PathId};
pub use shape::{Shape, ShapeMut};
pub use stream::VertexStream;
pub use vertex::{Attribute, StreamKind, Vertex};
