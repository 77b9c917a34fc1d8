//! Nabu engine crate.
//!
//! Retained-mode 2D vector geometry: paths are tessellated on the CPU into
//! fill and stroke vertex streams, committed regions become editable shapes,
//! and edits reach the GPU as partial buffer writes.
//!
//! The platform pieces (`device`, `window`, `core`, `time`) host the engine in
//! a winit window for the studio binary.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod geometry;
pub mod render;
pub mod style;
pub mod canvas;

mod error;

pub use canvas::{EngineConfig, GeometryEngine, Mode};
pub use error::{GeometryError, Result};
