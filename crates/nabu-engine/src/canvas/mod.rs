//! Drawing-call surface and the immediate/retained mode controller.

mod config;
mod engine;

pub use config::{EngineConfig, Mode};
pub use engine::GeometryEngine;
