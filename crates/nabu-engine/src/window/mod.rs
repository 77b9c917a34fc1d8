//! Window and event loop.
//!
//! Owns the winit `EventLoop` and a single window, and wires them to the GPU
//! layer and the [`App`](crate::core::App).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
