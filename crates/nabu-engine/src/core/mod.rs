//! Contract between the window runtime and the application.
//!
//! The runtime owns the window and the [`Gpu`](crate::device::Gpu); the
//! application sees them only through [`FrameCtx`] once per frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
