//! Frame timing.
//!
//! One [`FrameClock`] per render loop; `tick()` once per presented frame.
//! Animation code (the studio's moving shape) scales by [`FrameTime::dt`].

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
