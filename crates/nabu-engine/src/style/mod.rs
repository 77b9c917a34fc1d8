//! Style strings to RGBA.
//!
//! [`ColorResolver`] is the pure conversion; [`StyleCache`] memoizes it with an
//! explicit capacity so a drawing sequence never re-parses a style it has
//! already seen.

mod cache;
mod resolver;

pub use cache::StyleCache;
pub use resolver::{ColorResolver, CssColorResolver};
