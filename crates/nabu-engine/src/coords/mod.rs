//! Coordinate and color types shared by the geometry core and the device layer.
//!
//! User space (what drawing calls receive):
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Stored vertex positions are Y-up (device convention); the shader maps them
//! back through the view transform and viewport uniform.

mod color;
mod vec2;
mod view;
mod viewport;

pub use color::ColorRgba;
pub use vec2::Vec2;
pub use view::ViewTransform;
pub use viewport::Viewport;
