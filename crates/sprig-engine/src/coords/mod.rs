//! Coordinate and geometry types shared by the renderer and game code.
//!
//! Canonical CPU space:
//! - Logical pixels (window pixels divided by the pixel scale)
//! - Origin top-left
//! - +X right, +Y down

mod color;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
