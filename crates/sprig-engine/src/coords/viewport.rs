/// Viewport size in logical pixels.
///
/// The projection maps `(0, 0)..(width, height)` onto the whole surface.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Logical viewport for a surface of `width` x `height` physical pixels,
    /// with every logical pixel drawn as a `pixel_scale` square.
    pub fn from_surface(width: u32, height: u32, pixel_scale: u32) -> Self {
        let scale = pixel_scale.max(1) as f32;
        Self::new(width as f32 / scale, height as f32 / scale)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}
