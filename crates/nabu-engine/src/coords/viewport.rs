/// Viewport size in logical pixels.
///
/// Uploaded as a uniform; the vertex shader divides by it to reach NDC.
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

    /// Converts a physical pixel size to logical pixels.
    #[inline]
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new((width as f64 / scale) as f32, (height as f64 / scale) as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_physical_divides_by_scale() {
        assert_eq!(Viewport::from_physical(1600, 1200, 2.0), Viewport::new(800.0, 600.0));
    }

    #[test]
    fn from_physical_ignores_bogus_scale() {
        assert_eq!(Viewport::from_physical(100, 50, 0.0), Viewport::new(100.0, 50.0));
    }

    #[test]
    fn zero_area_is_invalid() {
        assert!(!Viewport::new(0.0, 10.0).is_valid());
        assert!(Viewport::new(1.0, 1.0).is_valid());
    }
}
