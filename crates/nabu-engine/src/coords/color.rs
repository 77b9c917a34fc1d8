/// Straight-alpha RGBA color with components in `[0, 1]`.
///
/// This is the resolved form of a style string and the per-vertex color the
/// device surface blends with straight alpha.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    /// Fully transparent black, the color `Shape::hide` writes.
    #[inline]
    pub const fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Creates a color from sRGB bytes (`0`–`255`), as produced by hex literals.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub const fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Clamps all channels to `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_srgb_u8_scales_to_unit_range() {
        let c = ColorRgba::from_srgb_u8(255, 0, 51, 255);
        assert_eq!(c, ColorRgba::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn clamped_limits_every_channel() {
        let c = ColorRgba::new(-1.0, 2.0, 0.5, 1.5).clamped();
        assert_eq!(c, ColorRgba::new(0.0, 1.0, 0.5, 1.0));
    }

    #[test]
    fn array_round_trip() {
        let c = ColorRgba::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(ColorRgba::from_array(c.to_array()), c);
    }
}
