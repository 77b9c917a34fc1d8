/// Pan/zoom applied at display time.
///
/// A user-space point `p` lands at `(p - origin) * zoom` logical pixels from
/// the top-left of the viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewTransform {
    pub origin_x: f32,
    pub origin_y: f32,
    pub zoom: f32,
}

impl ViewTransform {
    #[inline]
    pub const fn new(origin_x: f32, origin_y: f32, zoom: f32) -> Self {
        Self { origin_x, origin_y, zoom }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.origin_x.is_finite() && self.origin_y.is_finite() && self.zoom.is_finite() && self.zoom > 0.0
    }

    /// Returns a copy panned by `(dx, dy)` screen pixels at the current zoom.
    #[inline]
    pub fn panned(self, dx: f32, dy: f32) -> Self {
        Self::new(self.origin_x - dx / self.zoom, self.origin_y - dy / self.zoom, self.zoom)
    }

    /// Returns a copy zoomed by `factor` around the screen point `(sx, sy)`.
    ///
    /// The user-space point under `(sx, sy)` stays fixed.
    pub fn zoomed_at(self, factor: f32, sx: f32, sy: f32) -> Self {
        let zoom = (self.zoom * factor).clamp(0.01, 100.0);
        let ux = self.origin_x + sx / self.zoom;
        let uy = self.origin_y + sy / self.zoom;
        Self::new(ux - sx / zoom, uy - sy / zoom, zoom)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panned_moves_origin_against_drag() {
        let v = ViewTransform::new(0.0, 0.0, 2.0).panned(10.0, -4.0);
        assert_eq!(v.origin_x, -5.0);
        assert_eq!(v.origin_y, 2.0);
    }

    #[test]
    fn zoomed_at_keeps_anchor_fixed() {
        let v = ViewTransform::new(10.0, 20.0, 1.0);
        let z = v.zoomed_at(2.0, 100.0, 50.0);
        // User point under (100, 50) before: (110, 70).
        assert!((z.origin_x + 100.0 / z.zoom - 110.0).abs() < 1e-4);
        assert!((z.origin_y + 50.0 / z.zoom - 70.0).abs() < 1e-4);
        assert_eq!(z.zoom, 2.0);
    }

    #[test]
    fn zero_zoom_is_invalid() {
        assert!(!ViewTransform::new(0.0, 0.0, 0.0).is_valid());
        assert!(ViewTransform::identity().is_valid());
    }
}
