use core::ops::Range;

use crate::coords::ColorRgba;
use crate::error::{GeometryError, Result};
use crate::render::{BufferSlot, DeviceSurface, Residency};

use super::{Attribute, Path, PathId, StreamKind};

/// Handle over a committed, contiguous slice of a path's fill and stroke
/// streams.
///
/// A shape owns no vertices. It is resolved through the engine that produced
/// it (`GeometryEngine::shape`), which rejects it once its path is gone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    path: PathId,
    fill: Range<usize>,
    stroke: Range<usize>,
}

impl Shape {
    pub(crate) fn new(path: PathId, fill: Range<usize>, stroke: Range<usize>) -> Self {
        Self { path, fill, stroke }
    }

    #[inline]
    pub fn path_id(&self) -> PathId {
        self.path
    }

    #[inline]
    pub fn range(&self, kind: StreamKind) -> Range<usize> {
        match kind {
            StreamKind::Fill => self.fill.clone(),
            StreamKind::Stroke => self.stroke.clone(),
        }
    }

    /// True when the shape claimed no vertices in either stream.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fill.is_empty() && self.stroke.is_empty()
    }
}

/// A shape resolved against its path and the device surface.
///
/// Every edit rewrites only the shape's vertices and then issues one partial
/// device write per touched attribute, restricted to the shape's byte range.
/// Bytes past what the device currently holds are left for the next full
/// upload.
pub struct ShapeMut<'a> {
    shape: Shape,
    path: &'a mut Path,
    surface: &'a mut dyn DeviceSurface,
    resident: Residency,
}

impl<'a> ShapeMut<'a> {
    pub(crate) fn resolve(
        shape: &Shape,
        path: &'a mut Path,
        surface: &'a mut dyn DeviceSurface,
        resident: Residency,
    ) -> Result<Self> {
        if shape.path != path.id() {
            return Err(GeometryError::StaleShape {
                shape: shape.path,
                current: path.id(),
            });
        }

        for kind in StreamKind::ALL {
            let range = shape.range(kind);
            let len = path.len(kind);
            if range.start > range.end || range.end > len {
                return Err(GeometryError::InvalidRange { stream: kind, range, len });
            }
        }

        Ok(Self {
            shape: shape.clone(),
            path,
            surface,
            resident,
        })
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Translates positions by `(dx, dy)` user-space pixels.
    ///
    /// Stored positions are Y-up, so the stored offset is `(dx, -dy)`.
    /// `target = None` moves both fill and stroke.
    pub fn move_by(&mut self, dx: f32, dy: f32, target: Option<StreamKind>) -> Result<()> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(GeometryError::invalid_argument(format!(
                "non-finite offset ({dx}, {dy})"
            )));
        }

        for &kind in targets(target) {
            let range = self.shape.range(kind);
            for p in &mut self.path.stream_mut(kind).positions_mut()[range] {
                p[0] += dx;
                p[1] -= dy;
            }
            self.sync(kind, Attribute::Position);
        }
        Ok(())
    }

    /// Overwrites every color of one stream's range.
    pub fn recolor(&mut self, color: ColorRgba, target: StreamKind) -> Result<()> {
        if !color.is_finite() {
            return Err(GeometryError::invalid_argument(format!("non-finite color {color:?}")));
        }
        self.paint(color.clamped(), target);
        Ok(())
    }

    /// Recolors both ranges to transparent. Occupancy is unchanged, so the
    /// shape can be shown again with `recolor`.
    pub fn hide(&mut self) {
        for kind in StreamKind::ALL {
            self.paint(ColorRgba::transparent(), kind);
        }
    }

    /// Re-sends every attribute of both ranges from the CPU arrays.
    pub fn geometrize(&mut self) {
        for kind in StreamKind::ALL {
            for attr in Attribute::ALL {
                self.sync(kind, attr);
            }
        }
    }

    fn paint(&mut self, color: ColorRgba, kind: StreamKind) {
        let range = self.shape.range(kind);
        let rgba = color.to_array();
        self.path.stream_mut(kind).colors_mut()[range].fill(rgba);
        self.sync(kind, Attribute::Color);
    }

    fn sync(&mut self, kind: StreamKind, attr: Attribute) {
        let range = self.shape.range(kind);
        let end = range.end.min(self.resident.get(kind));
        if range.start >= end {
            if !range.is_empty() {
                log::debug!("{kind} range {range:?} not resident yet; deferred to next upload");
            }
            return;
        }

        let bytes = self.path.stream(kind).attribute_byte_range(attr, range.start..end);
        let offset = (range.start * attr.stride()) as u64;
        self.surface.write(BufferSlot::new(attr, kind), offset, bytes);
    }
}

fn targets(target: Option<StreamKind>) -> &'static [StreamKind] {
    match target {
        None => &StreamKind::ALL,
        Some(StreamKind::Fill) => &[StreamKind::Fill],
        Some(StreamKind::Stroke) => &[StreamKind::Stroke],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::geometry::Brush;
    use crate::render::{RecordingSurface, SurfaceCall};

    fn square(p: &mut Path, x: f32) {
        let b = Brush::default();
        p.begin_path();
        p.move_to(Vec2::new(x, 0.0));
        p.line_to(Vec2::new(x + 10.0, 0.0), &b);
        p.line_to(Vec2::new(x + 10.0, 10.0), &b);
        p.line_to(Vec2::new(x, 10.0), &b);
        p.line_to(Vec2::new(x, 0.0), &b);
        p.keep(StreamKind::Fill);
        p.keep(StreamKind::Stroke);
    }

    /// Surface holding a full upload of both streams.
    fn uploaded(p: &Path) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        for slot in BufferSlot::ALL {
            let stream = p.stream(slot.stream);
            surface.replace(slot, stream.attribute_bytes(slot.attribute), stream.len());
        }
        surface
    }

    fn resident(p: &Path) -> Residency {
        Residency::new(p.len(StreamKind::Fill), p.len(StreamKind::Stroke))
    }

    #[test]
    fn stale_path_id_is_rejected() {
        let mut p = Path::new(PathId::new(1));
        square(&mut p, 0.0);
        let shape = p.get_shape();
        p.recycle(PathId::new(2));
        let mut surface = RecordingSurface::new();
        let err = ShapeMut::resolve(&shape, &mut p, &mut surface, Residency::default())
            .err()
            .unwrap();
        assert!(matches!(err, GeometryError::StaleShape { .. }));
    }

    #[test]
    fn out_of_bounds_range_is_rejected() {
        let mut p = Path::new(PathId::new(1));
        let shape = Shape::new(PathId::new(1), 0..3, 0..0);
        let mut surface = RecordingSurface::new();
        let err = ShapeMut::resolve(&shape, &mut p, &mut surface, Residency::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            GeometryError::InvalidRange { stream: StreamKind::Fill, len: 0, .. }
        ));
    }

    #[test]
    fn move_only_touches_the_shape_range() {
        let mut p = Path::new(PathId::new(1));
        square(&mut p, 0.0);
        let first = p.get_shape();
        square(&mut p, 50.0);
        let _second = p.get_shape();
        let before: Vec<[f32; 2]> = p.stream(StreamKind::Fill).positions().to_vec();

        let mut surface = uploaded(&p);
        let res = resident(&p);
        let mut edit = ShapeMut::resolve(&first, &mut p, &mut surface, res).unwrap();
        edit.move_by(1.0, 2.0, Some(StreamKind::Fill)).unwrap();

        let after = p.stream(StreamKind::Fill).positions();
        for i in 0..6 {
            assert_eq!(after[i], [before[i][0] + 1.0, before[i][1] - 2.0]);
        }
        assert_eq!(&after[6..], &before[6..]);

        let slot = BufferSlot::new(Attribute::Position, StreamKind::Fill);
        assert_eq!(surface.buffer(slot), p.stream(StreamKind::Fill).attribute_bytes(Attribute::Position));
        assert_eq!(surface.calls().len(), BufferSlot::COUNT + 1);
    }

    #[test]
    fn move_both_streams_patches_each_once() {
        let mut p = Path::new(PathId::new(1));
        square(&mut p, 0.0);
        let shape = p.get_shape();
        let mut surface = uploaded(&p);
        surface.take_calls();

        let res = resident(&p);
        let mut edit = ShapeMut::resolve(&shape, &mut p, &mut surface, res).unwrap();
        edit.move_by(-4.0, 3.0, None).unwrap();

        let writes: Vec<_> = surface
            .calls()
            .iter()
            .map(|c| match c {
                SurfaceCall::Write { slot, .. } => *slot,
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        assert_eq!(
            writes,
            vec![
                BufferSlot::new(Attribute::Position, StreamKind::Fill),
                BufferSlot::new(Attribute::Position, StreamKind::Stroke),
            ]
        );
        for kind in StreamKind::ALL {
            let slot = BufferSlot::new(Attribute::Position, kind);
            assert_eq!(surface.buffer(slot), p.stream(kind).attribute_bytes(Attribute::Position));
        }
    }

    #[test]
    fn non_resident_range_is_not_written() {
        let mut p = Path::new(PathId::new(1));
        square(&mut p, 0.0);
        let shape = p.get_shape();
        let mut surface = RecordingSurface::new();
        let mut edit =
            ShapeMut::resolve(&shape, &mut p, &mut surface, Residency::default()).unwrap();
        edit.hide();
        assert!(surface.calls().is_empty());
        assert!(p.stream(StreamKind::Fill).colors().iter().all(|c| *c == [0.0; 4]));
    }

    #[test]
    fn non_finite_offset_fails_fast() {
        let mut p = Path::new(PathId::new(1));
        square(&mut p, 0.0);
        let shape = p.get_shape();
        let mut surface = RecordingSurface::new();
        let mut edit =
            ShapeMut::resolve(&shape, &mut p, &mut surface, Residency::default()).unwrap();
        assert!(matches!(
            edit.move_by(f32::NAN, 0.0, None),
            Err(GeometryError::InvalidArgument(_))
        ));
    }
}
