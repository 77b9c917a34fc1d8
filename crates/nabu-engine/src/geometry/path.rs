use core::fmt;
use core::ops::Range;

use crate::coords::{ColorRgba, Vec2};

use super::{Shape, StreamKind, Vertex, VertexStream};

/// Identity of one path generation.
///
/// A fresh id is issued whenever the engine discards a path wholesale, so
/// shapes minted from the old path resolve as stale instead of aliasing new
/// geometry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PathId(u64);

impl PathId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Colors applied to newly appended vertices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Brush {
    pub fill: ColorRgba,
    pub stroke: ColorRgba,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            fill: ColorRgba::black(),
            stroke: ColorRgba::black(),
        }
    }
}

/// One stream plus its markers.
///
/// Invariant: `claimed <= committed <= stream.len()`.
#[derive(Debug, Clone, Default)]
struct Track {
    stream: VertexStream,
    /// First vertex still subject to rollback.
    committed: usize,
    /// First vertex not yet owned by an extracted shape.
    claimed: usize,
}

impl Track {
    fn rollback(&mut self) {
        self.stream.truncate(self.committed);
    }

    fn claim(&mut self) -> Range<usize> {
        let range = self.claimed..self.stream.len();
        self.claimed = self.stream.len();
        range
    }

    fn clear(&mut self) {
        self.stream.clear();
        self.committed = 0;
        self.claimed = 0;
    }
}

/// Path accumulator: turns move/line calls into a fill triangle list and a
/// stroke line list.
///
/// Fill uses a fan anchored at the first point of each subpath, rewritten as
/// independent triangles so the device only needs a triangle-list topology.
/// A subpath's first segment emits no fill; each later one writes a whole
/// triangle, so the fill stream is always a complete triangle list.
/// Filled polygons must therefore be star-shaped with respect to their first
/// point; anything else renders incorrectly (but safely).
///
/// Coordinates passed in are user space (+Y down); stored positions are
/// Y-up.
#[derive(Debug, Clone)]
pub struct Path {
    id: PathId,
    tracks: [Track; 2],

    /// Current point in user space. `None` until the first move/line.
    pen: Option<Vec2>,
    /// First point of the current subpath, user space.
    anchor: Vec2,
    /// Fill-emitting `line_to` calls in the current subpath.
    fan_len: u32,

    /// Depth assigned to the next appended vertex.
    depth: f32,
}

impl Path {
    pub fn new(id: PathId) -> Self {
        Self {
            id,
            tracks: Default::default(),
            pen: None,
            anchor: Vec2::zero(),
            fan_len: 0,
            depth: 0.0,
        }
    }

    #[inline]
    pub fn id(&self) -> PathId {
        self.id
    }

    /// Current point in user space.
    #[inline]
    pub fn pen(&self) -> Option<Vec2> {
        self.pen
    }

    /// Depth value the next appended vertex will carry.
    #[inline]
    pub fn depth(&self) -> f32 {
        self.depth
    }

    #[inline]
    pub fn stream(&self, kind: StreamKind) -> &VertexStream {
        &self.tracks[kind.index()].stream
    }

    #[inline]
    pub(crate) fn stream_mut(&mut self, kind: StreamKind) -> &mut VertexStream {
        &mut self.tracks[kind.index()].stream
    }

    #[inline]
    pub fn len(&self, kind: StreamKind) -> usize {
        self.stream(kind).len()
    }

    /// Index of the first uncommitted vertex of `kind`.
    #[inline]
    pub fn committed(&self, kind: StreamKind) -> usize {
        self.tracks[kind.index()].committed
    }

    /// Index of the first vertex of `kind` not yet claimed by a shape.
    #[inline]
    pub fn claimed(&self, kind: StreamKind) -> usize {
        self.tracks[kind.index()].claimed
    }

    /// Starts a new subpath at `to`. Appends nothing.
    pub fn move_to(&mut self, to: Vec2) {
        self.pen = Some(to);
        self.anchor = to;
        self.fan_len = 0;
    }

    /// Appends the segment from the pen to `to`.
    ///
    /// Without a current point this behaves like `move_to`.
    pub fn line_to(&mut self, to: Vec2, brush: &Brush) {
        let Some(from) = self.pen else {
            self.move_to(to);
            return;
        };

        // Closing back onto the anchor would only add a degenerate triangle.
        // The first segment of a subpath emits no fill: its triangle is
        // written whole by the second, so the fill stream never holds a
        // partial triangle, whichever way the subpath ends.
        if to != self.anchor {
            if self.fan_len > 0 {
                let anchor = self.anchor;
                self.push(StreamKind::Fill, anchor, brush.fill);
                self.push(StreamKind::Fill, from, brush.fill);
                self.push(StreamKind::Fill, to, brush.fill);
            }
            self.fan_len += 1;
        }

        // Stroke after fill so an outline wins the depth test against its own triangles.
        self.push(StreamKind::Stroke, from, brush.stroke);
        self.push(StreamKind::Stroke, to, brush.stroke);

        self.pen = Some(to);
    }

    /// Rolls both streams back to their commit markers and forgets the pen.
    pub fn begin_path(&mut self) {
        self.reset();
        self.pen = None;
        self.fan_len = 0;
    }

    /// Commits every pending vertex of `kind`.
    pub fn keep(&mut self, kind: StreamKind) {
        let track = &mut self.tracks[kind.index()];
        track.committed = track.stream.len();
    }

    /// Truncates both streams to their commit markers.
    pub fn reset(&mut self) {
        for track in &mut self.tracks {
            track.rollback();
        }
        self.debug_check();
    }

    /// Claims every committed vertex since the previous extraction.
    ///
    /// Uncommitted vertices are dropped first. With nothing pending the
    /// returned shape has empty ranges and claims nothing.
    pub fn get_shape(&mut self) -> Shape {
        self.reset();
        let [fill, stroke] = &mut self.tracks;
        let shape = Shape::new(self.id, fill.claim(), stroke.claim());
        log::debug!(
            "path {}: shape claimed fill {:?}, stroke {:?}",
            self.id,
            shape.range(StreamKind::Fill),
            shape.range(StreamKind::Stroke)
        );
        shape
    }

    /// Discards all geometry and markers and re-issues the path under `id`.
    ///
    /// Allocated capacity is kept.
    pub fn recycle(&mut self, id: PathId) {
        for track in &mut self.tracks {
            track.clear();
        }
        self.id = id;
        self.pen = None;
        self.anchor = Vec2::zero();
        self.fan_len = 0;
        self.depth = 0.0;
    }

    #[inline]
    pub fn reset_depth(&mut self) {
        self.depth = 0.0;
    }

    fn push(&mut self, kind: StreamKind, user: Vec2, color: ColorRgba) {
        let vertex = Vertex::new(user.flip_y(), color, self.depth);
        self.depth += 1.0;
        self.tracks[kind.index()].stream.push(vertex);
    }

    #[inline]
    fn debug_check(&self) {
        for track in &self.tracks {
            debug_assert!(
                track.claimed <= track.committed && track.committed <= track.stream.len(),
                "path markers out of order: claimed {} committed {} len {}",
                track.claimed,
                track.committed,
                track.stream.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Path {
        Path::new(PathId::new(1))
    }

    fn brush() -> Brush {
        Brush {
            fill: ColorRgba::new(1.0, 0.0, 0.0, 1.0),
            stroke: ColorRgba::new(0.0, 0.0, 1.0, 1.0),
        }
    }

    fn polygon(p: &mut Path, pts: &[(f32, f32)]) {
        let b = brush();
        p.move_to(Vec2::new(pts[0].0, pts[0].1));
        for &(x, y) in &pts[1..] {
            p.line_to(Vec2::new(x, y), &b);
        }
    }

    /// Regular k-gon around (50, 50); convex, so star-shaped from any vertex.
    fn regular(k: usize) -> Vec<(f32, f32)> {
        (0..k)
            .map(|i| {
                let t = i as f32 / k as f32 * std::f32::consts::TAU;
                (50.0 + 20.0 * t.cos(), 50.0 + 20.0 * t.sin())
            })
            .collect()
    }

    // ── fan triangulation ─────────────────────────────────────────────────

    #[test]
    fn fill_has_three_times_k_minus_two_vertices() {
        for k in 3..12 {
            let mut p = path();
            polygon(&mut p, &regular(k));
            p.keep(StreamKind::Fill);
            assert_eq!(p.len(StreamKind::Fill), 3 * (k - 2), "k = {k}");
        }
    }

    #[test]
    fn every_triangle_starts_at_the_anchor() {
        let pts = regular(7);
        let mut p = path();
        polygon(&mut p, &pts);
        let anchor = Vec2::new(pts[0].0, pts[0].1).flip_y().to_array();
        let fill = p.stream(StreamKind::Fill).positions();
        for tri in fill.chunks(3) {
            assert_eq!(tri.len(), 3);
            assert_eq!(tri[0], anchor);
        }
    }

    #[test]
    fn triangles_cover_consecutive_point_pairs() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let fill = p.stream(StreamKind::Fill).positions();
        assert_eq!(
            fill,
            &[
                [0.0, 0.0], [10.0, 0.0], [10.0, -10.0],
                [0.0, 0.0], [10.0, -10.0], [0.0, -10.0],
            ]
        );
    }

    #[test]
    fn closing_line_to_anchor_adds_stroke_only() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        assert_eq!(p.len(StreamKind::Fill), 6);
        assert_eq!(p.len(StreamKind::Stroke), 8);
    }

    #[test]
    fn move_to_starts_a_new_fan() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        polygon(&mut p, &[(20.0, 0.0), (30.0, 0.0), (30.0, 10.0)]);
        let fill = p.stream(StreamKind::Fill).positions();
        assert_eq!(fill.len(), 6);
        assert_eq!(fill[3], [20.0, 0.0]);
    }

    // ── stroke ────────────────────────────────────────────────────────────

    #[test]
    fn stroke_has_two_vertices_per_line_to() {
        for k in 1..10 {
            let mut p = path();
            let b = brush();
            p.move_to(Vec2::zero());
            for i in 0..k {
                p.line_to(Vec2::new(i as f32 + 1.0, (i % 2) as f32), &b);
            }
            assert_eq!(p.len(StreamKind::Stroke), 2 * k);
        }
    }

    #[test]
    fn stroke_segments_are_independent() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (5.0, 0.0)]);
        polygon(&mut p, &[(100.0, 100.0), (105.0, 100.0)]);
        let s = p.stream(StreamKind::Stroke).positions();
        assert_eq!(s, &[[0.0, 0.0], [5.0, 0.0], [100.0, -100.0], [105.0, -100.0]]);
    }

    #[test]
    fn colors_follow_the_brush() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        let b = brush();
        assert!(p.stream(StreamKind::Fill).colors().iter().all(|c| *c == b.fill.to_array()));
        assert!(p.stream(StreamKind::Stroke).colors().iter().all(|c| *c == b.stroke.to_array()));
    }

    #[test]
    fn line_to_without_pen_moves() {
        let mut p = path();
        p.line_to(Vec2::new(3.0, 4.0), &brush());
        assert_eq!(p.pen(), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(p.len(StreamKind::Stroke), 0);
        assert_eq!(p.len(StreamKind::Fill), 0);
    }

    // ── depth ─────────────────────────────────────────────────────────────

    #[test]
    fn depth_increases_across_both_streams() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        let mut all: Vec<f32> = p.stream(StreamKind::Fill).depths().to_vec();
        all.extend_from_slice(p.stream(StreamKind::Stroke).depths());
        all.sort_by(f32::total_cmp);
        let expected: Vec<f32> = (0..all.len()).map(|i| i as f32).collect();
        assert_eq!(all, expected);
        assert_eq!(p.depth(), all.len() as f32);
    }

    #[test]
    fn stroke_follows_the_triangle_it_closes() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        let fill_max = p.stream(StreamKind::Fill).depths().iter().copied().fold(0.0, f32::max);
        let last_segment = &p.stream(StreamKind::Stroke).depths()[2..];
        assert!(last_segment.iter().all(|&d| d > fill_max));
    }

    #[test]
    fn lone_segments_never_leave_partial_triangles() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (100.0, 0.0)]);
        polygon(&mut p, &[(10.0, 10.0), (20.0, 10.0), (20.0, 20.0)]);
        polygon(&mut p, &[(50.0, 50.0), (60.0, 50.0)]);
        p.keep(StreamKind::Fill);

        let fill = p.stream(StreamKind::Fill).positions();
        assert_eq!(fill.len() % 3, 0);
        assert_eq!(fill, &[[10.0, -10.0], [20.0, -10.0], [20.0, -20.0]]);
    }

    #[test]
    fn first_segment_emits_stroke_only() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (5.0, 0.0)]);
        assert_eq!(p.len(StreamKind::Fill), 0);
        assert_eq!(p.len(StreamKind::Stroke), 2);
    }

    // ── commit / rollback ─────────────────────────────────────────────────

    #[test]
    fn begin_path_restores_committed_lengths() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        p.keep(StreamKind::Fill);
        p.keep(StreamKind::Stroke);
        let (fill, stroke) = (p.len(StreamKind::Fill), p.len(StreamKind::Stroke));

        polygon(&mut p, &[(10.0, 0.0), (15.0, 0.0), (15.0, 5.0), (10.0, 5.0)]);
        assert!(p.len(StreamKind::Fill) > fill);
        p.begin_path();

        assert_eq!(p.len(StreamKind::Fill), fill);
        assert_eq!(p.len(StreamKind::Stroke), stroke);
        assert_eq!(p.pen(), None);
    }

    #[test]
    fn keep_is_per_stream() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        p.keep(StreamKind::Fill);
        p.begin_path();
        assert_eq!(p.len(StreamKind::Fill), 3);
        assert_eq!(p.len(StreamKind::Stroke), 0);
    }

    #[test]
    fn recycle_clears_everything() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        p.keep(StreamKind::Fill);
        p.recycle(PathId::new(9));
        assert_eq!(p.id(), PathId::new(9));
        assert_eq!(p.len(StreamKind::Fill), 0);
        assert_eq!(p.committed(StreamKind::Fill), 0);
        assert_eq!(p.depth(), 0.0);
    }

    // ── shape extraction ──────────────────────────────────────────────────

    #[test]
    fn get_shape_claims_committed_vertices_only() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        p.keep(StreamKind::Fill);
        let s = p.get_shape();
        assert_eq!(s.range(StreamKind::Fill), 0..3);
        // Stroke was never kept, so the uncommitted tail was dropped.
        assert_eq!(s.range(StreamKind::Stroke), 0..0);
        assert_eq!(p.len(StreamKind::Stroke), 0);
    }

    #[test]
    fn get_shape_twice_returns_empty_second_shape() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        p.keep(StreamKind::Fill);
        p.keep(StreamKind::Stroke);
        let first = p.get_shape();
        let second = p.get_shape();
        assert!(!first.is_empty());
        assert!(second.is_empty());
        assert_eq!(second.range(StreamKind::Fill), 3..3);
        assert_eq!(p.claimed(StreamKind::Fill), 3);
    }

    #[test]
    fn successive_shapes_are_disjoint_and_contiguous() {
        let mut p = path();
        polygon(&mut p, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        p.keep(StreamKind::Fill);
        let a = p.get_shape();
        p.begin_path();
        polygon(&mut p, &[(10.0, 0.0), (15.0, 0.0), (15.0, 5.0), (10.0, 5.0)]);
        p.keep(StreamKind::Fill);
        let b = p.get_shape();
        assert_eq!(a.range(StreamKind::Fill).end, b.range(StreamKind::Fill).start);
        assert_eq!(b.range(StreamKind::Fill), 3..9);
    }
}
