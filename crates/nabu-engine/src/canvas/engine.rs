use crate::coords::{ColorRgba, Vec2, Viewport, ViewTransform};
use crate::error::{GeometryError, Result};
use crate::geometry::{Attribute, Brush, Path, PathId, Shape, ShapeMut, StreamKind};
use crate::render::{BufferSlot, DeviceSurface, Primitive, Residency};
use crate::style::{ColorResolver, CssColorResolver, StyleCache};

use super::{EngineConfig, Mode};

/// Canvas-style drawing surface over a [`DeviceSurface`].
///
/// Drawing calls feed the active [`Path`]. What `fill`/`stroke` do depends on
/// the [`Mode`]:
///
/// | call         | Immediate                         | Retained                            |
/// |--------------|-----------------------------------|-------------------------------------|
/// | `begin_path` | discard the path, reset depth     | roll back to the last commit        |
/// | `fill`       | upload fill stream, draw, reset depth | commit the fill stream          |
/// | `stroke`     | upload stroke stream, draw, reset depth | commit the stroke stream      |
/// | `clear`      | no-op                             | discard all geometry, reset depth   |
/// | `display`    | no-op                             | upload, draw fill then stroke, clear depth |
///
/// Immediate mode draws without a depth test, in the exact order `fill` and
/// `stroke` are called. Retained mode enables a `LessEqual` depth test so the
/// append-order depth counter restores paint order across commits.
///
/// The engine exclusively owns its surface.
pub struct GeometryEngine<S: DeviceSurface> {
    mode: Mode,
    surface: S,

    path: Path,
    next_path_id: u64,

    brush: Brush,
    styles: StyleCache,
    resolver: Box<dyn ColorResolver>,

    /// Vertices per stream the device buffers currently hold.
    resident: Residency,

    arc_segments: u32,
}

impl<S: DeviceSurface> GeometryEngine<S> {
    /// Creates an engine using [`CssColorResolver`].
    pub fn new(config: EngineConfig, surface: S) -> Result<Self> {
        Self::with_resolver(config, surface, Box::new(CssColorResolver))
    }

    pub fn with_resolver(
        config: EngineConfig,
        surface: S,
        resolver: Box<dyn ColorResolver>,
    ) -> Result<Self> {
        if config.arc_segments == 0 {
            return Err(GeometryError::invalid_argument("arc_segments must be at least 1"));
        }

        let mut styles = StyleCache::new(config.style_cache_capacity);
        let brush = Brush {
            fill: styles.resolve(resolver.as_ref(), &config.fill_style)?,
            stroke: styles.resolve(resolver.as_ref(), &config.stroke_style)?,
        };

        let mut engine = Self {
            mode: config.mode,
            surface,
            path: Path::new(PathId::new(0)),
            next_path_id: 1,
            brush,
            styles,
            resolver,
            resident: Residency::default(),
            arc_segments: config.arc_segments,
        };
        engine.surface.set_depth_test(engine.mode == Mode::Retained);

        log::debug!("geometry engine created in {:?} mode", engine.mode);
        Ok(engine)
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn brush(&self) -> Brush {
        self.brush
    }

    #[inline]
    pub fn style_cache(&self) -> &StyleCache {
        &self.styles
    }

    #[inline]
    pub fn resident(&self) -> Residency {
        self.resident
    }

    // ── styles ────────────────────────────────────────────────────────────

    /// Sets the fill color from a style string. On error the brush is unchanged.
    pub fn set_fill_style(&mut self, spec: &str) -> Result<()> {
        self.brush.fill = self.styles.resolve(self.resolver.as_ref(), spec)?;
        Ok(())
    }

    /// Sets the stroke color from a style string. On error the brush is unchanged.
    pub fn set_stroke_style(&mut self, spec: &str) -> Result<()> {
        self.brush.stroke = self.styles.resolve(self.resolver.as_ref(), spec)?;
        Ok(())
    }

    #[inline]
    pub fn set_fill_color(&mut self, color: ColorRgba) {
        self.brush.fill = color.clamped();
    }

    #[inline]
    pub fn set_stroke_color(&mut self, color: ColorRgba) {
        self.brush.stroke = color.clamped();
    }

    // ── path building ─────────────────────────────────────────────────────

    pub fn begin_path(&mut self) {
        match self.mode {
            Mode::Immediate => {
                let id = self.alloc_path_id();
                self.path.recycle(id);
            }
            Mode::Retained => self.path.begin_path(),
        }
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> Result<()> {
        let p = finite_point(x, y)?;
        self.path.move_to(p);
        Ok(())
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> Result<()> {
        let p = finite_point(x, y)?;
        self.path.line_to(p, &self.brush);
        Ok(())
    }

    pub fn fill(&mut self) {
        self.finish(StreamKind::Fill);
    }

    pub fn stroke(&mut self) {
        self.finish(StreamKind::Stroke);
    }

    /// Begins a path, traces the rectangle (closing back to the start) and fills it.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        finite_point(x, y)?;
        finite_point(w, h)?;

        self.begin_path();
        self.move_to(x, y)?;
        self.line_to(x + w, y)?;
        self.line_to(x + w, y + h)?;
        self.line_to(x, y + h)?;
        self.line_to(x, y)?;
        self.fill();
        Ok(())
    }

    /// Appends a polyline approximation of a circular arc: `segments + 1`
    /// points from `start` to `end` radians (clockwise on screen for
    /// increasing angles).
    ///
    /// The first point is a `line_to` when the path has a current point,
    /// otherwise a `move_to`. `segments = None` uses the configured default.
    pub fn arc(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        start: f32,
        end: f32,
        segments: Option<u32>,
    ) -> Result<()> {
        finite_point(x, y)?;
        finite_point(start, end)?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeometryError::invalid_argument(format!(
                "arc radius must be finite and non-negative, got {radius}"
            )));
        }
        let n = segments.unwrap_or(self.arc_segments);
        if n == 0 {
            return Err(GeometryError::invalid_argument("arc needs at least one segment"));
        }

        let sweep = end - start;
        for i in 0..=n {
            let t = start + sweep * (i as f32 / n as f32);
            let p = Vec2::new(x + radius * t.cos(), y + radius * t.sin());
            if i == 0 && self.path.pen().is_none() {
                self.path.move_to(p);
            } else {
                self.path.line_to(p, &self.brush);
            }
        }
        Ok(())
    }

    // ── retained picture ──────────────────────────────────────────────────

    /// Discards all retained geometry. Shapes from before become stale.
    ///
    /// No-op in immediate mode.
    pub fn clear(&mut self) {
        if self.mode == Mode::Immediate {
            return;
        }
        let id = self.alloc_path_id();
        self.path.recycle(id);
        self.resident = Residency::default();
        log::debug!("retained geometry cleared; active path {id}");
    }

    /// Draws every committed vertex under `view`.
    ///
    /// With `skip_geometry` the device buffers are reused as they are (shape
    /// edits already patched them); otherwise both streams are re-uploaded
    /// first. The depth buffer is cleared after the draws so the next pass
    /// starts fresh. No-op in immediate mode.
    pub fn display(&mut self, view: ViewTransform, skip_geometry: bool) -> Result<()> {
        if self.mode == Mode::Immediate {
            return Ok(());
        }
        if !view.is_valid() {
            return Err(GeometryError::invalid_argument(format!("invalid view transform {view:?}")));
        }

        self.surface.set_view(view);
        if !skip_geometry {
            for kind in StreamKind::ALL {
                self.upload(kind);
            }
        }
        for kind in StreamKind::ALL {
            let count = self.resident.get(kind).min(self.path.committed(kind));
            self.surface.draw(Primitive::for_stream(kind), kind, count);
        }
        self.surface.clear_depth();
        Ok(())
    }

    /// Forwards a new logical viewport size to the device.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            log::warn!("ignoring invalid viewport {viewport:?}");
            return;
        }
        self.surface.set_viewport(viewport);
    }

    // ── shapes ────────────────────────────────────────────────────────────

    /// Claims all geometry committed since the previous call.
    ///
    /// Uncommitted geometry is discarded first. Succeeds with an empty shape
    /// when nothing is pending.
    pub fn get_shape(&mut self) -> Shape {
        self.path.get_shape()
    }

    /// Resolves `shape` for editing.
    ///
    /// Fails with `StaleShape` once the shape's path has been discarded
    /// (`clear`, or `begin_path` in immediate mode).
    pub fn shape(&mut self, shape: &Shape) -> Result<ShapeMut<'_>> {
        ShapeMut::resolve(shape, &mut self.path, &mut self.surface, self.resident)
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn finish(&mut self, kind: StreamKind) {
        match self.mode {
            Mode::Immediate => {
                self.upload(kind);
                let count = self.path.len(kind);
                self.surface.draw(Primitive::for_stream(kind), kind, count);
                self.path.reset_depth();
            }
            Mode::Retained => self.path.keep(kind),
        }
    }

    /// Replaces all three device buffers of `kind` with the CPU stream.
    fn upload(&mut self, kind: StreamKind) {
        let stream = self.path.stream(kind);
        let count = stream.len();
        for attr in Attribute::ALL {
            self.surface
                .replace(BufferSlot::new(attr, kind), stream.attribute_bytes(attr), count);
        }
        self.resident.set(kind, count);
    }

    fn alloc_path_id(&mut self) -> PathId {
        let id = PathId::new(self.next_path_id);
        self.next_path_id += 1;
        id
    }
}

fn finite_point(x: f32, y: f32) -> Result<Vec2> {
    let p = Vec2::new(x, y);
    if p.is_finite() {
        Ok(p)
    } else {
        Err(GeometryError::invalid_argument(format!("non-finite coordinates ({x}, {y})")))
    }
}
