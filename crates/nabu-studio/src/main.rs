use std::f32::consts::TAU;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use nabu_engine::coords::{ColorRgba, ViewTransform};
use nabu_engine::core::{App, AppControl, FrameCtx};
use nabu_engine::device::GpuInit;
use nabu_engine::geometry::{Shape, StreamKind};
use nabu_engine::logging::{init_logging, LoggingConfig};
use nabu_engine::render::{RenderCtx, WgpuSurface};
use nabu_engine::time::FrameTime;
use nabu_engine::window::{Runtime, RuntimeConfig};
use nabu_engine::{EngineConfig, GeometryEngine};

const BACKGROUND: ColorRgba = ColorRgba::new(0.96, 0.95, 0.92, 1.0);
const PAN_STEP: f32 = 40.0;
const ZOOM_STEP: f32 = 1.25;

/// Horizontal travel of the animated square, user-space pixels.
const ORBIT_MIN_X: f32 = 60.0;
const ORBIT_MAX_X: f32 = 540.0;
const ORBIT_SPEED: f32 = 160.0;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("arrows pan, +/- zoom, 0 resets the view, H hides the runner, Esc quits");

    Runtime::run(
        RuntimeConfig {
            title: "Nabu Studio".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        Studio::default(),
    )
}

#[derive(Default)]
struct Studio {
    view: ViewTransform,
    toggle_hidden: bool,
    /// Built on the first frame, once device handles exist.
    scene: Option<Scene>,
}

impl App for Studio {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed {
            return AppControl::Continue;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return AppControl::Continue;
        };

        match code {
            KeyCode::Escape => return AppControl::Exit,
            KeyCode::ArrowLeft => self.view = self.view.panned(PAN_STEP, 0.0),
            KeyCode::ArrowRight => self.view = self.view.panned(-PAN_STEP, 0.0),
            KeyCode::ArrowUp => self.view = self.view.panned(0.0, PAN_STEP),
            KeyCode::ArrowDown => self.view = self.view.panned(0.0, -PAN_STEP),
            KeyCode::Equal | KeyCode::NumpadAdd => self.view = self.view.zoomed_at(ZOOM_STEP, 0.0, 0.0),
            KeyCode::Minus | KeyCode::NumpadSubtract => {
                self.view = self.view.zoomed_at(1.0 / ZOOM_STEP, 0.0, 0.0)
            }
            KeyCode::Digit0 => self.view = ViewTransform::identity(),
            KeyCode::KeyH => self.toggle_hidden = true,
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let time = ctx.time;
        let view = self.view;
        let toggle = std::mem::take(&mut self.toggle_hidden);
        let scene = &mut self.scene;
        let mut failure = None;

        let control = ctx.render(|rctx, target| {
            let result = match scene.as_mut() {
                Some(s) => s.frame(rctx, target, view, time, toggle),
                None => Scene::build(rctx).and_then(|mut s| {
                    let first = s.frame(rctx, target, view, time, toggle);
                    *scene = Some(s);
                    first
                }),
            };
            if let Err(err) = result {
                failure = Some(err);
            }
        });

        if let Some(err) = failure {
            log::error!("{err:#}");
            return AppControl::Exit;
        }
        control
    }
}

/// Retained picture plus the one shape that moves.
struct Scene {
    engine: GeometryEngine<WgpuSurface>,
    runner: Shape,
    runner_x: f32,
    direction: f32,
    hidden: bool,
    /// Full upload needed before the next display.
    dirty: bool,
}

impl Scene {
    fn build(rctx: &RenderCtx<'_>) -> Result<Self> {
        let surface = WgpuSurface::new(rctx)?;
        let mut engine = GeometryEngine::new(EngineConfig::retained(), surface)?;
        engine.set_viewport(rctx.viewport);

        draw_backdrop(&mut engine)?;
        let backdrop = engine.get_shape();
        log::debug!("backdrop shape {backdrop:?}");

        engine.set_fill_style("#e4572e")?;
        engine.set_stroke_style("#29335c")?;
        engine.fill_rect(ORBIT_MIN_X - 20.0, 300.0, 40.0, 40.0)?;
        engine.stroke();
        let runner = engine.get_shape();

        log::info!(
            "scene built: {} fill / {} stroke vertices",
            engine.path().committed(StreamKind::Fill),
            engine.path().committed(StreamKind::Stroke),
        );

        Ok(Self {
            engine,
            runner,
            runner_x: ORBIT_MIN_X,
            direction: 1.0,
            hidden: false,
            dirty: true,
        })
    }

    fn frame(
        &mut self,
        rctx: &RenderCtx<'_>,
        target: &wgpu::TextureView,
        view: ViewTransform,
        time: FrameTime,
        toggle_hidden: bool,
    ) -> Result<()> {
        let (w, h) = rctx.physical_size;
        let surface = self.engine.surface_mut();
        surface.resize(w, h);
        surface.set_target(target.clone());
        surface.clear_target(BACKGROUND);
        self.engine.set_viewport(rctx.viewport);

        if toggle_hidden {
            self.toggle_runner()?;
        }
        self.advance(time)?;

        // After the first upload, only partial writes from shape edits reach
        // the device.
        self.engine.display(view, !self.dirty)?;
        self.dirty = false;

        self.engine.surface_mut().take_target();
        Ok(())
    }

    fn advance(&mut self, time: FrameTime) -> Result<()> {
        let mut dx = ORBIT_SPEED * time.dt * self.direction;
        let next = self.runner_x + dx;
        if !(ORBIT_MIN_X..=ORBIT_MAX_X).contains(&next) {
            self.direction = -self.direction;
            dx = -dx;
        }
        self.runner_x += dx;

        let bob = (time.elapsed * TAU * 0.5).sin() * 40.0 * time.dt;
        let mut runner = self.engine.shape(&self.runner)?;
        runner.move_by(dx, bob, None)?;
        Ok(())
    }

    fn toggle_runner(&mut self) -> Result<()> {
        let brush = self.engine.brush();
        let mut runner = self.engine.shape(&self.runner)?;
        if self.hidden {
            runner.recolor(brush.fill, StreamKind::Fill)?;
            runner.recolor(brush.stroke, StreamKind::Stroke)?;
        } else {
            runner.hide();
        }
        self.hidden = !self.hidden;
        Ok(())
    }
}

/// Static content: a tile grid, a triangle and a ring of arcs.
fn draw_backdrop(engine: &mut GeometryEngine<WgpuSurface>) -> Result<()> {
    for row in 0..4 {
        for col in 0..8 {
            let shade = if (row + col) % 2 == 0 { "#d9d4c7" } else { "#c9c2b1" };
            engine.set_fill_style(shade)?;
            engine.fill_rect(col as f32 * 80.0, row as f32 * 60.0, 80.0, 60.0)?;
        }
    }

    engine.set_fill_style("rgba(76, 149, 108, 0.8)")?;
    engine.set_stroke_style("black")?;
    engine.begin_path();
    engine.move_to(700.0, 80.0)?;
    engine.line_to(820.0, 260.0)?;
    engine.line_to(580.0, 260.0)?;
    engine.line_to(700.0, 80.0)?;
    engine.fill();
    engine.stroke();

    engine.set_fill_style("#f3a712")?;
    engine.set_stroke_style("#29335c")?;
    engine.begin_path();
    engine.arc(320.0, 450.0, 70.0, 0.0, TAU, Some(48))?;
    engine.fill();
    engine.stroke();

    engine.begin_path();
    engine.arc(520.0, 450.0, 50.0, 0.0, TAU * 0.75, None)?;
    engine.stroke();

    Ok(())
}
