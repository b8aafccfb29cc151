//! Live playback window. Frames advance on a fixed best-effort interval and
//! wrap back to the start until the window is closed.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::{
    core::FrameIndex,
    error::{TrajplotError, TrajplotResult},
    render::CpuRenderer,
    scene::SceneState,
    trajectory::Trajectory,
};

struct App {
    trajectory: Trajectory,
    renderer: CpuRenderer,
    scene: SceneState,
    interval: Duration,

    window: Option<Arc<Window>>,
    // Kept alive for the lifetime of the surface.
    _context: Option<softbuffer::Context<Arc<Window>>>,
    surface: Option<softbuffer::Surface<Arc<Window>, Arc<Window>>>,

    next_frame: FrameIndex,
    last_step: Instant,
    error: Option<TrajplotError>,
}

impl App {
    fn new(trajectory: Trajectory, renderer: CpuRenderer, interval: Duration) -> Self {
        Self {
            trajectory,
            renderer,
            scene: SceneState::new(),
            interval,
            window: None,
            _context: None,
            surface: None,
            next_frame: FrameIndex(0),
            last_step: Instant::now(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: TrajplotError) {
        tracing::error!(error = %err, "preview failed");
        self.error = Some(err);
        event_loop.exit();
    }

    fn step_and_present(&mut self) -> TrajplotResult<()> {
        if self.last_step.elapsed() >= self.interval {
            self.last_step = Instant::now();
            let frame = self.next_frame;
            let total = self.trajectory.len() as u64;
            self.next_frame = FrameIndex((frame.0 + 1) % total);
            // Each pass over the data starts from a blank trail.
            if frame.0 == 0 {
                self.scene.reset();
            }
            let state = self.scene.advance(&self.trajectory, frame)?;
            let rendered = self.renderer.render(&state)?;

            let (Some(window), Some(surface)) = (self.window.as_ref(), self.surface.as_mut())
            else {
                return Ok(());
            };

            let size = window.inner_size();
            let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
            else {
                return Ok(()); // minimized
            };
            surface
                .resize(w, h)
                .map_err(|e| TrajplotError::render(format!("surface resize failed: {e}")))?;
            let mut buffer = surface
                .buffer_mut()
                .map_err(|e| TrajplotError::render(format!("surface buffer unavailable: {e}")))?;

            // Nearest-neighbor into the window buffer; sizes usually match
            // the canvas but scale factors and manual resizes may not.
            let bw = size.width as usize;
            let bh = size.height as usize;
            let fw = rendered.width as usize;
            let fh = rendered.height as usize;
            for by in 0..bh {
                let fy = by * fh / bh;
                for bx in 0..bw {
                    let fx = bx * fw / bw;
                    let i = (fy * fw + fx) * 4;
                    let [r, g, b] = [
                        rendered.data[i] as u32,
                        rendered.data[i + 1] as u32,
                        rendered.data[i + 2] as u32,
                    ];
                    buffer[by * bw + bx] = (r << 16) | (g << 8) | b;
                }
            }
            buffer
                .present()
                .map_err(|e| TrajplotError::render(format!("surface present failed: {e}")))?;
        }

        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let canvas = self.renderer.canvas();
        let attrs = Window::default_attributes()
            .with_title("trajplot - trajectory replay")
            .with_inner_size(PhysicalSize::new(canvas.width, canvas.height));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(
                    event_loop,
                    TrajplotError::render(format!("failed to create window: {e}")),
                );
                return;
            }
        };

        let context = match softbuffer::Context::new(window.clone()) {
            Ok(c) => c,
            Err(e) => {
                self.fail(
                    event_loop,
                    TrajplotError::render(format!("failed to create display context: {e}")),
                );
                return;
            }
        };
        let surface = match softbuffer::Surface::new(&context, window.clone()) {
            Ok(s) => s,
            Err(e) => {
                self.fail(
                    event_loop,
                    TrajplotError::render(format!("failed to create window surface: {e}")),
                );
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self._context = Some(context);
        self.surface = Some(surface);
        self.last_step = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && event.logical_key == Key::Named(NamedKey::Escape) {
                    event_loop.exit();
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.step_and_present() {
                    self.fail(event_loop, e);
                }
            }

            _ => {}
        }
    }
}

/// Run the windowed replay until the user closes it. Blocks on the event
/// loop; this is the only blocking hand-off in interactive mode.
pub fn run(
    trajectory: Trajectory,
    renderer: CpuRenderer,
    interval: Duration,
) -> TrajplotResult<()> {
    let event_loop = EventLoop::new()
        .map_err(|e| TrajplotError::render(format!("failed to create event loop: {e}")))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    tracing::info!(frames = trajectory.len(), "starting preview window");
    let mut app = App::new(trajectory, renderer, interval);
    event_loop
        .run_app(&mut app)
        .map_err(|e| TrajplotError::render(format!("event loop failed: {e}")))?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
