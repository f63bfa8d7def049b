// ============================================================================
// WINDOWED VIEWER
// ============================================================================

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::canvas::Canvas;
use crate::config::Label;
use crate::error::GaugeError;
use crate::gauge::Gauge;
use crate::surface::Surface;

/// Messages accepted by [`GaugeWindow::show_with_commands`]
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeCommand {
    SetValue(Label),
}

/// Shows a raster gauge in a fixed-size window.
pub struct GaugeWindow {
    title: String,
    gauge: Gauge<Canvas>,
    max_framerate: f64,
}

impl GaugeWindow {
    pub fn new(title: impl Into<String>, gauge: Gauge<Canvas>) -> Self {
        Self {
            title: title.into(),
            gauge,
            max_framerate: 60.0,
        }
    }

    /// How often pending commands are drained, in checks per second.
    pub fn with_max_framerate(mut self, max_framerate: f64) -> Self {
        if max_framerate.is_finite() && max_framerate > 0.0 {
            self.max_framerate = max_framerate;
        }
        self
    }

    pub fn show(self) -> Result<(), GaugeError> {
        self.run_window(None)
    }

    pub fn show_with_commands(self, receiver: Receiver<GaugeCommand>) -> Result<(), GaugeError> {
        self.run_window(Some(receiver))
    }

    fn run_window(self, receiver: Option<Receiver<GaugeCommand>>) -> Result<(), GaugeError> {
        let Self {
            title,
            mut gauge,
            max_framerate,
        } = self;
        let (width, height) = (gauge.surface().width(), gauge.surface().height());

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&title)
            .with_inner_size(LogicalSize::new(f64::from(width), f64::from(height)))
            .with_resizable(false)
            .build(&event_loop)?;
        let window = Arc::new(window);

        // The pixel buffer keeps the canvas size; pixels scales it onto the window.
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let mut pixels = Pixels::new(width, height, surface_texture)?;

        let frame_duration = Duration::from_secs_f64(1.0 / max_framerate);
        log::debug!("showing gauge window `{title}` ({width}x{height})");

        event_loop.run(move |event, window_target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        log::error!("failed to resize surface: {err}");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    pixels.frame_mut().copy_from_slice(gauge.surface().frame());
                    if let Err(err) = pixels.render() {
                        log::error!("failed to present frame: {err}");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if let Some(receiver) = &receiver {
                    let mut changed = false;
                    for command in receiver.try_iter() {
                        match command {
                            GaugeCommand::SetValue(value) => gauge.set_value(value),
                        }
                        changed = true;
                    }
                    if changed {
                        window.request_redraw();
                    }
                }
                window_target
                    .set_control_flow(ControlFlow::WaitUntil(Instant::now() + frame_duration));
            }
            _ => {}
        })?;

        Ok(())
    }
}
