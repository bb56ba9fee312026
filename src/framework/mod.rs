//! A small host framework: it owns the window, the GPU context and the
//! camera, and drives an app through `on_init`, `on_update`, `on_render`
//! and `on_resize`.

pub mod camera;
mod host;
pub mod input;
pub mod time;

use std::fmt;
use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoop;
use winit::window::Window;

pub use camera::{Camera, FlyCameraController};
pub use host::Host;
pub use input::{forwards_button, InputState};
pub use time::{FrameClock, FrameTime};

use crate::renderer::GpuContext;
use crate::settings::DemoSettings;

/// Everything the host lends to an app callback.
pub struct Systems {
    pub gpu: GpuContext,
    pub window: Arc<Window>,
    pub camera: Camera,
    pub input: InputState,
    pub time: FrameTime,
}

/// The swapchain frame being recorded.
pub struct Frame<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

pub trait FrameworkApp: 'static {
    fn name(&self) -> &str {
        "Framework App"
    }

    /// Create every GPU resource. An error here ends the run.
    fn on_init(&mut self, systems: &mut Systems) -> Result<(), String>;

    /// Called once per frame after input and camera have been updated.
    fn on_update(&mut self, systems: &mut Systems);

    fn on_render(&mut self, systems: &mut Systems, frame: &mut Frame<'_>);

    /// Surface and depth buffer have already been rebuilt for `size`.
    fn on_resize(&mut self, systems: &mut Systems, size: PhysicalSize<u32>) {
        let _ = (systems, size);
    }

    #[cfg(feature = "egui")]
    fn ui(&mut self, ctx: &egui::Context) {
        let _ = ctx;
    }
}

#[derive(Debug)]
pub enum RunError {
    EventLoop(winit::error::EventLoopError),
    /// Window, device or app resources could not be created.
    Startup(String),
    /// The device failed while rendering.
    Render(String),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(err) => write!(f, "event loop error: {err}"),
            RunError::Startup(msg) => write!(f, "startup failed: {msg}"),
            RunError::Render(msg) => write!(f, "render failed: {msg}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::EventLoop(err) => Some(err),
            _ => None,
        }
    }
}

impl From<winit::error::EventLoopError> for RunError {
    fn from(err: winit::error::EventLoopError) -> Self {
        RunError::EventLoop(err)
    }
}

/// Run `app` until its window closes or a fatal error occurs.
pub fn run_app<A: FrameworkApp>(app: A, settings: DemoSettings) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    let mut host = Host::new(app, settings);

    event_loop.run_app(&mut host)?;

    match host.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
