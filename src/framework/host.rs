use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use super::{
    forwards_button, Camera, FlyCameraController, Frame, FrameClock, FrameTime, FrameworkApp,
    InputState, RunError, Systems,
};
use crate::renderer::GpuContext;
use crate::settings::DemoSettings;

#[cfg(feature = "egui")]
use crate::ui::{EguiOverlay, EguiRenderTarget};

struct Running {
    systems: Systems,
    #[cfg(feature = "egui")]
    egui: EguiOverlay,
}

/// winit handler that owns the window and GPU context and drives one app.
pub struct Host<A: FrameworkApp> {
    app: A,
    settings: DemoSettings,
    controller: FlyCameraController,
    clock: FrameClock,
    running: Option<Running>,
    error: Option<RunError>,
}

impl<A: FrameworkApp> Host<A> {
    pub fn new(app: A, settings: DemoSettings) -> Self {
        let controller = FlyCameraController::new(&settings.camera);
        Self {
            app,
            settings,
            controller,
            clock: FrameClock::new(),
            running: None,
            error: None,
        }
    }

    /// The fatal error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<RunError> {
        self.error.take()
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), String> {
        let size = PhysicalSize::new(
            self.settings.resolution.width,
            self.settings.resolution.height,
        );
        let attributes = Window::default_attributes()
            .with_title(self.app.name())
            .with_inner_size(size);
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|err| format!("Failed to create window: {err}"))?,
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone(), &self.settings))?;

        let mut camera = Camera::default();
        camera.set_aspect(gpu.aspect_ratio());

        let mut systems = Systems {
            gpu,
            window: window.clone(),
            camera,
            input: InputState::default(),
            time: FrameTime::default(),
        };

        log::info!("Initializing {}", self.app.name());
        self.app.on_init(&mut systems)?;

        #[cfg(feature = "egui")]
        let egui = EguiOverlay::new(&systems.gpu.device, systems.gpu.color_format(), &window);

        self.clock = FrameClock::new();
        self.running = Some(Running {
            systems,
            #[cfg(feature = "egui")]
            egui,
        });

        window.request_redraw();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RunError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        let systems = &mut running.systems;
        if !systems.gpu.resize(size) {
            return;
        }
        systems.camera.set_aspect(systems.gpu.aspect_ratio());
        self.app.on_resize(systems, size);
    }

    fn redraw(&mut self) -> Result<(), String> {
        let Some(running) = self.running.as_mut() else {
            return Ok(());
        };
        let systems = &mut running.systems;

        systems.time = self.clock.tick();
        self.controller
            .update(&mut systems.camera, &systems.input, systems.time.dt);
        self.app.on_update(systems);
        systems.input.end_frame();

        let output = match systems.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                systems.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err("Out of memory acquiring the next frame".to_string());
            }
            Err(err) => {
                log::warn!("Skipping frame: {err}");
                return Ok(());
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = systems
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut frame = Frame {
                encoder: &mut encoder,
                color_view: &view,
            };
            self.app.on_render(systems, &mut frame);
        }

        #[cfg(feature = "egui")]
        {
            let app = &mut self.app;
            let full_output = running.egui.run(&systems.window, |ctx| app.ui(ctx));
            let mut target = EguiRenderTarget {
                device: &systems.gpu.device,
                queue: &systems.gpu.queue,
                encoder: &mut encoder,
                window: &systems.window,
                view: &view,
                surface_size: [systems.gpu.config.width, systems.gpu.config.height],
            };
            running.egui.render(&mut target, full_output);
        }

        systems.gpu.queue.submit(Some(encoder.finish()));
        systems.window.pre_present_notify();
        output.present();
        Ok(())
    }
}

impl<A: FrameworkApp> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() || self.error.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, RunError::Startup(err));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        if running.systems.window.id() != id {
            return;
        }

        #[cfg(feature = "egui")]
        let consumed = running.egui.handle_event(&running.systems.window, &event);
        #[cfg(not(feature = "egui"))]
        let consumed = false;

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.resize(size);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = running.systems.window.inner_size();
                self.resize(size);
            }
            WindowEvent::Focused(false) => {
                running.systems.input.release_all();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } if forwards_button(event.state, consumed) => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    running.systems.input.handle_key(code, event.state, event.repeat);
                }
            }
            WindowEvent::MouseInput { state, button, .. } if forwards_button(state, consumed) => {
                running.systems.input.handle_mouse_button(button, state);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, RunError::Render(err));
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let (Some(running), DeviceEvent::MouseMotion { delta }) = (self.running.as_mut(), event)
        {
            running.systems.input.handle_mouse_motion(delta.0, delta.1);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.systems.window.request_redraw();
        }
    }
}
