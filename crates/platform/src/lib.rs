//! Platform layer: window, event loop, per-frame driving.
//!
//! One thread, fixed frame order: tick the clock, fold polled input into the
//! camera, advance scene animation, render. Close request exits the loop; all
//! per-frame state is recomputed from the scene, so nothing needs recovery.

pub mod input;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use corelib::scene::{FrameClock, Scene};
use input::InputState;
use renderer::{GpuState, RendererConfig};

/// Camera speeds, in world units/s and radians per mouse count.
const WALK_SPEED: f32 = 7.5;
const LOOK_SENSITIVITY: f32 = 0.002;

/// Everything `run` needs to open the window and drive the scene.
pub struct RunConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub renderer: RendererConfig,
    pub scene: Scene,
    /// Uploaded in order at startup; positions double as [`corelib::scene::MeshId`]s.
    pub meshes: Vec<asset::mesh::MeshData>,
}

/// Open a window and run the frame loop until close is requested.
pub fn run(config: RunConfig) -> Result<()> {
    let event_loop: EventLoop<()> = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        pending: Some(config),
        active: None,
        failure: None,
    };
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("Event loop error: {e:?}"))?;

    match app.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Live state once the window exists.
struct ActiveApp {
    window: Arc<Window>,
    gpu: GpuState,
    scene: Scene,
    input: InputState,
    clock: FrameClock,
}

struct App {
    /// Consumed on first resume to build [`ActiveApp`].
    pending: Option<RunConfig>,
    active: Option<ActiveApp>,
    /// Startup error carried out of the loop for `run` to return.
    failure: Option<anyhow::Error>,
}

impl App {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<ActiveApp> {
        let config = self
            .pending
            .take()
            .context("resumed twice without suspension support")?;

        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width.max(1), config.height.max(1)));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let mut gpu = pollster::block_on(GpuState::new(window.clone(), config.renderer))?;
        for mesh in &config.meshes {
            gpu.upload_mesh(mesh)?;
        }

        let mut scene = config.scene;
        let size = window.inner_size();
        scene
            .projection
            .set_aspect(size.width.max(1) as f32 / size.height.max(1) as f32);

        window.request_redraw();
        Ok(ActiveApp {
            window,
            gpu,
            scene,
            input: InputState::new(),
            clock: FrameClock::new(),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.active.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(active) => self.active = Some(active),
            Err(err) => {
                log::error!("Startup failed: {err:#}");
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Resized: {}x{}", new_size.width, new_size.height);
                active.gpu.resize(new_size.width, new_size.height);
                active
                    .scene
                    .projection
                    .set_aspect(new_size.width.max(1) as f32 / new_size.height.max(1) as f32);
            }
            WindowEvent::Focused(false) => {
                // Dropped key-release events would otherwise leave keys stuck.
                active.input.clear();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::Escape) => {
                            event_loop.exit();
                            return;
                        }
                        PhysicalKey::Code(KeyCode::KeyR) => {
                            active.scene.camera.reset();
                            return;
                        }
                        _ => {}
                    }
                }
                active.input.on_key(&event);
            }
            WindowEvent::RedrawRequested => {
                active.frame();
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
        if let (Some(active), DeviceEvent::MouseMotion { delta: (dx, dy) }) =
            (self.active.as_mut(), event)
        {
            active.input.on_mouse_motion(dx, dy);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(active) = self.active.as_ref() {
            active.window.request_redraw();
        }
    }
}

impl ActiveApp {
    /// One frame: clock, input -> camera, animation, draw.
    fn frame(&mut self) {
        let (_elapsed, dt) = self.clock.tick();

        let step = WALK_SPEED * dt;
        self.scene.camera.push_move(
            self.input.strafe_axis() * step,
            self.input.walk_axis() * step,
            self.input.rise_axis() * step,
        );
        let (dx, dy) = self.input.take_mouse_delta();
        if dx != 0.0 || dy != 0.0 {
            // Mouse right turns right (negative yaw), mouse up looks up.
            self.scene
                .camera
                .rotate(-dx * LOOK_SENSITIVITY, -dy * LOOK_SENSITIVITY);
        }
        self.scene.camera.update();
        self.scene.advance(dt);

        match self.gpu.render(&self.scene) {
            Ok(()) => {}
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::warn!("Surface lost/outdated; reconfiguring.");
                self.gpu.recreate_surface();
            }
            Err(err) => {
                log::error!("Render error: {err:?}");
            }
        }
    }
}
