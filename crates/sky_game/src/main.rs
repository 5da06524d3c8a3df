//! Skylight sample -- event loop and application entry point.
//!
//! winit drives the loop via `ApplicationHandler`. One frame is one
//! `RedrawRequested`:
//!
//!   1. `begin_frame()` -- measure wall-clock delta and smoothed FPS
//!   2. held keys move the camera, newly pressed keys flip modes
//!   3. `on_frame` queues overlays, renders and presents
//!   4. `end_frame()` -- hand the key snapshot to the next frame
//!
//! Mouse look uses raw device motion so captured cursors still turn the view.

mod config;
mod controller;
mod error;
mod scene_setup;
#[cfg(test)]
mod test_engine;

use std::path::PathBuf;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use config::AppConfig;
use controller::FrameController;
use error::AppError;
use sky_core::{InputState, Key, TimeState};
use sky_platform::{create_window, map_key, set_cursor_captured};
use sky_render::{GpuContext, SceneEngine};

const DEFAULT_CONFIG_PATH: &str = "sample.json";

struct App {
    config: AppConfig,
    input: InputState,
    time: TimeState,
    window: Option<Arc<Window>>,
    controller: Option<FrameController<SceneEngine>>,
    focused: bool,
    /// Set when startup fails inside the event loop; returned from `run`.
    fatal: Option<AppError>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            input: InputState::new(),
            time: TimeState::new(),
            window: None,
            controller: None,
            focused: true,
            fatal: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let platform = self.config.platform_config();
        let window = create_window(event_loop, &platform).map_err(AppError::CreateWindow)?;
        log::info!("Window created: {}x{}", platform.width, platform.height);

        let gpu = GpuContext::new(window.clone())?;
        let mut controller = FrameController::init(SceneEngine::with_gpu(gpu), &self.config)?;
        let size = window.inner_size();
        controller.on_resize(size.width, size.height);

        self.window = Some(window);
        self.controller = Some(controller);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            log::error!("Startup failed: {err}");
            self.fatal = Some(err);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let (w, h) = (physical_size.width, physical_size.height);
                // Minimized windows report 0x0; keep the last viewport.
                if w > 0 && h > 0 {
                    controller.on_resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Key-up events are lost while unfocused.
                    self.input.release_all();
                }
                if self.config.window.capture_cursor {
                    if let Some(window) = &self.window {
                        set_cursor_captured(window, focused);
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => self.input.key_down(key),
                            ElementState::Released => self.input.key_up(key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.time.begin_frame();
                if self.input.is_just_pressed(Key::Escape) {
                    event_loop.exit();
                    return;
                }

                controller.on_held_keys(&self.input);
                controller.on_key_state(&self.input);
                controller.on_frame(self.time.smoothed_fps as f32);
                self.input.end_frame();
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
        if !self.focused {
            return;
        }
        if let (DeviceEvent::MouseMotion { delta: (dx, dy) }, Some(controller)) =
            (event, self.controller.as_mut())
        {
            // Device y grows downwards; pitch grows upwards.
            controller.on_mouse_move(dx as f32, -dy as f32);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(controller) = self.controller.take() {
            log::info!(
                "Shutting down after {} frames ({:.1}s)",
                self.time.frame_count,
                self.time.total_time
            );
            controller.release();
        }
    }
}

fn run(config: AppConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(AppError::EventLoopRun)?;
    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Skylight sample starting...");

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = match config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(config) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
