use std::sync::Arc;
use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorGrabMode, Window, WindowAttributes};

#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Hide and confine the cursor so mouse look gets unbounded deltas.
    pub capture_cursor: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Skylight Sample".to_string(),
            width: 1024,
            height: 576,
            capture_cursor: false,
        }
    }
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, OsError> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

    let window = event_loop.create_window(attrs)?;
    if config.capture_cursor {
        set_cursor_captured(&window, true);
    }
    Ok(Arc::new(window))
}

/// Not every platform supports every grab mode, so fall back from `Locked`
/// to `Confined` and only warn if both fail.
pub fn set_cursor_captured(window: &Window, captured: bool) {
    if !captured {
        if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("Failed to release cursor: {err}");
        }
        window.set_cursor_visible(true);
        return;
    }

    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    match grabbed {
        Ok(()) => window.set_cursor_visible(false),
        Err(err) => log::warn!("Cursor capture unavailable: {err}"),
    }
}
