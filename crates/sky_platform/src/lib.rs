pub mod keymap;
pub mod window;

pub use keymap::map_key;
pub use window::{create_window, set_cursor_captured, PlatformConfig};
