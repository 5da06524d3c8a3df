pub mod input;
pub mod modes;
pub mod pose;
pub mod time;

pub use input::{InputState, Key};
pub use modes::{FreezeMode, StatLevel, MAX_STAT_LEVEL};
pub use pose::CameraPose;
pub use time::TimeState;
