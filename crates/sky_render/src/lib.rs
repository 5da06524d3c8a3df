pub mod camera;
pub mod content;
pub mod diagnostics;
pub mod engine;
pub mod gpu_context;
pub mod scene_engine;
pub mod vertex;

pub use camera::{CameraView, Transform};
pub use diagnostics::dump_messages;
pub use engine::{
    EngineError, EngineMessage, EngineOption, MessageLevel, NodeFlags, NodeHandle, NodeParam,
    RenderEngine, ResHandle, ResourceKind,
};
pub use gpu_context::{GpuContext, GpuError};
pub use scene_engine::SceneEngine;
pub use vertex::OverlayVertex;
