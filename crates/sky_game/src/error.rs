use sky_render::{EngineError, GpuError};
use thiserror::Error;
use winit::error::{EventLoopError, OsError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("engine initialization failed: {0}")]
    EngineInit(#[source] EngineError),
    #[error("engine could not create the camera node")]
    CameraCreation,
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize graphics: {0}")]
    Gpu(#[from] GpuError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}
