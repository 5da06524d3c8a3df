//! The capability set a frame controller needs from a rendering engine.
//!
//! Everything behind this trait (resource loading, scene graph, culling,
//! shadows, post-processing) is owned by the engine. Callers keep only the
//! opaque handles it returns and pass them back in later calls.

use std::path::Path;

use sky_core::StatLevel;
use thiserror::Error;

use crate::camera::Transform;
use crate::vertex::OverlayVertex;

/// Opaque resource handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResHandle(pub u32);

impl ResHandle {
    /// Integer form, as stored in node parameters such as `PipelineRes`.
    pub fn as_param(self) -> i32 {
        self.0 as i32
    }

    pub fn from_param(value: i32) -> Option<Self> {
        u32::try_from(value).ok().filter(|&v| v != 0).map(ResHandle)
    }
}

/// Opaque scene node handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u32);

impl NodeHandle {
    pub const ROOT: NodeHandle = NodeHandle(1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    SceneGraph,
    Geometry,
    Animation,
    Material,
    Code,
    Shader,
    Texture,
    ParticleEffect,
    Pipeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineOption {
    LoadTextures,
    TexCompression,
    FastAnimation,
    MaxAnisotropy,
    ShadowMapSize,
    DebugViewMode,
    WireframeMode,
}

/// Integer and float node parameters. Float parameters may have several
/// components (e.g. `Color` has three).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeParam {
    // Camera
    PipelineRes,
    ViewportX,
    ViewportY,
    ViewportWidth,
    ViewportHeight,
    // Light
    Radius,
    Fov,
    ShadowMapCount,
    ShadowMapBias,
    Color,
    ColorMultiplier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeFlags {
    pub no_cast_shadow: bool,
}

impl NodeFlags {
    pub const NO_CAST_SHADOW: NodeFlags = NodeFlags {
        no_cast_shadow: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageLevel {
    Error,
    Warning,
    Info,
    Debug,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineMessage {
    pub level: MessageLevel,
    /// Engine time in seconds when the message was recorded.
    pub time: f32,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine is already initialized")]
    AlreadyInitialized,
    #[error("graphics device unavailable: {0}")]
    Device(String),
}

pub trait RenderEngine {
    // --- Lifecycle --------------------------------------------------------------
    fn init(&mut self) -> Result<(), EngineError>;
    fn release(&mut self);

    // --- Options ----------------------------------------------------------------
    /// Returns false if the engine rejected the value.
    fn set_option(&mut self, option: EngineOption, value: f32) -> bool;
    fn option(&self, option: EngineOption) -> f32;

    // --- Resources --------------------------------------------------------------
    /// Registers a resource by name. Registering the same (kind, name) twice
    /// returns the existing handle.
    fn add_resource(&mut self, kind: ResourceKind, name: &str, flags: u32) -> ResHandle;
    fn find_resource(&self, kind: ResourceKind, name: &str) -> Option<ResHandle>;
    /// Loads every registered, not-yet-loaded resource. Returns false if any
    /// resource failed.
    fn load_resources_from_disk(&mut self, content_dir: &Path) -> bool;

    // --- Scene graph ------------------------------------------------------------
    /// Instantiates a scene-graph resource under `parent`.
    fn add_nodes(&mut self, parent: NodeHandle, scene_res: ResHandle) -> Option<NodeHandle>;
    fn add_camera_node(
        &mut self,
        parent: NodeHandle,
        name: &str,
        pipeline: ResHandle,
    ) -> Option<NodeHandle>;
    fn add_light_node(
        &mut self,
        parent: NodeHandle,
        name: &str,
        material: Option<ResHandle>,
        lighting_context: &str,
        shadow_context: &str,
    ) -> Option<NodeHandle>;
    fn set_node_transform(&mut self, node: NodeHandle, transform: &Transform);
    fn set_node_param_i(&mut self, node: NodeHandle, param: NodeParam, value: i32);
    fn get_node_param_i(&self, node: NodeHandle, param: NodeParam) -> i32;
    fn set_node_param_f(
        &mut self,
        node: NodeHandle,
        param: NodeParam,
        component: usize,
        value: f32,
    );
    fn set_node_flags(&mut self, node: NodeHandle, flags: NodeFlags, recursive: bool);

    // --- Camera -----------------------------------------------------------------
    fn setup_camera_view(
        &mut self,
        camera: NodeHandle,
        fov_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
    );
    fn resize_pipeline_buffers(&mut self, pipeline: ResHandle, width: u32, height: u32);

    // --- Materials --------------------------------------------------------------
    fn set_material_uniform(&mut self, material: ResHandle, name: &str, values: [f32; 4])
        -> bool;

    // --- Per-frame drawing ------------------------------------------------------
    fn show_frame_stats(
        &mut self,
        font_material: ResHandle,
        panel_material: ResHandle,
        level: StatLevel,
    );
    fn show_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: [f32; 3],
        font_material: ResHandle,
    );
    fn show_overlays(
        &mut self,
        vertices: &[OverlayVertex],
        color: [f32; 4],
        material: ResHandle,
        flags: u32,
    );
    fn render(&mut self, camera: NodeHandle);
    fn finalize_frame(&mut self);
    fn clear_overlays(&mut self);

    // --- Diagnostics ------------------------------------------------------------
    /// Removes and returns all messages recorded since the last call.
    fn drain_messages(&mut self) -> Vec<EngineMessage>;
}
