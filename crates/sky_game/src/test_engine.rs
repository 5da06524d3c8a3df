//! Recording `RenderEngine` fake and content fixtures for controller and
//! scene setup tests.

use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::scene_setup::{
    CONTROL_PANEL_SCENE, ENVIRONMENT_SCENE, FONT_MATERIAL, FORWARD_PIPELINE, HDR_PIPELINE,
    LOGO_MATERIAL, PANEL_MATERIAL, POST_HDR_MATERIAL, SKYBOX_SCENE,
};
use sky_core::StatLevel;
use sky_render::{
    EngineError, EngineMessage, EngineOption, MessageLevel, NodeFlags, NodeHandle, NodeParam,
    OverlayVertex, RenderEngine, ResHandle, ResourceKind, Transform,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init,
    Release,
    SetOption(EngineOption, f32),
    AddResource(ResourceKind, String),
    LoadResources,
    AddNodes(NodeHandle, ResHandle),
    AddCamera(String, ResHandle),
    AddLight(String),
    SetNodeTransform(NodeHandle, Transform),
    SetNodeParamI(NodeHandle, NodeParam, i32),
    SetNodeParamF(NodeHandle, NodeParam, usize, f32),
    SetNodeFlags(NodeHandle, NodeFlags),
    SetupCameraView(NodeHandle, f32, f32, f32, f32),
    ResizePipelineBuffers(ResHandle, u32, u32),
    SetMaterialUniform(ResHandle, String, [f32; 4]),
    ShowFrameStats(StatLevel),
    ShowText(String, f32, f32, f32),
    ShowOverlays(Vec<OverlayVertex>, ResHandle),
    Render(NodeHandle),
    FinalizeFrame,
    ClearOverlays,
    DrainMessages,
}

#[derive(Default)]
pub struct RecordingEngine {
    pub calls: Vec<Call>,
    pub fail_init: bool,
    pub fail_camera: bool,
    /// Returned (and emptied) by the next `drain_messages`.
    pub pending_messages: Vec<EngineMessage>,
    /// Shared so tests can observe an engine the controller consumed.
    pub drained: Rc<Cell<usize>>,
    pub released: Rc<Cell<bool>>,
    resources: Vec<(ResourceKind, String)>,
    node_count: u32,
    int_params: HashMap<(NodeHandle, NodeParam), i32>,
    options: HashMap<EngineOption, f32>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            node_count: 1,
            ..Self::default()
        }
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn queue_message(&mut self, level: MessageLevel, text: &str) {
        self.pending_messages.push(EngineMessage {
            level,
            time: 0.0,
            text: text.to_string(),
        });
    }

    fn next_node(&mut self) -> NodeHandle {
        self.node_count += 1;
        NodeHandle(self.node_count)
    }
}

impl RenderEngine for RecordingEngine {
    fn init(&mut self) -> Result<(), EngineError> {
        self.calls.push(Call::Init);
        if self.fail_init {
            self.queue_message(MessageLevel::Error, "no suitable device");
            return Err(EngineError::Device("no suitable device".to_string()));
        }
        Ok(())
    }

    fn release(&mut self) {
        self.calls.push(Call::Release);
        self.released.set(true);
    }

    fn set_option(&mut self, option: EngineOption, value: f32) -> bool {
        self.calls.push(Call::SetOption(option, value));
        self.options.insert(option, value);
        true
    }

    fn option(&self, option: EngineOption) -> f32 {
        self.options.get(&option).copied().unwrap_or(0.0)
    }

    fn add_resource(&mut self, kind: ResourceKind, name: &str, _flags: u32) -> ResHandle {
        self.calls.push(Call::AddResource(kind, name.to_string()));
        if let Some(existing) = self.find_resource(kind, name) {
            return existing;
        }
        self.resources.push((kind, name.to_string()));
        ResHandle(self.resources.len() as u32)
    }

    fn find_resource(&self, kind: ResourceKind, name: &str) -> Option<ResHandle> {
        self.resources
            .iter()
            .position(|(k, n)| *k == kind && n == name)
            .map(|i| ResHandle(i as u32 + 1))
    }

    fn load_resources_from_disk(&mut self, _content_dir: &Path) -> bool {
        self.calls.push(Call::LoadResources);
        true
    }

    fn add_nodes(&mut self, parent: NodeHandle, scene_res: ResHandle) -> Option<NodeHandle> {
        self.calls.push(Call::AddNodes(parent, scene_res));
        Some(self.next_node())
    }

    fn add_camera_node(
        &mut self,
        _parent: NodeHandle,
        name: &str,
        pipeline: ResHandle,
    ) -> Option<NodeHandle> {
        self.calls.push(Call::AddCamera(name.to_string(), pipeline));
        if self.fail_camera {
            return None;
        }
        let camera = self.next_node();
        self.int_params
            .insert((camera, NodeParam::PipelineRes), pipeline.as_param());
        self.int_params.insert((camera, NodeParam::ViewportWidth), 320);
        self.int_params.insert((camera, NodeParam::ViewportHeight), 240);
        Some(camera)
    }

    fn add_light_node(
        &mut self,
        _parent: NodeHandle,
        name: &str,
        _material: Option<ResHandle>,
        _lighting_context: &str,
        _shadow_context: &str,
    ) -> Option<NodeHandle> {
        self.calls.push(Call::AddLight(name.to_string()));
        Some(self.next_node())
    }

    fn set_node_transform(&mut self, node: NodeHandle, transform: &Transform) {
        self.calls.push(Call::SetNodeTransform(node, *transform));
    }

    fn set_node_param_i(&mut self, node: NodeHandle, param: NodeParam, value: i32) {
        self.calls.push(Call::SetNodeParamI(node, param, value));
        self.int_params.insert((node, param), value);
    }

    fn get_node_param_i(&self, node: NodeHandle, param: NodeParam) -> i32 {
        self.int_params.get(&(node, param)).copied().unwrap_or(0)
    }

    fn set_node_param_f(
        &mut self,
        node: NodeHandle,
        param: NodeParam,
        component: usize,
        value: f32,
    ) {
        self.calls
            .push(Call::SetNodeParamF(node, param, component, value));
    }

    fn set_node_flags(&mut self, node: NodeHandle, flags: NodeFlags, _recursive: bool) {
        self.calls.push(Call::SetNodeFlags(node, flags));
    }

    fn setup_camera_view(
        &mut self,
        camera: NodeHandle,
        fov_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) {
        self.calls
            .push(Call::SetupCameraView(camera, fov_deg, aspect, near, far));
    }

    fn resize_pipeline_buffers(&mut self, pipeline: ResHandle, width: u32, height: u32) {
        self.calls
            .push(Call::ResizePipelineBuffers(pipeline, width, height));
    }

    fn set_material_uniform(&mut self, material: ResHandle, name: &str, values: [f32; 4]) -> bool {
        self.calls
            .push(Call::SetMaterialUniform(material, name.to_string(), values));
        true
    }

    fn show_frame_stats(
        &mut self,
        _font_material: ResHandle,
        _panel_material: ResHandle,
        level: StatLevel,
    ) {
        self.calls.push(Call::ShowFrameStats(level));
    }

    fn show_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        _color: [f32; 3],
        _font_material: ResHandle,
    ) {
        self.calls.push(Call::ShowText(text.to_string(), x, y, size));
    }

    fn show_overlays(
        &mut self,
        vertices: &[OverlayVertex],
        _color: [f32; 4],
        material: ResHandle,
        _flags: u32,
    ) {
        self.calls
            .push(Call::ShowOverlays(vertices.to_vec(), material));
    }

    fn render(&mut self, camera: NodeHandle) {
        self.calls.push(Call::Render(camera));
    }

    fn finalize_frame(&mut self) {
        self.calls.push(Call::FinalizeFrame);
    }

    fn clear_overlays(&mut self) {
        self.calls.push(Call::ClearOverlays);
    }

    fn drain_messages(&mut self) -> Vec<EngineMessage> {
        self.calls.push(Call::DrainMessages);
        let messages = std::mem::take(&mut self.pending_messages);
        self.drained.set(self.drained.get() + messages.len());
        messages
    }
}

pub fn temp_content_dir(name_hint: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "sky_game_test_{}_{}_{}",
        name_hint,
        std::process::id(),
        nanos
    ));
    fs::create_dir_all(&dir).expect("failed to create temp content dir");
    dir
}

pub fn write_content(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create content subdir");
    }
    fs::write(path, body).expect("failed to write content file");
}

/// Minimal content tree with every file the sample scene references.
pub fn sample_content(name_hint: &str) -> PathBuf {
    let dir = temp_content_dir(name_hint);
    write_content(
        &dir,
        HDR_PIPELINE,
        r#"<Pipeline><DrawQuad material="pipelines/postHDR.material.xml" /></Pipeline>"#,
    );
    write_content(&dir, FORWARD_PIPELINE, "<Pipeline />");
    write_content(&dir, POST_HDR_MATERIAL, "<Material />");
    for name in [FONT_MATERIAL, PANEL_MATERIAL, LOGO_MATERIAL] {
        write_content(&dir, name, "<Material />");
    }
    for name in [ENVIRONMENT_SCENE, CONTROL_PANEL_SCENE, SKYBOX_SCENE] {
        write_content(&dir, name, "<Group />");
    }
    dir
}
