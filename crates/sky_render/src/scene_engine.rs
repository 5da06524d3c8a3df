//! In-memory `RenderEngine`: keeps the resource registry, node tree, option
//! table and overlay queues an engine would own, and optionally presents each
//! frame into a window surface. It draws no geometry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use glam::Mat4;
use sky_core::{StatLevel, TimeState};

use crate::camera::{CameraView, Transform};
use crate::content::{is_xml_resource, scan_dependencies, Dependency};
use crate::engine::{
    EngineError, EngineMessage, EngineOption, MessageLevel, NodeFlags, NodeHandle, NodeParam,
    RenderEngine, ResHandle, ResourceKind,
};
use crate::gpu_context::GpuContext;
use crate::vertex::{overlay_floats, OverlayVertex};

const VALID_SHADOW_MAP_SIZES: &[f32] = &[128.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0];

const STAT_TEXT_X: f32 = 0.03;
const STAT_TEXT_Y: f32 = 0.03;
const STAT_TEXT_SIZE: f32 = 0.026;

#[derive(Debug, Clone)]
pub struct ResourceInfo {
    pub kind: ResourceKind,
    pub name: String,
    pub flags: u32,
    pub loaded: bool,
    failed: bool,
    pub uniforms: HashMap<String, [f32; 4]>,
    pub buffer_size: Option<(u32, u32)>,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Root,
    Group {
        resource: ResHandle,
    },
    Camera {
        view: CameraView,
    },
    Light {
        material: Option<ResHandle>,
        lighting_context: String,
        shadow_context: String,
    },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    name: String,
    parent: Option<NodeHandle>,
    transform: Transform,
    int_params: HashMap<NodeParam, i32>,
    float_params: HashMap<NodeParam, [f32; 4]>,
    flags: NodeFlags,
}

impl Node {
    fn new(kind: NodeKind, name: &str, parent: Option<NodeHandle>) -> Self {
        Self {
            kind,
            name: name.to_string(),
            parent,
            transform: Transform::default(),
            int_params: HashMap::new(),
            float_params: HashMap::new(),
            flags: NodeFlags::default(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Root | NodeKind::Group { .. } => "group",
            NodeKind::Camera { .. } => "camera",
            NodeKind::Light { .. } => "light",
        }
    }

    fn accepts_int(&self, param: NodeParam) -> bool {
        match self.kind {
            NodeKind::Camera { .. } => matches!(
                param,
                NodeParam::PipelineRes
                    | NodeParam::ViewportX
                    | NodeParam::ViewportY
                    | NodeParam::ViewportWidth
                    | NodeParam::ViewportHeight
            ),
            NodeKind::Light { .. } => param == NodeParam::ShadowMapCount,
            _ => false,
        }
    }

    /// Number of float components the parameter has on this node, or 0.
    fn float_components(&self, param: NodeParam) -> usize {
        match (&self.kind, param) {
            (NodeKind::Light { .. }, NodeParam::Color) => 3,
            (
                NodeKind::Light { .. },
                NodeParam::Radius
                | NodeParam::Fov
                | NodeParam::ShadowMapBias
                | NodeParam::ColorMultiplier,
            ) => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: [f32; 3],
    pub font_material: ResHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBatch {
    /// Packed `x, y, u, v` per vertex.
    pub floats: Vec<f32>,
    pub color: [f32; 4],
    pub material: ResHandle,
    pub flags: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCounters {
    pub frames: u64,
    pub renders: u64,
}

pub struct SceneEngine {
    initialized: bool,
    options: HashMap<EngineOption, f32>,
    resources: Vec<ResourceInfo>,
    nodes: Vec<Node>,
    texts: Vec<TextItem>,
    overlays: Vec<OverlayBatch>,
    messages: RefCell<Vec<EngineMessage>>,
    started: Instant,
    timer: TimeState,
    counters: FrameCounters,
    last_view_proj: Option<Mat4>,
    last_pipeline: Option<ResHandle>,
    gpu: Option<GpuContext>,
}

impl SceneEngine {
    pub fn new() -> Self {
        Self {
            initialized: false,
            options: default_options(),
            resources: Vec::new(),
            nodes: vec![Node::new(NodeKind::Root, "RootNode", None)],
            texts: Vec::new(),
            overlays: Vec::new(),
            messages: RefCell::new(Vec::new()),
            started: Instant::now(),
            timer: TimeState::new(),
            counters: FrameCounters::default(),
            last_view_proj: None,
            last_pipeline: None,
            gpu: None,
        }
    }

    /// Engine that presents finalized frames into `gpu`'s surface.
    pub fn with_gpu(gpu: GpuContext) -> Self {
        Self {
            gpu: Some(gpu),
            ..Self::new()
        }
    }

    pub fn resource(&self, handle: ResHandle) -> Option<&ResourceInfo> {
        index_of(handle.0).and_then(|i| self.resources.get(i))
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_transform(&self, node: NodeHandle) -> Option<Transform> {
        self.node(node).map(|n| n.transform)
    }

    pub fn node_flags(&self, node: NodeHandle) -> Option<NodeFlags> {
        self.node(node).map(|n| n.flags)
    }

    pub fn node_param_f(
        &self,
        node: NodeHandle,
        param: NodeParam,
        component: usize,
    ) -> Option<f32> {
        self.node(node)?
            .float_params
            .get(&param)
            .and_then(|v| v.get(component).copied())
    }

    /// Scene-graph resource a group was instanced from, or a light's material.
    pub fn node_resource(&self, node: NodeHandle) -> Option<ResHandle> {
        match self.node(node)?.kind {
            NodeKind::Group { resource } => Some(resource),
            NodeKind::Light { material, .. } => material,
            _ => None,
        }
    }

    /// Lighting and shadow shader contexts of a light node.
    pub fn light_contexts(&self, light: NodeHandle) -> Option<(&str, &str)> {
        match &self.node(light)?.kind {
            NodeKind::Light {
                lighting_context,
                shadow_context,
                ..
            } => Some((lighting_context.as_str(), shadow_context.as_str())),
            _ => None,
        }
    }

    pub fn camera_view(&self, camera: NodeHandle) -> Option<CameraView> {
        match self.node(camera)?.kind {
            NodeKind::Camera { view } => Some(view),
            _ => None,
        }
    }

    pub fn texts(&self) -> &[TextItem] {
        &self.texts
    }

    pub fn overlays(&self) -> &[OverlayBatch] {
        &self.overlays
    }

    pub fn counters(&self) -> FrameCounters {
        self.counters
    }

    pub fn last_view_proj(&self) -> Option<Mat4> {
        self.last_view_proj
    }

    fn now(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    fn message(&self, level: MessageLevel, text: impl Into<String>) {
        let time = self.now();
        self.messages.borrow_mut().push(EngineMessage {
            level,
            time,
            text: text.into(),
        });
    }

    fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(index_of(handle.0)?)
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(index_of(handle.0)?)
    }

    fn resource_of_kind(&self, handle: ResHandle, kind: ResourceKind) -> Option<&ResourceInfo> {
        self.resource(handle).filter(|r| r.kind == kind)
    }

    fn push_node(&mut self, node: Node) -> NodeHandle {
        self.nodes.push(node);
        NodeHandle(self.nodes.len() as u32)
    }

    fn world_matrix(&self, handle: NodeHandle) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = self.node(handle);
        while let Some(node) = current {
            matrix = node.transform.matrix() * matrix;
            current = node.parent.and_then(|p| self.node(p));
        }
        matrix
    }

    fn descendants(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![handle];
        while let Some(parent) = stack.pop() {
            for (i, node) in self.nodes.iter().enumerate() {
                if node.parent == Some(parent) {
                    let child = NodeHandle(i as u32 + 1);
                    out.push(child);
                    stack.push(child);
                }
            }
        }
        out
    }

    fn register(&mut self, kind: ResourceKind, name: &str, flags: u32) -> ResHandle {
        if let Some(existing) = self.find_resource(kind, name) {
            return existing;
        }
        self.resources.push(ResourceInfo {
            kind,
            name: name.to_string(),
            flags,
            loaded: false,
            failed: false,
            uniforms: HashMap::new(),
            buffer_size: None,
        });
        ResHandle(self.resources.len() as u32)
    }

    fn load_one(&self, content_dir: &Path, index: usize) -> Result<Vec<Dependency>, String> {
        let name = &self.resources[index].name;
        let path = content_dir.join(name);
        if !is_xml_resource(name) {
            return if path.is_file() {
                Ok(Vec::new())
            } else {
                Err(format!("file not found: {}", path.display()))
            };
        }
        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        scan_dependencies(&raw).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Surface clear colour for the current options and active pipeline.
    pub fn clear_color(&self) -> wgpu::Color {
        if self.option(EngineOption::DebugViewMode) > 0.0 {
            return wgpu::Color {
                r: 0.25,
                g: 0.25,
                b: 0.25,
                a: 1.0,
            };
        }
        if self.option(EngineOption::WireframeMode) > 0.0 {
            return wgpu::Color::BLACK;
        }
        const PALETTE: [(f64, f64, f64); 4] = [
            (0.05, 0.07, 0.12),
            (0.12, 0.10, 0.06),
            (0.06, 0.11, 0.08),
            (0.10, 0.06, 0.11),
        ];
        let slot = self.last_pipeline.map_or(0, |p| p.0 as usize % PALETTE.len());
        let (r, g, b) = PALETTE[slot];
        wgpu::Color { r, g, b, a: 1.0 }
    }
}

impl Default for SceneEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderEngine for SceneEngine {
    fn init(&mut self) -> Result<(), EngineError> {
        if self.initialized {
            return Err(EngineError::AlreadyInitialized);
        }
        self.initialized = true;
        self.started = Instant::now();
        self.message(MessageLevel::Info, "Engine initialized");
        Ok(())
    }

    fn release(&mut self) {
        if !self.initialized {
            return;
        }
        self.message(
            MessageLevel::Info,
            format!(
                "Engine released ({} frames, {} resources, {} nodes)",
                self.counters.frames,
                self.resources.len(),
                self.nodes.len()
            ),
        );
        self.resources.clear();
        self.nodes.truncate(1);
        self.texts.clear();
        self.overlays.clear();
        self.initialized = false;
    }

    fn set_option(&mut self, option: EngineOption, value: f32) -> bool {
        let valid = match option {
            EngineOption::LoadTextures
            | EngineOption::TexCompression
            | EngineOption::FastAnimation
            | EngineOption::DebugViewMode
            | EngineOption::WireframeMode => value == 0.0 || value == 1.0,
            EngineOption::MaxAnisotropy => (1.0..=16.0).contains(&value) && value.fract() == 0.0,
            EngineOption::ShadowMapSize => VALID_SHADOW_MAP_SIZES.contains(&value),
        };
        if !valid {
            self.message(
                MessageLevel::Warning,
                format!("Invalid value {value} for option {option:?}"),
            );
            return false;
        }
        self.options.insert(option, value);
        true
    }

    fn option(&self, option: EngineOption) -> f32 {
        self.options.get(&option).copied().unwrap_or(0.0)
    }

    fn add_resource(&mut self, kind: ResourceKind, name: &str, flags: u32) -> ResHandle {
        if name.trim().is_empty() {
            self.message(MessageLevel::Warning, "Resource registered with an empty name");
        }
        self.register(kind, name, flags)
    }

    fn find_resource(&self, kind: ResourceKind, name: &str) -> Option<ResHandle> {
        self.resources
            .iter()
            .position(|r| r.kind == kind && r.name == name)
            .map(|i| ResHandle(i as u32 + 1))
    }

    fn load_resources_from_disk(&mut self, content_dir: &Path) -> bool {
        for resource in &mut self.resources {
            resource.failed = false;
        }

        let load_textures = self.option(EngineOption::LoadTextures) > 0.0;
        let mut all_ok = true;
        loop {
            let pending: Vec<usize> = self
                .resources
                .iter()
                .enumerate()
                .filter(|(_, r)| !r.loaded && !r.failed)
                .map(|(i, _)| i)
                .collect();
            if pending.is_empty() {
                break;
            }

            for index in pending {
                if !load_textures && self.resources[index].kind == ResourceKind::Texture {
                    // Textures stay registered but are treated as resident.
                    self.resources[index].loaded = true;
                    continue;
                }
                match self.load_one(content_dir, index) {
                    Ok(deps) => {
                        self.resources[index].loaded = true;
                        self.message(
                            MessageLevel::Debug,
                            format!("Loaded resource '{}'", self.resources[index].name),
                        );
                        for dep in deps {
                            self.register(dep.kind, &dep.name, 0);
                        }
                    }
                    Err(err) => {
                        self.resources[index].failed = true;
                        all_ok = false;
                        self.message(
                            MessageLevel::Error,
                            format!(
                                "Failed to load resource '{}': {err}",
                                self.resources[index].name
                            ),
                        );
                    }
                }
            }
        }
        all_ok
    }

    fn add_nodes(&mut self, parent: NodeHandle, scene_res: ResHandle) -> Option<NodeHandle> {
        if self.node(parent).is_none() {
            self.message(MessageLevel::Error, format!("add_nodes: invalid parent {parent:?}"));
            return None;
        }
        let Some(resource) = self.resource_of_kind(scene_res, ResourceKind::SceneGraph) else {
            self.message(
                MessageLevel::Error,
                format!("add_nodes: {scene_res:?} is not a scene graph resource"),
            );
            return None;
        };
        if !resource.loaded {
            self.message(
                MessageLevel::Error,
                format!("add_nodes: scene graph '{}' is not loaded", resource.name),
            );
            return None;
        }
        let name = Path::new(&resource.name)
            .file_name()
            .and_then(|f| f.to_str())
            .and_then(|f| f.split('.').next())
            .unwrap_or("group")
            .to_string();
        let node = Node::new(
            NodeKind::Group {
                resource: scene_res,
            },
            &name,
            Some(parent),
        );
        Some(self.push_node(node))
    }

    fn add_camera_node(
        &mut self,
        parent: NodeHandle,
        name: &str,
        pipeline: ResHandle,
    ) -> Option<NodeHandle> {
        if self.node(parent).is_none() {
            self.message(
                MessageLevel::Error,
                format!("add_camera_node: invalid parent {parent:?}"),
            );
            return None;
        }
        if self.resource_of_kind(pipeline, ResourceKind::Pipeline).is_none() {
            self.message(
                MessageLevel::Error,
                format!("add_camera_node: {pipeline:?} is not a pipeline resource"),
            );
            return None;
        }
        let mut node = Node::new(
            NodeKind::Camera {
                view: CameraView::default(),
            },
            name,
            Some(parent),
        );
        node.int_params.insert(NodeParam::PipelineRes, pipeline.as_param());
        node.int_params.insert(NodeParam::ViewportX, 0);
        node.int_params.insert(NodeParam::ViewportY, 0);
        node.int_params.insert(NodeParam::ViewportWidth, 320);
        node.int_params.insert(NodeParam::ViewportHeight, 240);
        Some(self.push_node(node))
    }

    fn add_light_node(
        &mut self,
        parent: NodeHandle,
        name: &str,
        material: Option<ResHandle>,
        lighting_context: &str,
        shadow_context: &str,
    ) -> Option<NodeHandle> {
        if self.node(parent).is_none() {
            self.message(MessageLevel::Error, format!("add_light_node: invalid parent {parent:?}"));
            return None;
        }
        if let Some(mat) = material {
            if self.resource_of_kind(mat, ResourceKind::Material).is_none() {
                self.message(
                    MessageLevel::Error,
                    format!("add_light_node: {mat:?} is not a material resource"),
                );
                return None;
            }
        }
        let mut node = Node::new(
            NodeKind::Light {
                material,
                lighting_context: lighting_context.to_string(),
                shadow_context: shadow_context.to_string(),
            },
            name,
            Some(parent),
        );
        node.int_params.insert(NodeParam::ShadowMapCount, 0);
        node.float_params.insert(NodeParam::Radius, [100.0, 0.0, 0.0, 0.0]);
        node.float_params.insert(NodeParam::Fov, [90.0, 0.0, 0.0, 0.0]);
        node.float_params.insert(NodeParam::ShadowMapBias, [0.005, 0.0, 0.0, 0.0]);
        node.float_params.insert(NodeParam::Color, [1.0, 1.0, 1.0, 0.0]);
        node.float_params.insert(NodeParam::ColorMultiplier, [1.0, 0.0, 0.0, 0.0]);
        Some(self.push_node(node))
    }

    fn set_node_transform(&mut self, node: NodeHandle, transform: &Transform) {
        if let Some(n) = self.node_mut(node) {
            n.transform = *transform;
            return;
        }
        self.message(
            MessageLevel::Warning,
            format!("set_node_transform: invalid node {node:?}"),
        );
    }

    fn set_node_param_i(&mut self, node: NodeHandle, param: NodeParam, value: i32) {
        let Some(target) = self.node(node) else {
            self.message(MessageLevel::Warning, format!("set_node_param_i: invalid node {node:?}"));
            return;
        };
        if !target.accepts_int(param) {
            self.message(
                MessageLevel::Warning,
                format!(
                    "set_node_param_i: {param:?} is not an integer parameter of {} '{}'",
                    target.type_name(),
                    target.name
                ),
            );
            return;
        }
        if param == NodeParam::PipelineRes {
            let is_pipeline = ResHandle::from_param(value)
                .and_then(|h| self.resource_of_kind(h, ResourceKind::Pipeline))
                .is_some();
            if !is_pipeline {
                self.message(
                    MessageLevel::Warning,
                    format!("set_node_param_i: {value} is not a pipeline resource"),
                );
                return;
            }
        }
        if let Some(target) = self.node_mut(node) {
            target.int_params.insert(param, value);
        }
    }

    fn get_node_param_i(&self, node: NodeHandle, param: NodeParam) -> i32 {
        match self.node(node).and_then(|n| n.int_params.get(&param)) {
            Some(&value) => value,
            None => {
                self.message(
                    MessageLevel::Warning,
                    format!("get_node_param_i: {param:?} not available on node {node:?}"),
                );
                0
            }
        }
    }

    fn set_node_param_f(
        &mut self,
        node: NodeHandle,
        param: NodeParam,
        component: usize,
        value: f32,
    ) {
        let Some(target) = self.node(node) else {
            self.message(MessageLevel::Warning, format!("set_node_param_f: invalid node {node:?}"));
            return;
        };
        if component >= target.float_components(param) {
            self.message(
                MessageLevel::Warning,
                format!(
                    "set_node_param_f: {param:?}[{component}] is not a float parameter of {} '{}'",
                    target.type_name(),
                    target.name
                ),
            );
            return;
        }
        if let Some(target) = self.node_mut(node) {
            target.float_params.entry(param).or_insert([0.0; 4])[component] = value;
        }
    }

    fn set_node_flags(&mut self, node: NodeHandle, flags: NodeFlags, recursive: bool) {
        if self.node(node).is_none() {
            self.message(MessageLevel::Warning, format!("set_node_flags: invalid node {node:?}"));
            return;
        }
        let mut targets = vec![node];
        if recursive {
            targets.extend(self.descendants(node));
        }
        for handle in targets {
            if let Some(n) = self.node_mut(handle) {
                n.flags = flags;
            }
        }
    }

    fn setup_camera_view(
        &mut self,
        camera: NodeHandle,
        fov_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) {
        if !(aspect.is_finite() && aspect > 0.0 && near > 0.0 && far > near) {
            self.message(
                MessageLevel::Warning,
                format!(
                    "setup_camera_view: invalid frustum (aspect {aspect}, near {near}, far {far})"
                ),
            );
            return;
        }
        if let Some(Node {
            kind: NodeKind::Camera { view },
            ..
        }) = self.node_mut(camera)
        {
            *view = CameraView {
                fov_y_deg: fov_deg,
                aspect,
                near,
                far,
            };
            return;
        }
        self.message(
            MessageLevel::Warning,
            format!("setup_camera_view: {camera:?} is not a camera"),
        );
    }

    fn resize_pipeline_buffers(&mut self, pipeline: ResHandle, width: u32, height: u32) {
        let Some(index) = index_of(pipeline.0)
            .filter(|&i| self.resources.get(i).is_some_and(|r| r.kind == ResourceKind::Pipeline))
        else {
            self.message(
                MessageLevel::Warning,
                format!("resize_pipeline_buffers: {pipeline:?} is not a pipeline resource"),
            );
            return;
        };
        self.resources[index].buffer_size = Some((width, height));
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(width, height);
        }
    }

    fn set_material_uniform(&mut self, material: ResHandle, name: &str, values: [f32; 4]) -> bool {
        let Some(index) = index_of(material.0)
            .filter(|&i| self.resources.get(i).is_some_and(|r| r.kind == ResourceKind::Material))
        else {
            self.message(
                MessageLevel::Warning,
                format!("set_material_uniform: {material:?} is not a material resource"),
            );
            return false;
        };
        if !self.resources[index].loaded {
            self.message(
                MessageLevel::Warning,
                format!(
                    "set_material_uniform: material '{}' is not loaded",
                    self.resources[index].name
                ),
            );
            return false;
        }
        self.resources[index]
            .uniforms
            .insert(name.to_string(), values);
        true
    }

    fn show_frame_stats(
        &mut self,
        font_material: ResHandle,
        panel_material: ResHandle,
        level: StatLevel,
    ) {
        if !level.is_visible() {
            return;
        }
        let mut lines = vec![
            format!("Frame time: {:.2} ms", self.timer.smoothed_frame_time_ms),
            format!("FPS: {:.1}", self.timer.smoothed_fps),
        ];
        if level.get() >= 2 {
            lines.push(format!("Resources: {}", self.resources.len()));
            lines.push(format!("Nodes: {}", self.nodes.len()));
            lines.push(format!("Overlays: {}", self.overlays.len()));
        }

        let line_height = STAT_TEXT_SIZE * 1.2;
        let panel_bottom = STAT_TEXT_Y + line_height * lines.len() as f32 + 0.01;
        let panel = [
            OverlayVertex::new(0.0, 0.0, 0.0, 1.0),
            OverlayVertex::new(0.0, panel_bottom, 0.0, 0.0),
            OverlayVertex::new(0.3, panel_bottom, 1.0, 0.0),
            OverlayVertex::new(0.3, 0.0, 1.0, 1.0),
        ];
        self.show_overlays(&panel, [0.0, 0.0, 0.0, 0.6], panel_material, 0);
        for (i, line) in lines.iter().enumerate() {
            self.show_text(
                line,
                STAT_TEXT_X,
                STAT_TEXT_Y + line_height * i as f32,
                STAT_TEXT_SIZE,
                [1.0, 1.0, 1.0],
                font_material,
            );
        }
    }

    fn show_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: [f32; 3],
        font_material: ResHandle,
    ) {
        if self
            .resource_of_kind(font_material, ResourceKind::Material)
            .is_none()
        {
            self.message(
                MessageLevel::Warning,
                format!("show_text: {font_material:?} is not a material resource"),
            );
            return;
        }
        self.texts.push(TextItem {
            text: text.to_string(),
            x,
            y,
            size,
            color,
            font_material,
        });
    }

    fn show_overlays(
        &mut self,
        vertices: &[OverlayVertex],
        color: [f32; 4],
        material: ResHandle,
        flags: u32,
    ) {
        if vertices.is_empty() || vertices.len() % 4 != 0 {
            self.message(
                MessageLevel::Warning,
                format!(
                    "show_overlays: vertex count {} is not a multiple of 4",
                    vertices.len()
                ),
            );
            return;
        }
        if self.resource_of_kind(material, ResourceKind::Material).is_none() {
            self.message(
                MessageLevel::Warning,
                format!("show_overlays: {material:?} is not a material resource"),
            );
            return;
        }
        self.overlays.push(OverlayBatch {
            floats: overlay_floats(vertices).to_vec(),
            color,
            material,
            flags,
        });
    }

    fn render(&mut self, camera: NodeHandle) {
        let Some(NodeKind::Camera { view }) = self.node(camera).map(|n| n.kind.clone()) else {
            self.message(MessageLevel::Error, format!("render: {camera:?} is not a camera"));
            return;
        };
        let pipeline = ResHandle::from_param(self.get_node_param_i(camera, NodeParam::PipelineRes));
        let pipeline_loaded = pipeline
            .and_then(|p| self.resource_of_kind(p, ResourceKind::Pipeline))
            .is_some_and(|r| r.loaded);
        if !pipeline_loaded {
            self.message(MessageLevel::Error, "render: camera pipeline is not loaded");
            return;
        }

        let world = self.world_matrix(camera);
        let (_, rotation, translation) = world.to_scale_rotation_translation();
        let view_proj =
            view.projection() * Mat4::from_rotation_translation(rotation, translation).inverse();
        self.last_view_proj = Some(view_proj);
        self.last_pipeline = pipeline;
        self.counters.renders += 1;
    }

    fn finalize_frame(&mut self) {
        self.timer.begin_frame();
        self.counters.frames += 1;
        if let Some(gpu) = &self.gpu {
            gpu.present_clear(self.clear_color());
        }
    }

    fn clear_overlays(&mut self) {
        self.texts.clear();
        self.overlays.clear();
    }

    fn drain_messages(&mut self) -> Vec<EngineMessage> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }
}

fn index_of(raw: u32) -> Option<usize> {
    (raw as usize).checked_sub(1)
}

fn default_options() -> HashMap<EngineOption, f32> {
    HashMap::from([
        (EngineOption::LoadTextures, 1.0),
        (EngineOption::TexCompression, 1.0),
        (EngineOption::FastAnimation, 1.0),
        (EngineOption::MaxAnisotropy, 1.0),
        (EngineOption::ShadowMapSize, 1024.0),
        (EngineOption::DebugViewMode, 0.0),
        (EngineOption::WireframeMode, 0.0),
    ])
}
