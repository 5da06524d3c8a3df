use glam::Vec3;
use sky_core::{CameraPose, FreezeMode, InputState, Key, StatLevel};
use sky_render::{
    dump_messages, EngineOption, NodeParam, OverlayVertex, RenderEngine, ResHandle, Transform,
};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::scene_setup::{self, flag, SceneHandles};

const FOV_Y_DEG: f32 = 45.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;
const INITIAL_FPS: f32 = 30.0;
const BOOST_FACTOR: f32 = 5.0;
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// Per-frame driver of the sample: turns input into mode toggles and camera
/// motion, and sequences the engine calls for one frame.
pub struct FrameController<E: RenderEngine> {
    engine: E,
    handles: SceneHandles,
    pose: CameraPose,
    drive_camera: bool,
    cur_fps: f32,
    freeze_mode: FreezeMode,
    debug_view: bool,
    wireframe: bool,
    stat_level: StatLevel,
    anim_time: f32,
    weight: f32,
}

impl<E: RenderEngine> FrameController<E> {
    /// Initializes `engine` and builds the sample scene. Engine messages are
    /// flushed to the log before returning, on success and failure alike.
    pub fn init(mut engine: E, config: &AppConfig) -> Result<Self, AppError> {
        if let Err(err) = engine.init() {
            dump_messages(&mut engine);
            return Err(AppError::EngineInit(err));
        }

        let built = scene_setup::build_scene(&mut engine, config);
        dump_messages(&mut engine);
        let handles = built?;
        log::info!("Scene ready, camera {:?}", handles.camera);

        Ok(Self {
            engine,
            handles,
            pose: config.initial_pose(),
            drive_camera: config.camera.drive_camera,
            cur_fps: INITIAL_FPS,
            freeze_mode: FreezeMode::Live,
            debug_view: false,
            wireframe: false,
            stat_level: StatLevel::HIDDEN,
            anim_time: 0.0,
            weight: 1.0,
        })
    }

    pub fn on_frame(&mut self, fps: f32) {
        self.cur_fps = fps;
        if self.freeze_mode == FreezeMode::Live && fps > 0.0 {
            self.anim_time += 1.0 / fps;
        }

        self.engine
            .set_option(EngineOption::DebugViewMode, flag(self.debug_view));
        self.engine
            .set_option(EngineOption::WireframeMode, flag(self.wireframe));

        if self.drive_camera {
            let transform = Transform::from_translation(self.pose.position)
                .with_rotation(Vec3::new(self.pose.rx, self.pose.ry, 0.0));
            self.engine.set_node_transform(self.handles.camera, &transform);
        }

        self.engine.show_frame_stats(
            self.handles.font_material,
            self.handles.panel_material,
            self.stat_level,
        );
        if self.stat_level.is_visible() {
            let text = format!("Weight: {:.2}", self.weight);
            self.engine
                .show_text(&text, 0.03, 0.24, 0.026, WHITE, self.handles.font_material);
        }

        let logo = logo_overlay(self.viewport_aspect());
        self.engine
            .show_overlays(&logo, [1.0; 4], self.handles.logo_material, 0);

        self.engine.render(self.handles.camera);
        self.engine.finalize_frame();
        self.engine.clear_overlays();
        dump_messages(&mut self.engine);
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if height == 0 {
            log::warn!("Ignoring resize to {width}x{height}");
            return;
        }
        let camera = self.handles.camera;
        self.engine.set_node_param_i(camera, NodeParam::ViewportX, 0);
        self.engine.set_node_param_i(camera, NodeParam::ViewportY, 0);
        self.engine
            .set_node_param_i(camera, NodeParam::ViewportWidth, width as i32);
        self.engine
            .set_node_param_i(camera, NodeParam::ViewportHeight, height as i32);

        let aspect = width as f32 / height as f32;
        self.engine
            .setup_camera_view(camera, FOV_Y_DEG, aspect, NEAR_PLANE, FAR_PLANE);
        self.engine
            .resize_pipeline_buffers(self.handles.hdr_pipeline, width, height);
        self.engine
            .resize_pipeline_buffers(self.handles.forward_pipeline, width, height);
    }

    /// Edge-triggered toggles. `input.previous` must still hold last frame's
    /// keys, so call this before `InputState::end_frame`.
    pub fn on_key_state(&mut self, input: &InputState) {
        if input.is_just_pressed(Key::Space) {
            self.freeze_mode = self.freeze_mode.next();
            log::info!("Freeze mode: {}", self.freeze_mode);
        }
        if input.is_just_pressed(Key::F3) {
            self.toggle_pipeline();
        }
        if input.is_just_pressed(Key::F7) {
            self.debug_view = !self.debug_view;
            log::info!("Debug view: {}", self.debug_view);
        }
        if input.is_just_pressed(Key::F8) {
            self.wireframe = !self.wireframe;
            log::info!("Wireframe: {}", self.wireframe);
        }
        for key in [Key::F6, Key::E] {
            if input.is_just_pressed(key) {
                self.stat_level = self.stat_level.next();
                log::info!("Stat level: {}", self.stat_level);
            }
        }
    }

    /// Level-triggered free-fly movement and blend weight control.
    pub fn on_held_keys(&mut self, input: &InputState) {
        if self.freeze_mode == FreezeMode::FrozenLook || self.cur_fps <= 0.0 {
            return;
        }
        let mut step = self.pose.velocity / self.cur_fps;
        if input.is_held(Key::LShift) {
            step *= BOOST_FACTOR;
        }
        if input.is_held(Key::W) {
            self.pose.move_forward(step);
        }
        if input.is_held(Key::S) {
            self.pose.move_forward(-step);
        }
        if input.is_held(Key::A) {
            self.pose.strafe(-step);
        }
        if input.is_held(Key::D) {
            self.pose.strafe(step);
        }

        let weight_step = 2.0 / self.cur_fps;
        if input.is_held(Key::Digit1) {
            self.weight = (self.weight - weight_step).max(0.0);
        }
        if input.is_held(Key::Digit2) {
            self.weight = (self.weight + weight_step).min(1.0);
        }
    }

    pub fn on_mouse_move(&mut self, dx: f32, dy: f32) {
        if self.freeze_mode == FreezeMode::FrozenLook {
            return;
        }
        self.pose.look(dx, dy);
    }

    pub fn release(mut self) {
        self.engine.release();
        dump_messages(&mut self.engine);
    }

    fn toggle_pipeline(&mut self) {
        let camera = self.handles.camera;
        let current =
            ResHandle::from_param(self.engine.get_node_param_i(camera, NodeParam::PipelineRes));
        let next = if current == Some(self.handles.hdr_pipeline) {
            self.handles.forward_pipeline
        } else {
            self.handles.hdr_pipeline
        };
        self.engine
            .set_node_param_i(camera, NodeParam::PipelineRes, next.as_param());
        log::info!("Camera pipeline: {next:?}");
    }

    fn viewport_aspect(&self) -> f32 {
        let camera = self.handles.camera;
        let width = self.engine.get_node_param_i(camera, NodeParam::ViewportWidth);
        let height = self.engine.get_node_param_i(camera, NodeParam::ViewportHeight);
        width as f32 / height.max(1) as f32
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn handles(&self) -> &SceneHandles {
        &self.handles
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn freeze_mode(&self) -> FreezeMode {
        self.freeze_mode
    }

    pub fn stat_level(&self) -> StatLevel {
        self.stat_level
    }

    pub fn debug_view(&self) -> bool {
        self.debug_view
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn anim_time(&self) -> f32 {
        self.anim_time
    }

    pub fn cur_fps(&self) -> f32 {
        self.cur_fps
    }

    pub fn active_pipeline(&self) -> Option<ResHandle> {
        ResHandle::from_param(
            self.engine
                .get_node_param_i(self.handles.camera, NodeParam::PipelineRes),
        )
    }
}

/// Logo quad pinned to the top-right corner. Overlay x runs 0..aspect, y 0..1.
pub fn logo_overlay(aspect: f32) -> [OverlayVertex; 4] {
    [
        OverlayVertex::new(aspect - 0.4, 0.8, 0.0, 1.0),
        OverlayVertex::new(aspect - 0.4, 1.0, 0.0, 0.0),
        OverlayVertex::new(aspect, 1.0, 1.0, 0.0),
        OverlayVertex::new(aspect, 0.8, 1.0, 1.0),
    ]
}
