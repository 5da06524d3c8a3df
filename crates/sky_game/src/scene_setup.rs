//! Builds the fixed sample scene: options, resources, nodes, light and HDR
//! post-processing parameters.

use glam::Vec3;
use sky_render::{
    EngineOption, NodeFlags, NodeHandle, NodeParam, RenderEngine, ResHandle, ResourceKind,
    Transform,
};

use crate::config::AppConfig;
use crate::error::AppError;

pub const HDR_PIPELINE: &str = "pipelines/hdr.pipeline.xml";
pub const FORWARD_PIPELINE: &str = "pipelines/forward.pipeline.xml";
pub const FONT_MATERIAL: &str = "overlays/font.material.xml";
pub const PANEL_MATERIAL: &str = "overlays/panel.material.xml";
pub const LOGO_MATERIAL: &str = "overlays/logo.material.xml";
pub const ENVIRONMENT_SCENE: &str = "models/sphere/sphere.scene.xml";
pub const CONTROL_PANEL_SCENE: &str = "models/control-panel/control-panel.scene.xml";
pub const SKYBOX_SCENE: &str = "models/skybox/skybox.scene.xml";
pub const POST_HDR_MATERIAL: &str = "pipelines/postHDR.material.xml";

/// Handles the frame controller keeps after setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandles {
    pub hdr_pipeline: ResHandle,
    pub forward_pipeline: ResHandle,
    pub font_material: ResHandle,
    pub panel_material: ResHandle,
    pub logo_material: ResHandle,
    pub camera: NodeHandle,
    pub panel: Option<NodeHandle>,
}

pub fn build_scene<E: RenderEngine>(
    engine: &mut E,
    config: &AppConfig,
) -> Result<SceneHandles, AppError> {
    apply_engine_options(engine, config);

    let hdr_pipeline = engine.add_resource(ResourceKind::Pipeline, HDR_PIPELINE, 0);
    let forward_pipeline = engine.add_resource(ResourceKind::Pipeline, FORWARD_PIPELINE, 0);
    let font_material = engine.add_resource(ResourceKind::Material, FONT_MATERIAL, 0);
    let panel_material = engine.add_resource(ResourceKind::Material, PANEL_MATERIAL, 0);
    let logo_material = engine.add_resource(ResourceKind::Material, LOGO_MATERIAL, 0);
    let env_res = engine.add_resource(ResourceKind::SceneGraph, ENVIRONMENT_SCENE, 0);
    let panel_res = engine.add_resource(ResourceKind::SceneGraph, CONTROL_PANEL_SCENE, 0);
    let sky_res = engine.add_resource(ResourceKind::SceneGraph, SKYBOX_SCENE, 0);

    if !engine.load_resources_from_disk(&config.content_dir) {
        log::warn!(
            "Some resources failed to load from {}",
            config.content_dir.display()
        );
    }

    let camera = engine
        .add_camera_node(NodeHandle::ROOT, "Camera", hdr_pipeline)
        .ok_or(AppError::CameraCreation)?;
    engine.set_node_transform(
        camera,
        &Transform::from_translation(Vec3::new(0.0, 5.0, 8.0))
            .with_rotation(Vec3::new(330.0, 0.0, 0.0)),
    );

    match engine.add_nodes(NodeHandle::ROOT, env_res) {
        Some(env) => engine.set_node_transform(
            env,
            &Transform::from_translation(Vec3::new(0.0, -20.0, 0.0))
                .with_scale(Vec3::splat(20.0)),
        ),
        None => log::warn!("Environment '{ENVIRONMENT_SCENE}' was not added to the scene"),
    }

    let panel = engine.add_nodes(NodeHandle::ROOT, panel_res);
    match panel {
        Some(panel) => engine.set_node_transform(panel, &Transform::default()),
        None => log::warn!("Control panel '{CONTROL_PANEL_SCENE}' was not added to the scene"),
    }

    match engine.add_nodes(NodeHandle::ROOT, sky_res) {
        Some(sky) => {
            engine.set_node_transform(
                sky,
                &Transform::default().with_scale(Vec3::new(210.0, 50.0, 210.0)),
            );
            engine.set_node_flags(sky, NodeFlags::NO_CAST_SHADOW, true);
        }
        None => log::warn!("Skybox '{SKYBOX_SCENE}' was not added to the scene"),
    }

    add_light(engine);
    apply_hdr_settings(engine, config);

    Ok(SceneHandles {
        hdr_pipeline,
        forward_pipeline,
        font_material,
        panel_material,
        logo_material,
        camera,
        panel,
    })
}

fn apply_engine_options<E: RenderEngine>(engine: &mut E, config: &AppConfig) {
    let settings = &config.engine;
    let options = [
        (EngineOption::LoadTextures, flag(settings.load_textures)),
        (EngineOption::TexCompression, flag(settings.tex_compression)),
        (EngineOption::FastAnimation, flag(settings.fast_animation)),
        (EngineOption::MaxAnisotropy, settings.max_anisotropy as f32),
        (EngineOption::ShadowMapSize, settings.shadow_map_size as f32),
    ];
    for (option, value) in options {
        if !engine.set_option(option, value) {
            log::warn!("Engine rejected {option:?} = {value}");
        }
    }
}

fn add_light<E: RenderEngine>(engine: &mut E) {
    let Some(light) =
        engine.add_light_node(NodeHandle::ROOT, "Light1", None, "LIGHTING", "SHADOWMAP")
    else {
        log::warn!("Light 'Light1' was not added to the scene");
        return;
    };
    engine.set_node_transform(
        light,
        &Transform::from_translation(Vec3::new(0.0, 15.0, 10.0))
            .with_rotation(Vec3::new(-60.0, 0.0, 0.0)),
    );
    engine.set_node_param_f(light, NodeParam::Radius, 0, 30.0);
    engine.set_node_param_f(light, NodeParam::Fov, 0, 90.0);
    engine.set_node_param_i(light, NodeParam::ShadowMapCount, 1);
    engine.set_node_param_f(light, NodeParam::ShadowMapBias, 0, 0.01);
    for (component, value) in [1.0, 0.8, 0.7].into_iter().enumerate() {
        engine.set_node_param_f(light, NodeParam::Color, component, value);
    }
    engine.set_node_param_f(light, NodeParam::ColorMultiplier, 0, 1.0);
}

fn apply_hdr_settings<E: RenderEngine>(engine: &mut E, config: &AppConfig) {
    let Some(material) = engine.find_resource(ResourceKind::Material, POST_HDR_MATERIAL) else {
        log::warn!("'{POST_HDR_MATERIAL}' not found; HDR post-processing keeps its defaults");
        return;
    };
    let hdr = &config.hdr;
    let uniforms = [
        ("hdrExposure", hdr.exposure),
        ("hdrBrightThres", hdr.bright_threshold),
        ("hdrBrightOffset", hdr.bright_offset),
    ];
    for (name, value) in uniforms {
        if !engine.set_material_uniform(material, name, [value, 0.0, 0.0, 0.0]) {
            log::warn!("Failed to set {name} on '{POST_HDR_MATERIAL}'");
        }
    }
}

pub(crate) fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}
