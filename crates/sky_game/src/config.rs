use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use sky_core::CameraPose;
use sky_platform::PlatformConfig;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Root the engine resolves resource names against.
    pub content_dir: PathBuf,
    pub window: WindowSettings,
    pub engine: EngineSettings,
    pub hdr: HdrSettings,
    pub camera: CameraSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub capture_cursor: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    pub load_textures: bool,
    pub tex_compression: bool,
    pub fast_animation: bool,
    pub max_anisotropy: u32,
    pub shadow_map_size: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HdrSettings {
    pub exposure: f32,
    pub bright_threshold: f32,
    pub bright_offset: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSettings {
    pub start: [f32; 3],
    pub pitch: f32,
    pub yaw: f32,
    pub velocity: f32,
    /// Push the free-look pose into the camera node every frame. Off by
    /// default: the scene camera keeps its fixed placement.
    pub drive_camera: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("Content"),
            window: WindowSettings::default(),
            engine: EngineSettings::default(),
            hdr: HdrSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        let platform = PlatformConfig::default();
        Self {
            title: platform.title,
            width: platform.width,
            height: platform.height,
            capture_cursor: platform.capture_cursor,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            load_textures: true,
            tex_compression: false,
            fast_animation: false,
            max_anisotropy: 4,
            shadow_map_size: 2048,
        }
    }
}

impl Default for HdrSettings {
    fn default() -> Self {
        Self {
            exposure: 2.5,
            bright_threshold: 0.5,
            bright_offset: 0.08,
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        let pose = CameraPose::default();
        Self {
            start: pose.position.to_array(),
            pitch: pose.rx,
            yaw: pose.ry,
            velocity: pose.velocity,
            drive_camera: false,
        }
    }
}

impl AppConfig {
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.window.title.clone(),
            width: self.window.width,
            height: self.window.height,
            capture_cursor: self.window.capture_cursor,
        }
    }

    pub fn initial_pose(&self) -> CameraPose {
        CameraPose {
            position: Vec3::from_array(self.camera.start),
            rx: self.camera.pitch.clamp(-90.0, 90.0),
            ry: self.camera.yaw,
            velocity: self.camera.velocity,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<AppConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let mut config: AppConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;

    // Relative content paths are relative to the config file, not the cwd.
    if config.content_dir.is_relative() {
        if let Some(parent) = path.parent() {
            config.content_dir = parent.join(&config.content_dir);
        }
    }
    Ok(config)
}

/// Loads `path` if it exists, otherwise falls back to built-in defaults.
pub fn load_or_default(path: &Path) -> Result<AppConfig, String> {
    if path.exists() {
        let config = load_config_from_path(path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    } else {
        log::info!(
            "No config at {}, using built-in defaults",
            path.display()
        );
        Ok(AppConfig::default())
    }
}

fn validate_config(config: &AppConfig) -> Result<(), String> {
    if config.window.width == 0 || config.window.height == 0 {
        return Err(format!(
            "Config validation failed: window size {}x{} must be non-zero",
            config.window.width, config.window.height
        ));
    }
    if !(1..=16).contains(&config.engine.max_anisotropy) {
        return Err(format!(
            "Config validation failed: max_anisotropy {} must be within 1..=16",
            config.engine.max_anisotropy
        ));
    }
    if !config.engine.shadow_map_size.is_power_of_two() {
        return Err(format!(
            "Config validation failed: shadow_map_size {} must be a power of two",
            config.engine.shadow_map_size
        ));
    }
    if !(config.camera.velocity.is_finite() && config.camera.velocity >= 0.0) {
        return Err(format!(
            "Config validation failed: camera velocity {} must be >= 0",
            config.camera.velocity
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "sky_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn write_config_file(path: &Path, body: &str) {
        fs::write(path, body).expect("failed to write temp config file");
    }

    #[test]
    fn defaults_match_sample_setup() {
        let config = AppConfig::default();
        assert_eq!(config.engine.max_anisotropy, 4);
        assert_eq!(config.engine.shadow_map_size, 2048);
        assert!(config.engine.load_textures);
        assert!(!config.engine.tex_compression);
        assert!((config.hdr.exposure - 2.5).abs() < f32::EPSILON);
        assert_eq!(config.initial_pose(), CameraPose::default());
        assert!(!config.camera.drive_camera);
    }

    #[test]
    fn partial_config_keeps_defaults_for_missing_fields() {
        let path = temp_file_path("partial");
        write_config_file(
            &path,
            r#"{ "window": { "width": 800 }, "camera": { "drive_camera": true } }"#,
        );
        let config = load_config_from_path(&path).expect("partial config should load");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, WindowSettings::default().height);
        assert!(config.camera.drive_camera);
        assert_eq!(config.engine, EngineSettings::default());
    }

    #[test]
    fn relative_content_dir_resolves_against_config_location() {
        let path = temp_file_path("content_dir");
        write_config_file(&path, r#"{ "content_dir": "../Content" }"#);
        let config = load_config_from_path(&path).expect("config should load");
        let parent = path.parent().expect("temp file has a parent");
        assert_eq!(config.content_dir, parent.join("../Content"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let path = temp_file_path("unknown");
        write_config_file(&path, r#"{ "engine": { "shadow_size": 1024 } }"#);
        let err = load_config_from_path(&path).expect_err("unknown field should fail");
        assert!(err.contains("Failed to parse config JSON"), "unexpected error: {err}");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let path = temp_file_path("zero_height");
        write_config_file(&path, r#"{ "window": { "height": 0 } }"#);
        let err = load_config_from_path(&path).expect_err("zero height should fail");
        assert!(err.contains("must be non-zero"));

        let path = temp_file_path("shadow_size");
        write_config_file(&path, r#"{ "engine": { "shadow_map_size": 1000 } }"#);
        let err = load_config_from_path(&path).expect_err("odd shadow size should fail");
        assert!(err.contains("power of two"));

        let path = temp_file_path("anisotropy");
        write_config_file(&path, r#"{ "engine": { "max_anisotropy": 0 } }"#);
        assert!(load_config_from_path(&path).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = temp_file_path("absent");
        let config = load_or_default(&path).expect("absent config should fall back");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn shipped_sample_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../sample.json");
        let config = load_config_from_path(&path).expect("sample.json should load");
        assert_eq!(config.engine, EngineSettings::default());
        assert_eq!(config.hdr, HdrSettings::default());
        assert_eq!(config.initial_pose(), CameraPose::default());
        assert!(config.content_dir.join("pipelines/hdr.pipeline.xml").is_file());
    }

    #[test]
    fn initial_pose_clamps_configured_pitch() {
        let config = AppConfig {
            camera: CameraSettings {
                pitch: 170.0,
                ..CameraSettings::default()
            },
            ..AppConfig::default()
        };
        assert!((config.initial_pose().rx - 90.0).abs() < f32::EPSILON);
    }
}
