//! Demo Settings
//!
//! Everything the demo needs to build its scene, in one serde-friendly tree.
//! Every struct is `#[serde(default)]`, so a settings file only has to name
//! the values it changes:
//!
//! ```json
//! {
//!   "model": "characters/robot.glb",
//!   "camera": { "fov": 60.0 },
//!   "head_tracking": { "controllable_clips": [1] }
//! }
//! ```
//!
//! Colors are `0xRRGGBB` integers.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::app::orbit::OrbitSettings;
use crate::driver::HeadTracking;
use crate::errors::Result;
use crate::scene::light::ShadowConfig;

// ---------------------------------------------------------------------------
// DemoSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    pub title: String,
    /// Directory that model paths resolve against.
    pub asset_root: PathBuf,
    /// Primary model; its clips are driven by the clip driver.
    pub model: String,
    pub window: WindowSettings,
    pub renderer: RendererSettings,
    pub camera: CameraSettings,
    pub orbit: OrbitSettings,
    pub directional_light: DirectionalLightSettings,
    pub ambient_light: AmbientLightSettings,
    pub head_tracking: HeadTracking,
    /// Additional models that loop clip 0 of a separate animation file.
    pub extra_models: Vec<ExtraModel>,
    /// Upper bound, in seconds, for a single frame step.
    pub max_frame_delta: f32,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            title: "Kinema".to_string(),
            asset_root: PathBuf::from("."),
            model: "scene.glb".to_string(),
            window: WindowSettings::default(),
            renderer: RendererSettings::default(),
            camera: CameraSettings::default(),
            orbit: OrbitSettings::default(),
            directional_light: DirectionalLightSettings::default(),
            ambient_light: AmbientLightSettings::default(),
            head_tracking: HeadTracking::default(),
            extra_models: Vec::new(),
            max_frame_delta: 0.25,
        }
    }
}

impl DemoSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&text)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Master shadow switch. When off, no light gets a shadow map and model
    /// nodes neither cast nor receive shadows.
    pub shadows: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self { shadows: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 50.0,
            aspect: 1920.0 / 1080.0,
            near: 0.01,
            far: 1000.0,
            position: Vec3::new(0.0, 1.2, 2.3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightSettings {
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub cast_shadows: bool,
    pub shadow: ShadowConfig,
}

impl Default for DirectionalLightSettings {
    fn default() -> Self {
        Self {
            color: 0xFF_FFFF,
            intensity: 5.0,
            position: Vec3::new(5.0, 10.0, 7.5),
            target: Vec3::ZERO,
            cast_shadows: true,
            shadow: ShadowConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLightSettings {
    pub color: u32,
    pub intensity: f32,
}

impl Default for AmbientLightSettings {
    fn default() -> Self {
        Self {
            color: 0x84_6E62,
            intensity: 5.0,
        }
    }
}

/// A model that plays clip 0 of a separately stored animation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraModel {
    pub model: String,
    pub animation: String,
    pub offset: Vec3,
    pub scale: f32,
}

impl Default for ExtraModel {
    fn default() -> Self {
        Self {
            model: String::new(),
            animation: String::new(),
            offset: Vec3::ZERO,
            scale: 0.1,
        }
    }
}
