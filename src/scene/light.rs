use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Shadow map settings of a directional light.
///
/// The bounds describe the orthographic shadow camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub bias: f32,
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            bias: 0.0,
            map_size: 2048,
            near: 0.5,
            far: 500.0,
            left: -5.0,
            right: 5.0,
            top: 5.0,
            bottom: -5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Parallel light from the node position towards `target` (world space).
    Directional { target: Vec3 },
    /// Uniform light with no direction and no shadows.
    Ambient,
}

#[derive(Debug, Clone)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,

    pub cast_shadows: bool,
    pub shadow: Option<ShadowConfig>,
}

impl Light {
    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32, target: Vec3) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional { target },
            cast_shadows: false,
            shadow: None,
        }
    }

    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Ambient,
            cast_shadows: false,
            shadow: None,
        }
    }

    /// Enables shadow casting with the given settings.
    ///
    /// Ambient lights cannot cast shadows; the call is ignored for them.
    #[must_use]
    pub fn with_shadow(mut self, shadow: ShadowConfig) -> Self {
        if matches!(self.kind, LightKind::Ambient) {
            log::warn!("Ambient lights do not cast shadows");
            return self;
        }
        self.cast_shadows = true;
        self.shadow = Some(shadow);
        self
    }

    /// Converts a `0xRRGGBB` value into RGB components in `[0, 1]`.
    #[must_use]
    pub fn color_from_hex(hex: u32) -> Vec3 {
        Vec3::new(
            ((hex >> 16) & 0xFF) as f32 / 255.0,
            ((hex >> 8) & 0xFF) as f32 / 255.0,
            (hex & 0xFF) as f32 / 255.0,
        )
    }
}
