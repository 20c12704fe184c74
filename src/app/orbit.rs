//! Mouse-driven camera orbit around a target point.
//!
//! Left drag rotates, right drag pans and the wheel zooms. The camera is
//! kept on a sphere around `center` and always faces it with its -Z axis.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::app::input::{Input, PointerButton};
use crate::scene::transform::{Transform, look_rotation};

const POLE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub enabled: bool,
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            target: Vec3::ZERO,
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            enable_damping: false,
            damping_factor: 0.05,
            min_distance: 0.1,
            max_distance: 1000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    pub center: Vec3,
    pub radius: f32,
    /// Azimuth around +Y, measured from +Z.
    pub theta: f32,
    /// Polar angle from +Y.
    pub phi: f32,

    rotate_delta: Vec2,
}

impl OrbitControls {
    /// Controls that start from `camera_position` and orbit `settings.target`.
    #[must_use]
    pub fn from_settings(settings: &OrbitSettings, camera_position: Vec3) -> Self {
        let offset = camera_position - settings.target;
        let radius = offset.length();
        let mut controls = Self::with_settings(settings, settings.target, radius);
        if radius > f32::EPSILON {
            controls.theta = offset.x.atan2(offset.z);
            controls.phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        }
        controls
    }

    fn with_settings(settings: &OrbitSettings, center: Vec3, radius: f32) -> Self {
        Self {
            rotate_speed: settings.rotate_speed,
            zoom_speed: settings.zoom_speed,
            pan_speed: settings.pan_speed,
            damping_factor: settings.damping_factor,
            enable_damping: settings.enable_damping,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
            center,
            radius,
            theta: 0.0,
            phi: PI / 2.0,
            rotate_delta: Vec2::ZERO,
        }
    }

    /// Direction from `center` to the camera.
    #[must_use]
    pub fn offset_direction(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }

    /// Applies this frame's pointer input and places `transform` on the orbit.
    ///
    /// `fov` is the camera's vertical field of view in radians.
    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov: f32, dt: f32) {
        let screen_height = input.screen_size.y.max(1.0);

        if input.is_button_pressed(PointerButton::Left) {
            let rotate_per_pixel = TAU / screen_height;
            self.rotate_delta -= input.cursor_delta * rotate_per_pixel * self.rotate_speed;
        }

        if self.enable_damping {
            let retention = (1.0 - self.damping_factor).powf(dt.max(0.0) * 60.0);
            let applied = self.rotate_delta * (1.0 - retention);
            self.theta += applied.x;
            self.phi += applied.y;
            self.rotate_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }
        self.phi = self.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);

        if input.scroll_delta.y.abs() > f32::EPSILON {
            let scale = (1.0 - self.zoom_speed).powf(input.scroll_delta.y.abs());
            if input.scroll_delta.y > 0.0 {
                self.radius *= scale;
            } else {
                self.radius /= scale;
            }
        }
        // Tolerates min_distance > max_distance.
        self.radius = self.radius.max(self.min_distance).min(self.max_distance);

        if input.is_button_pressed(PointerButton::Right) {
            let world_height = 2.0 * self.radius * (fov / 2.0).tan();
            let world_per_pixel = world_height / screen_height;

            let forward = -self.offset_direction();
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();

            self.center += (right * -input.cursor_delta.x + up * input.cursor_delta.y)
                * world_per_pixel
                * self.pan_speed;
        }

        let offset = self.offset_direction() * self.radius;
        transform.position = self.center + offset;
        if let Some(rotation) = look_rotation(offset, Vec3::Y) {
            transform.rotation = rotation;
        }
    }
}
