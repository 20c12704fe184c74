use glam::{Affine3A, EulerRot, Mat3, Quat, Vec3};

/// Local position, rotation and scale of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn set_uniform_scale(&mut self, s: f32) {
        self.scale = Vec3::splat(s);
    }

    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// Turns the local +Z axis towards `target`.
    ///
    /// `target` and `up` are expressed in the parent's coordinate system.
    /// Degenerate inputs leave the rotation unchanged.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        if let Some(rotation) = look_rotation(target - self.position, up) {
            self.rotation = rotation;
        }
    }
}

/// Rotation whose +Z axis points along `direction`, with +Y as close to `up`
/// as possible. `None` when `direction` is zero or parallel to `up`.
#[must_use]
pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
    if direction.length_squared() < 1e-12 {
        return None;
    }
    let forward = direction.normalize();

    let right = up.cross(forward);
    if right.length_squared() < 1e-8 {
        return None;
    }
    let right = right.normalize();
    let new_up = forward.cross(right);

    Some(Quat::from_mat3(&Mat3::from_cols(right, new_up, forward)).normalize())
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
