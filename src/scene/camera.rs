use glam::Mat4;

/// Perspective camera settings.
///
/// The camera's placement lives on its node's transform; this only describes
/// the projection.
#[derive(Debug, Clone)]
pub struct Camera {
    pub name: String,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    projection_matrix: Mat4,
}

impl Camera {
    /// `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            name: "Camera".to_string(),
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    /// Changes the aspect ratio and refreshes the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        if !aspect.is_finite() || aspect <= 0.0 {
            log::warn!("Ignoring invalid camera aspect ratio {aspect}");
            return;
        }
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }
}
