use crate::util::math::Vector3;

/// Fixed pinhole camera looking down +z through a square viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3,
    pub viewport_size: f64,
    pub projection_plane_z: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            viewport_size: 1.0,
            projection_plane_z: 1.0,
        }
    }
}

impl Camera {
    /// Maps a canvas-centered pixel (y up) to a ray direction in camera space.
    ///
    /// The direction is not normalized; its z component is always the
    /// projection plane distance.
    pub fn canvas_to_viewport(&self, x: i32, y: i32, width: u32, height: u32) -> Vector3 {
        Vector3::new(
            x as f64 * self.viewport_size / width as f64,
            y as f64 * self.viewport_size / height as f64,
            self.projection_plane_z,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.viewport_size.is_finite()
            && self.projection_plane_z.is_finite()
    }
}
