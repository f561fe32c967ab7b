use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::core::window::SurfaceSize;

/// Perspective camera that orbits the origin at a constant rate and always
/// looks at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Horizontal distance from the Y axis at mount.
    radius: f32,
    /// Azimuth about Y at mount, radians.
    azimuth0: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Orbit rate in rad/s.
    pub orbit_rate: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig, size: SurfaceSize) -> Self {
        let position = Vec3::from_array(config.position);
        Self {
            position,
            radius: Vec3::new(position.x, 0.0, position.z).length(),
            azimuth0: position.x.atan2(position.z),
            fov_y: config.fov_degrees.to_radians(),
            aspect: size.aspect(),
            near: config.near,
            far: config.far,
            orbit_rate: config.orbit_rate(),
        }
    }

    /// Viewport aspect. Ignored for an empty surface.
    pub fn set_aspect(&mut self, size: SurfaceSize) {
        if !size.is_empty() {
            self.aspect = size.aspect();
        }
    }

    /// Place the camera on its orbit for elapsed time `time`. The azimuth
    /// decreases, so a camera starting on +Z swings towards -X.
    pub fn update(&mut self, time: f32) {
        let azimuth = self.azimuth0 - self.orbit_rate * time;
        self.position = Vec3::new(
            self.radius * azimuth.sin(),
            self.position.y,
            self.radius * azimuth.cos(),
        );
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
