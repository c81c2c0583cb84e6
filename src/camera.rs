//! Perspective camera.
//!
//! The camera sits on the +Z axis looking at the origin. Only its aspect ratio
//! changes after start-up (on resize); the scroll transitions move the igloo,
//! not the camera.

use crate::config::CameraConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: glam::Vec3,
    pub target: glam::Vec3,
    pub up: glam::Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let [x, y, z] = config.position;
        Self {
            position: glam::Vec3::new(x, y, z),
            target: glam::Vec3::ZERO,
            up: glam::Vec3::Y,
            fov: config.fov,
            near: config.near,
            far: config.far,
            aspect: sanitize_aspect(aspect),
        }
    }

    /// Update the projection for a new viewport size.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = sanitize_aspect(width / height);
        }
    }

    pub fn view_matrix(&self) -> glam::Mat4 {
        glam::Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> glam::Mat4 {
        glam::Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> glam::Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_looks_at_origin() {
        let camera = Camera::new(&CameraConfig::default(), 16.0 / 9.0);
        let origin_in_view = camera.view_matrix().transform_point3(glam::Vec3::ZERO);
        // Origin should be in front (negative Z in view space)
        assert!((origin_in_view.z + 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_deeper_objects_project_smaller() {
        let camera = Camera::new(&CameraConfig::default(), 1.0);
        let vp = camera.view_projection_matrix();
        let near = vp.project_point3(glam::Vec3::new(1.0, 0.0, 0.0));
        let far = vp.project_point3(glam::Vec3::new(1.0, 0.0, -10.0));
        assert!(far.x < near.x);
        assert!(far.x > 0.0);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = Camera::new(&CameraConfig::default(), 1.0);
        camera.set_viewport(1920.0, 1080.0);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);

        // Degenerate sizes are ignored.
        camera.set_viewport(0.0, 1080.0);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_initial_aspect_falls_back() {
        let camera = Camera::new(&CameraConfig::default(), f32::NAN);
        assert_eq!(camera.aspect, 1.0);
    }
}
