//! Scene graph for the igloo scene.
//!
//! The scene is fixed: one camera, one igloo mesh, one particle cloud. They
//! are created once and live as long as the owning [`crate::scene_state::SceneState`].

use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::material::{IceMaterial, PointsMaterial};
use crate::particle::generate_field;

/// 3D position/vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }
}

/// Transform component for scene objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3, // Euler angles in radians
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::default(),
            rotation: Vec3::default(),
            scale: Vec3::splat(1.0),
        }
    }
}

impl Transform {
    /// Model matrix: Translation * Rotation (Euler XYZ) * Scale.
    pub fn matrix(&self) -> glam::Mat4 {
        let translation = glam::Mat4::from_translation(glam::Vec3::new(
            self.position.x,
            self.position.y,
            self.position.z,
        ));
        let rotation = glam::Mat4::from_euler(
            glam::EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        let scale = glam::Mat4::from_scale(glam::Vec3::new(self.scale.x, self.scale.y, self.scale.z));

        translation * rotation * scale
    }
}

/// The translucent sphere standing in for the igloo.
#[derive(Debug, Clone)]
pub struct IglooMesh {
    pub radius: f32,
    pub segments: u32,
    pub material: IceMaterial,
    pub transform: Transform,
}

/// The point cloud scattered around the igloo.
#[derive(Debug, Clone)]
pub struct ParticleCloud {
    pub positions: Vec<[f32; 3]>,
    pub material: PointsMaterial,
    pub transform: Transform,
}

impl ParticleCloud {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub camera: Camera,
    pub igloo: IglooMesh,
    pub particles: ParticleCloud,
}

impl SceneGraph {
    /// Build the scene. The particle field is generated here, once.
    pub fn new(config: &SceneConfig, aspect: f32) -> Self {
        let particles = &config.particles;
        let cloud = ParticleCloud {
            positions: generate_field(particles),
            material: PointsMaterial::new(particles.color, particles.size),
            transform: Transform::default(),
        };
        log::info!("Generated particle field: {} points", cloud.len());

        Self {
            camera: Camera::new(&config.camera, aspect),
            igloo: IglooMesh {
                radius: config.igloo.radius,
                segments: config.igloo.segments,
                material: IceMaterial::default(),
                transform: Transform::default(),
            },
            particles: cloud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_starts_at_origin() {
        let scene = SceneGraph::new(&SceneConfig::default(), 1.5);
        assert_eq!(scene.igloo.transform, Transform::default());
        assert_eq!(scene.particles.transform, Transform::default());
        assert_eq!(scene.igloo.radius, 2.0);
        assert_eq!(scene.particles.len(), 500);
        assert_eq!(scene.particles.material.size, 0.05);
    }

    #[test]
    fn test_transform_matrix_translates() {
        let transform = Transform {
            position: Vec3::new(0.0, 0.0, -5.0),
            ..Default::default()
        };
        let p = transform.matrix().transform_point3(glam::Vec3::ZERO);
        assert_eq!(p, glam::Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_transform_matrix_rotates_about_y() {
        let transform = Transform {
            rotation: Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
            ..Default::default()
        };
        let p = transform.matrix().transform_point3(glam::Vec3::X);
        assert!((p - glam::Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
