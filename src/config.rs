//! Scene configuration.
//!
//! Every cosmetic constant of the scene lives here: band thresholds and
//! targets, transition durations, pointer mapping, idle spin, particle field
//! and camera parameters. All fields default to the stock scene, and JSON
//! documents only need to name the values they override.

use serde::Deserialize;

use crate::easing::EasingFunction;

/// Per-band targets for the two animated scene properties.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BandTarget {
    /// Target `position.z` of the igloo mesh.
    pub mesh_depth: f32,
    /// Target opacity of the particle cloud material.
    pub particle_opacity: f32,
}

/// Scroll classification thresholds, expressed as multiples of viewport height.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Offsets at or past `mid_start * h` leave the near band.
    pub mid_start: f32,
    /// Offsets at or past `far_start * h` enter the far band.
    pub far_start: f32,
    pub near: BandTarget,
    pub mid: BandTarget,
    pub far: BandTarget,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            mid_start: 0.5,
            far_start: 1.5,
            near: BandTarget { mesh_depth: 0.0, particle_opacity: 0.0 },
            mid: BandTarget { mesh_depth: -5.0, particle_opacity: 0.0 },
            far: BandTarget { mesh_depth: -10.0, particle_opacity: 1.0 },
        }
    }
}

/// Durations (seconds) and target values for the transitions issued on scroll.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub section_dim_opacity: f32,
    pub section_dim_duration: f32,
    pub section_active_opacity: f32,
    pub section_active_duration: f32,
    pub mesh_depth_duration: f32,
    pub particle_opacity_duration: f32,
    pub easing: EasingFunction,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            section_dim_opacity: 0.2,
            section_dim_duration: 0.5,
            section_active_opacity: 1.0,
            section_active_duration: 0.7,
            mesh_depth_duration: 1.0,
            particle_opacity_duration: 1.0,
            easing: EasingFunction::QuadraticOut,
        }
    }
}

/// Pointer-to-rotation mapping for the particle cloud.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Pointer input is ignored below `gate * h` of scroll.
    pub gate: f32,
    /// Radians of rotation at the viewport edge.
    pub rotation_scale: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            gate: 2.0,
            rotation_scale: 0.5,
        }
    }
}

/// Idle spin applied every frame regardless of scroll.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Igloo Y rotation per reference frame (radians).
    pub igloo_spin: f32,
    /// Particle cloud Y rotation per reference frame (radians).
    pub particle_spin: f32,
    /// Frame rate the per-frame spin amounts are tuned for.
    pub reference_fps: f32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            igloo_spin: 0.003,
            particle_spin: 0.001,
            reference_fps: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleFieldConfig {
    pub count: usize,
    /// Edge length of the cube the particles are scattered in.
    pub spread: f32,
    /// Point size in world units.
    pub size: f32,
    pub color: [f32; 3],
    pub seed: u64,
}

impl Default for ParticleFieldConfig {
    fn default() -> Self {
        Self {
            count: 500,
            spread: 8.0,
            size: 0.05,
            color: [1.0, 1.0, 1.0],
            seed: 0x5DEECE66D,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IglooConfig {
    pub radius: f32,
    pub segments: u32,
}

impl Default for IglooConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            segments: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 7.0],
        }
    }
}

/// Top-level scene configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub scroll: ScrollConfig,
    pub transitions: TransitionConfig,
    pub pointer: PointerConfig,
    pub idle: IdleConfig,
    pub particles: ParticleFieldConfig,
    pub igloo: IglooConfig,
    pub camera: CameraConfig,
}

impl SceneConfig {
    /// Parse a (possibly partial) JSON configuration document.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {:?}: {}", path, e))?;
        Self::from_json(&contents)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !(self.scroll.mid_start <= self.scroll.far_start) {
            anyhow::bail!(
                "scroll.mid_start ({}) must not exceed scroll.far_start ({})",
                self.scroll.mid_start,
                self.scroll.far_start
            );
        }
        if self.igloo.segments < 3 || self.igloo.segments > 180 {
            anyhow::bail!("igloo.segments must be within 3..=180, got {}", self.igloo.segments);
        }
        if self.idle.reference_fps <= 0.0 {
            anyhow::bail!("idle.reference_fps must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.scroll.mid_start, 0.5);
        assert_eq!(config.scroll.far_start, 1.5);
        assert_eq!(config.scroll.far.mesh_depth, -10.0);
        assert_eq!(config.scroll.far.particle_opacity, 1.0);
        assert_eq!(config.pointer.gate, 2.0);
        assert_eq!(config.pointer.rotation_scale, 0.5);
        assert_eq!(config.particles.count, 500);
        assert_eq!(config.camera.position, [0.0, 0.0, 7.0]);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = SceneConfig::from_json(
            r#"{ "pointer": { "rotation_scale": 1.25 }, "transitions": { "easing": "linear" } }"#,
        )
        .unwrap();
        assert_eq!(config.pointer.rotation_scale, 1.25);
        assert_eq!(config.pointer.gate, 2.0);
        assert_eq!(config.transitions.easing, EasingFunction::Linear);
        assert_eq!(config.transitions.section_dim_opacity, 0.2);
        assert_eq!(config.scroll, ScrollConfig::default());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let result = SceneConfig::from_json(r#"{ "scroll": { "mid_start": 2.0, "far_start": 1.0 } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(SceneConfig::from_json("{ not json").is_err());
    }
}
