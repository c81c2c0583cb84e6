//! Material parameters for the igloo and the particle cloud.

/// Convert a packed `0xRRGGBB` colour to linear-ish RGB floats.
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Physically-flavoured ice material.
///
/// The renderer has no refraction pass; `transmission` becomes transparency
/// and `clearcoat` a sharp specular layer on top of the base lobe.
#[derive(Debug, Clone, PartialEq)]
pub struct IceMaterial {
    pub color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    pub transmission: f32,
    pub thickness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub reflectivity: f32,
}

impl Default for IceMaterial {
    fn default() -> Self {
        Self {
            color: rgb_from_hex(0x99dfff),
            roughness: 0.2,
            metalness: 0.1,
            transmission: 0.8,
            thickness: 1.2,
            clearcoat: 1.0,
            clearcoat_roughness: 0.1,
            reflectivity: 0.5,
        }
    }
}

impl IceMaterial {
    /// Surface alpha once transmission is folded into blending.
    /// Thicker ice lets less light through.
    pub fn alpha(&self) -> f32 {
        let absorbed = (self.thickness * 0.25).min(1.0);
        (1.0 - self.transmission * (1.0 - absorbed * 0.5)).clamp(0.05, 1.0)
    }
}

/// Flat-coloured point sprites.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsMaterial {
    pub color: [f32; 3],
    /// Sprite edge length in world units.
    pub size: f32,
    pub opacity: f32,
}

impl PointsMaterial {
    pub fn new(color: [f32; 3], size: f32) -> Self {
        Self {
            color,
            size,
            opacity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_conversion() {
        assert_eq!(rgb_from_hex(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(rgb_from_hex(0x000000), [0.0, 0.0, 0.0]);
        let ice = rgb_from_hex(0x99dfff);
        assert!((ice[0] - 0.6).abs() < 1e-6);
        assert_eq!(ice[2], 1.0);
    }

    #[test]
    fn test_ice_is_translucent() {
        let alpha = IceMaterial::default().alpha();
        assert!(alpha > 0.05 && alpha < 1.0, "alpha {}", alpha);
    }

    #[test]
    fn test_opaque_without_transmission() {
        let material = IceMaterial {
            transmission: 0.0,
            ..Default::default()
        };
        assert_eq!(material.alpha(), 1.0);
    }
}
