//! Pointer-driven particle rotation.

use serde::Serialize;

use crate::config::PointerConfig;

/// Viewport dimensions and scroll position as last reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }

    /// Whether the dimensions are usable for classification and mapping.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Map a pointer position in client coordinates to particle cloud rotation.
///
/// Returns `[rot_x, rot_y]` in radians, or `None` while the page is scrolled
/// less than `gate * height`. The centre of the viewport maps to zero and the
/// edges to `±rotation_scale`.
pub fn pointer_rotation(
    client_x: f32,
    client_y: f32,
    viewport: &Viewport,
    config: &PointerConfig,
) -> Option<[f32; 2]> {
    if !viewport.is_valid() || viewport.scroll_y < viewport.height * config.gate {
        return None;
    }

    let nx = (client_x / viewport.width - 0.5) * 2.0;
    let ny = -(client_y / viewport.height - 0.5) * 2.0;

    Some([ny * config.rotation_scale, nx * config.rotation_scale])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrolled(scroll_y: f32) -> Viewport {
        Viewport {
            width: 1600.0,
            height: 1000.0,
            scroll_y,
        }
    }

    #[test]
    fn test_center_maps_to_zero() {
        let rot = pointer_rotation(800.0, 500.0, &scrolled(2000.0), &PointerConfig::default()).unwrap();
        assert_eq!(rot, [0.0, 0.0]);
    }

    #[test]
    fn test_top_left_maps_to_extremes() {
        let rot = pointer_rotation(0.0, 0.0, &scrolled(2500.0), &PointerConfig::default()).unwrap();
        // Top of the screen tilts about X positively, left edge turns about Y negatively.
        assert_eq!(rot, [0.5, -0.5]);
    }

    #[test]
    fn test_bottom_right_maps_to_opposite_extremes() {
        let rot = pointer_rotation(1600.0, 1000.0, &scrolled(2000.0), &PointerConfig::default()).unwrap();
        assert_eq!(rot, [-0.5, 0.5]);
    }

    #[test]
    fn test_gated_below_threshold() {
        let config = PointerConfig::default();
        assert!(pointer_rotation(0.0, 0.0, &scrolled(1999.0), &config).is_none());
        assert!(pointer_rotation(800.0, 500.0, &scrolled(0.0), &config).is_none());
        assert!(pointer_rotation(0.0, 0.0, &scrolled(2000.0), &config).is_some());
    }

    #[test]
    fn test_scale_factor_is_configurable() {
        let config = PointerConfig {
            gate: 2.0,
            rotation_scale: 1.0,
        };
        let rot = pointer_rotation(0.0, 1000.0, &scrolled(2000.0), &config).unwrap();
        assert_eq!(rot, [-1.0, -1.0]);
    }

    #[test]
    fn test_degenerate_viewport_is_ignored() {
        let viewport = Viewport {
            width: 0.0,
            height: 0.0,
            scroll_y: 10_000.0,
        };
        assert!(pointer_rotation(1.0, 1.0, &viewport, &PointerConfig::default()).is_none());
    }
}
