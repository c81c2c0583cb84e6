//! Scroll offset classification.
//!
//! The page is split into three bands measured in multiples of the viewport
//! height. Each band fixes which section is active and where the igloo and
//! particle cloud should end up. Classification is a pure function of the
//! scroll offset and viewport height, so every scroll event is evaluated
//! from scratch.

use serde::Serialize;

use crate::config::{BandTarget, ScrollConfig};
use crate::section::Section;

/// One of the three ordered scroll bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBand {
    Near,
    Mid,
    Far,
}

impl ScrollBand {
    pub fn active_section(self) -> Section {
        match self {
            ScrollBand::Near => Section::Hero,
            ScrollBand::Mid => Section::Mid,
            ScrollBand::Far => Section::Particles,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScrollBand::Near => "near",
            ScrollBand::Mid => "mid",
            ScrollBand::Far => "far",
        }
    }
}

/// Everything a scroll event resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandTargets {
    pub band: ScrollBand,
    pub active_section: Section,
    pub mesh_depth: f32,
    pub particle_opacity: f32,
}

/// Classify a scroll offset. Lower bounds are inclusive.
pub fn classify(scroll_y: f32, viewport_height: f32, config: &ScrollConfig) -> ScrollBand {
    if scroll_y < viewport_height * config.mid_start {
        ScrollBand::Near
    } else if scroll_y < viewport_height * config.far_start {
        ScrollBand::Mid
    } else {
        ScrollBand::Far
    }
}

/// Classify a scroll offset and look up the band's targets.
pub fn resolve(scroll_y: f32, viewport_height: f32, config: &ScrollConfig) -> BandTargets {
    let band = classify(scroll_y, viewport_height, config);
    let BandTarget {
        mesh_depth,
        particle_opacity,
    } = match band {
        ScrollBand::Near => config.near,
        ScrollBand::Mid => config.mid,
        ScrollBand::Far => config.far,
    };

    BandTargets {
        band,
        active_section: band.active_section(),
        mesh_depth,
        particle_opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScrollConfig {
        ScrollConfig::default()
    }

    #[test]
    fn test_near_band() {
        for y in [0.0, 100.0, 499.9] {
            let t = resolve(y, 1000.0, &config());
            assert_eq!(t.band, ScrollBand::Near);
            assert_eq!(t.active_section, Section::Hero);
            assert_eq!(t.mesh_depth, 0.0);
            assert_eq!(t.particle_opacity, 0.0);
        }
    }

    #[test]
    fn test_mid_band() {
        for y in [500.0, 1000.0, 1499.0] {
            let t = resolve(y, 1000.0, &config());
            assert_eq!(t.band, ScrollBand::Mid);
            assert_eq!(t.active_section, Section::Mid);
            assert_eq!(t.mesh_depth, -5.0);
            assert_eq!(t.particle_opacity, 0.0);
        }
    }

    #[test]
    fn test_far_band() {
        for y in [1500.0, 2000.0, 1.0e6] {
            let t = resolve(y, 1000.0, &config());
            assert_eq!(t.band, ScrollBand::Far);
            assert_eq!(t.active_section, Section::Particles);
            assert_eq!(t.mesh_depth, -10.0);
            assert_eq!(t.particle_opacity, 1.0);
        }
    }

    #[test]
    fn test_lower_bounds_are_inclusive() {
        assert_eq!(classify(400.0, 800.0, &config()), ScrollBand::Mid);
        assert_eq!(classify(1200.0, 800.0, &config()), ScrollBand::Far);
        assert_eq!(classify(399.99, 800.0, &config()), ScrollBand::Near);
        assert_eq!(classify(1199.99, 800.0, &config()), ScrollBand::Mid);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let a = resolve(730.0, 912.0, &config());
        let b = resolve(730.0, 912.0, &config());
        assert_eq!(a, b);
    }

    #[test]
    fn test_bands_are_ordered() {
        assert!(ScrollBand::Near < ScrollBand::Mid);
        assert!(ScrollBand::Mid < ScrollBand::Far);
    }
}
