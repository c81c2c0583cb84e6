//! Owning context for the whole scene.
//!
//! `SceneState` holds the scene graph, section opacities, in-flight tweens
//! and the last reported viewport. Event handlers (scroll, pointer, resize,
//! frame) are methods on it; nothing lives in module-level state.

use serde::Serialize;

use crate::config::SceneConfig;
use crate::pointer::{pointer_rotation, Viewport};
use crate::scene_graph::SceneGraph;
use crate::scroll::{self, BandTargets, ScrollBand};
use crate::section::{Section, SectionOpacities};
use crate::tween::{Animatable, Property, TweenKey, TweenTarget, Tweener};

/// Everything tweens can write to, borrowed from the state for one call.
struct TweenTargets<'a> {
    graph: &'a mut SceneGraph,
    sections: &'a mut SectionOpacities,
}

impl Animatable for TweenTargets<'_> {
    fn get(&self, key: TweenKey) -> Option<f32> {
        match (key.target, key.property) {
            (TweenTarget::Igloo, Property::PositionZ) => Some(self.graph.igloo.transform.position.z),
            (TweenTarget::Particles, Property::Opacity) => Some(self.graph.particles.material.opacity),
            (TweenTarget::Section(section), Property::Opacity) => Some(self.sections.get(section)),
            _ => None,
        }
    }

    fn set(&mut self, key: TweenKey, value: f32) -> bool {
        match (key.target, key.property) {
            (TweenTarget::Igloo, Property::PositionZ) => self.graph.igloo.transform.position.z = value,
            (TweenTarget::Particles, Property::Opacity) => {
                self.graph.particles.material.opacity = value.clamp(0.0, 1.0)
            }
            (TweenTarget::Section(section), Property::Opacity) => self.sections.set(section, value),
            _ => return false,
        }
        true
    }
}

/// Serializable view of the current state, for tracing and debugging.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub time: f32,
    pub scroll_y: f32,
    pub viewport_height: f32,
    pub band: Option<ScrollBand>,
    pub active_section: Option<Section>,
    pub mesh_depth: f32,
    pub particle_opacity: f32,
    pub particle_rotation: [f32; 2],
    pub section_opacities: Vec<(Section, f32)>,
    pub active_tweens: usize,
}

pub struct SceneState {
    pub config: SceneConfig,
    graph: SceneGraph,
    sections: SectionOpacities,
    tweens: Tweener,
    viewport: Viewport,
    last_targets: Option<BandTargets>,
    time: f32,
}

impl SceneState {
    /// Build the scene and apply the initial state: the hero section fades
    /// in and the particle cloud starts invisible.
    pub fn new(config: SceneConfig, width: f32, height: f32) -> Self {
        let viewport = Viewport::new(width, height);
        let graph = SceneGraph::new(&config, viewport.aspect());

        let mut state = Self {
            config,
            graph,
            sections: SectionOpacities::new(),
            tweens: Tweener::new(),
            viewport,
            last_targets: None,
            time: 0.0,
        };

        state.section_in(Section::Hero);
        state.set_now(TweenKey::particle_opacity(), 0.0);
        state
    }

    fn targets(&mut self) -> (&mut Tweener, TweenTargets<'_>) {
        (
            &mut self.tweens,
            TweenTargets {
                graph: &mut self.graph,
                sections: &mut self.sections,
            },
        )
    }

    fn tween_to(&mut self, key: TweenKey, to: f32, duration: f32) {
        let easing = self.config.transitions.easing;
        let (tweens, targets) = self.targets();
        tweens.to(&targets, key, to, duration, easing);
    }

    fn set_now(&mut self, key: TweenKey, value: f32) {
        let (tweens, mut targets) = self.targets();
        tweens.set(&mut targets, key, value);
    }

    /// Cross-fade to `active`: dim every section, then bring `active` up.
    /// The second request supersedes the first on the active section.
    pub fn section_in(&mut self, active: Section) {
        let t = self.config.transitions.clone();
        for section in Section::ALL {
            self.tween_to(
                TweenKey::section_opacity(section),
                t.section_dim_opacity,
                t.section_dim_duration,
            );
        }
        self.tween_to(
            TweenKey::section_opacity(active),
            t.section_active_opacity,
            t.section_active_duration,
        );
    }

    /// Handle a scroll event.
    ///
    /// Classifies the offset and issues the band's transitions. Returns the
    /// resolved targets, or `None` if the input was unusable.
    pub fn on_scroll(&mut self, scroll_y: f32, viewport_height: f32) -> Option<BandTargets> {
        if !scroll_y.is_finite() || !viewport_height.is_finite() || viewport_height <= 0.0 {
            log::warn!(
                "Ignoring scroll event with scroll_y={} viewport_height={}",
                scroll_y,
                viewport_height
            );
            return None;
        }

        self.viewport.scroll_y = scroll_y.max(0.0);
        self.viewport.height = viewport_height;

        let targets = scroll::resolve(self.viewport.scroll_y, viewport_height, &self.config.scroll);
        log::debug!("scroll_y={} h={} -> {:?}", scroll_y, viewport_height, targets.band);
        if self.last_targets.map(|t| t.band) != Some(targets.band) {
            log::info!(
                "Entering {} band (section '{}')",
                targets.band.name(),
                targets.active_section.id()
            );
        }

        let t = self.config.transitions.clone();
        self.section_in(targets.active_section);
        self.tween_to(TweenKey::igloo_depth(), targets.mesh_depth, t.mesh_depth_duration);
        self.tween_to(
            TweenKey::particle_opacity(),
            targets.particle_opacity,
            t.particle_opacity_duration,
        );

        self.last_targets = Some(targets);
        Some(targets)
    }

    /// Handle a pointer move in client coordinates.
    ///
    /// Returns true if the particle rotation was updated.
    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) -> bool {
        match pointer_rotation(client_x, client_y, &self.viewport, &self.config.pointer) {
            Some([rx, ry]) => {
                let rotation = &mut self.graph.particles.transform.rotation;
                rotation.x = rx;
                rotation.y = ry;
                true
            }
            None => false,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.viewport.width = width;
        self.viewport.height = height;
        self.graph.camera.set_viewport(width, height);
    }

    /// Advance one frame: drive tweens and the idle spin.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time += dt;

        let (tweens, mut targets) = self.targets();
        tweens.tick(dt, &mut targets);

        let frames = dt * self.config.idle.reference_fps;
        self.graph.igloo.transform.rotation.y += self.config.idle.igloo_spin * frames;
        self.graph.particles.transform.rotation.y += self.config.idle.particle_spin * frames;
    }

    /// Jump every in-flight tween to its end value.
    pub fn settle(&mut self) {
        let (tweens, mut targets) = self.targets();
        tweens.finish_all(&mut targets);
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn sections(&self) -> &SectionOpacities {
        &self.sections
    }

    pub fn tweens(&self) -> &Tweener {
        &self.tweens
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Targets resolved by the most recent scroll event.
    pub fn last_targets(&self) -> Option<BandTargets> {
        self.last_targets
    }

    /// The section currently being faded in. Hero until the first scroll.
    pub fn active_section(&self) -> Section {
        self.last_targets
            .map(|t| t.active_section)
            .unwrap_or(Section::Hero)
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let particles = &self.graph.particles;
        SceneSnapshot {
            time: self.time,
            scroll_y: self.viewport.scroll_y,
            viewport_height: self.viewport.height,
            band: self.last_targets.map(|t| t.band),
            active_section: self.last_targets.map(|t| t.active_section),
            mesh_depth: self.graph.igloo.transform.position.z,
            particle_opacity: particles.material.opacity,
            particle_rotation: [particles.transform.rotation.x, particles.transform.rotation.y],
            section_opacities: self.sections.iter().collect(),
            active_tweens: self.tweens.active_count(),
        }
    }
}
