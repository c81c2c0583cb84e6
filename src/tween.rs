//! Keyed property tweens.
//!
//! A tween interpolates one numeric property of one scene target from the
//! value it held when the tween was requested toward a target value. Tweens
//! are keyed by `(target, property)`: requesting a new tween for a key that
//! already has one in flight replaces it, starting from wherever the old one
//! had got to. Replacement is the only form of cancellation.

use std::collections::HashMap;

use crate::easing::EasingFunction;
use crate::section::Section;

/// Object whose property is being animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenTarget {
    Igloo,
    Particles,
    Section(Section),
}

/// Animatable property of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    PositionZ,
    Opacity,
}

/// Identity of a tween. At most one tween runs per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenKey {
    pub target: TweenTarget,
    pub property: Property,
}

impl TweenKey {
    pub const fn new(target: TweenTarget, property: Property) -> Self {
        Self { target, property }
    }

    pub const fn igloo_depth() -> Self {
        Self::new(TweenTarget::Igloo, Property::PositionZ)
    }

    pub const fn particle_opacity() -> Self {
        Self::new(TweenTarget::Particles, Property::Opacity)
    }

    pub const fn section_opacity(section: Section) -> Self {
        Self::new(TweenTarget::Section(section), Property::Opacity)
    }
}

/// Read/write access to the properties tweens drive.
///
/// Returns `None` / `false` for keys the implementor does not own.
pub trait Animatable {
    fn get(&self, key: TweenKey) -> Option<f32>;
    fn set(&mut self, key: TweenKey, value: f32) -> bool;
}

/// A single in-flight interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub elapsed: f32,
    pub easing: EasingFunction,
}

impl Tween {
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.easing.apply(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Owns every in-flight tween and drives them each frame.
#[derive(Debug, Default)]
pub struct Tweener {
    active: HashMap<TweenKey, Tween>,
}

impl Tweener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tweening `key` toward `to` over `duration` seconds.
    ///
    /// Any tween already running on `key` is superseded. Returns false if
    /// `targets` does not own `key`.
    pub fn to(
        &mut self,
        targets: &impl Animatable,
        key: TweenKey,
        to: f32,
        duration: f32,
        easing: EasingFunction,
    ) -> bool {
        let Some(from) = targets.get(key) else {
            log::warn!("Tween requested for unknown property {:?}", key);
            return false;
        };

        let tween = Tween {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        };
        if self.active.insert(key, tween).is_some() {
            log::trace!("Superseded in-flight tween on {:?}", key);
        }
        true
    }

    /// Cancel any tween on `key` and write `value` immediately.
    pub fn set(&mut self, targets: &mut impl Animatable, key: TweenKey, value: f32) -> bool {
        self.active.remove(&key);
        targets.set(key, value)
    }

    /// Advance all tweens by `dt` seconds, writing interpolated values.
    /// Finished tweens write their exact target and are dropped.
    pub fn tick(&mut self, dt: f32, targets: &mut impl Animatable) {
        let dt = dt.max(0.0);
        self.active.retain(|key, tween| {
            tween.elapsed += dt;
            targets.set(*key, tween.value());
            !tween.is_finished()
        });
    }

    /// Jump every tween to its end value.
    pub fn finish_all(&mut self, targets: &mut impl Animatable) {
        for (key, tween) in self.active.drain() {
            targets.set(key, tween.to);
        }
    }

    pub fn get(&self, key: TweenKey) -> Option<&Tween> {
        self.active.get(&key)
    }

    pub fn is_active(&self, key: TweenKey) -> bool {
        self.active.contains_key(&key)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Props {
        depth: f32,
        opacity: f32,
    }

    impl Animatable for Props {
        fn get(&self, key: TweenKey) -> Option<f32> {
            match (key.target, key.property) {
                (TweenTarget::Igloo, Property::PositionZ) => Some(self.depth),
                (TweenTarget::Particles, Property::Opacity) => Some(self.opacity),
                _ => None,
            }
        }

        fn set(&mut self, key: TweenKey, value: f32) -> bool {
            match (key.target, key.property) {
                (TweenTarget::Igloo, Property::PositionZ) => self.depth = value,
                (TweenTarget::Particles, Property::Opacity) => self.opacity = value,
                _ => return false,
            }
            true
        }
    }

    #[test]
    fn test_tween_reaches_target() {
        let mut props = Props::default();
        let mut tweener = Tweener::new();
        assert!(tweener.to(&props, TweenKey::igloo_depth(), -5.0, 1.0, EasingFunction::Linear));

        tweener.tick(0.5, &mut props);
        assert!((props.depth + 2.5).abs() < 1e-5);
        assert!(tweener.is_active(TweenKey::igloo_depth()));

        tweener.tick(0.6, &mut props);
        assert_eq!(props.depth, -5.0);
        assert!(tweener.is_idle());
    }

    #[test]
    fn test_new_request_supersedes_in_flight() {
        let mut props = Props::default();
        let mut tweener = Tweener::new();
        tweener.to(&props, TweenKey::igloo_depth(), -10.0, 1.0, EasingFunction::Linear);
        tweener.tick(0.5, &mut props);
        assert!((props.depth + 5.0).abs() < 1e-5);

        // Reverse direction mid-flight: restarts from the current value.
        tweener.to(&props, TweenKey::igloo_depth(), 0.0, 1.0, EasingFunction::Linear);
        assert_eq!(tweener.active_count(), 1);
        let tween = tweener.get(TweenKey::igloo_depth()).unwrap();
        assert!((tween.from + 5.0).abs() < 1e-5);
        assert_eq!(tween.to, 0.0);

        tweener.tick(1.0, &mut props);
        assert_eq!(props.depth, 0.0);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut props = Props::default();
        let mut tweener = Tweener::new();
        tweener.to(&props, TweenKey::igloo_depth(), -5.0, 1.0, EasingFunction::Linear);
        tweener.to(&props, TweenKey::particle_opacity(), 1.0, 2.0, EasingFunction::Linear);
        assert_eq!(tweener.active_count(), 2);

        tweener.tick(1.0, &mut props);
        assert_eq!(props.depth, -5.0);
        assert!((props.opacity - 0.5).abs() < 1e-5);
        assert_eq!(tweener.active_count(), 1);
    }

    #[test]
    fn test_set_cancels_and_writes_immediately() {
        let mut props = Props::default();
        let mut tweener = Tweener::new();
        tweener.to(&props, TweenKey::particle_opacity(), 1.0, 1.0, EasingFunction::Linear);
        tweener.set(&mut props, TweenKey::particle_opacity(), 0.0);
        assert!(tweener.is_idle());

        tweener.tick(1.0, &mut props);
        assert_eq!(props.opacity, 0.0);
    }

    #[test]
    fn test_zero_duration_lands_on_first_tick() {
        let mut props = Props::default();
        let mut tweener = Tweener::new();
        tweener.to(&props, TweenKey::igloo_depth(), -3.0, 0.0, EasingFunction::QuadraticOut);
        tweener.tick(0.0, &mut props);
        assert_eq!(props.depth, -3.0);
        assert!(tweener.is_idle());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let props = Props::default();
        let mut tweener = Tweener::new();
        let key = TweenKey::section_opacity(Section::Hero);
        assert!(!tweener.to(&props, key, 1.0, 1.0, EasingFunction::Linear));
        assert!(tweener.is_idle());
    }

    #[test]
    fn test_finish_all_jumps_to_targets() {
        let mut props = Props::default();
        let mut tweener = Tweener::new();
        tweener.to(&props, TweenKey::igloo_depth(), -10.0, 1.0, EasingFunction::CubicOut);
        tweener.to(&props, TweenKey::particle_opacity(), 1.0, 1.0, EasingFunction::CubicOut);
        tweener.finish_all(&mut props);
        assert_eq!(props.depth, -10.0);
        assert_eq!(props.opacity, 1.0);
        assert!(tweener.is_idle());
    }
}
