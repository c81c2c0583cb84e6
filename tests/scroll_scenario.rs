//! End-to-end scroll scenario on a 1000px viewport.
//!
//! Run with: cargo test --test scroll_scenario

use igloo_scene::config::SceneConfig;
use igloo_scene::scene_state::SceneState;
use igloo_scene::scroll::ScrollBand;
use igloo_scene::section::Section;

const FRAME: f32 = 1.0 / 60.0;

fn run_for(state: &mut SceneState, seconds: f32) {
    let frames = (seconds / FRAME).ceil() as usize;
    for _ in 0..frames {
        state.update(FRAME);
    }
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn scroll_walks_through_all_sections() {
    let mut state = SceneState::new(SceneConfig::default(), 1280.0, 1000.0);

    let targets = state.on_scroll(200.0, 1000.0).unwrap();
    assert_eq!(targets.band, ScrollBand::Near);
    run_for(&mut state, 1.2);
    assert_eq!(state.active_section(), Section::Hero);
    assert_close(state.graph().igloo.transform.position.z, 0.0);
    assert_close(state.graph().particles.material.opacity, 0.0);
    assert_close(state.sections().get(Section::Hero), 1.0);
    assert_close(state.sections().get(Section::Mid), 0.2);

    let targets = state.on_scroll(1200.0, 1000.0).unwrap();
    assert_eq!(targets.band, ScrollBand::Mid);
    run_for(&mut state, 1.2);
    assert_eq!(state.active_section(), Section::Mid);
    assert_close(state.graph().igloo.transform.position.z, -5.0);
    assert_close(state.graph().particles.material.opacity, 0.0);
    assert_close(state.sections().get(Section::Mid), 1.0);
    assert_close(state.sections().get(Section::Hero), 0.2);

    let targets = state.on_scroll(1600.0, 1000.0).unwrap();
    assert_eq!(targets.band, ScrollBand::Far);
    run_for(&mut state, 1.2);
    assert_eq!(state.active_section(), Section::Particles);
    assert_close(state.graph().igloo.transform.position.z, -10.0);
    assert_close(state.graph().particles.material.opacity, 1.0);
    assert_close(state.sections().get(Section::Particles), 1.0);
    assert_close(state.sections().get(Section::Mid), 0.2);
    assert!(state.tweens().is_idle());
}

#[test]
fn interrupted_transition_ends_at_latest_target() {
    let mut state = SceneState::new(SceneConfig::default(), 1280.0, 1000.0);

    state.on_scroll(1600.0, 1000.0);
    run_for(&mut state, 0.3);
    let mid_flight = state.graph().igloo.transform.position.z;
    assert!(mid_flight < 0.0 && mid_flight > -10.0);

    // Scroll back up before the far transition finishes.
    state.on_scroll(100.0, 1000.0);
    run_for(&mut state, 1.2);
    assert_close(state.graph().igloo.transform.position.z, 0.0);
    assert_close(state.graph().particles.material.opacity, 0.0);
    assert_close(state.sections().get(Section::Hero), 1.0);
    assert_close(state.sections().get(Section::Particles), 0.2);
}

#[test]
fn pointer_only_moves_particles_past_the_gate() {
    let mut state = SceneState::new(SceneConfig::default(), 1000.0, 1000.0);

    state.on_scroll(1600.0, 1000.0);
    assert!(!state.on_pointer_move(1000.0, 1000.0));

    state.on_scroll(2500.0, 1000.0);
    assert!(state.on_pointer_move(1000.0, 1000.0));
    let rotation = state.graph().particles.transform.rotation;
    assert_close(rotation.x, -0.5);
    assert_close(rotation.y, 0.5);

    // Centre of the viewport maps to no rotation.
    assert!(state.on_pointer_move(500.0, 500.0));
    let rotation = state.graph().particles.transform.rotation;
    assert_close(rotation.x, 0.0);
    assert_close(rotation.y, 0.0);
}

#[test]
fn snapshot_serializes_current_state() {
    let mut state = SceneState::new(SceneConfig::default(), 1280.0, 1000.0);
    state.on_scroll(1200.0, 1000.0);
    state.settle();

    let json = serde_json::to_value(state.snapshot()).unwrap();
    assert_eq!(json["band"], "mid");
    assert_eq!(json["active_section"], "mid");
    assert_eq!(json["mesh_depth"], -5.0);
    assert_eq!(json["active_tweens"], 0);
}

#[test]
fn config_overrides_band_targets() {
    let config = SceneConfig::from_json(r#"{ "scroll": { "far": { "mesh_depth": -20.0, "particle_opacity": 0.5 } } }"#).unwrap();
    let mut state = SceneState::new(config, 1280.0, 1000.0);
    state.on_scroll(3000.0, 1000.0);
    state.settle();
    assert_close(state.graph().igloo.transform.position.z, -20.0);
    assert_close(state.graph().particles.material.opacity, 0.5);
    // Unspecified fields keep their defaults.
    assert_eq!(state.config.scroll.far_start, 1.5);
}
