pub mod gpu;
pub mod scene_graph;
pub mod scene_state;

// Scroll-driven state
pub mod config;
pub mod easing;
pub mod pointer;
pub mod scroll;
pub mod section;
pub mod tween;

// Scene content
pub mod camera;
pub mod material;
pub mod particle;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

#[cfg(not(target_arch = "wasm32"))]
pub mod preview;

#[cfg(target_arch = "wasm32")]
pub mod wasm;
