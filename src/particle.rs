//! Particle field generation.
//!
//! The field is a fixed cloud of points scattered uniformly through a cube
//! centred on the origin. It is generated once at start-up from a seeded
//! xorshift generator so the same configuration always produces the same
//! field.

use crate::config::ParticleFieldConfig;

/// Default seed used when a zero seed is requested (xorshift is stuck at 0).
const FALLBACK_SEED: u64 = 0x5DEECE66D;

/// Deterministic xorshift64 generator.
#[derive(Debug, Clone)]
pub struct FieldRng {
    state: u64,
}

impl FieldRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { FALLBACK_SEED } else { seed },
        }
    }

    /// Next value in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        // Top 24 bits give an exactly representable f32 below 1.0.
        (self.state >> 40) as f32 / (1u64 << 24) as f32
    }
}

/// Generate `config.count` particle positions, each coordinate in
/// `[-spread / 2, spread / 2)`.
pub fn generate_field(config: &ParticleFieldConfig) -> Vec<[f32; 3]> {
    let mut rng = FieldRng::new(config.seed);
    let spread = config.spread;

    (0..config.count)
        .map(|_| {
            [
                (rng.next_f32() - 0.5) * spread,
                (rng.next_f32() - 0.5) * spread,
                (rng.next_f32() - 0.5) * spread,
            ]
        })
        .collect()
}
