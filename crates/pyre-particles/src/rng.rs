//! Seedable random source for generators and spawners

use glam::Vec2;
use pyre_core::Color;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform samplers over a seedable `StdRng`.
///
/// Float ranges are half-open and degenerate gracefully: `range(a, a)`
/// always returns `a`. Color ranges are inclusive on both ends.
pub struct ParticleRng {
    inner: StdRng,
}

impl ParticleRng {
    /// Deterministic source, same seed gives the same particle stream
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system
    pub fn from_os() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        debug_assert!(min <= max, "inverted float range {min}..{max}");
        min + self.next_f32() * (max - min)
    }

    /// Per-component `range` between two corners
    pub fn range_vec2(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(self.range(min.x, max.x), self.range(min.y, max.y))
    }

    /// Uniform index into a collection of `len` items; `len` must be non-zero
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.random_range(0..len)
    }

    /// Per-channel inclusive sample between two colors
    pub fn color(&mut self, low: Color, high: Color) -> Color {
        Color::new(
            self.channel(low.r, high.r),
            self.channel(low.g, high.g),
            self.channel(low.b, high.b),
            self.channel(low.a, high.a),
        )
    }

    fn channel(&mut self, low: u8, high: u8) -> u8 {
        debug_assert!(low <= high, "inverted color channel {low}..={high}");
        self.inner.random_range(low.min(high)..=high.max(low))
    }
}
