//! Struct-of-arrays particle storage with an alive/dead partition

use glam::Vec2;
use pyre_core::{Color, IntRect};

/// Lifetime state of one particle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Lifetime {
    /// Seconds left before the particle dies
    pub remaining: f32,
    /// Total seconds the particle was born with
    pub total: f32,
    /// Elapsed fraction of the lifetime in [0, 1]
    pub fraction: f32,
}

impl Lifetime {
    pub fn new(total: f32) -> Self {
        Self {
            remaining: total,
            total,
            fraction: 0.0,
        }
    }
}

/// A value interpolated from `start` to `end` over the particle's life
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tween {
    pub current: f32,
    pub start: f32,
    pub end: f32,
}

impl Tween {
    pub fn new(start: f32, end: f32) -> Self {
        Self {
            current: start,
            start,
            end,
        }
    }

    pub fn constant(value: f32) -> Self {
        Self::new(value, value)
    }
}

/// Parallel per-particle columns for a fixed number of slots.
///
/// Slots `[0, count_alive)` are alive and `[count_alive, count)` are dead.
/// Killing a particle moves the last alive particle into its slot, so slot
/// indices of alive particles are not stable across deaths.
pub struct ParticleData {
    pub pos: Vec<Vec2>,
    pub vel: Vec<Vec2>,
    /// Reset to zero at the start of every update pass
    pub acc: Vec<Vec2>,
    pub time: Vec<Lifetime>,
    pub size: Vec<Tween>,
    /// Rotation in degrees
    pub angle: Vec<Tween>,
    pub col: Vec<Color>,
    pub start_col: Vec<Color>,
    pub end_col: Vec<Color>,
    pub tex_coords: Vec<IntRect>,
    pub frame: Vec<usize>,
    pub frame_timer: Vec<f32>,
    count: usize,
    count_alive: usize,
}

impl ParticleData {
    pub fn new(max_count: usize) -> Self {
        Self {
            pos: vec![Vec2::ZERO; max_count],
            vel: vec![Vec2::ZERO; max_count],
            acc: vec![Vec2::ZERO; max_count],
            time: vec![Lifetime::default(); max_count],
            size: vec![Tween::constant(1.0); max_count],
            angle: vec![Tween::default(); max_count],
            col: vec![Color::WHITE; max_count],
            start_col: vec![Color::WHITE; max_count],
            end_col: vec![Color::WHITE; max_count],
            tex_coords: vec![IntRect::new(0, 0, 1, 1); max_count],
            frame: vec![0; max_count],
            frame_timer: vec![0.0; max_count],
            count: max_count,
            count_alive: 0,
        }
    }

    /// Total number of slots, fixed at construction
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn count_alive(&self) -> usize {
        self.count_alive
    }

    /// Kill the alive particle at `id` by swapping the last alive particle
    /// into its slot.
    ///
    /// Panics if `id` is not an alive slot.
    pub fn kill(&mut self, id: usize) {
        assert!(
            id < self.count_alive,
            "kill({id}) on a dead slot (count_alive = {})",
            self.count_alive
        );
        let last = self.count_alive - 1;
        self.swap_data(id, last);
        self.count_alive = last;
    }

    /// Make the slot at `count_alive` alive. `id` must be that slot; spawn
    /// ranges are always contiguous from the alive boundary.
    pub fn wake(&mut self, id: usize) {
        assert!(
            id == self.count_alive && id < self.count,
            "wake({id}) out of order (count_alive = {}, count = {})",
            self.count_alive,
            self.count
        );
        self.count_alive += 1;
    }

    /// Exchange every field between two slots. The partition is untouched.
    pub fn swap_data(&mut self, a: usize, b: usize) {
        assert!(
            a < self.count && b < self.count,
            "swap_data({a}, {b}) out of bounds (count = {})",
            self.count
        );
        if a == b {
            return;
        }
        self.pos.swap(a, b);
        self.vel.swap(a, b);
        self.acc.swap(a, b);
        self.time.swap(a, b);
        self.size.swap(a, b);
        self.angle.swap(a, b);
        self.col.swap(a, b);
        self.start_col.swap(a, b);
        self.end_col.swap(a, b);
        self.tex_coords.swap(a, b);
        self.frame.swap(a, b);
        self.frame_timer.swap(a, b);
    }

    pub fn reset_accelerations(&mut self) {
        self.acc[..self.count_alive].fill(Vec2::ZERO);
    }

    /// Discard every alive particle
    pub fn reset(&mut self) {
        self.count_alive = 0;
    }
}
