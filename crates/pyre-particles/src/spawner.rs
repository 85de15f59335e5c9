//! Spawners: position generators run before every other generator

use crate::data::ParticleData;
use crate::rng::ParticleRng;
use glam::Vec2;
use std::f32::consts::TAU;

/// Initial position distribution of newly spawned particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spawner {
    /// Every particle starts at `center`
    Point { center: Vec2 },
    /// Uniform inside the axis-aligned box `center ± size`
    Box { center: Vec2, size: Vec2 },
    /// On an ellipse outline with per-axis radii
    Circle { center: Vec2, radius: Vec2 },
    /// Filled disk; the sampled radius is `sqrt(uniform(0, radius))`
    Disk { center: Vec2, radius: f32 },
}

impl Default for Spawner {
    fn default() -> Self {
        Self::Point { center: Vec2::ZERO }
    }
}

impl Spawner {
    pub fn center(&self) -> Vec2 {
        match *self {
            Self::Point { center }
            | Self::Box { center, .. }
            | Self::Circle { center, .. }
            | Self::Disk { center, .. } => center,
        }
    }

    /// Move the emission origin, keeping the shape
    pub fn set_center(&mut self, new_center: Vec2) {
        match self {
            Self::Point { center }
            | Self::Box { center, .. }
            | Self::Circle { center, .. }
            | Self::Disk { center, .. } => *center = new_center,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Point { .. } => "point",
            Self::Box { .. } => "box",
            Self::Circle { .. } => "circle",
            Self::Disk { .. } => "disk",
        }
    }

    /// Write positions for slots `[start, end)`
    pub fn generate(&self, data: &mut ParticleData, rng: &mut ParticleRng, start: usize, end: usize) {
        let positions = &mut data.pos[start..end];
        match *self {
            Self::Point { center } => positions.fill(center),
            Self::Box { center, size } => {
                let (min, max) = (center - size, center + size);
                for p in positions {
                    *p = rng.range_vec2(min, max);
                }
            }
            Self::Circle { center, radius } => {
                for p in positions {
                    let phi = rng.range(0.0, TAU);
                    *p = center + radius * Vec2::new(phi.sin(), phi.cos());
                }
            }
            Self::Disk { center, radius } => {
                for p in positions {
                    let phi = rng.range(0.0, TAU);
                    let r = rng.range(0.0, radius).sqrt();
                    *p = center + r * Vec2::new(phi.sin(), phi.cos());
                }
            }
        }
    }
}
