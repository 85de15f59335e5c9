//! Generators: initialize fields of freshly spawned particles

use crate::data::{Lifetime, ParticleData, Tween};
use crate::rng::ParticleRng;
use glam::Vec2;
use pyre_core::{Color, IntRect};

/// One initialization stage of the emission pipeline.
///
/// Each variant writes only the fields it owns, for every slot of the spawn
/// range. Ranges are sampled uniformly and independently per particle.
#[derive(Debug, Clone, PartialEq)]
pub enum Generator {
    /// Per-component velocity between two corners
    Velocity { min: Vec2, max: Vec2 },
    /// Velocity `speed * (sin a, cos a)`; angles in degrees, 0 points along +y
    AngledVelocity {
        min_angle: f32,
        max_angle: f32,
        min_speed: f32,
        max_speed: f32,
    },
    /// Velocity toward `goal` from the spawned position
    AimedVelocity {
        goal: Vec2,
        min_speed: f32,
        max_speed: f32,
    },
    Size {
        min_start: f32,
        max_start: f32,
        min_end: f32,
        max_end: f32,
    },
    ConstantSize { size: f32 },
    /// Start/end rotation in degrees
    Rotation {
        min_start: f32,
        max_start: f32,
        min_end: f32,
        max_end: f32,
    },
    ConstantRotation { angle: f32 },
    /// Rotation set to the heading of the velocity. Register after a
    /// velocity generator.
    DirectionDefinedRotation,
    Color {
        min_start: Color,
        max_start: Color,
        min_end: Color,
        max_end: Color,
    },
    ConstantColor { color: Color },
    /// Lifetime in seconds
    Time { min_time: f32, max_time: f32 },
    TexCoords { rect: IntRect },
    /// One sprite sheet cell picked at random per particle
    TexCoordsRandom { rects: Vec<IntRect> },
}

impl Generator {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Velocity { .. } => "velocity",
            Self::AngledVelocity { .. } => "angled_velocity",
            Self::AimedVelocity { .. } => "aimed_velocity",
            Self::Size { .. } => "size",
            Self::ConstantSize { .. } => "constant_size",
            Self::Rotation { .. } => "rotation",
            Self::ConstantRotation { .. } => "constant_rotation",
            Self::DirectionDefinedRotation => "direction_rotation",
            Self::Color { .. } => "color",
            Self::ConstantColor { .. } => "constant_color",
            Self::Time { .. } => "time",
            Self::TexCoords { .. } => "tex_coords",
            Self::TexCoordsRandom { .. } => "tex_coords_random",
        }
    }

    /// Initialize slots `[start, end)`
    pub fn generate(&self, data: &mut ParticleData, rng: &mut ParticleRng, start: usize, end: usize) {
        match self {
            Self::Velocity { min, max } => {
                for v in &mut data.vel[start..end] {
                    *v = rng.range_vec2(*min, *max);
                }
            }
            Self::AngledVelocity {
                min_angle,
                max_angle,
                min_speed,
                max_speed,
            } => {
                for v in &mut data.vel[start..end] {
                    let phi = rng.range(*min_angle, *max_angle).to_radians();
                    let speed = rng.range(*min_speed, *max_speed);
                    *v = speed * Vec2::new(phi.sin(), phi.cos());
                }
            }
            Self::AimedVelocity {
                goal,
                min_speed,
                max_speed,
            } => {
                for i in start..end {
                    let dir = (*goal - data.pos[i]).normalize_or_zero();
                    data.vel[i] = dir * rng.range(*min_speed, *max_speed);
                }
            }
            Self::Size {
                min_start,
                max_start,
                min_end,
                max_end,
            } => {
                for s in &mut data.size[start..end] {
                    let from = rng.range(*min_start, *max_start);
                    let to = rng.range(*min_end, *max_end);
                    *s = Tween::new(from, to);
                }
            }
            Self::ConstantSize { size } => data.size[start..end].fill(Tween::constant(*size)),
            Self::Rotation {
                min_start,
                max_start,
                min_end,
                max_end,
            } => {
                for a in &mut data.angle[start..end] {
                    let from = rng.range(*min_start, *max_start);
                    let to = rng.range(*min_end, *max_end);
                    *a = Tween::new(from, to);
                }
            }
            Self::ConstantRotation { angle } => {
                data.angle[start..end].fill(Tween::constant(*angle));
            }
            Self::DirectionDefinedRotation => {
                for i in start..end {
                    let v = data.vel[i];
                    data.angle[i] = Tween::constant(v.y.atan2(v.x).to_degrees());
                }
            }
            Self::Color {
                min_start,
                max_start,
                min_end,
                max_end,
            } => {
                for i in start..end {
                    data.start_col[i] = rng.color(*min_start, *max_start);
                    data.end_col[i] = rng.color(*min_end, *max_end);
                    data.col[i] = data.start_col[i];
                }
            }
            Self::ConstantColor { color } => {
                data.col[start..end].fill(*color);
                data.start_col[start..end].fill(*color);
                data.end_col[start..end].fill(*color);
            }
            Self::Time { min_time, max_time } => {
                for t in &mut data.time[start..end] {
                    *t = Lifetime::new(rng.range(*min_time, *max_time));
                }
            }
            Self::TexCoords { rect } => data.tex_coords[start..end].fill(*rect),
            Self::TexCoordsRandom { rects } => {
                if rects.is_empty() {
                    return;
                }
                for t in &mut data.tex_coords[start..end] {
                    *t = rects[rng.index(rects.len())];
                }
            }
        }
        // Sprite animation restarts for every new particle
        if matches!(self, Self::TexCoords { .. } | Self::TexCoordsRandom { .. }) {
            data.frame[start..end].fill(0);
            data.frame_timer[start..end].fill(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(gen: &Generator, data: &mut ParticleData, seed: u64) {
        let mut rng = ParticleRng::new(seed);
        let n = data.count();
        gen.generate(data, &mut rng, 0, n);
    }

    #[test]
    fn angled_velocity_zero_points_down() {
        let gen = Generator::AngledVelocity {
            min_angle: 0.0,
            max_angle: 0.0,
            min_speed: 100.0,
            max_speed: 100.0,
        };
        let mut data = ParticleData::new(4);
        run(&gen, &mut data, 1);
        for v in &data.vel {
            assert!(v.x.abs() < 1e-4);
            assert!((v.y - 100.0).abs() < 1e-4);
        }
    }

    #[test]
    fn angled_velocity_ninety_degrees_points_right() {
        let gen = Generator::AngledVelocity {
            min_angle: 90.0,
            max_angle: 90.0,
            min_speed: 2.0,
            max_speed: 2.0,
        };
        let mut data = ParticleData::new(1);
        run(&gen, &mut data, 1);
        assert!((data.vel[0].x - 2.0).abs() < 1e-4);
        assert!(data.vel[0].y.abs() < 1e-4);
    }

    #[test]
    fn aimed_velocity_points_at_goal() {
        let gen = Generator::AimedVelocity {
            goal: Vec2::new(10.0, 0.0),
            min_speed: 5.0,
            max_speed: 5.0,
        };
        let mut data = ParticleData::new(2);
        data.pos[1] = Vec2::new(10.0, 0.0);
        run(&gen, &mut data, 2);
        assert!((data.vel[0] - Vec2::new(5.0, 0.0)).length() < 1e-4);
        // Spawned on the goal: no direction to aim at
        assert_eq!(data.vel[1], Vec2::ZERO);
    }

    #[test]
    fn vector_velocity_within_range() {
        let gen = Generator::Velocity {
            min: Vec2::new(20.0, -40.0),
            max: Vec2::new(40.0, -20.0),
        };
        let mut data = ParticleData::new(200);
        run(&gen, &mut data, 3);
        for v in &data.vel {
            assert!((20.0..40.0).contains(&v.x));
            assert!((-40.0..-20.0).contains(&v.y));
        }
    }

    #[test]
    fn time_generator_starts_fresh() {
        let gen = Generator::Time {
            min_time: 1.0,
            max_time: 5.0,
        };
        let mut data = ParticleData::new(50);
        run(&gen, &mut data, 4);
        for t in &data.time {
            assert!((1.0..5.0).contains(&t.total));
            assert_eq!(t.remaining, t.total);
            assert_eq!(t.fraction, 0.0);
        }
    }

    #[test]
    fn size_and_rotation_start_at_start_value() {
        let mut data = ParticleData::new(20);
        let size = Generator::Size {
            min_start: 20.0,
            max_start: 60.0,
            min_end: 10.0,
            max_end: 30.0,
        };
        let rot = Generator::Rotation {
            min_start: -20.0,
            max_start: -20.0,
            min_end: 90.0,
            max_end: 90.0,
        };
        run(&size, &mut data, 5);
        run(&rot, &mut data, 6);
        for (s, a) in data.size.iter().zip(&data.angle) {
            assert!((20.0..60.0).contains(&s.start));
            assert!((10.0..30.0).contains(&s.end));
            assert_eq!(s.current, s.start);
            assert_eq!(*a, Tween::new(-20.0, 90.0));
        }
    }

    #[test]
    fn color_generator_samples_each_channel() {
        let gen = Generator::Color {
            min_start: Color::new(16, 124, 167, 255),
            max_start: Color::new(30, 150, 255, 255),
            min_end: Color::new(57, 0, 150, 0),
            max_end: Color::new(235, 128, 220, 0),
        };
        let mut data = ParticleData::new(100);
        run(&gen, &mut data, 7);
        for i in 0..100 {
            let s = data.start_col[i];
            assert!((16..=30).contains(&s.r) && (124..=150).contains(&s.g));
            assert_eq!(s.a, 255);
            assert_eq!(data.end_col[i].a, 0);
            assert_eq!(data.col[i], s);
        }
    }

    #[test]
    fn direction_rotation_follows_velocity() {
        let mut data = ParticleData::new(1);
        data.vel[0] = Vec2::new(0.0, 3.0);
        run(&Generator::DirectionDefinedRotation, &mut data, 8);
        assert!((data.angle[0].start - 90.0).abs() < 1e-4);
        assert_eq!(data.angle[0].start, data.angle[0].end);
    }

    #[test]
    fn random_tex_coords_pick_from_list() {
        let rects: Vec<IntRect> = (0..4).map(|i| IntRect::new(8 * i, 0, 8, 8)).collect();
        let gen = Generator::TexCoordsRandom {
            rects: rects.clone(),
        };
        let mut data = ParticleData::new(64);
        data.frame[3] = 2;
        run(&gen, &mut data, 9);
        assert!(data.tex_coords.iter().all(|r| rects.contains(r)));
        assert_eq!(data.frame[3], 0);
    }

    #[test]
    fn generators_only_touch_spawn_range() {
        let mut data = ParticleData::new(4);
        let mut rng = ParticleRng::new(10);
        Generator::ConstantSize { size: 7.0 }.generate(&mut data, &mut rng, 1, 3);
        assert_eq!(data.size[0], Tween::constant(1.0));
        assert_eq!(data.size[1], Tween::constant(7.0));
        assert_eq!(data.size[2], Tween::constant(7.0));
        assert_eq!(data.size[3], Tween::constant(1.0));
    }
}
