//! Updaters: per-frame stages that evolve every alive particle

use crate::curves::{lerp_color, lerp_f32};
use crate::data::ParticleData;
use glam::Vec2;
use pyre_core::IntRect;

/// Which side of a horizontal plane counts as "inside the collider"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSide {
    /// Particles with `y < position` collide; the surface normal is +y
    Below,
    /// Particles with `y > position` collide; the surface normal is -y.
    /// In y-down screen space this is the floor at the window bottom.
    Above,
}

impl CollisionSide {
    fn normal(self) -> Vec2 {
        match self {
            Self::Below => Vec2::Y,
            Self::Above => Vec2::NEG_Y,
        }
    }
}

/// Point attractor with inverse-square pull
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attractor {
    pub position: Vec2,
    pub strength: f32,
}

/// One stage of the per-frame update pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Updater {
    /// Semi-implicit Euler integration with a global acceleration
    Euler { global_acceleration: Vec2 },
    /// Lifetime decay; kills particles whose remaining time drops below zero
    /// or is NaN
    Time,
    Color,
    Size,
    Rotation,
    /// Bounce off a horizontal plane at `y = position`
    Collision {
        position: f32,
        side: CollisionSide,
        bounce: f32,
    },
    Attractor { attractors: Vec<Attractor> },
    /// Step through `frames`, one every `frame_time` seconds
    Animation {
        frames: Vec<IntRect>,
        frame_time: f32,
        looped: bool,
    },
}

impl Updater {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Euler { .. } => "euler",
            Self::Time => "time",
            Self::Color => "color",
            Self::Size => "size",
            Self::Rotation => "rotation",
            Self::Collision { .. } => "collision",
            Self::Attractor { .. } => "attractor",
            Self::Animation { .. } => "animation",
        }
    }

    /// Advance every alive particle by `dt` seconds
    pub fn update(&self, data: &mut ParticleData, dt: f32) {
        let alive = data.count_alive();
        match self {
            Self::Euler {
                global_acceleration,
            } => {
                let global = *global_acceleration * dt;
                for i in 0..alive {
                    data.acc[i] += global;
                    data.vel[i] += data.acc[i] * dt;
                    data.pos[i] += data.vel[i] * dt;
                }
            }
            Self::Time => update_time(data, dt),
            Self::Color => {
                for i in 0..alive {
                    let t = data.time[i].fraction;
                    data.col[i] = lerp_color(data.start_col[i], data.end_col[i], t);
                }
            }
            Self::Size => {
                for i in 0..alive {
                    let t = data.time[i].fraction;
                    let s = &mut data.size[i];
                    s.current = lerp_f32(s.start, s.end, t);
                }
            }
            Self::Rotation => {
                for i in 0..alive {
                    let t = data.time[i].fraction;
                    let a = &mut data.angle[i];
                    a.current = lerp_f32(a.start, a.end, t);
                }
            }
            Self::Collision {
                position,
                side,
                bounce,
            } => {
                let normal = side.normal();
                for i in 0..alive {
                    let inside = match side {
                        CollisionSide::Below => data.pos[i].y < *position,
                        CollisionSide::Above => data.pos[i].y > *position,
                    };
                    if !inside {
                        continue;
                    }
                    let inbound = data.acc[i].dot(normal);
                    if inbound < 0.0 {
                        data.acc[i] -= normal * inbound;
                    }
                    let vel_factor = data.vel[i].dot(normal);
                    data.vel[i] -= normal * (1.0 + bounce) * vel_factor;
                }
            }
            Self::Attractor { attractors } => {
                for i in 0..alive {
                    for a in attractors {
                        let off = a.position - data.pos[i];
                        data.acc[i] += off * (a.strength / off.length_squared());
                    }
                }
            }
            Self::Animation {
                frames,
                frame_time,
                looped,
            } => {
                if frames.is_empty() || *frame_time <= 0.0 {
                    return;
                }
                let len = frames.len();
                let last = len - 1;
                for i in 0..alive {
                    let timer = data.frame_timer[i] + dt;
                    let steps = (timer / *frame_time).floor();
                    data.frame_timer[i] = (timer - steps * *frame_time).max(0.0);

                    // Saturates for absurd step counts
                    let steps = steps as usize;
                    let frame = data.frame[i].min(last);
                    data.frame[i] = if *looped {
                        (frame + steps % len) % len
                    } else {
                        frame.saturating_add(steps).min(last)
                    };
                    data.tex_coords[i] = frames[data.frame[i]];
                }
            }
        }
    }
}

/// Decay lifetimes and swap-remove the dead.
///
/// A kill moves the last alive particle into slot `i`, which has not been
/// processed yet, so `i` is only advanced past survivors.
fn update_time(data: &mut ParticleData, dt: f32) {
    let mut i = 0;
    while i < data.count_alive() {
        let t = &mut data.time[i];
        t.remaining -= dt;
        t.fraction = if t.total > 0.0 {
            1.0 - t.remaining / t.total
        } else {
            1.0
        };
        if t.remaining < 0.0 || t.remaining.is_nan() {
            data.kill(i);
        } else {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Lifetime, Tween};
    use pyre_core::Color;

    fn alive_data(n: usize) -> ParticleData {
        let mut data = ParticleData::new(n + 1);
        for i in 0..n {
            data.time[i] = Lifetime::new(1.0);
            data.wake(i);
        }
        data
    }

    #[test]
    fn euler_integrates_semi_implicitly() {
        let mut data = alive_data(1);
        data.vel[0] = Vec2::new(1.0, 0.0);
        let euler = Updater::Euler {
            global_acceleration: Vec2::new(0.0, 10.0),
        };
        euler.update(&mut data, 0.5);
        // acc = 10 * 0.5 = 5, vel = (1, 2.5), pos = vel * 0.5
        assert!((data.acc[0] - Vec2::new(0.0, 5.0)).length() < 1e-6);
        assert!((data.vel[0] - Vec2::new(1.0, 2.5)).length() < 1e-6);
        assert!((data.pos[0] - Vec2::new(0.5, 1.25)).length() < 1e-6);
    }

    #[test]
    fn time_updater_kills_expired_and_rechecks_swapped_slot() {
        let mut data = alive_data(4);
        // Slots 1 and 3 expire; 3 gets swapped into 1 and must die as well
        data.time[1] = Lifetime::new(0.1);
        data.time[3] = Lifetime::new(0.1);
        data.pos[2] = Vec2::new(2.0, 0.0);
        Updater::Time.update(&mut data, 0.5);

        assert_eq!(data.count_alive(), 2);
        for i in 0..2 {
            assert!(data.time[i].remaining >= 0.0);
        }
        assert_eq!(data.pos[0], Vec2::ZERO);
        assert_eq!(data.pos[1], Vec2::new(2.0, 0.0));
    }

    #[test]
    fn time_updater_fraction_is_monotonic() {
        let mut data = alive_data(1);
        data.time[0] = Lifetime::new(2.0);
        let mut last = 0.0;
        for _ in 0..3 {
            Updater::Time.update(&mut data, 0.5);
            assert!(data.time[0].fraction >= last);
            last = data.time[0].fraction;
        }
        assert!((last - 0.75).abs() < 1e-6);
    }

    #[test]
    fn interpolators_hit_both_endpoints() {
        let mut data = alive_data(1);
        data.start_col[0] = Color::new(16, 124, 167, 255);
        data.end_col[0] = Color::new(235, 128, 220, 0);
        data.size[0] = Tween::new(20.0, 10.0);
        data.angle[0] = Tween::new(-20.0, 90.0);

        for (fraction, col, size, angle) in [
            (0.0, data.start_col[0], 20.0, -20.0),
            (1.0, data.end_col[0], 10.0, 90.0),
        ] {
            data.time[0].fraction = fraction;
            for up in [Updater::Color, Updater::Size, Updater::Rotation] {
                up.update(&mut data, 0.0);
            }
            assert_eq!(data.col[0], col);
            assert_eq!(data.size[0].current, size);
            assert_eq!(data.angle[0].current, angle);
        }
    }

    #[test]
    fn collision_reflects_velocity_with_bounce() {
        let mut data = alive_data(2);
        data.pos[0] = Vec2::new(0.0, 610.0);
        data.vel[0] = Vec2::new(3.0, 50.0);
        data.acc[0] = Vec2::new(0.0, 9.0);
        data.pos[1] = Vec2::new(0.0, 100.0);
        data.vel[1] = Vec2::new(0.0, 50.0);

        let floor = Updater::Collision {
            position: 600.0,
            side: CollisionSide::Above,
            bounce: 0.5,
        };
        floor.update(&mut data, 0.016);

        assert!((data.vel[0] - Vec2::new(3.0, -25.0)).length() < 1e-4);
        assert_eq!(data.acc[0], Vec2::ZERO);
        assert_eq!(data.vel[1], Vec2::new(0.0, 50.0));
    }

    #[test]
    fn collision_below_plane() {
        let mut data = alive_data(1);
        data.pos[0] = Vec2::new(0.0, -1.0);
        data.vel[0] = Vec2::new(0.0, -4.0);
        data.acc[0] = Vec2::new(1.0, -9.8);
        let floor = Updater::Collision {
            position: 0.0,
            side: CollisionSide::Below,
            bounce: 1.0,
        };
        floor.update(&mut data, 0.016);
        assert!((data.vel[0] - Vec2::new(0.0, 4.0)).length() < 1e-5);
        assert_eq!(data.acc[0], Vec2::new(1.0, 0.0));
    }

    #[test]
    fn attractor_is_inverse_square() {
        let mut data = alive_data(1);
        let up = Updater::Attractor {
            attractors: vec![Attractor {
                position: Vec2::new(2.0, 0.0),
                strength: 8.0,
            }],
        };
        up.update(&mut data, 0.016);
        // off = (2, 0), |off|^2 = 4, acc = off * 8 / 4
        assert!((data.acc[0] - Vec2::new(4.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn attractor_at_particle_position_is_not_finite() {
        let mut data = alive_data(1);
        let up = Updater::Attractor {
            attractors: vec![Attractor {
                position: Vec2::ZERO,
                strength: 1.0,
            }],
        };
        up.update(&mut data, 0.016);
        assert!(!data.acc[0].is_finite());
    }

    fn frames() -> Vec<IntRect> {
        (0..4).map(|i| IntRect::new(8 * i, 0, 8, 8)).collect()
    }

    #[test]
    fn animation_carries_excess_time() {
        let mut data = alive_data(1);
        let anim = Updater::Animation {
            frames: frames(),
            frame_time: 0.8,
            looped: true,
        };
        anim.update(&mut data, 1.0);
        assert_eq!(data.frame[0], 1);
        assert!((data.frame_timer[0] - 0.2).abs() < 1e-5);
        assert_eq!(data.tex_coords[0], IntRect::new(8, 0, 8, 8));

        // 0.2 carried + 0.7 crosses the next boundary
        anim.update(&mut data, 0.7);
        assert_eq!(data.frame[0], 2);
        assert!((data.frame_timer[0] - 0.1).abs() < 1e-5);
    }

    #[test]
    fn animation_with_tiny_frame_time_finishes() {
        let mut data = alive_data(1);
        let anim = Updater::Animation {
            frames: frames()[..2].to_vec(),
            frame_time: 1e-8,
            looped: true,
        };
        anim.update(&mut data, 1.0);
        assert!(data.frame[0] < 2);
        assert!(data.frame_timer[0].is_finite());
        assert!(data.frame_timer[0] >= 0.0 && data.frame_timer[0] < 1e-3);
        assert_eq!(data.tex_coords[0], frames()[data.frame[0]]);
    }

    #[test]
    fn animation_skips_whole_cycles_in_one_step() {
        let mut data = alive_data(1);
        let anim = Updater::Animation {
            frames: frames(),
            frame_time: 0.5,
            looped: true,
        };
        // 11 steps over 4 frames lands on frame 3
        anim.update(&mut data, 5.6);
        assert_eq!(data.frame[0], 3);
        assert!((data.frame_timer[0] - 0.1).abs() < 1e-4);
    }

    #[test]
    fn zero_lifetime_has_full_fraction() {
        let mut data = alive_data(2);
        data.time[0] = Lifetime::new(0.0);
        Updater::Time.update(&mut data, 0.0);
        assert_eq!(data.count_alive(), 2);
        assert_eq!(data.time[0].fraction, 1.0);
        assert_eq!(data.time[1].fraction, 0.0);
    }

    #[test]
    fn nan_lifetime_is_killed() {
        let mut data = alive_data(3);
        data.time[1] = Lifetime::new(f32::NAN);
        data.pos[2] = Vec2::new(2.0, 0.0);
        Updater::Time.update(&mut data, 0.1);
        assert_eq!(data.count_alive(), 2);
        assert_eq!(data.pos[1], Vec2::new(2.0, 0.0));
    }

    #[test]
    fn animation_loops_or_holds() {
        for (looped, expected) in [(true, 0), (false, 3)] {
            let mut data = alive_data(1);
            let anim = Updater::Animation {
                frames: frames(),
                frame_time: 1.0,
                looped,
            };
            anim.update(&mut data, 4.0);
            assert_eq!(data.frame[0], expected, "looped = {looped}");
        }
    }
}
