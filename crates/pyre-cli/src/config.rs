//! Run configuration, read from TOML
//!
//! Every table is optional; omitted ones fall back to the values of the
//! default fountain (point spawner, angled velocity, 1–5 s lifetimes).

use glam::Vec2;
use pyre_core::{Color, IntRect, PyreError, Result};
use pyre_particles::{
    Attractor, CollisionSide, Generator, ParticleSystem, RenderMode, Spawner, TextureHandle,
    ThresholdComposite, Updater,
};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub system: SystemSection,
    pub run: RunSection,
    pub spawner: SpawnerConfig,
    pub velocity: VelocityConfig,
    pub size: Option<SizeConfig>,
    pub rotation: Option<RotationConfig>,
    pub color: Option<ColorConfig>,
    pub time: Range,
    pub tex_coords: Option<TexCoordsConfig>,
    pub physics: PhysicsSection,
    pub animation: Option<AnimationConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    Points,
    Textured,
    Spritesheet,
    Metaball,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemSection {
    pub capacity: usize,
    pub emit_rate: f32,
    pub render: RenderKind,
    pub additive: bool,
    pub threshold: f32,
    pub metaball_color: [u8; 4],
    /// Pixel size of the bound texture `[width, height]`
    pub texture_size: [u32; 2],
}

impl Default for SystemSection {
    fn default() -> Self {
        let composite = ThresholdComposite::default();
        Self {
            capacity: 10_000,
            emit_rate: 160.0,
            render: RenderKind::Points,
            additive: false,
            threshold: composite.threshold,
            metaball_color: composite.color.to_array(),
            texture_size: [64, 64],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    pub frames: u32,
    pub dt: f32,
    pub seed: Option<u64>,
    /// Particles emitted immediately before the first frame
    pub burst: usize,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            frames: 600,
            dt: 1.0 / 60.0,
            seed: None,
            burst: 0,
        }
    }
}

/// Inclusive sampling range
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Default for Range {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SpawnerConfig {
    Point { center: Vec2 },
    Box { center: Vec2, size: Vec2 },
    Circle { center: Vec2, radius: Vec2 },
    Disk { center: Vec2, radius: f32 },
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self::Point { center: Vec2::ZERO }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum VelocityConfig {
    Vector { min: Vec2, max: Vec2 },
    /// Degrees; 0 points along +y
    Angled { angle: Range, speed: Range },
    Aimed { goal: Vec2, speed: Range },
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self::Angled {
            angle: Range {
                min: -20.0,
                max: 20.0,
            },
            speed: Range {
                min: 100.0,
                max: 100.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SizeConfig {
    Range { start: Range, end: Range },
    Constant { size: f32 },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum RotationConfig {
    Range { start: Range, end: Range },
    Constant { angle: f32 },
    /// Face along the initial velocity
    Direction,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ColorConfig {
    Range {
        start_min: [u8; 4],
        start_max: [u8; 4],
        end_min: [u8; 4],
        end_max: [u8; 4],
    },
    Constant { color: [u8; 4] },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum TexCoordsConfig {
    /// `[left, top, width, height]`
    Fixed { rect: [i32; 4] },
    Random { rects: Vec<[i32; 4]> },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsSection {
    pub gravity: Vec2,
    pub collision: Option<CollisionConfig>,
    pub attractors: Vec<AttractorConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollisionConfig {
    pub position: f32,
    pub side: Side,
    #[serde(default = "default_bounce")]
    pub bounce: f32,
}

fn default_bounce() -> f32 {
    0.5
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttractorConfig {
    pub position: Vec2,
    pub strength: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationConfig {
    pub frames: Vec<[i32; 4]>,
    pub frame_time: f32,
    #[serde(default = "default_looped")]
    pub looped: bool,
}

fn default_looped() -> bool {
    true
}

fn rect(r: [i32; 4]) -> IntRect {
    IntRect::new(r[0], r[1], r[2], r[3])
}

impl SimulationConfig {
    /// Read and parse a configuration file. Call `validate` before use.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.float_fields() {
            if !value.is_finite() {
                return Err(PyreError::ValidationError(format!(
                    "{field} must be finite, got {value}"
                )));
            }
        }
        if self.system.capacity == 0 {
            return Err(out_of_range("system.capacity", 1.0, usize::MAX as f64, 0.0));
        }
        if !(self.run.dt > 0.0 && self.run.dt <= 1.0) {
            return Err(out_of_range("run.dt", 0.0, 1.0, self.run.dt as f64));
        }
        if self.system.emit_rate < 0.0 {
            return Err(out_of_range(
                "system.emit_rate",
                0.0,
                f32::MAX as f64,
                self.system.emit_rate as f64,
            ));
        }
        if !(0.0..=1.0).contains(&self.system.threshold) {
            return Err(out_of_range("system.threshold", 0.0, 1.0, self.system.threshold as f64));
        }
        if self.system.render != RenderKind::Points && self.system.texture_size.contains(&0) {
            return Err(PyreError::ValidationError(
                "system.texture_size must be non-zero for textured rendering".into(),
            ));
        }

        check_range("time", self.time)?;
        if self.time.min < 0.0 {
            return Err(out_of_range("time.min", 0.0, f32::MAX as f64, self.time.min as f64));
        }

        match self.spawner {
            SpawnerConfig::Disk { radius, .. } if radius < 0.0 => {
                return Err(out_of_range("spawner.radius", 0.0, f32::MAX as f64, radius as f64));
            }
            SpawnerConfig::Box { size, .. } | SpawnerConfig::Circle { radius: size, .. }
                if size.min_element() < 0.0 =>
            {
                return Err(PyreError::ValidationError(
                    "spawner extents must not be negative".into(),
                ));
            }
            _ => {}
        }

        match self.velocity {
            VelocityConfig::Vector { min, max } => {
                check_range("velocity.x", Range { min: min.x, max: max.x })?;
                check_range("velocity.y", Range { min: min.y, max: max.y })?;
            }
            VelocityConfig::Angled { angle, speed } => {
                check_range("velocity.angle", angle)?;
                check_range("velocity.speed", speed)?;
            }
            VelocityConfig::Aimed { speed, .. } => check_range("velocity.speed", speed)?,
        }

        if let Some(SizeConfig::Range { start, end }) = self.size {
            check_range("size.start", start)?;
            check_range("size.end", end)?;
        }
        if let Some(RotationConfig::Range { start, end }) = self.rotation {
            check_range("rotation.start", start)?;
            check_range("rotation.end", end)?;
        }
        if let Some(ColorConfig::Range {
            start_min,
            start_max,
            end_min,
            end_max,
        }) = self.color
        {
            check_channels("color.start", start_min, start_max)?;
            check_channels("color.end", end_min, end_max)?;
        }

        if let Some(TexCoordsConfig::Random { rects }) = &self.tex_coords {
            if rects.is_empty() {
                return Err(PyreError::ValidationError(
                    "tex_coords.rects must list at least one rectangle".into(),
                ));
            }
        }
        if let Some(anim) = &self.animation {
            if anim.frames.is_empty() {
                return Err(PyreError::ValidationError(
                    "animation.frames must list at least one rectangle".into(),
                ));
            }
            if anim.frame_time <= 0.0 {
                return Err(out_of_range(
                    "animation.frame_time",
                    0.0,
                    f32::MAX as f64,
                    anim.frame_time as f64,
                ));
            }
        }
        Ok(())
    }

    /// Every float the pipeline consumes, labelled for error messages
    fn float_fields(&self) -> Vec<(&'static str, f32)> {
        let mut fields = vec![
            ("system.emit_rate", self.system.emit_rate),
            ("system.threshold", self.system.threshold),
            ("run.dt", self.run.dt),
            ("time.min", self.time.min),
            ("time.max", self.time.max),
            ("physics.gravity.x", self.physics.gravity.x),
            ("physics.gravity.y", self.physics.gravity.y),
        ];

        let (center, extent) = match self.spawner {
            SpawnerConfig::Point { center } => (center, Vec2::ZERO),
            SpawnerConfig::Box { center, size } => (center, size),
            SpawnerConfig::Circle { center, radius } => (center, radius),
            SpawnerConfig::Disk { center, radius } => (center, Vec2::splat(radius)),
        };
        fields.extend([
            ("spawner.center.x", center.x),
            ("spawner.center.y", center.y),
            ("spawner.extent.x", extent.x),
            ("spawner.extent.y", extent.y),
        ]);

        match self.velocity {
            VelocityConfig::Vector { min, max } => fields.extend([
                ("velocity.min.x", min.x),
                ("velocity.min.y", min.y),
                ("velocity.max.x", max.x),
                ("velocity.max.y", max.y),
            ]),
            VelocityConfig::Angled { angle, speed } => fields.extend([
                ("velocity.angle.min", angle.min),
                ("velocity.angle.max", angle.max),
                ("velocity.speed.min", speed.min),
                ("velocity.speed.max", speed.max),
            ]),
            VelocityConfig::Aimed { goal, speed } => fields.extend([
                ("velocity.goal.x", goal.x),
                ("velocity.goal.y", goal.y),
                ("velocity.speed.min", speed.min),
                ("velocity.speed.max", speed.max),
            ]),
        }

        match self.size {
            Some(SizeConfig::Range { start, end }) => fields.extend([
                ("size.start.min", start.min),
                ("size.start.max", start.max),
                ("size.end.min", end.min),
                ("size.end.max", end.max),
            ]),
            Some(SizeConfig::Constant { size }) => fields.push(("size.size", size)),
            None => {}
        }
        match self.rotation {
            Some(RotationConfig::Range { start, end }) => fields.extend([
                ("rotation.start.min", start.min),
                ("rotation.start.max", start.max),
                ("rotation.end.min", end.min),
                ("rotation.end.max", end.max),
            ]),
            Some(RotationConfig::Constant { angle }) => fields.push(("rotation.angle", angle)),
            Some(RotationConfig::Direction) | None => {}
        }

        if let Some(c) = self.physics.collision {
            fields.extend([
                ("physics.collision.position", c.position),
                ("physics.collision.bounce", c.bounce),
            ]);
        }
        for a in &self.physics.attractors {
            fields.extend([
                ("physics.attractors.position.x", a.position.x),
                ("physics.attractors.position.y", a.position.y),
                ("physics.attractors.strength", a.strength),
            ]);
        }
        if let Some(anim) = &self.animation {
            fields.push(("animation.frame_time", anim.frame_time));
        }
        fields
    }

    pub fn render_mode(&self) -> RenderMode {
        let [width, height] = self.system.texture_size;
        let texture = TextureHandle { id: 0, width, height };
        match self.system.render {
            RenderKind::Points => RenderMode::Points,
            RenderKind::Textured => RenderMode::Textured {
                texture,
                additive: self.system.additive,
            },
            RenderKind::Spritesheet => RenderMode::SpriteSheet { texture },
            RenderKind::Metaball => RenderMode::Metaball {
                texture,
                composite: ThresholdComposite {
                    threshold: self.system.threshold,
                    color: Color::from(self.system.metaball_color),
                },
            },
        }
    }

    /// Build a particle system wired with the configured pipeline.
    ///
    /// Updaters run in the order time, color, size, rotation, collision,
    /// attractor, euler, animation.
    pub fn build_system(&self) -> ParticleSystem {
        let mode = self.render_mode();
        let mut ps = match self.run.seed {
            Some(seed) => ParticleSystem::with_seed(self.system.capacity, mode, seed),
            None => ParticleSystem::new(self.system.capacity, mode),
        };
        ps.set_emit_rate(self.system.emit_rate);

        ps.add_spawner(match self.spawner {
            SpawnerConfig::Point { center } => Spawner::Point { center },
            SpawnerConfig::Box { center, size } => Spawner::Box { center, size },
            SpawnerConfig::Circle { center, radius } => Spawner::Circle { center, radius },
            SpawnerConfig::Disk { center, radius } => Spawner::Disk { center, radius },
        });

        ps.add_generator(match self.velocity {
            VelocityConfig::Vector { min, max } => Generator::Velocity { min, max },
            VelocityConfig::Angled { angle, speed } => Generator::AngledVelocity {
                min_angle: angle.min,
                max_angle: angle.max,
                min_speed: speed.min,
                max_speed: speed.max,
            },
            VelocityConfig::Aimed { goal, speed } => Generator::AimedVelocity {
                goal,
                min_speed: speed.min,
                max_speed: speed.max,
            },
        });

        if let Some(size) = self.size {
            ps.add_generator(match size {
                SizeConfig::Range { start, end } => Generator::Size {
                    min_start: start.min,
                    max_start: start.max,
                    min_end: end.min,
                    max_end: end.max,
                },
                SizeConfig::Constant { size } => Generator::ConstantSize { size },
            });
        }
        if let Some(rotation) = self.rotation {
            ps.add_generator(match rotation {
                RotationConfig::Range { start, end } => Generator::Rotation {
                    min_start: start.min,
                    max_start: start.max,
                    min_end: end.min,
                    max_end: end.max,
                },
                RotationConfig::Constant { angle } => Generator::ConstantRotation { angle },
                RotationConfig::Direction => Generator::DirectionDefinedRotation,
            });
        }

        ps.add_generator(Generator::Time {
            min_time: self.time.min,
            max_time: self.time.max,
        });

        if let Some(color) = self.color {
            ps.add_generator(match color {
                ColorConfig::Range {
                    start_min,
                    start_max,
                    end_min,
                    end_max,
                } => Generator::Color {
                    min_start: start_min.into(),
                    max_start: start_max.into(),
                    min_end: end_min.into(),
                    max_end: end_max.into(),
                },
                ColorConfig::Constant { color } => Generator::ConstantColor {
                    color: color.into(),
                },
            });
        }

        match &self.tex_coords {
            Some(TexCoordsConfig::Fixed { rect: r }) => {
                ps.add_generator(Generator::TexCoords { rect: rect(*r) });
            }
            Some(TexCoordsConfig::Random { rects }) => {
                ps.add_generator(Generator::TexCoordsRandom {
                    rects: rects.iter().copied().map(rect).collect(),
                });
            }
            None => {}
        }

        ps.add_updater(Updater::Time);
        if self.color.is_some() {
            ps.add_updater(Updater::Color);
        }
        if self.size.is_some() {
            ps.add_updater(Updater::Size);
        }
        if self.rotation.is_some() {
            ps.add_updater(Updater::Rotation);
        }
        if let Some(c) = self.physics.collision {
            ps.add_updater(Updater::Collision {
                position: c.position,
                side: match c.side {
                    Side::Above => CollisionSide::Above,
                    Side::Below => CollisionSide::Below,
                },
                bounce: c.bounce,
            });
        }
        if !self.physics.attractors.is_empty() {
            ps.add_updater(Updater::Attractor {
                attractors: self
                    .physics
                    .attractors
                    .iter()
                    .map(|a| Attractor {
                        position: a.position,
                        strength: a.strength,
                    })
                    .collect(),
            });
        }
        ps.add_updater(Updater::Euler {
            global_acceleration: self.physics.gravity,
        });
        if let Some(anim) = &self.animation {
            ps.add_updater(Updater::Animation {
                frames: anim.frames.iter().copied().map(rect).collect(),
                frame_time: anim.frame_time,
                looped: anim.looped,
            });
        }

        ps
    }
}

fn out_of_range(field: &str, min: f64, max: f64, value: f64) -> PyreError {
    PyreError::ValueOutOfRange {
        field: field.to_string(),
        min,
        max,
        value,
    }
}

fn check_range(field: &str, range: Range) -> Result<()> {
    if range.min > range.max {
        return Err(PyreError::InvertedRange {
            field: field.to_string(),
            min: range.min as f64,
            max: range.max as f64,
        });
    }
    Ok(())
}

fn check_channels(field: &str, low: [u8; 4], high: [u8; 4]) -> Result<()> {
    for (lo, hi) in low.iter().zip(&high) {
        if lo > hi {
            return Err(PyreError::InvertedRange {
                field: field.to_string(),
                min: *lo as f64,
                max: *hi as f64,
            });
        }
    }
    Ok(())
}
