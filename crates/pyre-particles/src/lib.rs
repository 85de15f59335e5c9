//! Pyre Particles - CPU-side 2D particle simulation
//!
//! Provides a fixed-capacity particle system with:
//! - Struct-of-arrays particle store with swap-remove O(1) kill
//! - Spawner → generator → updater pipeline over contiguous alive ranges
//! - Rate-driven and burst emission with a seedable random source
//! - Vertex packing for point, textured, sprite sheet and metaball rendering

pub mod curves;
pub mod data;
pub mod generator;
pub mod render;
pub mod rng;
pub mod spawner;
pub mod system;
pub mod updater;

pub use data::{Lifetime, ParticleData, Tween};
pub use generator::Generator;
pub use render::{
    ParticleBlendMode, ParticleVertex, Primitive, RenderBatch, RenderMode, TextureHandle,
    ThresholdComposite,
};
pub use rng::ParticleRng;
pub use spawner::Spawner;
pub use system::{GeneratorId, ParticleSystem, SpawnerId, UpdaterId};
pub use updater::{Attractor, CollisionSide, Updater};
