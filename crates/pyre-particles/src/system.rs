//! The particle system: owns the store and runs the per-frame pipeline

use crate::data::ParticleData;
use crate::generator::Generator;
use crate::render::{
    pack_vertices, ParticleVertex, RenderBatch, RenderMode, TextureHandle, ThresholdComposite,
};
use crate::rng::ParticleRng;
use crate::spawner::Spawner;
use crate::updater::Updater;

macro_rules! stage_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

stage_id!(
    /// Handle to a registered spawner
    SpawnerId
);
stage_id!(
    /// Handle to a registered generator
    GeneratorId
);
stage_id!(
    /// Handle to a registered updater
    UpdaterId
);

/// A fixed-capacity particle system.
///
/// Each `update(dt)`:
/// 1. emits `floor(dt * emit_rate)` particles (spawners, then generators)
/// 2. clears accelerations of alive particles
/// 3. runs the updaters in registration order
/// 4. packs the alive particles into the vertex buffer for the render mode
///
/// Stage list changes take effect on the next call to `update` or `emit`.
pub struct ParticleSystem {
    data: ParticleData,
    spawners: Vec<(SpawnerId, Spawner)>,
    generators: Vec<(GeneratorId, Generator)>,
    updaters: Vec<(UpdaterId, Updater)>,
    next_id: u32,
    emit_rate: f32,
    active: bool,
    mode: RenderMode,
    vertices: Vec<ParticleVertex>,
    rng: ParticleRng,
}

impl ParticleSystem {
    /// Create a system with an OS-seeded random source
    pub fn new(max_count: usize, mode: RenderMode) -> Self {
        Self::with_rng(max_count, mode, ParticleRng::from_os())
    }

    /// Create a system whose particle stream is reproducible from `seed`
    pub fn with_seed(max_count: usize, mode: RenderMode, seed: u64) -> Self {
        Self::with_rng(max_count, mode, ParticleRng::new(seed))
    }

    pub fn with_rng(max_count: usize, mode: RenderMode, rng: ParticleRng) -> Self {
        log::debug!("particle system: {max_count} slots, {} rendering", mode.name());
        Self {
            data: ParticleData::new(max_count),
            spawners: Vec::new(),
            generators: Vec::new(),
            updaters: Vec::new(),
            next_id: 0,
            emit_rate: 0.0,
            active: true,
            mode,
            vertices: Vec::with_capacity(max_count * mode.vertices_per_particle()),
            rng,
        }
    }

    // ── Per-frame entry points ──

    pub fn update(&mut self, dt: f32) {
        if self.active && self.emit_rate > 0.0 {
            let spawn_count = (dt * self.emit_rate) as usize;
            let emitted = self.emit_range(spawn_count);
            log::trace!("emitted {emitted} of {spawn_count} requested");
        }

        self.data.reset_accelerations();

        for (_, updater) in &self.updaters {
            updater.update(&mut self.data, dt);
        }

        pack_vertices(&self.mode, &self.data, &mut self.vertices);
    }

    /// Spawn up to `max_count` particles now, ignoring the emit rate.
    /// Returns the number actually spawned.
    pub fn emit(&mut self, max_count: usize) -> usize {
        self.emit_range(max_count)
    }

    /// Kill every particle
    pub fn reset(&mut self) {
        log::debug!("reset: dropping {} alive particles", self.data.count_alive());
        self.data.reset();
        self.vertices.clear();
    }

    /// Initialize and wake `[count_alive, min(count_alive + n, count - 1))`.
    /// The last slot is never filled.
    fn emit_range(&mut self, spawn_count: usize) -> usize {
        let start = self.data.count_alive();
        let end = start
            .saturating_add(spawn_count)
            .min(self.data.count().saturating_sub(1))
            .max(start);

        for (_, spawner) in &self.spawners {
            spawner.generate(&mut self.data, &mut self.rng, start, end);
        }
        for (_, generator) in &self.generators {
            generator.generate(&mut self.data, &mut self.rng, start, end);
        }
        for i in start..end {
            self.data.wake(i);
        }
        end - start
    }

    // ── Emission policy ──

    pub fn emit_rate(&self) -> f32 {
        self.emit_rate
    }

    /// Particles per second
    pub fn set_emit_rate(&mut self, rate: f32) {
        self.emit_rate = rate;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pause or resume rate-driven emission; alive particles keep updating
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    // ── Stage registration ──

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_spawner(&mut self, spawner: Spawner) -> SpawnerId {
        let id = SpawnerId(self.next_id());
        log::debug!("add spawner {id} ({} at {})", spawner.name(), spawner.center());
        self.spawners.push((id, spawner));
        id
    }

    pub fn remove_spawner(&mut self, id: SpawnerId) -> Option<Spawner> {
        let idx = self.spawners.iter().position(|(sid, _)| *sid == id)?;
        log::debug!("remove spawner {id}");
        Some(self.spawners.remove(idx).1)
    }

    pub fn clear_spawners(&mut self) {
        log::debug!("clear {} spawner(s)", self.spawners.len());
        self.spawners.clear();
    }

    pub fn spawner(&self, id: SpawnerId) -> Option<&Spawner> {
        self.spawners.iter().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    pub fn spawner_mut(&mut self, id: SpawnerId) -> Option<&mut Spawner> {
        self.spawners.iter_mut().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    pub fn add_generator(&mut self, generator: Generator) -> GeneratorId {
        let id = GeneratorId(self.next_id());
        log::debug!("add generator {id} ({})", generator.name());
        self.generators.push((id, generator));
        id
    }

    pub fn remove_generator(&mut self, id: GeneratorId) -> Option<Generator> {
        let idx = self.generators.iter().position(|(gid, _)| *gid == id)?;
        log::debug!("remove generator {id}");
        Some(self.generators.remove(idx).1)
    }

    pub fn generator(&self, id: GeneratorId) -> Option<&Generator> {
        self.generators.iter().find(|(gid, _)| *gid == id).map(|(_, g)| g)
    }

    pub fn generator_mut(&mut self, id: GeneratorId) -> Option<&mut Generator> {
        self.generators
            .iter_mut()
            .find(|(gid, _)| *gid == id)
            .map(|(_, g)| g)
    }

    pub fn add_updater(&mut self, updater: Updater) -> UpdaterId {
        let id = UpdaterId(self.next_id());
        log::debug!("add updater {id} ({})", updater.name());
        self.updaters.push((id, updater));
        id
    }

    pub fn remove_updater(&mut self, id: UpdaterId) -> Option<Updater> {
        let idx = self.updaters.iter().position(|(uid, _)| *uid == id)?;
        log::debug!("remove updater {id}");
        Some(self.updaters.remove(idx).1)
    }

    pub fn updater(&self, id: UpdaterId) -> Option<&Updater> {
        self.updaters.iter().find(|(uid, _)| *uid == id).map(|(_, u)| u)
    }

    pub fn updater_mut(&mut self, id: UpdaterId) -> Option<&mut Updater> {
        self.updaters.iter_mut().find(|(uid, _)| *uid == id).map(|(_, u)| u)
    }

    /// Number of registered (spawners, generators, updaters)
    pub fn stage_counts(&self) -> (usize, usize, usize) {
        (self.spawners.len(), self.generators.len(), self.updaters.len())
    }

    // ── Rendering ──

    pub fn render_mode(&self) -> &RenderMode {
        &self.mode
    }

    /// Swap the bound texture. Ignored in point mode.
    pub fn set_texture(&mut self, handle: TextureHandle) {
        match &mut self.mode {
            RenderMode::Points => {
                log::debug!("set_texture ignored in point mode");
                return;
            }
            RenderMode::Textured { texture, .. }
            | RenderMode::SpriteSheet { texture }
            | RenderMode::Metaball { texture, .. } => *texture = handle,
        }
        log::debug!("texture {} bound ({}x{})", handle.id, handle.width, handle.height);
        pack_vertices(&self.mode, &self.data, &mut self.vertices);
    }

    /// Toggle additive blending in textured mode
    pub fn set_additive_blend(&mut self, enabled: bool) {
        if let RenderMode::Textured { additive, .. } = &mut self.mode {
            *additive = enabled;
        }
    }

    /// Replace the metaball threshold pass parameters
    pub fn set_composite(&mut self, pass: ThresholdComposite) {
        if let RenderMode::Metaball { composite, .. } = &mut self.mode {
            *composite = pass;
        }
    }

    /// Vertices of the particles alive after the last `update`
    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    pub fn render_batch(&self) -> RenderBatch<'_> {
        RenderBatch {
            primitive: self.mode.primitive(),
            blend_mode: self.mode.blend_mode(),
            texture: self.mode.texture(),
            composite: self.mode.composite(),
            vertices: &self.vertices,
        }
    }

    // ── Introspection ──

    pub fn num_all_particles(&self) -> usize {
        self.data.count()
    }

    pub fn num_alive_particles(&self) -> usize {
        self.data.count_alive()
    }

    /// Read-only view of the particle store
    pub fn data(&self) -> &ParticleData {
        &self.data
    }
}
