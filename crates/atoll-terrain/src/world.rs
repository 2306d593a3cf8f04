//! The world facade: one context object owning the generator, terrain,
//! pools, events, and sinks.
//!
//! Registries and pools live here as plain fields, never as process
//! globals, so multiple independent worlds can coexist in one process
//! (and in one test binary).

use atoll_biome::{BiomeGenerator, StrategyKind, SubBiome, SubBiomeId, UnknownStrategyError};
use atoll_config::Config;
use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;

use crate::chunk::{Chunk, ChunkCoord};
use crate::events::{WorldEvent, WorldEventBuffer};
use crate::placement::{FootprintTable, pick_at};
use crate::pool::ScenePool;
use crate::record::{PickOptions, PlaceOptions, PlacedObject};
use crate::save::{ChunkSave, SAVE_VERSION, SaveError, WorldSave};
use crate::seed::hash_seed;
use crate::surface::{NullSink, SurfaceSink};
use crate::terrain::{Terrain, TerrainParams, TickReport};
use crate::view::Aabb;

/// Salt decorrelating the external pick stream from chunk generation.
const PICK_STREAM_SALT: u64 = 0x91C4_0FF5;

/// Errors that can occur when constructing a world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The configured strategy name is not a known variant.
    #[error(transparent)]
    Strategy(#[from] UnknownStrategyError),
}

/// A running world: the full public surface of the engine core.
pub struct World {
    seed: String,
    seed_hash: u64,
    generator: BiomeGenerator,
    terrain: Terrain,
    pool: ScenePool,
    footprints: FootprintTable,
    events: WorldEventBuffer,
    sink: Box<dyn SurfaceSink>,
    pick_rng: ChaCha8Rng,
    observer_subbiome: Option<SubBiomeId>,
    pending_restores: FxHashMap<ChunkCoord, Vec<PlacedObject>>,
}

impl World {
    /// Creates a world from configuration with no geometry consumer.
    pub fn from_config(config: &Config) -> Result<Self, WorldError> {
        Self::with_sink(config, Box::new(NullSink))
    }

    /// Creates a world from configuration with an injected geometry sink.
    ///
    /// The one-time border and floor surfaces are emitted during
    /// construction.
    pub fn with_sink(
        config: &Config,
        mut sink: Box<dyn SurfaceSink>,
    ) -> Result<Self, WorldError> {
        let kind: StrategyKind = config.world.strategy.parse()?;
        let params = TerrainParams::from_config(config);
        let seed_hash = hash_seed(&config.world.seed);
        let generator = BiomeGenerator::new(seed_hash, kind, params.extent());
        let terrain = Terrain::new(params, &generator, sink.as_mut());
        let footprints = FootprintTable::from_strategy(generator.strategy());

        tracing::info!(
            seed = %config.world.seed,
            strategy = %kind,
            "world created"
        );

        Ok(Self {
            seed: config.world.seed.clone(),
            seed_hash,
            generator,
            terrain,
            pool: ScenePool::new(config.placement.pool_capacity),
            footprints,
            events: WorldEventBuffer::new(),
            sink,
            pick_rng: ChaCha8Rng::seed_from_u64(seed_hash.wrapping_add(PICK_STREAM_SALT)),
            observer_subbiome: None,
            pending_restores: FxHashMap::default(),
        })
    }

    /// The user-facing seed string.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// The composed terrain query surface.
    pub fn generator(&self) -> &BiomeGenerator {
        &self.generator
    }

    /// The streaming manager.
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Instance pool statistics.
    pub fn pool(&self) -> &ScenePool {
        &self.pool
    }

    /// Terrain height in world units.
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        self.generator.height_at(x, z)
    }

    /// Composed elevation + moisture classification.
    pub fn classify_at(&self, x: f64, z: f64) -> SubBiomeId {
        self.generator.classify_at(x, z)
    }

    /// Resolves a sub-biome id.
    pub fn subbiome(&self, id: SubBiomeId) -> &SubBiome {
        self.generator.subbiome(id)
    }

    /// The generated chunk covering a world position, if any.
    pub fn chunk_at(&self, x: f64, z: f64) -> Option<&Chunk> {
        self.terrain.chunk_at(x, z)
    }

    /// Readable notification events (this tick and the previous one).
    pub fn events(&self) -> &WorldEventBuffer {
        &self.events
    }

    /// The active strategy's ambient-sound id.
    pub fn ambient_sound(&self) -> &str {
        self.generator.strategy().ambient_sound()
    }

    /// One engine tick: swaps the event buffer, runs the streaming pass,
    /// and reports a biome transition if the observer crossed one.
    pub fn update(&mut self, observer: DVec3, view: &Aabb, dt: f64) -> TickReport {
        self.events.swap();
        let report = self.terrain.update(
            observer,
            view,
            dt,
            &self.generator,
            self.seed_hash,
            &self.footprints,
            &mut self.pool,
            self.sink.as_mut(),
            &mut self.pending_restores,
        );

        let id = self.generator.classify_at(observer.x, observer.z);
        if self.observer_subbiome != Some(id) {
            self.observer_subbiome = Some(id);
            self.events.send(WorldEvent::BiomeEntered {
                subbiome: self.generator.subbiome(id).name.clone(),
            });
        }

        report
    }

    /// Evaluates a pick at a world coordinate using the world's own
    /// deterministic draw stream.
    pub fn pick(&mut self, x: f64, z: f64, options: PickOptions) -> Option<PlacedObject> {
        pick_at(&self.generator, &mut self.pick_rng, x, z, options)
    }

    /// Commits an externally supplied record to its owning chunk.
    ///
    /// Fails (returning `false`) if the position is outside the world, the
    /// owning chunk has never been generated, or the record's bounding box
    /// overlaps a committed object.
    pub fn place_object(&mut self, record: PlacedObject, options: PlaceOptions) -> bool {
        let Some(coord) = self.terrain.coord_at(record.position[0], record.position[2]) else {
            tracing::warn!(kind = %record.kind, "placement outside the world extent");
            return false;
        };
        let Some(chunk) = self.terrain.chunk_mut(coord) else {
            tracing::warn!(kind = %record.kind, ?coord, "placement into an ungenerated chunk");
            return false;
        };

        let mut record = record;
        record.persist = options.persist;
        if !chunk.insert_record(record.clone(), &self.footprints, &mut self.pool) {
            return false;
        }
        self.events.send(WorldEvent::ObjectPlaced {
            record,
            animate: options.animate,
        });
        true
    }

    /// Best-effort removal of a committed record. A missing target is a
    /// tolerated no-op returning `false`.
    pub fn remove_object(&mut self, record: &PlacedObject) -> bool {
        let Some(coord) = self.terrain.coord_at(record.position[0], record.position[2]) else {
            return false;
        };
        let Some(chunk) = self.terrain.chunk_mut(coord) else {
            return false;
        };
        if !chunk.remove_record(record, &mut self.pool) {
            return false;
        }
        self.events.send(WorldEvent::ObjectRemoved {
            record: record.clone(),
        });
        true
    }

    /// Snapshots the durable state: seed, strategy, and every
    /// persist-flagged record (including restores not yet materialized).
    pub fn to_save(&self) -> WorldSave {
        let mut chunks = Vec::new();
        for (coord, chunk) in self.terrain.iter() {
            let records: Vec<PlacedObject> = chunk
                .blueprint()
                .iter()
                .filter(|r| r.persist)
                .cloned()
                .collect();
            if !records.is_empty() {
                chunks.push(ChunkSave {
                    row: coord.row,
                    col: coord.col,
                    records,
                });
            }
        }
        for (coord, records) in &self.pending_restores {
            let persisted: Vec<PlacedObject> =
                records.iter().filter(|r| r.persist).cloned().collect();
            if !persisted.is_empty() {
                chunks.push(ChunkSave {
                    row: coord.row,
                    col: coord.col,
                    records: persisted,
                });
            }
        }
        chunks.sort_by_key(|c| (c.row, c.col));
        WorldSave {
            version: SAVE_VERSION,
            seed: self.seed.clone(),
            strategy: self.generator.strategy().kind(),
            chunks,
        }
    }

    /// Re-applies a save's records to this world.
    ///
    /// Records for already-generated chunks materialize immediately;
    /// records for chunks not yet generated are held back and applied when
    /// the chunk first loads. Returns the number of records applied or
    /// queued.
    pub fn apply_save(&mut self, save: &WorldSave) -> Result<usize, SaveError> {
        if save.seed != self.seed {
            return Err(SaveError::SeedMismatch {
                expected: self.seed.clone(),
                found: save.seed.clone(),
            });
        }

        let mut applied = 0;
        for chunk_save in &save.chunks {
            let coord = ChunkCoord::new(chunk_save.row, chunk_save.col);
            applied += chunk_save.records.len();
            match self.terrain.chunk_mut(coord) {
                Some(chunk) => {
                    for record in &chunk_save.records {
                        chunk.restore_record(record.clone(), &mut self.pool);
                    }
                }
                None => {
                    self.pending_restores
                        .entry(coord)
                        .or_default()
                        .extend(chunk_save.records.iter().cloned());
                }
            }
        }
        tracing::info!(records = applied, "save applied");
        Ok(applied)
    }
}
