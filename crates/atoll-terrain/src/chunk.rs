//! Chunk: the unit of generation, population, and streaming.
//!
//! A chunk samples its terrain surface exactly once, on first load; the
//! seed guarantees resampling would reproduce it bit-for-bit, so detaching
//! a chunk only releases its live entities and retires its surfaces. The
//! blueprint (its placed-object records) outlives every detach and is the
//! only state a save needs.

use atoll_biome::BiomeGenerator;
use glam::{DVec2, DVec3};
use rand::Rng;

use crate::placement::{FootprintTable, overlaps_any, pick_at, place_landmark};
use crate::poisson::poisson_disk;
use crate::pool::{ScenePool, SceneryInstance};
use crate::record::{PickOptions, PlacedObject};
use crate::seed::{chunk_rng, chunk_seed};
use crate::surface::{SurfaceBuffer, SurfaceId, SurfaceSink};
use crate::terrain::TerrainParams;
use crate::view::Aabb;

/// Salt decorrelating the water-site Poisson pass from the land pass.
const WATER_SITE_SALT: u64 = 0x57A7_E401;

/// Candidates tested per accepted Poisson point.
const CANDIDATES_PER_POINT: u32 = 30;

/// Required gap between the tallest terrain sample and the cloud layer,
/// as a fraction of world height.
const CLOUD_CLEARANCE: f64 = 0.04;

/// Cloud vertex color.
const CLOUD_COLOR: [f32; 3] = [0.96, 0.97, 0.98];

/// Identifies a chunk's position in the world grid.
///
/// `row` indexes along Z, `col` along X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk-grid row (Z axis).
    pub row: i32,
    /// Chunk-grid column (X axis).
    pub col: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The coordinate of the chunk containing a world position.
    pub fn from_world(x: f64, z: f64, chunk_size: f64) -> Self {
        Self {
            row: (z / chunk_size).floor() as i32,
            col: (x / chunk_size).floor() as i32,
        }
    }
}

/// Lifecycle state of a chunk's visual representation.
///
/// `Loaded` means terrain exists but no entities are live; `Populated`
/// means the blueprint has been instantiated. Unloaded chunks simply do
/// not exist in the chunk map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Terrain sampled, surfaces built, entities not live.
    Loaded,
    /// Entities instantiated from the blueprint.
    Populated,
}

/// A decorative cloud anchored above a chunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudRecord {
    /// World-space center of the cloud.
    pub position: DVec3,
    /// Scale multiplier for the cloud footprint.
    pub scale: f64,
}

/// One terrain cell: surface samples, water/cloud decisions, and the
/// placed-object blueprint.
pub struct Chunk {
    coord: ChunkCoord,
    bounds: Aabb,
    state: ChunkState,
    visible: bool,
    dirty: bool,
    min_height: f64,
    max_height: f64,
    mean_moisture: f64,
    has_water_patch: bool,
    cloud: Option<CloudRecord>,
    surface: SurfaceBuffer,
    water_surface: Option<SurfaceBuffer>,
    cloud_surface: Option<SurfaceBuffer>,
    blueprint: Vec<PlacedObject>,
    live: Vec<SceneryInstance>,
}

impl Chunk {
    /// Deterministic first-time generation.
    ///
    /// Runs the full pipeline: surface sampling, water-patch and cloud
    /// decisions, then the land, water, and landmark placement passes.
    /// The result starts detached (`Loaded`, dirty, not visible).
    pub fn generate(
        coord: ChunkCoord,
        generator: &BiomeGenerator,
        params: &TerrainParams,
        world_seed: u64,
        footprints: &FootprintTable,
    ) -> Self {
        let size = params.chunk_size();
        let min = DVec2::new(coord.col as f64 * size, coord.row as f64 * size);
        let max = min + DVec2::splat(size);
        let size_y = generator.extent().size_y;

        // Surface sampling over the (cells+1)² grid.
        let cells = params.cells_per_chunk as usize;
        let step = params.cell_size;
        let vertex_count = (cells + 1) * (cells + 1);
        let mut positions = Vec::with_capacity(vertex_count);
        let mut colors = Vec::with_capacity(vertex_count);
        let mut min_height = f64::INFINITY;
        let mut max_height = f64::NEG_INFINITY;
        let mut moisture_sum = 0.0;

        for r in 0..=cells {
            for c in 0..=cells {
                let x = min.x + c as f64 * step;
                let z = min.y + r as f64 * step;
                let elevation = generator.elevation_at(x, z);
                let moisture = generator.moisture_at(x, z);
                let height = elevation * size_y;

                min_height = min_height.min(height);
                max_height = max_height.max(height);
                moisture_sum += moisture;

                positions.push(DVec3::new(x, height, z));
                colors.push(
                    generator
                        .subbiome(generator.classify(elevation, moisture))
                        .color,
                );
            }
        }
        let indices = grid_indices(cells);
        let surface = SurfaceBuffer {
            positions,
            indices,
            colors,
        };
        let mean_moisture = moisture_sum / vertex_count as f64;

        // Water patch: plausible shoreline/seabed chunk in a wet world.
        let shore_margin = params.shore_margin * size_y;
        let has_water_patch = generator.strategy().liquid_surface().is_some()
            && min_height <= generator.sea_level() + shore_margin;
        let water_surface =
            has_water_patch.then(|| water_grid(generator, min, cells, step));

        // Cloud: moisture-gated roll, then a clearance test against the
        // tallest terrain sample so the cloud never clips a peak.
        let mut rng = chunk_rng(world_seed, coord);
        let mut cloud = None;
        let mut cloud_surface = None;
        if rng.random::<f64>() < params.cloud_chance * mean_moisture {
            let scale = rng.random_range(0.6..1.4);
            let altitude = generator.cloud_altitude();
            if max_height + CLOUD_CLEARANCE * size_y <= altitude {
                let center = (min + max) * 0.5;
                let record = CloudRecord {
                    position: DVec3::new(center.x, altitude, center.y),
                    scale,
                };
                cloud_surface = Some(cloud_quad(&record, size));
                cloud = Some(record);
            }
        }

        // Population: land pass, water pass, then the landmark.
        let seed = chunk_seed(world_seed, coord);
        let mut blueprint = Vec::new();
        for site in poisson_disk(seed, min, max, params.site_spacing, CANDIDATES_PER_POINT) {
            let options = PickOptions {
                on_water: false,
                force: false,
            };
            if let Some(record) = pick_at(generator, &mut rng, site.x, site.y, options)
                && !overlaps_any(&record, &blueprint, footprints)
            {
                blueprint.push(record);
            }
        }
        if has_water_patch {
            let water_seed = seed ^ WATER_SITE_SALT;
            for site in
                poisson_disk(water_seed, min, max, params.site_spacing, CANDIDATES_PER_POINT)
            {
                let options = PickOptions {
                    on_water: true,
                    force: false,
                };
                if let Some(record) = pick_at(generator, &mut rng, site.x, site.y, options)
                    && !overlaps_any(&record, &blueprint, footprints)
                {
                    blueprint.push(record);
                }
            }
        }
        if let Some(rule) = generator.strategy().landmark()
            && rng.random::<f64>() < rule.spawn_chance
            && let Some(record) = place_landmark(
                generator,
                &mut rng,
                rule,
                min,
                max,
                &blueprint,
                footprints,
                params.landmark_attempts,
            )
        {
            blueprint.push(record);
        }

        Self {
            coord,
            bounds: Aabb::new(
                DVec3::new(min.x, 0.0, min.y),
                DVec3::new(max.x, size_y, max.y),
            ),
            state: ChunkState::Loaded,
            visible: false,
            dirty: true,
            min_height,
            max_height,
            mean_moisture,
            has_water_patch,
            cloud,
            surface,
            water_surface,
            cloud_surface,
            blueprint,
            live: Vec::new(),
        }
    }

    /// Brings the chunk into the live graph: surfaces go to the sink and,
    /// if the chunk is dirty, entities are re-instantiated from the
    /// blueprint. Idempotent while attached.
    pub fn attach(&mut self, pool: &mut ScenePool, sink: &mut dyn SurfaceSink) {
        if self.visible {
            return;
        }
        sink.surface_ready(SurfaceId::Terrain(self.coord), &self.surface);
        if let Some(ref water) = self.water_surface {
            sink.surface_ready(SurfaceId::Water(self.coord), water);
        }
        if let Some(ref cloud) = self.cloud_surface {
            sink.surface_ready(SurfaceId::Cloud(self.coord), cloud);
        }
        if self.dirty {
            for record in &self.blueprint {
                self.live.push(pool.acquire(record));
            }
            self.dirty = false;
        }
        self.visible = true;
        self.state = ChunkState::Populated;
    }

    /// Removes the chunk from the live graph: every live entity returns to
    /// its pool and the surfaces retire. The blueprint is untouched, so a
    /// later [`attach`](Chunk::attach) reproduces the exact same content.
    pub fn detach(&mut self, pool: &mut ScenePool, sink: &mut dyn SurfaceSink) {
        if !self.visible {
            return;
        }
        for instance in self.live.drain(..) {
            pool.release(instance);
        }
        sink.surface_retired(SurfaceId::Terrain(self.coord));
        if self.water_surface.is_some() {
            sink.surface_retired(SurfaceId::Water(self.coord));
        }
        if self.cloud_surface.is_some() {
            sink.surface_retired(SurfaceId::Cloud(self.coord));
        }
        self.visible = false;
        self.dirty = true;
        self.state = ChunkState::Loaded;
    }

    /// Commits an externally supplied record, honoring the no-overlap
    /// invariant. Returns `false` if the record's box overlaps a committed
    /// one.
    pub(crate) fn insert_record(
        &mut self,
        record: PlacedObject,
        footprints: &FootprintTable,
        pool: &mut ScenePool,
    ) -> bool {
        if overlaps_any(&record, &self.blueprint, footprints) {
            return false;
        }
        if self.visible {
            self.live.push(pool.acquire(&record));
        }
        self.blueprint.push(record);
        true
    }

    /// Re-adds a record restored from a save, bypassing the collision gate
    /// (the record was valid when saved).
    pub(crate) fn restore_record(&mut self, record: PlacedObject, pool: &mut ScenePool) {
        if self.visible {
            self.live.push(pool.acquire(&record));
        }
        self.blueprint.push(record);
    }

    /// Best-effort removal by kind and exact position. Returns `false` if
    /// no matching record exists.
    pub(crate) fn remove_record(&mut self, record: &PlacedObject, pool: &mut ScenePool) -> bool {
        let Some(index) = self
            .blueprint
            .iter()
            .position(|r| r.kind == record.kind && r.position == record.position)
        else {
            return false;
        };
        let removed = self.blueprint.remove(index);
        if self.visible
            && let Some(live_index) = self
                .live
                .iter()
                .position(|i| i.kind == removed.kind && i.position.to_array() == removed.position)
        {
            let instance = self.live.swap_remove(live_index);
            pool.release(instance);
        }
        true
    }

    /// This chunk's grid coordinate.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// World-space bounding box of the chunk's volume.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// `true` while the chunk is in the live graph.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// `true` if the chunk needs re-population on its next attach.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Lowest terrain sample in the chunk.
    pub fn min_height(&self) -> f64 {
        self.min_height
    }

    /// Highest terrain sample in the chunk.
    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Mean sampled moisture.
    pub fn mean_moisture(&self) -> f64 {
        self.mean_moisture
    }

    /// `true` if the chunk carries a water patch.
    pub fn has_water_patch(&self) -> bool {
        self.has_water_patch
    }

    /// The chunk's cloud, if one was committed.
    pub fn cloud(&self) -> Option<&CloudRecord> {
        self.cloud.as_ref()
    }

    /// The placed-object blueprint.
    pub fn blueprint(&self) -> &[PlacedObject] {
        &self.blueprint
    }

    /// Live entity instances (empty while detached).
    pub fn live(&self) -> &[SceneryInstance] {
        &self.live
    }

    /// The terrain surface buffer.
    pub fn surface(&self) -> &SurfaceBuffer {
        &self.surface
    }

    /// The water patch buffer, if any.
    pub fn water_surface(&self) -> Option<&SurfaceBuffer> {
        self.water_surface.as_ref()
    }
}

/// Two triangles per cell over a `(cells+1)²` vertex grid.
fn grid_indices(cells: usize) -> Vec<[u32; 3]> {
    let stride = (cells + 1) as u32;
    let mut indices = Vec::with_capacity(cells * cells * 2);
    for r in 0..cells as u32 {
        for c in 0..cells as u32 {
            let i0 = r * stride + c;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            indices.push([i0, i2, i1]);
            indices.push([i1, i2, i3]);
        }
    }
    indices
}

/// Water patch grid: same triangulation as the terrain, sampled on the
/// water height field and colored by depth.
fn water_grid(
    generator: &BiomeGenerator,
    min: DVec2,
    cells: usize,
    step: f64,
) -> SurfaceBuffer {
    let vertex_count = (cells + 1) * (cells + 1);
    let mut positions = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);
    for r in 0..=cells {
        for c in 0..=cells {
            let x = min.x + c as f64 * step;
            let z = min.y + r as f64 * step;
            positions.push(DVec3::new(x, generator.water_height_at(x, z), z));
            colors.push(generator.water_color_at(x, z).unwrap_or([0.0; 3]));
        }
    }
    SurfaceBuffer {
        positions,
        indices: grid_indices(cells),
        colors,
    }
}

/// A flat quad billboard for the cloud footprint.
fn cloud_quad(record: &CloudRecord, chunk_size: f64) -> SurfaceBuffer {
    let half = chunk_size * 0.25 * record.scale;
    let p = record.position;
    SurfaceBuffer {
        positions: vec![
            DVec3::new(p.x - half, p.y, p.z - half),
            DVec3::new(p.x + half, p.y, p.z - half),
            DVec3::new(p.x - half, p.y, p.z + half),
            DVec3::new(p.x + half, p.y, p.z + half),
        ],
        indices: vec![[0, 2, 1], [1, 2, 3]],
        colors: vec![CLOUD_COLOR; 4],
    }
}
