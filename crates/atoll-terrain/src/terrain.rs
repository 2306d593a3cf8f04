//! Terrain: the spatial streaming manager.
//!
//! Keeps a sparse grid of chunks, computes the resident window around the
//! observer each tick, and attaches/detaches chunks as they enter and
//! leave it. Chunks leaving the window are detached from the live graph
//! but never deleted from the map; their blueprints persist.
//!
//! Single-threaded by design: one update per tick, every chunk load
//! completes synchronously within the tick that requested it. A port that
//! introduces generation workers must keep window computation and chunk
//! mutation on one logical owner and serialize pool access.

use atoll_biome::{BiomeGenerator, WorldExtent};
use glam::{DVec2, DVec3};
use rustc_hash::FxHashMap;

use atoll_config::Config;

use crate::chunk::{Chunk, ChunkCoord};
use crate::placement::FootprintTable;
use crate::pool::ScenePool;
use crate::record::PlacedObject;
use crate::surface::{SurfaceBuffer, SurfaceId, SurfaceSink};
use crate::view::Aabb;

/// Vertex color of the border skirt and bottom cap.
const EDGE_ROCK_COLOR: [f32; 3] = [0.21, 0.19, 0.17];

/// Geometry and streaming parameters, resolved once from [`Config`].
#[derive(Clone, Debug)]
pub struct TerrainParams {
    /// Map width in chunks.
    pub chunks_x: i32,
    /// Map depth in chunks.
    pub chunks_z: i32,
    /// Terrain sample cells per chunk side.
    pub cells_per_chunk: u32,
    /// Edge length of one cell in world units.
    pub cell_size: f64,
    /// Vertical world extent in world units.
    pub world_height: f64,
    /// Resident-window radius in chunks.
    pub visibility_radius: i32,
    /// Shoreline margin as a fraction of world height.
    pub shore_margin: f64,
    /// Poisson-disk spacing between candidate sites, in world units.
    pub site_spacing: f64,
    /// Iteration ceiling for landmark placement.
    pub landmark_attempts: u32,
    /// Baseline cloud probability, scaled by chunk moisture.
    pub cloud_chance: f64,
}

impl TerrainParams {
    /// Resolves parameters from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunks_x: config.world.chunks_x as i32,
            chunks_z: config.world.chunks_z as i32,
            cells_per_chunk: config.world.cells_per_chunk,
            cell_size: config.world.cell_size,
            world_height: config.world.world_height,
            visibility_radius: config.streaming.visibility_radius as i32,
            shore_margin: config.streaming.shore_margin,
            site_spacing: config.placement.site_spacing_cells * config.world.cell_size,
            landmark_attempts: config.placement.landmark_attempts,
            cloud_chance: config.placement.cloud_chance,
        }
    }

    /// Edge length of one (square) chunk in world units.
    pub fn chunk_size(&self) -> f64 {
        self.cells_per_chunk as f64 * self.cell_size
    }

    /// The full world extent.
    pub fn extent(&self) -> WorldExtent {
        WorldExtent::new(
            self.chunks_x as f64 * self.chunk_size(),
            self.world_height,
            self.chunks_z as f64 * self.chunk_size(),
        )
    }

    /// The chunk coordinate containing a world position (unclamped).
    pub fn coord_of(&self, x: f64, z: f64) -> ChunkCoord {
        ChunkCoord::from_world(x, z, self.chunk_size())
    }

    /// `true` if the coordinate addresses a chunk inside the finite map.
    pub fn in_bounds(&self, coord: ChunkCoord) -> bool {
        coord.row >= 0 && coord.row < self.chunks_z && coord.col >= 0 && coord.col < self.chunks_x
    }
}

/// Counters from one streaming tick.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunks generated for the first time this tick.
    pub generated: u32,
    /// Dirty chunks re-populated from their blueprints.
    pub repopulated: u32,
    /// Chunks detached after leaving the window.
    pub detached: u32,
    /// Chunks in the resident window after the tick.
    pub resident: u32,
}

/// The chunk streaming manager.
pub struct Terrain {
    params: TerrainParams,
    chunks: FxHashMap<ChunkCoord, Chunk>,
    visible: Vec<ChunkCoord>,
    water_clock: f64,
}

impl Terrain {
    /// Creates the terrain and runs the one-time world-load pass: the
    /// border skirt along the four world edges and the bottom cap closing
    /// the volume underneath. Both are pure functions of the edge
    /// coordinates and are never regenerated.
    pub fn new(
        params: TerrainParams,
        generator: &BiomeGenerator,
        sink: &mut dyn SurfaceSink,
    ) -> Self {
        sink.surface_ready(SurfaceId::Border, &build_border(generator, &params));
        sink.surface_ready(SurfaceId::Floor, &build_floor(&params));
        Self {
            params,
            chunks: FxHashMap::default(),
            visible: Vec::new(),
            water_clock: 0.0,
        }
    }

    /// One streaming tick.
    ///
    /// 1. Compute the observer's chunk and the clamped resident window.
    /// 2. Detach previously visible chunks that fell outside it.
    /// 3. Generate missing window chunks; re-populate dirty ones that
    ///    intersect the view volume.
    /// 4. Advance the shared water clock.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        observer: DVec3,
        view: &Aabb,
        dt: f64,
        generator: &BiomeGenerator,
        world_seed: u64,
        footprints: &FootprintTable,
        pool: &mut ScenePool,
        sink: &mut dyn SurfaceSink,
        pending_restores: &mut FxHashMap<ChunkCoord, Vec<PlacedObject>>,
    ) -> TickReport {
        let mut report = TickReport::default();

        let center = self.params.coord_of(observer.x, observer.z);
        let radius = self.params.visibility_radius;
        // The window clamps at the map boundary; the world is finite, not
        // toroidal.
        let row_min = (center.row - radius).max(0);
        let row_max = (center.row + radius).min(self.params.chunks_z - 1);
        let col_min = (center.col - radius).max(0);
        let col_max = (center.col + radius).min(self.params.chunks_x - 1);
        let in_window = |coord: ChunkCoord| {
            coord.row >= row_min
                && coord.row <= row_max
                && coord.col >= col_min
                && coord.col <= col_max
        };

        // Detach chunks that left the window; their map entries persist.
        let previous = std::mem::take(&mut self.visible);
        for coord in previous {
            if !in_window(coord)
                && let Some(chunk) = self.chunks.get_mut(&coord)
            {
                chunk.detach(pool, sink);
                report.detached += 1;
            }
        }

        for row in row_min..=row_max {
            for col in col_min..=col_max {
                let coord = ChunkCoord::new(row, col);
                if let Some(chunk) = self.chunks.get_mut(&coord) {
                    if chunk.is_dirty() && chunk.bounds().intersects(view) {
                        chunk.attach(pool, sink);
                        report.repopulated += 1;
                    }
                } else {
                    let mut chunk =
                        Chunk::generate(coord, generator, &self.params, world_seed, footprints);
                    if let Some(restored) = pending_restores.remove(&coord) {
                        for record in restored {
                            chunk.restore_record(record, pool);
                        }
                    }
                    chunk.attach(pool, sink);
                    self.chunks.insert(coord, chunk);
                    report.generated += 1;
                }
                self.visible.push(coord);
            }
        }
        report.resident = self.visible.len() as u32;

        // One shared value per tick, not per chunk.
        self.water_clock += dt;

        report
    }

    /// Streaming parameters.
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// The chunk covering a world position, if it has been generated.
    pub fn chunk_at(&self, x: f64, z: f64) -> Option<&Chunk> {
        let coord = self.params.coord_of(x, z);
        self.params
            .in_bounds(coord)
            .then(|| self.chunks.get(&coord))
            .flatten()
    }

    /// The coordinate covering a world position, if inside the map.
    pub fn coord_at(&self, x: f64, z: f64) -> Option<ChunkCoord> {
        let coord = self.params.coord_of(x, z);
        self.params.in_bounds(coord).then_some(coord)
    }

    /// Immutable access to a chunk by coordinate.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Mutable access to a chunk by coordinate.
    pub(crate) fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Coordinates in the current resident window.
    pub fn resident(&self) -> &[ChunkCoord] {
        &self.visible
    }

    /// Number of chunks ever generated (resident or detached).
    pub fn generated_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates over all generated `(coord, chunk)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    /// The shared liquid-distortion clock, advanced once per tick.
    pub fn water_clock(&self) -> f64 {
        self.water_clock
    }
}

/// Skirt geometry along the four world edges, dropping from the sampled
/// terrain height down to the world floor.
fn build_border(generator: &BiomeGenerator, params: &TerrainParams) -> SurfaceBuffer {
    let extent = params.extent();
    let steps_x = (params.chunks_x * params.cells_per_chunk as i32) as usize;
    let steps_z = (params.chunks_z * params.cells_per_chunk as i32) as usize;

    let mut buffer = SurfaceBuffer::default();
    // Each edge is an independent strip; corners share positions but not
    // indices, which keeps the walk trivial.
    append_edge_strip(
        &mut buffer,
        generator,
        (0..=steps_x).map(|i| DVec2::new(i as f64 * params.cell_size, 0.0)),
    );
    append_edge_strip(
        &mut buffer,
        generator,
        (0..=steps_x).map(|i| DVec2::new(i as f64 * params.cell_size, extent.size_z)),
    );
    append_edge_strip(
        &mut buffer,
        generator,
        (0..=steps_z).map(|i| DVec2::new(0.0, i as f64 * params.cell_size)),
    );
    append_edge_strip(
        &mut buffer,
        generator,
        (0..=steps_z).map(|i| DVec2::new(extent.size_x, i as f64 * params.cell_size)),
    );
    buffer
}

fn append_edge_strip(
    buffer: &mut SurfaceBuffer,
    generator: &BiomeGenerator,
    points: impl Iterator<Item = DVec2>,
) {
    let base = buffer.positions.len() as u32;
    let mut count = 0u32;
    for p in points {
        let height = generator.height_at(p.x, p.y);
        buffer.positions.push(DVec3::new(p.x, height, p.y));
        buffer.positions.push(DVec3::new(p.x, 0.0, p.y));
        buffer.colors.push(EDGE_ROCK_COLOR);
        buffer.colors.push(EDGE_ROCK_COLOR);
        count += 1;
    }
    for i in 0..count.saturating_sub(1) {
        let top0 = base + i * 2;
        let bot0 = top0 + 1;
        let top1 = top0 + 2;
        let bot1 = top0 + 3;
        buffer.indices.push([top0, bot0, top1]);
        buffer.indices.push([top1, bot0, bot1]);
    }
}

/// One quad closing the world volume underneath.
fn build_floor(params: &TerrainParams) -> SurfaceBuffer {
    let extent = params.extent();
    SurfaceBuffer {
        positions: vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(extent.size_x, 0.0, 0.0),
            DVec3::new(0.0, 0.0, extent.size_z),
            DVec3::new(extent.size_x, 0.0, extent.size_z),
        ],
        indices: vec![[0, 1, 2], [1, 3, 2]],
        colors: vec![EDGE_ROCK_COLOR; 4],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::hash_seed;
    use crate::surface::NullSink;
    use atoll_biome::StrategyKind;

    fn params() -> TerrainParams {
        TerrainParams {
            chunks_x: 6,
            chunks_z: 6,
            cells_per_chunk: 4,
            cell_size: 32.0,
            world_height: 256.0,
            visibility_radius: 1,
            shore_margin: 0.05,
            site_spacing: 24.0,
            landmark_attempts: 1000,
            cloud_chance: 0.35,
        }
    }

    struct Harness {
        generator: BiomeGenerator,
        footprints: FootprintTable,
        pool: ScenePool,
        pending: FxHashMap<ChunkCoord, Vec<PlacedObject>>,
        seed: u64,
    }

    impl Harness {
        fn new() -> Self {
            let seed = hash_seed("42");
            let generator = BiomeGenerator::new(seed, StrategyKind::Verdant, params().extent());
            let footprints = FootprintTable::from_strategy(generator.strategy());
            Self {
                generator,
                footprints,
                pool: ScenePool::new(256),
                pending: FxHashMap::default(),
                seed,
            }
        }

        fn tick(&mut self, terrain: &mut Terrain, observer: DVec3) -> TickReport {
            let view = Aabb::from_center_half_extents(observer, DVec3::splat(10_000.0));
            terrain.update(
                observer,
                &view,
                0.016,
                &self.generator,
                self.seed,
                &self.footprints,
                &mut self.pool,
                &mut NullSink,
                &mut self.pending,
            )
        }
    }

    fn center_of(coord: ChunkCoord) -> DVec3 {
        let size = params().chunk_size();
        DVec3::new(
            (coord.col as f64 + 0.5) * size,
            100.0,
            (coord.row as f64 + 0.5) * size,
        )
    }

    #[test]
    fn test_interior_window_is_full_square() {
        let mut harness = Harness::new();
        let mut terrain = Terrain::new(params(), &harness.generator, &mut NullSink);
        let report = harness.tick(&mut terrain, center_of(ChunkCoord::new(3, 3)));

        // radius 1 gives (2*1+1)² chunks away from the map edge.
        assert_eq!(report.resident, 9);
        assert_eq!(report.generated, 9);
    }

    #[test]
    fn test_window_clamps_at_map_corner() {
        let mut harness = Harness::new();
        let mut terrain = Terrain::new(params(), &harness.generator, &mut NullSink);
        let report = harness.tick(&mut terrain, center_of(ChunkCoord::new(0, 0)));

        // Corner observer: only the 2×2 quadrant exists.
        assert_eq!(report.resident, 4);
    }

    #[test]
    fn test_leaving_window_detaches_but_keeps_blueprint() {
        let mut harness = Harness::new();
        let mut terrain = Terrain::new(params(), &harness.generator, &mut NullSink);

        harness.tick(&mut terrain, center_of(ChunkCoord::new(1, 1)));
        let coord = ChunkCoord::new(0, 0);
        let blueprint_before = terrain.chunk(coord).unwrap().blueprint().to_vec();
        assert!(terrain.chunk(coord).unwrap().is_visible());

        // Move far away; (0,0) leaves the window.
        let report = harness.tick(&mut terrain, center_of(ChunkCoord::new(4, 4)));
        assert!(report.detached > 0);
        let chunk = terrain.chunk(coord).unwrap();
        assert!(!chunk.is_visible());
        assert!(chunk.live().is_empty());
        assert_eq!(chunk.blueprint(), blueprint_before.as_slice());
    }

    #[test]
    fn test_reentering_window_repopulates_identically() {
        let mut harness = Harness::new();
        let mut terrain = Terrain::new(params(), &harness.generator, &mut NullSink);

        harness.tick(&mut terrain, center_of(ChunkCoord::new(1, 1)));
        let coord = ChunkCoord::new(0, 0);
        let before = terrain.chunk(coord).unwrap().blueprint().to_vec();

        harness.tick(&mut terrain, center_of(ChunkCoord::new(4, 4)));
        let report = harness.tick(&mut terrain, center_of(ChunkCoord::new(1, 1)));

        assert!(report.repopulated > 0, "dirty chunks in view must re-populate");
        assert_eq!(report.generated, 0, "existing chunks must not regenerate");
        let chunk = terrain.chunk(coord).unwrap();
        assert_eq!(chunk.blueprint(), before.as_slice());
        assert_eq!(chunk.live().len(), before.len());
    }

    #[test]
    fn test_second_tick_at_same_position_is_quiet() {
        let mut harness = Harness::new();
        let mut terrain = Terrain::new(params(), &harness.generator, &mut NullSink);

        harness.tick(&mut terrain, center_of(ChunkCoord::new(2, 2)));
        let report = harness.tick(&mut terrain, center_of(ChunkCoord::new(2, 2)));
        assert_eq!(report.generated, 0);
        assert_eq!(report.repopulated, 0);
        assert_eq!(report.detached, 0);
        assert_eq!(report.resident, 9);
    }

    #[test]
    fn test_water_clock_advances_once_per_tick() {
        let mut harness = Harness::new();
        let mut terrain = Terrain::new(params(), &harness.generator, &mut NullSink);
        harness.tick(&mut terrain, center_of(ChunkCoord::new(2, 2)));
        harness.tick(&mut terrain, center_of(ChunkCoord::new(2, 2)));
        assert!((terrain.water_clock() - 0.032).abs() < 1e-12);
    }

    #[test]
    fn test_border_and_floor_emitted_once_at_creation() {
        struct Recorder {
            ready: Vec<SurfaceId>,
        }
        impl SurfaceSink for Recorder {
            fn surface_ready(&mut self, id: SurfaceId, buffer: &SurfaceBuffer) {
                assert!(!buffer.is_empty(), "{id:?} arrived empty");
                self.ready.push(id);
            }
            fn surface_retired(&mut self, _id: SurfaceId) {}
        }

        let harness = Harness::new();
        let mut recorder = Recorder { ready: Vec::new() };
        let _terrain = Terrain::new(params(), &harness.generator, &mut recorder);
        assert_eq!(recorder.ready, vec![SurfaceId::Border, SurfaceId::Floor]);
    }

    #[test]
    fn test_border_skirt_reaches_the_floor() {
        let harness = Harness::new();
        let buffer = build_border(&harness.generator, &params());
        let bottoms = buffer.positions.iter().filter(|p| p.y == 0.0).count();
        assert_eq!(
            bottoms * 2,
            buffer.positions.len(),
            "every skirt column needs one floor vertex"
        );
    }

    #[test]
    fn test_coord_at_rejects_out_of_bounds() {
        let harness = Harness::new();
        let mut sink = NullSink;
        let terrain = Terrain::new(params(), &harness.generator, &mut sink);
        assert!(terrain.coord_at(-1.0, 10.0).is_none());
        assert!(terrain.coord_at(10.0, 1e9).is_none());
        assert!(terrain.coord_at(10.0, 10.0).is_some());
    }
}
