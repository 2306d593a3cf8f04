//! Headless demo: generate a world and walk an observer across it.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p atoll-demo -- --seed reef-7 --ticks 200`
//! to stream a diagonal crossing of the map and print placement/pool
//! statistics at the end.

use clap::Parser;
use glam::DVec3;
use tracing::info;

use atoll_config::{CliArgs, Config, default_config_dir};
use atoll_terrain::{
    Aabb, PickOptions, PlaceOptions, SurfaceBuffer, SurfaceId, SurfaceSink, World, WorldEvent,
    write_save,
};

/// Counts the geometry a renderer would receive.
#[derive(Default)]
struct StatsSink {
    surfaces_ready: u64,
    surfaces_retired: u64,
    triangles: u64,
}

impl SurfaceSink for StatsSink {
    fn surface_ready(&mut self, _id: SurfaceId, buffer: &SurfaceBuffer) {
        self.surfaces_ready += 1;
        self.triangles += buffer.indices.len() as u64;
    }

    fn surface_retired(&mut self, _id: SurfaceId) {
        self.surfaces_retired += 1;
    }
}

impl Drop for StatsSink {
    fn drop(&mut self) {
        info!(
            surfaces_ready = self.surfaces_ready,
            surfaces_retired = self.surfaces_retired,
            triangles = self.triangles,
            "geometry sink summary"
        );
    }
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| std::path::PathBuf::from("."));
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config unavailable ({err}), using defaults");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    atoll_log::init_logging(None, cfg!(debug_assertions), Some(&config));

    let mut world = match World::with_sink(&config, Box::new(StatsSink::default())) {
        Ok(world) => world,
        Err(err) => {
            eprintln!("failed to create world: {err}");
            std::process::exit(1);
        }
    };

    let extent = world.generator().extent();
    let (size_x, size_z) = (extent.size_x, extent.size_z);
    let ticks = args.ticks.unwrap_or(120);

    info!(
        seed = world.seed(),
        strategy = %world.generator().strategy().kind(),
        ambient = world.ambient_sound(),
        ticks,
        "walking the observer corner to corner"
    );

    let mut generated = 0;
    let mut repopulated = 0;
    let mut detached = 0;

    for tick in 0..ticks {
        // Diagonal crossing, corner to corner.
        let t = (tick as f64 + 0.5) / ticks as f64;
        let observer = DVec3::new(size_x * t, config.world.world_height * 0.5, size_z * t);
        let view = Aabb::from_center_half_extents(
            observer,
            DVec3::splat(world.terrain().params().chunk_size() * 4.0),
        );

        let report = world.update(observer, &view, 1.0 / 60.0);
        generated += report.generated;
        repopulated += report.repopulated;
        detached += report.detached;

        for event in world.events().read() {
            if let WorldEvent::BiomeEntered { subbiome } = event {
                info!(tick, subbiome = %subbiome, "observer crossed into");
            }
        }
    }

    // Drop one keepsake at the final observer position and persist it.
    let (x, z) = (size_x * 0.98, size_z * 0.98);
    if let Some(record) = world.pick(x, z, PickOptions::default()) {
        let committed = world.place_object(
            record.clone(),
            PlaceOptions {
                animate: false,
                persist: true,
            },
        );
        info!(kind = %record.kind, committed, "parting pick at the far corner");
    }

    let placed: usize = world
        .terrain()
        .iter()
        .map(|(_, chunk)| chunk.blueprint().len())
        .sum();
    let water_chunks = world
        .terrain()
        .iter()
        .filter(|(_, chunk)| chunk.has_water_patch())
        .count();
    let clouds = world
        .terrain()
        .iter()
        .filter(|(_, chunk)| chunk.cloud().is_some())
        .count();

    info!(
        generated,
        repopulated,
        detached,
        chunks = world.terrain().generated_count(),
        placed,
        water_chunks,
        clouds,
        pool_created = world.pool().created(),
        pool_reused = world.pool().reused(),
        "crossing complete"
    );

    if let Some(path) = args.save {
        match write_save(&path, &world.to_save()) {
            Ok(()) => info!(path = %path.display(), "save written"),
            Err(err) => eprintln!("failed to write save: {err}"),
        }
    }
}
