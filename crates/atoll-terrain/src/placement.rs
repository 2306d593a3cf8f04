//! The pick engine: weighted, scarcity-gated organism selection.
//!
//! A "pick" evaluates one candidate site against the sub-biome's placement
//! rules and either emits a [`PlacedObject`] record or nothing. Every
//! failure mode here is a sentinel `None`; a failed pick must never abort
//! chunk loading.

use atoll_biome::{BiomeGenerator, BiomeStrategy, LandmarkRule, Organism, SubBiome};
use glam::DVec2;
use hashbrown::HashMap;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::record::{PickOptions, PlacedObject};

/// Collision half-extent assumed for kinds the table has never seen
/// (externally supplied records).
const DEFAULT_FOOTPRINT: f64 = 2.0;

/// Resolves a record's padded bounding-box half-extent from its kind.
///
/// Built once per world from the active strategy's organisms and landmark
/// rule; owned by the world, never a process global.
pub struct FootprintTable {
    base: HashMap<String, f64>,
}

impl FootprintTable {
    /// Collects the footprints of every organism and landmark the strategy
    /// can place.
    pub fn from_strategy(strategy: &BiomeStrategy) -> Self {
        let mut base = HashMap::new();
        for (_, subbiome) in strategy.registry().iter() {
            for organism in &subbiome.organisms {
                base.insert(organism.name.clone(), organism.footprint);
            }
        }
        if let Some(rule) = strategy.landmark() {
            base.insert(rule.name.clone(), rule.footprint);
        }
        Self { base }
    }

    /// The scaled half-extent of a record's bounding box.
    pub fn half_extent(&self, record: &PlacedObject) -> f64 {
        let base = self
            .base
            .get(&record.kind)
            .copied()
            .unwrap_or(DEFAULT_FOOTPRINT);
        base * record.scale[0].max(record.scale[2])
    }
}

/// Returns `true` if `candidate`'s bounding box overlaps any committed
/// record's box in the horizontal plane.
pub fn overlaps_any(
    candidate: &PlacedObject,
    committed: &[PlacedObject],
    footprints: &FootprintTable,
) -> bool {
    let half = footprints.half_extent(candidate);
    committed.iter().any(|other| {
        let limit = half + footprints.half_extent(other);
        (candidate.position[0] - other.position[0]).abs() < limit
            && (candidate.position[2] - other.position[2]).abs() < limit
    })
}

/// Selects an organism from a sub-biome's rules, or `None` if the site is
/// rejected.
///
/// 1. Filter to organisms whose `floats` flag matches the requested mode.
/// 2. Draw one proportionally to weight (normalized over the filtered set).
/// 3. Gate the draw on scarcity (unless forced) and the organism's
///    elevation/moisture ranges.
pub fn pick_in<'a>(
    subbiome: &'a SubBiome,
    elevation: f64,
    moisture: f64,
    rng: &mut ChaCha8Rng,
    options: PickOptions,
) -> Option<&'a Organism> {
    let eligible: Vec<&Organism> = subbiome
        .organisms
        .iter()
        .filter(|o| o.floats == options.on_water)
        .collect();
    if eligible.is_empty() {
        return None;
    }

    let total_weight: f64 = eligible.iter().map(|o| o.weight).sum();
    if total_weight <= 0.0 {
        return None;
    }

    // Walk the cumulative weight sum; stop at the first organism whose
    // cumulative weight reaches the draw.
    let draw = rng.random_range(0.0..total_weight);
    let mut cumulative = 0.0;
    let mut chosen: Option<&Organism> = None;
    for &organism in &eligible {
        cumulative += organism.weight;
        if cumulative >= draw {
            chosen = Some(organism);
            break;
        }
    }
    // Float rounding can leave the cumulative sum a hair short of the
    // draw; the last organism takes it.
    let chosen = chosen.unwrap_or(eligible[eligible.len() - 1]);

    if !options.force && rng.random::<f64>() < chosen.scarcity {
        return None;
    }
    if !chosen.admits(elevation, moisture) {
        return None;
    }

    Some(chosen)
}

/// Evaluates a full pick at a world coordinate and builds the record.
///
/// Floating organisms sample the water height at four offset points around
/// the site and take the maximum, so the object never clips below a wave
/// crest; land organisms sit on the terrain surface.
pub fn pick_at(
    generator: &BiomeGenerator,
    rng: &mut ChaCha8Rng,
    x: f64,
    z: f64,
    options: PickOptions,
) -> Option<PlacedObject> {
    let elevation = generator.elevation_at(x, z);
    let moisture = generator.moisture_at(x, z);
    let subbiome = generator.subbiome(generator.classify(elevation, moisture));

    let organism = pick_in(subbiome, elevation, moisture, rng, options)?;

    let scale = rng.random_range(organism.scale_range.0..=organism.scale_range.1);
    let yaw = rng.random_range(0.0..std::f64::consts::TAU);

    let y = if organism.floats {
        let offset = organism.footprint.max(1.0) * 0.5;
        [(offset, 0.0), (-offset, 0.0), (0.0, offset), (0.0, -offset)]
            .into_iter()
            .map(|(dx, dz)| generator.water_height_at(x + dx, z + dz))
            .fold(f64::NEG_INFINITY, f64::max)
    } else {
        generator.height_at(x, z)
    };

    Some(PlacedObject {
        kind: organism.name.clone(),
        position: [x, y, z],
        yaw,
        scale: [scale, scale, scale],
        floats: organism.floats,
        persist: false,
    })
}

/// Places a strategy's unique landmark by bounded retry.
///
/// Draws uniformly random sites within the region and checks the same
/// elevation/moisture/collision gates as ordinary picks, up to
/// `max_attempts` iterations. Exhausting the ceiling yields `None` with a
/// warning, never an error.
pub fn place_landmark(
    generator: &BiomeGenerator,
    rng: &mut ChaCha8Rng,
    rule: &LandmarkRule,
    region_min: DVec2,
    region_max: DVec2,
    committed: &[PlacedObject],
    footprints: &FootprintTable,
    max_attempts: u32,
) -> Option<PlacedObject> {
    for _ in 0..max_attempts {
        let x = rng.random_range(region_min.x..region_max.x);
        let z = rng.random_range(region_min.y..region_max.y);

        let elevation = generator.elevation_at(x, z);
        let moisture = generator.moisture_at(x, z);
        let elevation_ok = rule
            .elevation_range
            .is_none_or(|(lo, hi)| elevation >= lo && elevation <= hi);
        let moisture_ok = rule
            .moisture_range
            .is_none_or(|(lo, hi)| moisture >= lo && moisture <= hi);
        if !elevation_ok || !moisture_ok {
            continue;
        }

        let scale = rng.random_range(rule.scale_range.0..=rule.scale_range.1);
        let yaw = rng.random_range(0.0..std::f64::consts::TAU);
        let candidate = PlacedObject {
            kind: rule.name.clone(),
            position: [x, generator.height_at(x, z), z],
            yaw,
            scale: [scale, scale, scale],
            floats: false,
            persist: false,
        };

        if overlaps_any(&candidate, committed, footprints) {
            continue;
        }
        return Some(candidate);
    }

    tracing::warn!(
        landmark = %rule.name,
        attempts = max_attempts,
        "no valid landmark site found; leaving chunk without one"
    );
    None
}
