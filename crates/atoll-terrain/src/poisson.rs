//! Seed-aware Poisson-disk sampling over a rectangle.
//!
//! Candidate sites for object placement are never drawn independently per
//! point; they come from this sampler, which guarantees a minimum
//! inter-site distance before any pick or scarcity gate runs. That bounds
//! worst-case object density up front instead of relying on rejection
//! sampling to converge.

use glam::DVec2;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Packing factor used to bound the number of points a region can hold.
/// Disk packings never exceed ~0.7 coverage of the naive `d²` grid bound.
const PACKING_BOUND: f64 = 0.7;

/// Generates Poisson-disk sample points within a rectangle using Mitchell's
/// best-candidate algorithm.
///
/// For each accepted point, `candidates_per_point` uniform candidates are
/// drawn and the one farthest from all existing points wins, provided it
/// clears `min_distance`. The result is deterministic for a given seed.
pub fn poisson_disk(
    seed: u64,
    region_min: DVec2,
    region_max: DVec2,
    min_distance: f64,
    candidates_per_point: u32,
) -> Vec<DVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut points: Vec<DVec2> = Vec::new();

    if min_distance <= 0.0 {
        return points;
    }

    let extent = region_max - region_min;
    if extent.x <= 0.0 || extent.y <= 0.0 {
        return points;
    }

    let area = extent.x * extent.y;
    let max_points = (area / (min_distance * min_distance * PACKING_BOUND)) as usize;

    for _ in 0..max_points {
        let mut best_candidate = None;
        let mut best_distance = 0.0f64;

        for _ in 0..candidates_per_point {
            let candidate = DVec2::new(
                rng.random_range(region_min.x..region_max.x),
                rng.random_range(region_min.y..region_max.y),
            );

            let nearest = points
                .iter()
                .map(|p| p.distance(candidate))
                .fold(f64::INFINITY, f64::min);

            if nearest >= min_distance && nearest > best_distance {
                best_candidate = Some(candidate);
                best_distance = nearest;
            }
        }

        match best_candidate {
            Some(point) => points.push(point),
            // No candidate cleared the spacing; the region is saturated.
            None => break,
        }
    }

    points
}
