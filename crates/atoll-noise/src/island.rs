//! Island-shaping combinators and per-world randomized shape parameters.
//!
//! Both combinators attenuate an elevation sample `e` (plus a noise term
//! `a`) by a power curve of the distance `d` from map center, so a landmass
//! fades into ocean toward the edges. Strategies share the math and vary
//! only the parameters, which are rolled once per world.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Additive island shaping: `e + a - b * d^c`.
///
/// Subtracting the distance term pulls the map edge below sea level while
/// leaving the center untouched.
pub fn island_add(a: f64, b: f64, c: f64, d: f64, e: f64) -> f64 {
    e + a - b * libm::pow(d, c)
}

/// Multiplicative island shaping: `(e + a) * (1 - b * d^c)`.
///
/// Scaling by the distance term preserves relative relief near the center
/// and flattens everything toward the edge, giving softer coastlines than
/// [`island_add`].
pub fn island_multiply(a: f64, b: f64, c: f64, d: f64, e: f64) -> f64 {
    (e + a) * (1.0 - b * libm::pow(d, c))
}

/// Axis-weighted Euclidean distance from map center in normalized
/// coordinates.
///
/// `nx`/`nz` are positions normalized to `[0, 1]` across the map extent;
/// the result is 0.0 at center and reaches `sqrt(wx^2 + wz^2)` in a corner.
/// Weights above 1.0 squash the landmass along that axis.
pub fn center_distance(nx: f64, nz: f64, weight_x: f64, weight_z: f64) -> f64 {
    let dx = (nx - 0.5) * 2.0 * weight_x;
    let dz = (nz - 0.5) * 2.0 * weight_z;
    libm::sqrt(dx * dx + dz * dz)
}

/// Per-world island shape parameters, rolled once at world creation.
///
/// Feeds the `a` (size), `b` (steepness), and `c` (roundness) arguments of
/// the combinators so every seed gets a visually distinct coastline from
/// the same math.
#[derive(Clone, Copy, Debug)]
pub struct IslandShape {
    /// Baseline landmass lift added to every sample.
    pub size: f64,
    /// How hard elevation falls off with distance from center.
    pub steepness: f64,
    /// Exponent on the distance term; higher values keep the interior flat
    /// and concentrate the falloff near the coast.
    pub roundness: f64,
    /// Distance weight along X; >1 narrows the landmass on that axis.
    pub weight_x: f64,
    /// Distance weight along Z.
    pub weight_z: f64,
}

impl IslandShape {
    /// Rolls shape parameters from a world-seeded RNG.
    ///
    /// Ranges are tuned so every roll still produces a single connected
    /// landmass with ocean reaching the map edge.
    pub fn roll(rng: &mut ChaCha8Rng) -> Self {
        Self {
            size: rng.random_range(0.06..0.16),
            steepness: rng.random_range(0.85..1.2),
            roundness: rng.random_range(1.7..2.8),
            weight_x: rng.random_range(0.9..1.15),
            weight_z: rng.random_range(0.9..1.15),
        }
    }

    /// Applies [`island_add`] with this shape's parameters.
    pub fn shape_add(&self, d: f64, e: f64) -> f64 {
        island_add(self.size, self.steepness, self.roundness, d, e)
    }

    /// Applies [`island_multiply`] with this shape's parameters.
    pub fn shape_multiply(&self, d: f64, e: f64) -> f64 {
        island_multiply(self.size, self.steepness, self.roundness, d, e)
    }

    /// Weighted center distance for normalized coordinates.
    pub fn distance(&self, nx: f64, nz: f64) -> f64 {
        center_distance(nx, nz, self.weight_x, self.weight_z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_island_add_is_identity_at_center() {
        // At d = 0 the distance term vanishes and only the lift remains.
        let v = island_add(0.1, 1.0, 2.0, 0.0, 0.6);
        assert!((v - 0.7).abs() < EPSILON, "expected 0.7, got {v}");
    }

    #[test]
    fn test_island_multiply_is_scaled_lift_at_center() {
        let v = island_multiply(0.1, 1.0, 2.0, 0.0, 0.6);
        assert!((v - 0.7).abs() < EPSILON, "expected 0.7, got {v}");
    }

    #[test]
    fn test_both_combinators_attenuate_with_distance() {
        let near = island_add(0.1, 1.0, 2.0, 0.2, 0.6);
        let far = island_add(0.1, 1.0, 2.0, 0.9, 0.6);
        assert!(far < near, "island_add must fall off with distance");

        let near = island_multiply(0.1, 1.0, 2.0, 0.2, 0.6);
        let far = island_multiply(0.1, 1.0, 2.0, 0.9, 0.6);
        assert!(far < near, "island_multiply must fall off with distance");
    }

    #[test]
    fn test_center_distance_zero_at_center() {
        assert!(center_distance(0.5, 0.5, 1.0, 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_center_distance_corner_is_sqrt2_unweighted() {
        let d = center_distance(1.0, 1.0, 1.0, 1.0);
        assert!((d - std::f64::consts::SQRT_2).abs() < 1e-9, "got {d}");
    }

    #[test]
    fn test_center_distance_weights_squash_one_axis() {
        let wide = center_distance(1.0, 0.5, 1.0, 1.0);
        let squashed = center_distance(1.0, 0.5, 1.5, 1.0);
        assert!(squashed > wide, "higher weight must increase distance");
    }

    #[test]
    fn test_roll_is_deterministic_per_seed() {
        let mut rng_a = ChaCha8Rng::seed_from_u64(99);
        let mut rng_b = ChaCha8Rng::seed_from_u64(99);
        let a = IslandShape::roll(&mut rng_a);
        let b = IslandShape::roll(&mut rng_b);
        assert!((a.size - b.size).abs() < EPSILON);
        assert!((a.steepness - b.steepness).abs() < EPSILON);
        assert!((a.roundness - b.roundness).abs() < EPSILON);
        assert!((a.weight_x - b.weight_x).abs() < EPSILON);
        assert!((a.weight_z - b.weight_z).abs() < EPSILON);
    }

    #[test]
    fn test_roll_stays_in_documented_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            let s = IslandShape::roll(&mut rng);
            assert!((0.06..0.16).contains(&s.size));
            assert!((0.85..1.2).contains(&s.steepness));
            assert!((1.7..2.8).contains(&s.roundness));
        }
    }

    #[test]
    fn test_shaped_elevation_sinks_at_map_edge() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let shape = IslandShape::roll(&mut rng);
            let center = shape.shape_multiply(shape.distance(0.5, 0.5), 0.5);
            let edge = shape.shape_multiply(shape.distance(0.0, 0.5), 0.5);
            assert!(
                edge < center,
                "edge elevation {edge} should sit below center {center}"
            );
        }
    }
}
