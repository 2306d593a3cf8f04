//! The composed terrain query surface: noise fields + active strategy.

use atoll_noise::NoiseField;

use crate::extent::WorldExtent;
use crate::strategy::{BiomeStrategy, CLOUD_ELEVATION, FLOOR_ELEVATION, SEA_ELEVATION, StrategyKind};
use crate::subbiome::{SubBiome, SubBiomeId};

/// Amplitude of the broad water swell, as a fraction of world height.
const WATER_SWELL_AMPLITUDE: f64 = 0.004;
/// Amplitude of the fine water chop, as a fraction of world height.
const WATER_CHOP_AMPLITUDE: f64 = 0.0015;

/// Owns the seeded noise fields and the world's one active strategy, and
/// answers every composed terrain query.
///
/// All queries are pure functions of `(x, z)`; coordinates outside the
/// world extent are clamped onto it so callers always get a defined answer.
pub struct BiomeGenerator {
    field: NoiseField,
    strategy: BiomeStrategy,
    extent: WorldExtent,
}

impl BiomeGenerator {
    /// Creates a generator for the given seed, strategy, and extent.
    pub fn new(seed: u64, kind: StrategyKind, extent: WorldExtent) -> Self {
        Self {
            field: NoiseField::new(seed),
            strategy: BiomeStrategy::new(kind, seed, extent),
            extent,
        }
    }

    /// The world extent this generator was built for.
    pub fn extent(&self) -> &WorldExtent {
        &self.extent
    }

    /// The active strategy.
    pub fn strategy(&self) -> &BiomeStrategy {
        &self.strategy
    }

    /// Normalized elevation in `[FLOOR_ELEVATION, 1]` at a world coordinate.
    ///
    /// The floor clamp guarantees no chunk ever samples below the absolute
    /// terrain floor, whatever the strategy computes.
    pub fn elevation_at(&self, x: f64, z: f64) -> f64 {
        let (x, z) = self.extent.clamp_xz(x, z);
        self.strategy
            .elevation_at(&self.field, x, z)
            .max(FLOOR_ELEVATION)
    }

    /// Terrain height in world units at a world coordinate.
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        self.elevation_at(x, z) * self.extent.size_y
    }

    /// The absolute terrain floor in world units.
    pub fn floor_height(&self) -> f64 {
        FLOOR_ELEVATION * self.extent.size_y
    }

    /// Normalized moisture in `[0, 1]` at a world coordinate.
    ///
    /// Strategies may override moisture; the default is a fixed
    /// low-frequency sample of the secondary field.
    pub fn moisture_at(&self, x: f64, z: f64) -> f64 {
        let (x, z) = self.extent.clamp_xz(x, z);
        match self.strategy.moisture_at(&self.field, x, z) {
            Some(m) => m,
            None => {
                let (nx, nz) = self.extent.normalized(x, z);
                self.field.sample2(nx * 1.3, nz * 1.3)
            }
        }
    }

    /// Classifies the point at a world coordinate into a sub-biome.
    pub fn classify_at(&self, x: f64, z: f64) -> SubBiomeId {
        self.strategy
            .classify(self.elevation_at(x, z), self.moisture_at(x, z))
    }

    /// Classifies a raw (elevation, moisture) pair.
    pub fn classify(&self, elevation: f64, moisture: f64) -> SubBiomeId {
        self.strategy.classify(elevation, moisture)
    }

    /// Resolves a sub-biome id to its definition.
    pub fn subbiome(&self, id: SubBiomeId) -> &SubBiome {
        self.strategy.registry().get(id)
    }

    /// Sea level in world units.
    pub fn sea_level(&self) -> f64 {
        SEA_ELEVATION * self.extent.size_y
    }

    /// Cloud-layer altitude in world units.
    pub fn cloud_altitude(&self) -> f64 {
        CLOUD_ELEVATION * self.extent.size_y
    }

    /// Water surface height in world units at a world coordinate.
    ///
    /// A biome-independent low-amplitude composition layered on the fixed
    /// sea level; used for the water mesh and for floating-object bobbing.
    /// Defined even for dry strategies (callers gate on
    /// [`BiomeStrategy::liquid_surface`]).
    pub fn water_height_at(&self, x: f64, z: f64) -> f64 {
        let (x, z) = self.extent.clamp_xz(x, z);
        let (nx, nz) = self.extent.normalized(x, z);
        let swell = (self.field.sample3(nx * 19.0, nz * 19.0) - 0.5) * 2.0;
        let chop = (self.field.sample2(nx * 41.0, nz * 41.0) - 0.5) * 2.0;
        self.sea_level()
            + swell * WATER_SWELL_AMPLITUDE * self.extent.size_y
            + chop * WATER_CHOP_AMPLITUDE * self.extent.size_y
    }

    /// Water color at a world coordinate, or `None` for dry strategies.
    ///
    /// Blends the strategy's deep color toward its shallow color as the
    /// seabed rises toward sea level.
    pub fn water_color_at(&self, x: f64, z: f64) -> Option<[f32; 3]> {
        let liquid = self.strategy.liquid_surface()?;
        let depth_t = (self.elevation_at(x, z) / SEA_ELEVATION).clamp(0.0, 1.0) as f32;
        let mut color = [0.0; 3];
        for (i, c) in color.iter_mut().enumerate() {
            *c = liquid.deep_color[i] + (liquid.shallow_color[i] - liquid.deep_color[i]) * depth_t;
        }
        Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(kind: StrategyKind) -> BiomeGenerator {
        BiomeGenerator::new(42, kind, WorldExtent::new(4096.0, 1024.0, 4096.0))
    }

    #[test]
    fn test_height_never_drops_below_world_floor() {
        for kind in [StrategyKind::Verdant, StrategyKind::Basalt] {
            let generator = generator(kind);
            for ix in 0..=48 {
                for iz in 0..=48 {
                    let x = ix as f64 / 48.0 * 4096.0;
                    let z = iz as f64 / 48.0 * 4096.0;
                    let h = generator.height_at(x, z);
                    assert!(
                        h >= generator.floor_height(),
                        "{kind:?} height {h} below floor at ({x}, {z})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_out_of_bounds_queries_clamp_to_the_edge() {
        let generator = generator(StrategyKind::Verdant);
        assert_eq!(
            generator.height_at(-500.0, 100.0),
            generator.height_at(0.0, 100.0)
        );
        assert_eq!(
            generator.height_at(100.0, 9999.0),
            generator.height_at(100.0, 4096.0)
        );
        assert_eq!(
            generator.classify_at(-1.0, -1.0),
            generator.classify_at(0.0, 0.0)
        );
    }

    #[test]
    fn test_same_seed_produces_identical_queries() {
        let a = generator(StrategyKind::Verdant);
        let b = generator(StrategyKind::Verdant);
        for i in 0..100 {
            let x = i as f64 * 37.1;
            let z = 4096.0 - i as f64 * 11.7;
            assert_eq!(a.height_at(x, z), b.height_at(x, z));
            assert_eq!(a.moisture_at(x, z), b.moisture_at(x, z));
            assert_eq!(a.classify_at(x, z), b.classify_at(x, z));
            assert_eq!(a.water_height_at(x, z), b.water_height_at(x, z));
        }
    }

    #[test]
    fn test_water_height_stays_near_sea_level() {
        let generator = generator(StrategyKind::Verdant);
        let sea = generator.sea_level();
        let band = 1024.0 * (WATER_SWELL_AMPLITUDE + WATER_CHOP_AMPLITUDE);
        for i in 0..200 {
            let x = i as f64 * 20.0;
            let z = i as f64 * 17.0;
            let w = generator.water_height_at(x, z);
            assert!(
                (w - sea).abs() <= band + 1e-9,
                "water height {w} strayed more than {band} from sea level {sea}"
            );
        }
    }

    #[test]
    fn test_dry_strategy_has_no_water_color() {
        let generator = generator(StrategyKind::Basalt);
        assert!(generator.water_color_at(100.0, 100.0).is_none());
    }

    #[test]
    fn test_water_color_blends_shallow_over_high_seabed() {
        let generator = generator(StrategyKind::Verdant);
        let liquid = generator.strategy().liquid_surface().unwrap().clone();
        // Find a deep-ocean point and a land point.
        let mut deepest = (0.0, 0.0, 1.0);
        let mut highest = (0.0, 0.0, 0.0);
        for ix in 0..64 {
            for iz in 0..64 {
                let x = ix as f64 / 64.0 * 4096.0;
                let z = iz as f64 / 64.0 * 4096.0;
                let e = generator.elevation_at(x, z);
                if e < deepest.2 {
                    deepest = (x, z, e);
                }
                if e > highest.2 {
                    highest = (x, z, e);
                }
            }
        }
        let deep_color = generator.water_color_at(deepest.0, deepest.1).unwrap();
        let high_color = generator.water_color_at(highest.0, highest.1).unwrap();
        // Above sea level the blend saturates at the shallow end.
        for i in 0..3 {
            assert!(
                (high_color[i] - liquid.shallow_color[i]).abs() < 1e-5,
                "channel {i} should saturate at the shallow color"
            );
        }
        assert!(
            (deep_color[2] - liquid.deep_color[2]).abs()
                < (high_color[2] - liquid.deep_color[2]).abs(),
            "deepest point should sit closer to the deep color"
        );
    }

    #[test]
    fn test_default_moisture_used_when_strategy_opts_out() {
        // Basalt supplies no moisture override; the default must still be
        // deterministic and in range.
        let a = generator(StrategyKind::Basalt);
        let b = generator(StrategyKind::Basalt);
        for i in 0..50 {
            let x = i as f64 * 81.0;
            let z = i as f64 * 63.0;
            let m = a.moisture_at(x, z);
            assert!((0.0..=1.0).contains(&m));
            assert_eq!(m, b.moisture_at(x, z));
        }
    }

    #[test]
    fn test_cloud_layer_sits_above_sea_level() {
        let generator = generator(StrategyKind::Verdant);
        assert!(generator.cloud_altitude() > generator.sea_level());
    }
}
