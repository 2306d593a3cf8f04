//! Verdant isles: a single green landmass fading into ocean.

use atoll_noise::{IslandShape, NoiseField};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::extent::WorldExtent;
use crate::organism::Organism;
use crate::strategy::{LandmarkRule, LiquidSurface, SEA_ELEVATION};
use crate::subbiome::{SubBiome, SubBiomeId, SubBiomeRegistry};

/// Beach band width above sea elevation.
const BEACH_BAND: f64 = 0.045;
/// Moisture above which mid elevations become swamp.
const SWAMP_MOISTURE: f64 = 0.66;
/// Elevation above which terrain can become forest.
const FOREST_ELEVATION: f64 = 0.58;
/// Minimum moisture for forest; drier high ground stays grassland.
const FOREST_MOISTURE: f64 = 0.33;

/// Seed offset decorrelating the shape roll from other per-world draws.
const SHAPE_SEED_OFFSET: u64 = 0x5EED_1517;

/// The island strategy: rolling swells with occasional ridgelines, shaped
/// multiplicatively so relief survives near the center and the coast stays
/// soft.
pub struct VerdantIsles {
    extent: WorldExtent,
    shape: IslandShape,
    registry: SubBiomeRegistry,
    ocean: SubBiomeId,
    beach: SubBiomeId,
    swamp: SubBiomeId,
    grassland: SubBiomeId,
    forest: SubBiomeId,
    liquid: LiquidSurface,
    landmark: LandmarkRule,
}

impl VerdantIsles {
    /// Builds the strategy, rolling island shape parameters from the seed.
    pub fn new(seed: u64, extent: WorldExtent) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(SHAPE_SEED_OFFSET));
        let shape = IslandShape::roll(&mut rng);

        let mut registry = SubBiomeRegistry::new();
        let ocean = registry
            .register(ocean_subbiome())
            .expect("sub-biome names are distinct");
        let beach = registry
            .register(beach_subbiome())
            .expect("sub-biome names are distinct");
        let swamp = registry
            .register(swamp_subbiome())
            .expect("sub-biome names are distinct");
        let grassland = registry
            .register(grassland_subbiome())
            .expect("sub-biome names are distinct");
        let forest = registry
            .register(forest_subbiome())
            .expect("sub-biome names are distinct");

        Self {
            extent,
            shape,
            registry,
            ocean,
            beach,
            swamp,
            grassland,
            forest,
            liquid: LiquidSurface {
                shallow_color: [0.33, 0.64, 0.66],
                deep_color: [0.05, 0.19, 0.38],
                distortion_amplitude: 0.35,
                distortion_frequency: 2.2,
            },
            landmark: LandmarkRule {
                name: "mossy_monolith".into(),
                spawn_chance: 0.07,
                elevation_range: Some((0.34, 0.72)),
                moisture_range: None,
                scale_range: (1.2, 2.0),
                footprint: 14.0,
            },
        }
    }

    /// Hand-tuned octave mix: broad swells dominate, hills add variety, and
    /// a ridge layer breaks up the silhouette. Divided by the exact weight
    /// sum, then island-shaped.
    pub fn elevation_at(&self, field: &NoiseField, x: f64, z: f64) -> f64 {
        let (nx, nz) = self.extent.normalized(x, z);
        let swells = field.sample(nx * 2.1, nz * 2.1);
        let hills = field.sample2(nx * 5.3, nz * 5.3);
        let crags = NoiseField::ridge(field.sample3(nx * 9.7, nz * 9.7));
        let base = (3.0 * swells + 1.4 * hills + 0.6 * crags) / 5.0;
        let d = self.shape.distance(nx, nz);
        self.shape.shape_multiply(d, base).clamp(0.0, 1.0)
    }

    /// Low-frequency moisture, biased wetter than the raw field.
    pub fn moisture_at(&self, field: &NoiseField, x: f64, z: f64) -> f64 {
        let (nx, nz) = self.extent.normalized(x, z);
        (field.sample2(nx * 1.7, nz * 1.7) + 0.08).clamp(0.0, 1.0)
    }

    /// Ordered threshold cascade; the final clause is gate-free.
    pub fn classify(&self, elevation: f64, moisture: f64) -> SubBiomeId {
        if elevation < SEA_ELEVATION {
            self.ocean
        } else if elevation < SEA_ELEVATION + BEACH_BAND {
            self.beach
        } else if moisture > SWAMP_MOISTURE {
            self.swamp
        } else if elevation > FOREST_ELEVATION && moisture > FOREST_MOISTURE {
            self.forest
        } else {
            self.grassland
        }
    }

    /// The strategy's sub-biome registry.
    pub fn registry(&self) -> &SubBiomeRegistry {
        &self.registry
    }

    /// Ocean gradient and distortion parameters.
    pub fn liquid_surface(&self) -> &LiquidSurface {
        &self.liquid
    }

    /// The monolith landmark rule.
    pub fn landmark(&self) -> &LandmarkRule {
        &self.landmark
    }
}

fn ocean_subbiome() -> SubBiome {
    SubBiome {
        name: "ocean".into(),
        color: [0.09, 0.26, 0.44],
        organisms: vec![
            Organism {
                name: "driftwood".into(),
                weight: 1.0,
                scarcity: 0.6,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.8, 1.3),
                footprint: 9.0,
                floats: true,
            },
            Organism {
                name: "kelp_mat".into(),
                weight: 0.6,
                scarcity: 0.75,
                elevation_range: None,
                moisture_range: None,
                scale_range: (1.0, 1.8),
                footprint: 12.0,
                floats: true,
            },
        ],
    }
}

fn beach_subbiome() -> SubBiome {
    SubBiome {
        name: "beach".into(),
        color: [0.87, 0.80, 0.58],
        organisms: vec![
            Organism {
                name: "palm".into(),
                weight: 2.0,
                scarcity: 0.35,
                elevation_range: Some((SEA_ELEVATION, SEA_ELEVATION + 0.08)),
                moisture_range: None,
                scale_range: (0.9, 1.5),
                footprint: 6.0,
                floats: false,
            },
            Organism {
                name: "shell".into(),
                weight: 1.2,
                scarcity: 0.55,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.4, 0.9),
                footprint: 1.5,
                floats: false,
            },
            Organism {
                name: "beached_log".into(),
                weight: 0.8,
                scarcity: 0.5,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.8, 1.2),
                footprint: 7.0,
                floats: false,
            },
        ],
    }
}

fn swamp_subbiome() -> SubBiome {
    SubBiome {
        name: "swamp".into(),
        color: [0.25, 0.35, 0.21],
        organisms: vec![
            Organism {
                name: "mangrove".into(),
                weight: 2.2,
                scarcity: 0.3,
                elevation_range: None,
                moisture_range: Some((0.6, 1.0)),
                scale_range: (0.9, 1.6),
                footprint: 8.0,
                floats: false,
            },
            Organism {
                name: "reed".into(),
                weight: 3.0,
                scarcity: 0.15,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.7, 1.4),
                footprint: 2.0,
                floats: false,
            },
            Organism {
                name: "water_lily".into(),
                weight: 1.5,
                scarcity: 0.4,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.6, 1.1),
                footprint: 3.0,
                floats: true,
            },
        ],
    }
}

fn grassland_subbiome() -> SubBiome {
    SubBiome {
        name: "grassland".into(),
        color: [0.42, 0.62, 0.28],
        organisms: vec![
            Organism {
                name: "grass_tuft".into(),
                weight: 4.0,
                scarcity: 0.1,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.6, 1.2),
                footprint: 1.2,
                floats: false,
            },
            Organism {
                name: "wildflower".into(),
                weight: 1.5,
                scarcity: 0.45,
                elevation_range: None,
                moisture_range: Some((0.25, 1.0)),
                scale_range: (0.5, 1.0),
                footprint: 1.0,
                floats: false,
            },
            Organism {
                name: "lone_oak".into(),
                weight: 0.7,
                scarcity: 0.65,
                elevation_range: Some((0.32, 0.6)),
                moisture_range: None,
                scale_range: (1.0, 1.8),
                footprint: 10.0,
                floats: false,
            },
        ],
    }
}

fn forest_subbiome() -> SubBiome {
    SubBiome {
        name: "forest".into(),
        color: [0.18, 0.38, 0.17],
        organisms: vec![
            Organism {
                name: "pine".into(),
                weight: 3.5,
                scarcity: 0.2,
                elevation_range: Some((0.45, 0.9)),
                moisture_range: None,
                scale_range: (0.9, 1.7),
                footprint: 7.0,
                floats: false,
            },
            Organism {
                name: "birch".into(),
                weight: 2.0,
                scarcity: 0.3,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.8, 1.4),
                footprint: 6.0,
                floats: false,
            },
            Organism {
                name: "fern".into(),
                weight: 2.4,
                scarcity: 0.2,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.5, 1.1),
                footprint: 2.0,
                floats: false,
            },
            Organism {
                name: "mushroom_ring".into(),
                weight: 0.6,
                scarcity: 0.7,
                elevation_range: None,
                moisture_range: Some((0.5, 1.0)),
                scale_range: (0.6, 1.0),
                footprint: 2.5,
                floats: false,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> VerdantIsles {
        VerdantIsles::new(42, WorldExtent::new(4096.0, 1024.0, 4096.0))
    }

    #[test]
    fn test_below_sea_is_ocean() {
        let s = strategy();
        let id = s.classify(0.1, 0.5);
        assert_eq!(s.registry().get(id).name, "ocean");
    }

    #[test]
    fn test_just_above_sea_is_beach() {
        let s = strategy();
        let id = s.classify(SEA_ELEVATION + 0.01, 0.5);
        assert_eq!(s.registry().get(id).name, "beach");
    }

    #[test]
    fn test_wet_midland_is_swamp() {
        let s = strategy();
        let id = s.classify(0.4, 0.8);
        assert_eq!(s.registry().get(id).name, "swamp");
    }

    #[test]
    fn test_high_and_moist_is_forest() {
        let s = strategy();
        let id = s.classify(0.65, 0.5);
        assert_eq!(s.registry().get(id).name, "forest");
    }

    #[test]
    fn test_dry_high_ground_is_grassland() {
        let s = strategy();
        let id = s.classify(0.65, 0.2);
        assert_eq!(s.registry().get(id).name, "grassland");
    }

    #[test]
    fn test_moisture_bias_skews_wetter() {
        let field = NoiseField::new(42);
        let s = strategy();
        let mut sum = 0.0;
        let n = 400;
        for i in 0..n {
            let x = (i % 20) as f64 * 200.0;
            let z = (i / 20) as f64 * 200.0;
            sum += s.moisture_at(&field, x, z);
        }
        let mean = sum / n as f64;
        assert!(
            mean > 0.5,
            "biased moisture should average above the raw 0.5 midpoint, got {mean}"
        );
    }

    #[test]
    fn test_floating_organisms_only_in_wet_subbiomes() {
        let s = strategy();
        for (_, sb) in s.registry().iter() {
            let has_floats = sb.organisms.iter().any(|o| o.floats);
            if has_floats {
                assert!(
                    sb.name == "ocean" || sb.name == "swamp",
                    "unexpected floating organism in {}",
                    sb.name
                );
            }
        }
    }
}
