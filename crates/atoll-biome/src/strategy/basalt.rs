//! Basalt ridges: dry volcanic highlands with no liquid surface.

use atoll_noise::{IslandShape, NoiseField};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::extent::WorldExtent;
use crate::organism::Organism;
use crate::strategy::{LandmarkRule, SEA_ELEVATION};
use crate::subbiome::{SubBiome, SubBiomeId, SubBiomeRegistry};

/// Elevation above which terrain becomes crest.
const CREST_ELEVATION: f64 = 0.62;
/// Moisture above which crests carry lichen.
const LICHEN_MOISTURE: f64 = 0.5;
/// Moisture above which mid slopes hold fumarole fields.
const FUMAROLE_MOISTURE: f64 = 0.7;

/// Seed offset decorrelating the shape roll from other per-world draws.
const SHAPE_SEED_OFFSET: u64 = 0xBA5A_17;

/// The highland strategy: two ridge-folded layers over fine rubble detail,
/// shaped additively so the range drops off sharply at the map edge.
pub struct BasaltRidges {
    extent: WorldExtent,
    shape: IslandShape,
    registry: SubBiomeRegistry,
    ash_flats: SubBiomeId,
    scree_slope: SubBiomeId,
    fumarole_field: SubBiomeId,
    ridge_crest: SubBiomeId,
    lichen_crest: SubBiomeId,
    landmark: LandmarkRule,
}

impl BasaltRidges {
    /// Builds the strategy, rolling shape parameters from the seed.
    pub fn new(seed: u64, extent: WorldExtent) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(SHAPE_SEED_OFFSET));
        let shape = IslandShape::roll(&mut rng);

        let mut registry = SubBiomeRegistry::new();
        let ash_flats = registry
            .register(ash_flats_subbiome())
            .expect("sub-biome names are distinct");
        let scree_slope = registry
            .register(scree_slope_subbiome())
            .expect("sub-biome names are distinct");
        let fumarole_field = registry
            .register(fumarole_field_subbiome())
            .expect("sub-biome names are distinct");
        let ridge_crest = registry
            .register(ridge_crest_subbiome())
            .expect("sub-biome names are distinct");
        let lichen_crest = registry
            .register(lichen_crest_subbiome())
            .expect("sub-biome names are distinct");

        Self {
            extent,
            shape,
            registry,
            ash_flats,
            scree_slope,
            fumarole_field,
            ridge_crest,
            lichen_crest,
            landmark: LandmarkRule {
                name: "stone_arch".into(),
                spawn_chance: 0.05,
                elevation_range: Some((0.5, 0.9)),
                moisture_range: None,
                scale_range: (1.0, 1.8),
                footprint: 16.0,
            },
        }
    }

    /// Ridge-dominated octave mix. The divisor (4.1) sits below the weight
    /// sum (4.4), a deliberate tune that pushes crests near the ceiling
    /// before the clamp.
    pub fn elevation_at(&self, field: &NoiseField, x: f64, z: f64) -> f64 {
        let (nx, nz) = self.extent.normalized(x, z);
        let ridges = NoiseField::ridge(field.sample(nx * 3.3, nz * 3.3));
        let folds = NoiseField::ridge(field.sample3(nx * 6.9, nz * 6.9));
        let rubble = field.sample2(nx * 13.0, nz * 13.0);
        let base = (2.6 * ridges + 1.2 * folds + 0.6 * rubble) / 4.1;
        let d = self.shape.distance(nx, nz);
        self.shape.shape_add(d, base).clamp(0.0, 1.0)
    }

    /// Ordered threshold cascade; the final clause is gate-free.
    ///
    /// `SEA_ELEVATION` still anchors the bottom band even though this
    /// strategy has no water: basins that would flood elsewhere fill with
    /// ash instead.
    pub fn classify(&self, elevation: f64, moisture: f64) -> SubBiomeId {
        if elevation < SEA_ELEVATION {
            self.ash_flats
        } else if elevation > CREST_ELEVATION {
            if moisture > LICHEN_MOISTURE {
                self.lichen_crest
            } else {
                self.ridge_crest
            }
        } else if moisture > FUMAROLE_MOISTURE {
            self.fumarole_field
        } else {
            self.scree_slope
        }
    }

    /// The strategy's sub-biome registry.
    pub fn registry(&self) -> &SubBiomeRegistry {
        &self.registry
    }

    /// The arch landmark rule.
    pub fn landmark(&self) -> &LandmarkRule {
        &self.landmark
    }
}

fn ash_flats_subbiome() -> SubBiome {
    SubBiome {
        name: "ash_flats".into(),
        color: [0.32, 0.30, 0.30],
        organisms: vec![
            Organism {
                name: "cinder_mound".into(),
                weight: 1.0,
                scarcity: 0.5,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.8, 1.5),
                footprint: 5.0,
                floats: false,
            },
            Organism {
                name: "obsidian_shard".into(),
                weight: 2.0,
                scarcity: 0.3,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.5, 1.0),
                footprint: 2.0,
                floats: false,
            },
        ],
    }
}

fn scree_slope_subbiome() -> SubBiome {
    SubBiome {
        name: "scree_slope".into(),
        color: [0.45, 0.41, 0.38],
        organisms: vec![
            Organism {
                name: "boulder".into(),
                weight: 3.0,
                scarcity: 0.25,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.7, 1.6),
                footprint: 5.5,
                floats: false,
            },
            Organism {
                name: "dead_tree".into(),
                weight: 1.0,
                scarcity: 0.55,
                elevation_range: None,
                moisture_range: Some((0.25, 1.0)),
                scale_range: (0.9, 1.4),
                footprint: 4.0,
                floats: false,
            },
        ],
    }
}

fn fumarole_field_subbiome() -> SubBiome {
    SubBiome {
        name: "fumarole_field".into(),
        color: [0.55, 0.48, 0.35],
        organisms: vec![
            Organism {
                name: "steam_vent".into(),
                weight: 2.0,
                scarcity: 0.3,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.8, 1.2),
                footprint: 3.0,
                floats: false,
            },
            Organism {
                name: "sulfur_crust".into(),
                weight: 1.4,
                scarcity: 0.4,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.6, 1.1),
                footprint: 2.5,
                floats: false,
            },
        ],
    }
}

fn ridge_crest_subbiome() -> SubBiome {
    SubBiome {
        name: "ridge_crest".into(),
        color: [0.27, 0.25, 0.28],
        organisms: vec![
            Organism {
                name: "basalt_column".into(),
                weight: 2.0,
                scarcity: 0.35,
                elevation_range: Some((0.55, 1.0)),
                moisture_range: None,
                scale_range: (0.9, 1.8),
                footprint: 4.5,
                floats: false,
            },
            Organism {
                name: "cairn".into(),
                weight: 0.8,
                scarcity: 0.6,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.6, 1.0),
                footprint: 2.0,
                floats: false,
            },
        ],
    }
}

fn lichen_crest_subbiome() -> SubBiome {
    SubBiome {
        name: "lichen_crest".into(),
        color: [0.38, 0.44, 0.33],
        organisms: vec![
            Organism {
                name: "lichen_mat".into(),
                weight: 2.5,
                scarcity: 0.2,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.5, 1.0),
                footprint: 1.5,
                floats: false,
            },
            Organism {
                name: "hardy_shrub".into(),
                weight: 1.2,
                scarcity: 0.45,
                elevation_range: None,
                moisture_range: None,
                scale_range: (0.6, 1.2),
                footprint: 2.5,
                floats: false,
            },
        ],
    }
}
