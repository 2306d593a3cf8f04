//! Biome strategies: one closed set of world "personalities".
//!
//! Each variant supplies its own hand-tuned elevation silhouette, moisture
//! bias, and classification cascade, while sharing the ridge/island shaping
//! math and the vertical reference constants below. Exactly one variant is
//! selected at world creation and never changes for the world's lifetime.

mod basalt;
mod verdant;

use std::str::FromStr;

use atoll_noise::NoiseField;
use serde::{Deserialize, Serialize};

pub use basalt::BasaltRidges;
pub use verdant::VerdantIsles;

use crate::extent::WorldExtent;
use crate::subbiome::{SubBiomeId, SubBiomeRegistry};

/// Normalized elevation of the sea surface. All strategies express their
/// classification thresholds relative to this so they agree on a shared
/// vertical frame.
pub const SEA_ELEVATION: f64 = 0.26;

/// Normalized elevation of the cloud layer.
pub const CLOUD_ELEVATION: f64 = 0.82;

/// Normalized elevation of the absolute terrain floor. No query ever
/// reports elevation below this.
pub const FLOOR_ELEVATION: f64 = 0.03;

/// A strategy's liquid-surface descriptor.
///
/// Opaque to the core beyond storage: rendering consumes the gradient and
/// distortion parameters, terrain only cares that a liquid surface exists.
#[derive(Clone, Debug, PartialEq)]
pub struct LiquidSurface {
    /// Gradient color where the water is shallow.
    pub shallow_color: [f32; 3],
    /// Gradient color over the deepest water.
    pub deep_color: [f32; 3],
    /// Shader distortion amplitude.
    pub distortion_amplitude: f64,
    /// Shader distortion frequency.
    pub distortion_frequency: f64,
}

/// Placement rule for a strategy's unique per-chunk narrative object.
///
/// Unlike [`Organism`](crate::Organism)s, landmarks are placed by bounded
/// retry over the whole chunk footprint, and each chunk holds at most one.
#[derive(Clone, Debug)]
pub struct LandmarkRule {
    /// Kind name of the landmark object.
    pub name: String,
    /// Probability that a chunk attempts a landmark at all.
    pub spawn_chance: f64,
    /// Optional `[low, high]` gate on normalized elevation.
    pub elevation_range: Option<(f64, f64)>,
    /// Optional `[low, high]` gate on normalized moisture.
    pub moisture_range: Option<(f64, f64)>,
    /// Uniform scale range.
    pub scale_range: (f64, f64),
    /// Padded bounding-box half-extent in world units.
    pub footprint: f64,
}

/// Error returned when parsing an unrecognized strategy name.
#[derive(Debug, thiserror::Error)]
#[error("unknown biome strategy: {0}")]
pub struct UnknownStrategyError(pub String);

/// Names the concrete strategy variants for configs and saves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Island landmass with ocean, beaches, swamps, and forests.
    Verdant,
    /// Dry ridge-folded volcanic highlands without a liquid surface.
    Basalt,
}

impl StrategyKind {
    /// Stable lowercase name, matching the `FromStr` spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Verdant => "verdant",
            StrategyKind::Basalt => "basalt",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = UnknownStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verdant" => Ok(StrategyKind::Verdant),
            "basalt" => Ok(StrategyKind::Basalt),
            other => Err(UnknownStrategyError(other.to_string())),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active biome strategy for a world.
///
/// A closed tagged union rather than a trait object: the variant set is
/// known at compile time, selected once, and dispatched by match.
pub enum BiomeStrategy {
    /// See [`VerdantIsles`].
    Verdant(VerdantIsles),
    /// See [`BasaltRidges`].
    Basalt(BasaltRidges),
}

impl BiomeStrategy {
    /// Builds the strategy for `kind`, rolling its per-world shape
    /// parameters from the world seed.
    pub fn new(kind: StrategyKind, seed: u64, extent: WorldExtent) -> Self {
        match kind {
            StrategyKind::Verdant => BiomeStrategy::Verdant(VerdantIsles::new(seed, extent)),
            StrategyKind::Basalt => BiomeStrategy::Basalt(BasaltRidges::new(seed, extent)),
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> StrategyKind {
        match self {
            BiomeStrategy::Verdant(_) => StrategyKind::Verdant,
            BiomeStrategy::Basalt(_) => StrategyKind::Basalt,
        }
    }

    /// Normalized elevation at a world coordinate, before floor clamping.
    pub fn elevation_at(&self, field: &NoiseField, x: f64, z: f64) -> f64 {
        match self {
            BiomeStrategy::Verdant(s) => s.elevation_at(field, x, z),
            BiomeStrategy::Basalt(s) => s.elevation_at(field, x, z),
        }
    }

    /// Normalized moisture at a world coordinate, or `None` to use the
    /// generator's default low-frequency sample.
    pub fn moisture_at(&self, field: &NoiseField, x: f64, z: f64) -> Option<f64> {
        match self {
            BiomeStrategy::Verdant(s) => Some(s.moisture_at(field, x, z)),
            BiomeStrategy::Basalt(_) => None,
        }
    }

    /// Classifies an (elevation, moisture) pair into a sub-biome.
    ///
    /// Every strategy's cascade is exhaustive over `[0,1]²`; the final
    /// clause carries no gate.
    pub fn classify(&self, elevation: f64, moisture: f64) -> SubBiomeId {
        match self {
            BiomeStrategy::Verdant(s) => s.classify(elevation, moisture),
            BiomeStrategy::Basalt(s) => s.classify(elevation, moisture),
        }
    }

    /// The strategy's sub-biome registry.
    pub fn registry(&self) -> &SubBiomeRegistry {
        match self {
            BiomeStrategy::Verdant(s) => s.registry(),
            BiomeStrategy::Basalt(s) => s.registry(),
        }
    }

    /// The liquid-surface descriptor, or `None` for dry worlds.
    pub fn liquid_surface(&self) -> Option<&LiquidSurface> {
        match self {
            BiomeStrategy::Verdant(s) => Some(s.liquid_surface()),
            BiomeStrategy::Basalt(_) => None,
        }
    }

    /// Opaque ambient-sound id for audio collaborators.
    pub fn ambient_sound(&self) -> &str {
        match self {
            BiomeStrategy::Verdant(_) => "ambient/shore_waves",
            BiomeStrategy::Basalt(_) => "ambient/high_wind",
        }
    }

    /// The strategy's unique per-chunk landmark rule, if it has one.
    pub fn landmark(&self) -> Option<&LandmarkRule> {
        match self {
            BiomeStrategy::Verdant(s) => Some(s.landmark()),
            BiomeStrategy::Basalt(s) => Some(s.landmark()),
        }
    }
}
