//! Biome model: sub-biome classification, organism placement rules, and the
//! composed terrain/moisture/water query surface.
//!
//! A world holds exactly one [`BiomeStrategy`] for its lifetime; the
//! [`BiomeGenerator`] wraps it together with the seeded noise fields and
//! answers every height, moisture, water, and classification query the
//! streaming layer needs.

mod extent;
mod generator;
mod organism;
mod subbiome;

pub mod strategy;

pub use extent::WorldExtent;
pub use generator::BiomeGenerator;
pub use organism::Organism;
pub use strategy::{
    BiomeStrategy, CLOUD_ELEVATION, FLOOR_ELEVATION, LandmarkRule, LiquidSurface, SEA_ELEVATION,
    StrategyKind, UnknownStrategyError,
};
pub use subbiome::{SubBiome, SubBiomeId, SubBiomeRegistry, SubBiomeRegistryError};
