//! Seeded noise fields and island-shaping primitives for terrain generation.

mod field;
mod island;

pub use field::NoiseField;
pub use island::{IslandShape, center_distance, island_add, island_multiply};
