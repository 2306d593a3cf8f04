//! Placed-object records: the persistent half of every scattered entity.

use serde::{Deserialize, Serialize};

/// The durable record of one placed object.
///
/// A record is what a chunk blueprint stores and what saves persist; the
/// live [`SceneryInstance`](crate::SceneryInstance) it spawns is disposable.
/// Once created a record is immutable except for removal, and its position
/// always lies within the owning chunk's bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    /// Object kind name; keys the per-kind reuse pool.
    pub kind: String,
    /// World-space position.
    pub position: [f64; 3],
    /// Rotation around the vertical axis, in radians.
    pub yaw: f64,
    /// Per-axis scale. Picks draw a uniform scale but the record carries
    /// all three axes.
    pub scale: [f64; 3],
    /// `true` if the object rides the water surface.
    pub floats: bool,
    /// `true` if the record belongs in durable saves.
    #[serde(default)]
    pub persist: bool,
}

impl PlacedObject {
    /// Horizontal world position as an `(x, z)` pair.
    pub fn xz(&self) -> (f64, f64) {
        (self.position[0], self.position[2])
    }
}

/// Options for a single pick evaluation.
#[derive(Clone, Copy, Debug, Default)]
pub struct PickOptions {
    /// Evaluate floating organisms instead of land-anchored ones.
    pub on_water: bool,
    /// Bypass the scarcity gate.
    pub force: bool,
}

/// Options for committing an externally supplied record.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaceOptions {
    /// Hint for collaborators to play a spawn animation; carried through
    /// the placement event untouched.
    pub animate: bool,
    /// Mark the record for durable saves.
    pub persist: bool,
}
