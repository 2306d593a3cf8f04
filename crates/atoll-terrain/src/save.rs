//! Durable world state: the seed plus persist-flagged placed-object
//! records.
//!
//! Everything else (terrain, classification, procedural decoration) is
//! re-derivable from the seed, so it never touches disk. Saves are
//! versioned RON documents.

use std::path::Path;

use atoll_biome::StrategyKind;
use serde::{Deserialize, Serialize};

use crate::record::PlacedObject;

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// Errors that can occur when reading or writing saves.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Failed to read the save file from disk.
    #[error("failed to read save: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the save file to disk.
    #[error("failed to write save: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse save: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize to RON.
    #[error("failed to serialize save: {0}")]
    SerializeError(#[source] ron::Error),

    /// The save was written by an incompatible format version.
    #[error("unsupported save version: {0}")]
    UnsupportedVersion(u32),

    /// The save belongs to a different world.
    #[error("save is for seed '{found}', world has seed '{expected}'")]
    SeedMismatch {
        /// The live world's seed.
        expected: String,
        /// The seed recorded in the save.
        found: String,
    },
}

/// Persisted records for one chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkSave {
    /// Chunk-grid row.
    pub row: i32,
    /// Chunk-grid column.
    pub col: i32,
    /// The chunk's persist-flagged records.
    pub records: Vec<PlacedObject>,
}

/// A complete durable world snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSave {
    /// Format version; readers reject unknown versions.
    pub version: u32,
    /// The world seed string.
    pub seed: String,
    /// The strategy the world was created with.
    pub strategy: StrategyKind,
    /// Per-chunk persisted records; chunks without any are omitted.
    pub chunks: Vec<ChunkSave>,
}

/// Writes a save to `path` as pretty RON.
pub fn write_save(path: &Path, save: &WorldSave) -> Result<(), SaveError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .separate_tuple_members(true);
    let serialized =
        ron::ser::to_string_pretty(save, pretty).map_err(SaveError::SerializeError)?;
    std::fs::write(path, serialized).map_err(SaveError::WriteError)
}

/// Reads a save from `path`, rejecting unsupported format versions.
pub fn read_save(path: &Path) -> Result<WorldSave, SaveError> {
    let contents = std::fs::read_to_string(path).map_err(SaveError::ReadError)?;
    let save: WorldSave = ron::from_str(&contents).map_err(SaveError::ParseError)?;
    if save.version != SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion(save.version));
    }
    Ok(save)
}
