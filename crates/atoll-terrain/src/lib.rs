//! Chunk streaming, object placement, and the world facade.
//!
//! This crate owns the spatial half of world generation: the sparse chunk
//! grid streamed around the observer, per-chunk surface sampling and object
//! population, the pooled reuse of placed entities, and the [`World`] type
//! tying it all to the biome layer.

mod chunk;
mod events;
mod placement;
mod poisson;
mod pool;
mod record;
mod save;
mod seed;
mod surface;
mod terrain;
mod view;
mod world;

pub use chunk::{Chunk, ChunkCoord, ChunkState, CloudRecord};
pub use events::{WorldEvent, WorldEventBuffer};
pub use placement::{FootprintTable, pick_at, place_landmark};
pub use poisson::poisson_disk;
pub use pool::{ScenePool, SceneryInstance};
pub use record::{PickOptions, PlaceOptions, PlacedObject};
pub use save::{ChunkSave, SAVE_VERSION, SaveError, WorldSave, read_save, write_save};
pub use seed::{chunk_rng, chunk_seed, hash_seed};
pub use surface::{NullSink, SurfaceBuffer, SurfaceId, SurfaceSink};
pub use terrain::{Terrain, TerrainParams, TickReport};
pub use view::Aabb;
pub use world::{World, WorldError};
