//! Geometry handoff to the rendering collaborator.
//!
//! The core never builds GPU-facing meshes. It produces raw sample buffers
//! (positions, triangle indices, vertex colors) and pushes them through an
//! injected [`SurfaceSink`]; merging chunk surfaces into few draw-call-sized
//! aggregates happens on the other side of that trait.

use glam::DVec3;

use crate::chunk::ChunkCoord;

/// Identifies one logical surface handed to the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    /// A chunk's terrain surface.
    Terrain(ChunkCoord),
    /// A chunk's water patch.
    Water(ChunkCoord),
    /// A chunk's decorative cloud.
    Cloud(ChunkCoord),
    /// The one-time border skirt along the world edges.
    Border,
    /// The one-time bottom cap closing the world volume underneath.
    Floor,
}

/// Raw geometry for one surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceBuffer {
    /// Vertex positions in world space.
    pub positions: Vec<DVec3>,
    /// Triangle indices into `positions`.
    pub indices: Vec<[u32; 3]>,
    /// Per-vertex linear RGB colors; same length as `positions`.
    pub colors: Vec<[f32; 3]>,
}

impl SurfaceBuffer {
    /// Returns `true` if the buffer holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Consumer of surface geometry, injected by the embedding application.
pub trait SurfaceSink {
    /// A surface became live and should be merged into the aggregates.
    fn surface_ready(&mut self, id: SurfaceId, buffer: &SurfaceBuffer);
    /// A previously ready surface left the live set.
    fn surface_retired(&mut self, id: SurfaceId);
}

/// Sink that drops everything; used headless and in tests.
pub struct NullSink;

impl SurfaceSink for NullSink {
    fn surface_ready(&mut self, _id: SurfaceId, _buffer: &SurfaceBuffer) {}
    fn surface_retired(&mut self, _id: SurfaceId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_reports_empty() {
        assert!(SurfaceBuffer::default().is_empty());
    }

    #[test]
    fn test_surface_ids_compare_by_coord() {
        let a = SurfaceId::Terrain(ChunkCoord::new(1, 2));
        let b = SurfaceId::Terrain(ChunkCoord::new(1, 2));
        let c = SurfaceId::Water(ChunkCoord::new(1, 2));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
