//! Per-kind FIFO reuse pools for placed-entity instances.
//!
//! Chunks churn as the observer moves; instancing a visually complex entity
//! is far more expensive than re-pointing an existing one at a new
//! transform. Every kind gets its own capped queue: release pushes back if
//! there is headroom, acquire pops the oldest release first.

use std::collections::VecDeque;

use glam::DVec3;
use hashbrown::HashMap;

use crate::record::PlacedObject;

/// A live, poolable entity instance.
///
/// The `id` survives reuse: a recycled instance keeps its identity and only
/// has its transform reinitialized.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneryInstance {
    /// Process-unique instance id.
    pub id: u64,
    /// Kind name, matching the record that spawned it.
    pub kind: String,
    /// World-space position.
    pub position: DVec3,
    /// Rotation around the vertical axis, in radians.
    pub yaw: f64,
    /// Per-axis scale.
    pub scale: DVec3,
    /// `true` if the instance rides the water surface.
    pub floats: bool,
}

impl SceneryInstance {
    /// Converts this instance back into a durable record.
    pub fn to_record(&self, persist: bool) -> PlacedObject {
        PlacedObject {
            kind: self.kind.clone(),
            position: self.position.to_array(),
            yaw: self.yaw,
            scale: self.scale.to_array(),
            floats: self.floats,
            persist,
        }
    }

    fn reinit(&mut self, record: &PlacedObject) {
        self.position = DVec3::from_array(record.position);
        self.yaw = record.yaw;
        self.scale = DVec3::from_array(record.scale);
        self.floats = record.floats;
    }
}

/// Per-kind FIFO reuse pool, owned by the world (never a process global).
pub struct ScenePool {
    queues: HashMap<String, VecDeque<SceneryInstance>>,
    capacity: usize,
    next_id: u64,
    created: u64,
    reused: u64,
    discarded: u64,
}

impl ScenePool {
    /// Creates a pool retaining at most `capacity` instances per kind.
    pub fn new(capacity: usize) -> Self {
        Self {
            queues: HashMap::new(),
            capacity,
            next_id: 0,
            created: 0,
            reused: 0,
            discarded: 0,
        }
    }

    /// Hands out an instance for `record`, reusing the oldest released
    /// instance of the same kind when one is available.
    pub fn acquire(&mut self, record: &PlacedObject) -> SceneryInstance {
        if let Some(queue) = self.queues.get_mut(&record.kind)
            && let Some(mut instance) = queue.pop_front()
        {
            instance.reinit(record);
            self.reused += 1;
            return instance;
        }

        self.created += 1;
        let id = self.next_id;
        self.next_id += 1;
        SceneryInstance {
            id,
            kind: record.kind.clone(),
            position: DVec3::from_array(record.position),
            yaw: record.yaw,
            scale: DVec3::from_array(record.scale),
            floats: record.floats,
        }
    }

    /// Returns an instance to its kind's queue, or discards it outright if
    /// the queue is full. Never errors.
    pub fn release(&mut self, instance: SceneryInstance) {
        let queue = self.queues.entry(instance.kind.clone()).or_default();
        if queue.len() < self.capacity {
            queue.push_back(instance);
        } else {
            self.discarded += 1;
        }
    }

    /// Number of instances currently retained for a kind.
    pub fn retained(&self, kind: &str) -> usize {
        self.queues.get(kind).map_or(0, VecDeque::len)
    }

    /// Total instances constructed from scratch.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Total acquisitions served from the queues.
    pub fn reused(&self) -> u64 {
        self.reused
    }

    /// Total releases dropped for lack of headroom.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, x: f64) -> PlacedObject {
        PlacedObject {
            kind: kind.into(),
            position: [x, 1.0, 2.0],
            yaw: 0.5,
            scale: [1.0, 1.0, 1.0],
            floats: false,
            persist: false,
        }
    }

    #[test]
    fn test_acquire_empty_pool_creates_fresh_instance() {
        let mut pool = ScenePool::new(4);
        let a = pool.acquire(&record("palm", 0.0));
        let b = pool.acquire(&record("palm", 1.0));
        assert_ne!(a.id, b.id, "fresh instances need distinct ids");
        assert_eq!(pool.created(), 2);
        assert_eq!(pool.reused(), 0);
    }

    #[test]
    fn test_release_then_acquire_reuses_fifo_order() {
        let mut pool = ScenePool::new(4);
        let a = pool.acquire(&record("palm", 0.0));
        let b = pool.acquire(&record("palm", 1.0));
        let (a_id, b_id) = (a.id, b.id);

        pool.release(a);
        pool.release(b);

        let first = pool.acquire(&record("palm", 9.0));
        let second = pool.acquire(&record("palm", 10.0));
        assert_eq!(first.id, a_id, "oldest release must come back first");
        assert_eq!(second.id, b_id);
        assert_eq!(pool.reused(), 2);
    }

    #[test]
    fn test_reuse_reinitializes_transform() {
        let mut pool = ScenePool::new(4);
        let instance = pool.acquire(&record("palm", 0.0));
        pool.release(instance);

        let reused = pool.acquire(&record("palm", 42.0));
        assert_eq!(reused.position.x, 42.0);
    }

    #[test]
    fn test_kinds_do_not_share_queues() {
        let mut pool = ScenePool::new(4);
        let palm = pool.acquire(&record("palm", 0.0));
        pool.release(palm);

        let fern = pool.acquire(&record("fern", 0.0));
        assert_eq!(pool.retained("palm"), 1, "fern acquire must not touch palm queue");
        assert_eq!(fern.kind, "fern");
    }

    #[test]
    fn test_overflow_release_discards_silently() {
        let mut pool = ScenePool::new(2);
        let instances: Vec<_> = (0..3).map(|i| pool.acquire(&record("palm", i as f64))).collect();
        for instance in instances {
            pool.release(instance);
        }
        assert_eq!(pool.retained("palm"), 2);
        assert_eq!(pool.discarded(), 1);
    }

    #[test]
    fn test_record_instance_round_trip() {
        let mut pool = ScenePool::new(4);
        let original = PlacedObject {
            kind: "driftwood".into(),
            position: [10.0, 20.0, 30.0],
            yaw: 1.25,
            scale: [1.5, 1.5, 1.5],
            floats: true,
            persist: true,
        };
        let instance = pool.acquire(&original);
        let back = instance.to_record(true);
        assert_eq!(back, original);
    }
}
