//! World notification events.
//!
//! Collaborators (achievements, audio, multiplayer) observe placement and
//! biome transitions through [`WorldEvent`]s. Events are double-buffered:
//! those written in the current tick stay readable through the next tick,
//! then drop. They carry no control flow back into the core.

use crate::record::PlacedObject;

/// A notification emitted by the world core.
#[derive(Clone, Debug, PartialEq)]
pub enum WorldEvent {
    /// An object was committed to a chunk blueprint.
    ObjectPlaced {
        /// The committed record.
        record: PlacedObject,
        /// Spawn-animation hint, passed through from the placement call.
        animate: bool,
    },
    /// An object was removed from a chunk blueprint.
    ObjectRemoved {
        /// The removed record.
        record: PlacedObject,
    },
    /// The observer crossed into a different sub-biome.
    BiomeEntered {
        /// Name of the sub-biome now under the observer.
        subbiome: String,
    },
}

/// Double-buffered event storage.
///
/// Call [`swap`](WorldEventBuffer::swap) once per tick before writing new
/// events; readers see the previous and current tick's events.
pub struct WorldEventBuffer {
    prev: Vec<WorldEvent>,
    current: Vec<WorldEvent>,
}

impl WorldEventBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            prev: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Records an event in the current tick.
    pub fn send(&mut self, event: WorldEvent) {
        self.current.push(event);
    }

    /// All readable events (previous + current tick).
    pub fn read(&self) -> impl Iterator<Item = &WorldEvent> {
        self.prev.iter().chain(self.current.iter())
    }

    /// Number of readable events.
    pub fn len(&self) -> usize {
        self.prev.len() + self.current.len()
    }

    /// Returns `true` if there are no readable events.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advances the tick: previous events drop, current becomes previous.
    pub fn swap(&mut self) {
        self.prev.clear();
        std::mem::swap(&mut self.prev, &mut self.current);
    }
}

impl Default for WorldEventBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entered(name: &str) -> WorldEvent {
        WorldEvent::BiomeEntered {
            subbiome: name.into(),
        }
    }

    #[test]
    fn test_events_readable_for_two_ticks() {
        let mut buffer = WorldEventBuffer::new();
        buffer.send(entered("beach"));
        assert_eq!(buffer.len(), 1);

        buffer.swap();
        assert_eq!(buffer.len(), 1, "event must survive one swap");

        buffer.swap();
        assert!(buffer.is_empty(), "event must drop after two swaps");
    }

    #[test]
    fn test_read_sees_both_ticks_in_order() {
        let mut buffer = WorldEventBuffer::new();
        buffer.send(entered("ocean"));
        buffer.swap();
        buffer.send(entered("beach"));

        let names: Vec<_> = buffer
            .read()
            .map(|e| match e {
                WorldEvent::BiomeEntered { subbiome } => subbiome.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["ocean", "beach"]);
    }
}
