//! Sub-biome registry: maps [`SubBiomeId`] to [`SubBiome`] with name lookup.
//!
//! Each strategy registers its sub-biomes once at world creation; the ids it
//! gets back are what `classify` returns, keeping classification results
//! copyable and cheap to compare.

use hashbrown::HashMap;

use crate::organism::Organism;

/// Unique identifier for a sub-biome within one strategy's registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubBiomeId(pub u16);

/// Errors that can occur when registering sub-biomes.
#[derive(Debug, thiserror::Error)]
pub enum SubBiomeRegistryError {
    /// A sub-biome with this name is already registered.
    #[error("duplicate sub-biome name: {0}")]
    DuplicateName(String),
}

/// The terminal classification of a surface point.
#[derive(Clone, Debug)]
pub struct SubBiome {
    /// Human-readable name (e.g., "grassland").
    pub name: String,
    /// Display color in linear RGB, consumed by surface coloring.
    pub color: [f32; 3],
    /// Ordered placement rules for this sub-biome.
    pub organisms: Vec<Organism>,
}

/// Stores one strategy's sub-biome definitions with O(1) lookup by id.
pub struct SubBiomeRegistry {
    subbiomes: Vec<SubBiome>,
    name_to_id: HashMap<String, SubBiomeId>,
}

impl SubBiomeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            subbiomes: Vec::new(),
            name_to_id: HashMap::new(),
        }
    }

    /// Registers a sub-biome, returning its assigned [`SubBiomeId`].
    ///
    /// # Errors
    ///
    /// Returns [`SubBiomeRegistryError::DuplicateName`] if the name is taken.
    pub fn register(&mut self, subbiome: SubBiome) -> Result<SubBiomeId, SubBiomeRegistryError> {
        if self.name_to_id.contains_key(&subbiome.name) {
            return Err(SubBiomeRegistryError::DuplicateName(subbiome.name.clone()));
        }
        let id = SubBiomeId(self.subbiomes.len() as u16);
        self.name_to_id.insert(subbiome.name.clone(), id);
        self.subbiomes.push(subbiome);
        Ok(id)
    }

    /// Returns the sub-biome for the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this registry.
    pub fn get(&self, id: SubBiomeId) -> &SubBiome {
        &self.subbiomes[id.0 as usize]
    }

    /// Looks up a sub-biome id by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<SubBiomeId> {
        self.name_to_id.get(name).copied()
    }

    /// Number of registered sub-biomes.
    pub fn len(&self) -> usize {
        self.subbiomes.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.subbiomes.is_empty()
    }

    /// Iterates over all `(id, sub-biome)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (SubBiomeId, &SubBiome)> {
        self.subbiomes
            .iter()
            .enumerate()
            .map(|(i, sb)| (SubBiomeId(i as u16), sb))
    }
}

impl Default for SubBiomeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(name: &str) -> SubBiome {
        SubBiome {
            name: name.into(),
            color: [0.5, 0.5, 0.5],
            organisms: Vec::new(),
        }
    }

    #[test]
    fn test_register_then_get_returns_same_definition() {
        let mut reg = SubBiomeRegistry::new();
        let id = reg.register(bare("grassland")).unwrap();
        assert_eq!(reg.get(id).name, "grassland");
    }

    #[test]
    fn test_ids_are_assigned_in_registration_order() {
        let mut reg = SubBiomeRegistry::new();
        let a = reg.register(bare("ocean")).unwrap();
        let b = reg.register(bare("beach")).unwrap();
        assert_eq!(a, SubBiomeId(0));
        assert_eq!(b, SubBiomeId(1));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut reg = SubBiomeRegistry::new();
        reg.register(bare("swamp")).unwrap();
        let result = reg.register(bare("swamp"));
        assert!(matches!(
            result,
            Err(SubBiomeRegistryError::DuplicateName(_))
        ));
        assert_eq!(reg.len(), 1, "failed registration must not grow the registry");
    }

    #[test]
    fn test_lookup_by_name() {
        let mut reg = SubBiomeRegistry::new();
        let id = reg.register(bare("forest")).unwrap();
        assert_eq!(reg.lookup_by_name("forest"), Some(id));
        assert_eq!(reg.lookup_by_name("tundra"), None);
    }

    #[test]
    fn test_iter_visits_all_in_order() {
        let mut reg = SubBiomeRegistry::new();
        reg.register(bare("a")).unwrap();
        reg.register(bare("b")).unwrap();
        let names: Vec<_> = reg.iter().map(|(_, sb)| sb.name.clone()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
