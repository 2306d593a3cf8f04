//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World generation settings.
    pub world: WorldGenConfig,
    /// Chunk streaming settings.
    pub streaming: StreamingConfig,
    /// Object placement settings.
    pub placement: PlacementConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldGenConfig {
    /// World seed. Any string; hashed to a 64-bit generator seed.
    pub seed: String,
    /// Biome strategy name (e.g., "verdant", "basalt").
    pub strategy: String,
    /// Map width in chunks.
    pub chunks_x: u32,
    /// Map depth in chunks.
    pub chunks_z: u32,
    /// Terrain sample cells per chunk side.
    pub cells_per_chunk: u32,
    /// Edge length of one cell in world units.
    pub cell_size: f64,
    /// Vertical world extent in world units (elevation 1.0 maps here).
    pub world_height: f64,
}

/// Chunk streaming configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
    /// Resident-window radius in chunks around the observer.
    pub visibility_radius: u32,
    /// Shoreline margin as a fraction of world height: a chunk whose lowest
    /// sample sits within this margin of sea level gets a water patch.
    pub shore_margin: f64,
}

/// Object placement configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlacementConfig {
    /// Minimum Poisson-disk spacing between candidate sites, in cells.
    pub site_spacing_cells: f64,
    /// Maximum retained instances per object kind in the reuse pool.
    pub pool_capacity: usize,
    /// Iteration ceiling for bounded-retry landmark placement.
    pub landmark_attempts: u32,
    /// Baseline probability that a chunk spawns a cloud; scaled by the
    /// chunk's mean moisture.
    pub cloud_chance: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: "42".to_string(),
            strategy: "verdant".to_string(),
            chunks_x: 12,
            chunks_z: 12,
            cells_per_chunk: 12,
            cell_size: 2048.0,
            world_height: 8192.0,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            visibility_radius: 2,
            shore_margin: 0.05,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            site_spacing_cells: 0.75,
            pool_capacity: 256,
            landmark_attempts: 1000,
            cloud_chance: 0.35,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform default config directory (e.g. `~/.config/atoll` on Linux).
pub fn default_config_dir() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join("atoll"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("strategy: \"verdant\""));
        assert!(ron_str.contains("cells_per_chunk: 12"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        // Config missing the `placement` section entirely.
        let ron_str = "(world: (), streaming: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.placement, PlacementConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.seed = "coral-7".to_string();
        config.streaming.visibility_radius = 4;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());

        let mut changed = config.clone();
        changed.world.seed = "other".to_string();
        changed.save(dir.path()).unwrap();

        let reloaded = config.reload(dir.path()).unwrap();
        assert_eq!(reloaded, Some(changed));
    }
}
