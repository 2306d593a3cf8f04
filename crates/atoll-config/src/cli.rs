//! Command-line argument parsing for the Atoll engine.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Atoll engine command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "atoll", about = "Atoll world engine")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<String>,

    /// Biome strategy name (verdant, basalt).
    #[arg(long)]
    pub strategy: Option<String>,

    /// Resident-window radius in chunks.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Number of simulation ticks to run (demo binary).
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Path for saving placed-object records on exit (demo binary).
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref seed) = args.seed {
            self.world.seed = seed.clone();
        }
        if let Some(ref strategy) = args.strategy {
            self.world.strategy = strategy.clone();
        }
        if let Some(radius) = args.radius {
            self.streaming.visibility_radius = radius;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some("kelp-9".to_string()),
            strategy: None,
            radius: Some(5),
            ticks: None,
            save: None,
            log_level: Some("debug".to_string()),
            config: None,
        };

        config.apply_cli_overrides(&args);

        assert_eq!(config.world.seed, "kelp-9");
        assert_eq!(config.streaming.visibility_radius, 5);
        assert_eq!(config.debug.log_level, "debug");
        // Untouched fields keep their defaults.
        assert_eq!(config.world.strategy, "verdant");
    }

    #[test]
    fn test_no_overrides_leaves_config_unchanged() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: None,
            strategy: None,
            radius: None,
            ticks: None,
            save: None,
            log_level: None,
            config: None,
        };
        let before = config.clone();
        config.apply_cli_overrides(&args);
        assert_eq!(config, before);
    }
}
