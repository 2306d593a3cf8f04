//! Configuration system for the Atoll world engine.
//!
//! Provides runtime-configurable settings that persist to disk as RON files,
//! with CLI overrides via clap and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, PlacementConfig, StreamingConfig, WorldGenConfig, default_config_dir,
};
pub use error::ConfigError;
