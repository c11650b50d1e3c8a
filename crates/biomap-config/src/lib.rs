//! Configuration for the biome map tools.
//!
//! Settings persist to disk as a RON file, accept CLI overrides via clap, and
//! tolerate missing or unknown fields so older config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, ExportConfig, PreviewConfig, ProfileConfig,
    WorldConfig, default_config_dir,
};
pub use error::ConfigError;
