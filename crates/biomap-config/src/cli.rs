//! Command-line overrides shared by every biomap command.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Global command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "biomap", about = "Biome map preview and export")]
pub struct CliArgs {
    /// World seed.
    #[arg(long, allow_hyphen_values = true)]
    pub seed: Option<i64>,

    /// World type (default, large_biomes).
    #[arg(long)]
    pub world_type: Option<String>,

    /// Preview side length in pixels.
    #[arg(long)]
    pub preview_size: Option<u32>,

    /// Biome profile to color with.
    #[arg(long)]
    pub profile: Option<PathBuf>,

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
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(ref world_type) = args.world_type {
            self.world.world_type = world_type.clone();
        }
        if let Some(size) = args.preview_size {
            self.preview.size = size;
        }
        if let Some(ref profile) = args.profile {
            self.profile.path = Some(profile.clone());
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
            seed: Some(-42),
            preview_size: Some(64),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.seed, -42);
        assert_eq!(config.preview.size, 64);
        // Non-overridden fields retain defaults
        assert_eq!(config.world.world_type, "default");
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_negative_seed() {
        let args = CliArgs::try_parse_from(["biomap", "--seed", "-7", "--log-level", "debug"])
            .unwrap();
        assert_eq!(args.seed, Some(-7));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
