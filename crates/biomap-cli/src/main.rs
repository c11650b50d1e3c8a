//! `biomap`: render biome previews and export biome images of a seeded world.
//!
//! Run with: `cargo run -p biomap-cli -- preview --left -500 --top -500 --right 500 --bottom 500 --out preview.png`

mod commands;
mod error;

use std::process::ExitCode;

use biomap_config::{CliArgs, Config, default_config_dir};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use crate::commands::{ExportArgs, PreviewArgs, ProfileArgs};

/// CLI arguments for the biomap binary.
#[derive(Parser, Debug)]
#[command(name = "biomap", version, about = "Biome map preview and export")]
struct Cli {
    #[command(flatten)]
    global: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a letterboxed preview of a region.
    Preview(PreviewArgs),
    /// Export a region as a PNG with one pixel per sampled coordinate.
    Export(ExportArgs),
    /// Write the built-in biome color profile for editing.
    Profile(ProfileArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_dir = cli.global.config.clone().unwrap_or_else(default_config_dir);
    let (mut config, config_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    config.apply_cli_overrides(&cli.global);

    biomap_log::init_logging(
        config.debug.log_dir.as_deref(),
        cfg!(debug_assertions),
        Some(&config),
    );
    if let Some(err) = config_error {
        warn!("Using default config: {err}");
    }
    info!(
        "World: seed={} type={} | preview {}px",
        config.world.seed, config.world.world_type, config.preview.size
    );

    let result = match cli.command {
        Command::Preview(args) => commands::preview(&config, &args),
        Command::Export(args) => commands::export(&mut config, &config_dir, &args),
        Command::Profile(args) => commands::write_profile(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
