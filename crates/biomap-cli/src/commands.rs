//! The `preview`, `export` and `profile` commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use biomap_config::{Config, ConfigError};
use biomap_preview::{
    BiomeColorTable, BiomeImageExporter, BiomeProfile, CancelToken, ExportProgress, ExportRequest,
    PreviewRequest, PreviewSlot, PreviewWorker, ResolutionMode, WorldRegion, suggested_filename,
    with_png_extension,
};
use biomap_world::{NoiseBiomeOracle, WorldType};
use clap::Args;
use tracing::{info, warn};

use crate::error::CliError;

const PREVIEW_TIMEOUT: Duration = Duration::from_secs(120);

/// Region edges in world coordinates, shared by `preview` and `export`.
#[derive(Args, Debug, Clone, Copy)]
pub struct RegionArgs {
    /// Minimum X of the region.
    #[arg(long, allow_hyphen_values = true)]
    pub left: i64,
    /// Minimum Y of the region.
    #[arg(long, allow_hyphen_values = true)]
    pub top: i64,
    /// Maximum X of the region (exclusive).
    #[arg(long, allow_hyphen_values = true)]
    pub right: i64,
    /// Maximum Y of the region (exclusive).
    #[arg(long, allow_hyphen_values = true)]
    pub bottom: i64,
    /// Sample every world coordinate instead of every fourth.
    #[arg(long)]
    pub full_res: bool,
}

impl RegionArgs {
    fn region(&self) -> Result<WorldRegion, CliError> {
        Ok(WorldRegion::from_edges(
            self.left,
            self.top,
            self.right,
            self.bottom,
        )?)
    }

    fn mode(&self, config: &Config) -> ResolutionMode {
        ResolutionMode::from_full_resolution(self.full_res || config.preview.full_resolution)
    }
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub region: RegionArgs,
    /// Output PNG.
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub region: RegionArgs,
    /// Output PNG. Defaults to a name derived from the world in the last export directory.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Replace an existing file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Where to write the profile.
    #[arg(long)]
    pub out: PathBuf,
    /// Replace an existing file.
    #[arg(long)]
    pub force: bool,
}

fn world(config: &Config) -> Result<NoiseBiomeOracle, CliError> {
    let world_type: WorldType = config.world.world_type.parse()?;
    Ok(NoiseBiomeOracle::new(config.world.seed, world_type))
}

fn color_table(config: &Config) -> Result<BiomeColorTable, CliError> {
    let profile = match &config.profile.path {
        Some(path) => BiomeProfile::load(path)?,
        None => BiomeProfile::default(),
    };
    Ok(profile.to_color_table()?)
}

fn ensure_writable(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::DestinationExists(path.to_path_buf()));
    }
    Ok(())
}

/// Renders a preview on the background worker and saves it upscaled.
pub fn preview(config: &Config, args: &PreviewArgs) -> Result<(), CliError> {
    let region = args.region.region()?;
    let mode = args.region.mode(config);
    let out = with_png_extension(&args.out);

    let mut worker = PreviewWorker::spawn(config.preview.size).map_err(CliError::Spawn)?;
    worker
        .submit(PreviewRequest {
            region,
            mode,
            lookup: Arc::new(world(config)?),
            colors: Arc::new(color_table(config)?),
        })
        .ok_or(CliError::WorkerStopped)?;

    let outcome = worker
        .wait_result(PREVIEW_TIMEOUT)
        .ok_or(CliError::PreviewTimeout(PREVIEW_TIMEOUT.as_secs()))?;
    info!(
        request_id = outcome.request_id,
        elapsed = ?outcome.elapsed,
        "Preview of {} ready",
        outcome.region
    );

    let mut slot = PreviewSlot::new();
    slot.apply(outcome);
    if let Some(err) = slot.last_error() {
        return Err(err.clone().into());
    }
    let Some(raster) = slot.raster() else {
        return Err(CliError::PreviewTimeout(PREVIEW_TIMEOUT.as_secs()));
    };

    let image = raster.upscaled(config.preview.display_scale.max(1));
    image.save(&out)?;
    info!(
        "Saved {}x{} preview to {}",
        image.width(),
        image.height(),
        out.display()
    );
    Ok(())
}

/// Where an export lands when `--out` is not given.
pub fn default_export_path(config: &Config, world_type: WorldType) -> PathBuf {
    Path::new(&config.export.last_export_dir)
        .join(suggested_filename(world_type, config.world.seed))
}

/// Exports a region to PNG and remembers the destination directory.
pub fn export(config: &mut Config, config_dir: &Path, args: &ExportArgs) -> Result<(), CliError> {
    let region = args.region.region()?;
    let mode = args.region.mode(config);
    let oracle = world(config)?;
    let colors = color_table(config)?;

    let path = match &args.out {
        Some(out) => with_png_extension(out),
        None => default_export_path(config, oracle.world_type()),
    };
    ensure_writable(&path, args.force)?;

    let exporter = BiomeImageExporter::new(config.export.max_pixels);
    let request = ExportRequest { path, region, mode };
    let mut last_reported = 0;
    let mut report = |progress: ExportProgress| {
        let percent = progress.percent();
        if percent / 10 > last_reported / 10 {
            last_reported = percent;
            info!("Export {percent}% ({}/{} rows)", progress.rows_done, progress.rows_total);
        }
    };
    let summary = exporter.export(&request, &oracle, &colors, &mut report, &CancelToken::new())?;
    info!(
        "Exported {}x{} image to {} in {:.2?}",
        summary.width,
        summary.height,
        summary.path.display(),
        summary.elapsed
    );

    config.remember_export_dir(&summary.path);
    if let Err(err) = persist_export_dir(config_dir, &summary.path) {
        warn!("Could not save export directory: {err}");
    }
    Ok(())
}

/// Records the export directory in the stored config.
///
/// Starts from the file on disk, not the running config, so command-line
/// overrides never persist. A file that fails to parse is left untouched.
fn persist_export_dir(config_dir: &Path, exported: &Path) -> Result<bool, ConfigError> {
    let mut stored = Config::load_or_create(config_dir)?;
    if !stored.remember_export_dir(exported) {
        return Ok(false);
    }
    stored.save(config_dir)?;
    Ok(true)
}

/// Writes the built-in biome profile so it can be edited.
pub fn write_profile(args: &ProfileArgs) -> Result<(), CliError> {
    ensure_writable(&args.out, args.force)?;
    BiomeProfile::default().save(&args.out)?;
    info!("Wrote default biome profile to {}", args.out.display());
    Ok(())
}
