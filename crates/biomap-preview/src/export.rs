//! Region export to PNG.
//!
//! One output pixel per lookup unit: a quartered export of a 4000 x 2000
//! region is 1000 x 500 pixels. Rows are encoded as they are sampled, so the
//! whole image never has to sit in memory.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use biomap_world::{BiomeLookup, WorldType};

use crate::{BiomeColorTable, CancelToken, PreviewError, ResolutionMode, WorldRegion};

/// Errors that can occur while exporting a region.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Sampling failed or the export was cancelled.
    #[error(transparent)]
    Render(#[from] PreviewError),

    /// The destination could not be created or written.
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    /// The PNG encoder rejected the image.
    #[error("failed to encode png: {0}")]
    Encoding(#[from] png::EncodingError),

    /// The output image would exceed the configured pixel budget.
    #[error("export of {width} x {height} pixels exceeds the limit of {max_pixels} pixels")]
    TooLarge {
        width: u64,
        height: u64,
        max_pixels: u64,
    },
}

/// A pre-validated export: the caller has already confirmed the destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportRequest {
    pub path: PathBuf,
    pub region: WorldRegion,
    pub mode: ResolutionMode,
}

/// Rows written so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportProgress {
    pub rows_done: u32,
    pub rows_total: u32,
}

impl ExportProgress {
    /// Completion in percent, `0..=100`.
    pub fn percent(&self) -> u32 {
        if self.rows_total == 0 {
            return 100;
        }
        (u64::from(self.rows_done) * 100 / u64::from(self.rows_total)) as u32
    }
}

/// What a finished export produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub elapsed: Duration,
}

/// Writes biome images of whole regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BiomeImageExporter {
    max_pixels: u64,
}

impl BiomeImageExporter {
    pub fn new(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    /// Output size for `region` in `mode`, at least one pixel per axis.
    ///
    /// # Errors
    ///
    /// [`ExportError::TooLarge`] if the image would exceed the pixel budget.
    pub fn output_dimensions(
        &self,
        region: &WorldRegion,
        mode: ResolutionMode,
    ) -> Result<(u32, u32), ExportError> {
        let width = (region.width() / mode.factor()).max(1) as u64;
        let height = (region.height() / mode.factor()).max(1) as u64;
        let too_large = width > u64::from(u32::MAX)
            || height > u64::from(u32::MAX)
            || width.saturating_mul(height) > self.max_pixels;
        if too_large {
            return Err(ExportError::TooLarge {
                width,
                height,
                max_pixels: self.max_pixels,
            });
        }
        Ok((width as u32, height as u32))
    }

    /// Samples `request.region` and writes it to `request.path` as an RGBA PNG.
    ///
    /// `progress` is called after every row. On any failure, including
    /// cancellation, the partially written file is removed.
    pub fn export(
        &self,
        request: &ExportRequest,
        lookup: &dyn BiomeLookup,
        colors: &BiomeColorTable,
        progress: &mut dyn FnMut(ExportProgress),
        cancel: &CancelToken,
    ) -> Result<ExportSummary, ExportError> {
        let (width, height) = self.output_dimensions(&request.region, request.mode)?;
        if let Some(parent) = request.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!(
            region = %request.region,
            mode = ?request.mode,
            width,
            height,
            "Exporting biomes to {}",
            request.path.display()
        );
        let start = Instant::now();
        let written = write_png(request, width, height, lookup, colors, progress, cancel);

        if let Err(err) = written {
            if let Err(remove_err) = std::fs::remove_file(&request.path) {
                tracing::warn!("could not remove partial export: {remove_err}");
            }
            match &err {
                ExportError::Render(PreviewError::Cancelled) => tracing::info!("export cancelled"),
                _ => tracing::error!("export failed: {err}"),
            }
            return Err(err);
        }

        let elapsed = start.elapsed();
        tracing::info!(?elapsed, "Export finished");
        Ok(ExportSummary {
            path: request.path.clone(),
            width,
            height,
            elapsed,
        })
    }
}

fn write_png(
    request: &ExportRequest,
    width: u32,
    height: u32,
    lookup: &dyn BiomeLookup,
    colors: &BiomeColorTable,
    progress: &mut dyn FnMut(ExportProgress),
    cancel: &CancelToken,
) -> Result<(), ExportError> {
    let file = File::create(&request.path)?;
    let mut encoder = png::Encoder::new(file, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut stream = encoder.write_header()?.into_stream_writer()?;

    let mode = request.mode;
    let origin = request.region.top_left();
    let mut row = vec![0_u8; width as usize * 4];

    for y in 0..height {
        if cancel.is_cancelled() {
            return Err(PreviewError::Cancelled.into());
        }
        let world_y = lookup_coord(origin.y, y, mode);
        for (x, pixel) in (0..width).zip(row.chunks_exact_mut(4)) {
            let world_x = lookup_coord(origin.x, x, mode);
            let biome = lookup
                .biome_at(world_x, world_y, mode.is_coarse())
                .map_err(PreviewError::from)?;
            pixel.copy_from_slice(&colors.color_for(biome)?.0);
        }
        stream.write_all(&row)?;
        progress(ExportProgress {
            rows_done: y + 1,
            rows_total: height,
        });
    }

    stream.finish()?;
    Ok(())
}

/// Lookup coordinate of the `index`-th output pixel along one axis.
///
/// Floors the origin so adjacent pixels never share a lookup unit, even
/// across zero.
fn lookup_coord(origin: i64, index: u32, mode: ResolutionMode) -> i64 {
    origin.div_euclid(mode.factor()) + i64::from(index)
}

/// Appends `.png` unless the path already ends in it (case-insensitive).
pub fn with_png_extension(path: &Path) -> PathBuf {
    let has_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if has_png {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".png");
        PathBuf::from(name)
    }
}

/// Default export file name for a world, e.g. `biomes_default_-42.png`.
pub fn suggested_filename(world_type: WorldType, seed: i64) -> String {
    format!("biomes_{}_{seed}.png", world_type.filename_text())
}
