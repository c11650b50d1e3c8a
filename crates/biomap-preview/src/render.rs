//! Letterboxed preview rendering of a world region.
//!
//! The region's longest side is fit to the preview's side length; the
//! shorter side is centered, leaving transparent bars on that axis. Each
//! interior pixel samples the biome at the world coordinate of its top-left
//! corner.

use biomap_world::BiomeLookup;

use crate::{
    BiomeColorTable, CancelToken, PreviewError, PreviewRaster, ResolutionMode, WorldRegion,
};

/// Side length of the preview raster when none is configured.
pub const DEFAULT_PREVIEW_SIZE: u32 = 100;

/// How a region maps onto a square raster of side `size`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewLayout {
    /// Raster side length in pixels.
    pub size: u32,
    /// World units per raster pixel.
    pub scale: f64,
    /// Width of the transparent bar on the left and on the right.
    pub offset_x: u32,
    /// Height of the transparent bar on the top and on the bottom.
    pub offset_y: u32,
}

impl PreviewLayout {
    pub fn compute(region: &WorldRegion, size: u32) -> Self {
        let size = size.max(1);
        let longest = region.longest_side();
        let scale = longest as f64 / size as f64;
        // Bars are computed from the integer half-difference, then truncated.
        let offset = |side: i64| ((((longest - side) / 2) as f64 / scale) as u32).min(size / 2);
        Self {
            size,
            scale,
            offset_x: offset(region.width()),
            offset_y: offset(region.height()),
        }
    }

    /// Number of sampled columns between the left and right bars.
    pub fn interior_width(&self) -> u32 {
        self.size - 2 * self.offset_x
    }

    /// Number of sampled rows between the top and bottom bars.
    pub fn interior_height(&self) -> u32 {
        self.size - 2 * self.offset_y
    }

    /// Whether raster pixel `(x, y)` lies inside the sampled area.
    pub fn is_interior(&self, x: u32, y: u32) -> bool {
        (self.offset_x..self.size - self.offset_x).contains(&x)
            && (self.offset_y..self.size - self.offset_y).contains(&y)
    }
}

/// Lookup coordinate for the `index`-th sample along one axis.
///
/// Truncates toward zero after dividing by the mode's factor.
fn sample_coord(origin: i64, index: u32, scale: f64, mode: ResolutionMode) -> i64 {
    ((origin as f64 + index as f64 * scale) / mode.factor() as f64) as i64
}

/// Renders fixed-size square previews of world regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionPreviewRenderer {
    size: u32,
}

impl Default for RegionPreviewRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_SIZE)
    }
}

impl RegionPreviewRenderer {
    /// A renderer producing `size` x `size` rasters. A zero size is raised to one.
    pub fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn layout(&self, region: &WorldRegion) -> PreviewLayout {
        PreviewLayout::compute(region, self.size)
    }

    /// Renders `region` to a new raster.
    ///
    /// The first lookup failure aborts the whole render.
    pub fn render(
        &self,
        region: &WorldRegion,
        mode: ResolutionMode,
        lookup: &dyn BiomeLookup,
        colors: &BiomeColorTable,
    ) -> Result<PreviewRaster, PreviewError> {
        self.render_cancellable(region, mode, lookup, colors, &CancelToken::new())
    }

    /// Like [`render`](Self::render), but stops with [`PreviewError::Cancelled`]
    /// once `cancel` is set. The token is polled between rows.
    pub fn render_cancellable(
        &self,
        region: &WorldRegion,
        mode: ResolutionMode,
        lookup: &dyn BiomeLookup,
        colors: &BiomeColorTable,
        cancel: &CancelToken,
    ) -> Result<PreviewRaster, PreviewError> {
        let layout = self.layout(region);
        let origin = region.top_left();
        let mut raster = PreviewRaster::transparent(self.size, self.size);

        tracing::debug!(
            %region,
            ?mode,
            scale = layout.scale,
            offset_x = layout.offset_x,
            offset_y = layout.offset_y,
            "rendering preview"
        );

        for y in 0..layout.interior_height() {
            if cancel.is_cancelled() {
                tracing::debug!(row = y, "preview render cancelled");
                return Err(PreviewError::Cancelled);
            }
            let world_y = sample_coord(origin.y, y, layout.scale, mode);

            for x in 0..layout.interior_width() {
                let world_x = sample_coord(origin.x, x, layout.scale, mode);
                let color = lookup
                    .biome_at(world_x, world_y, mode.is_coarse())
                    .map_err(PreviewError::from)
                    .and_then(|biome| colors.color_for(biome))
                    .inspect_err(|err| {
                        tracing::error!(
                            pixel_x = x + layout.offset_x,
                            pixel_y = y + layout.offset_y,
                            world_x,
                            world_y,
                            "preview render aborted: {err}"
                        );
                    })?;

                raster.put_pixel(x + layout.offset_x, y + layout.offset_y, color);
            }
        }

        Ok(raster)
    }
}
