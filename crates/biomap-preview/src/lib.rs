//! Biome map rasterization: letterboxed previews of a world region, a single
//! background worker that keeps only the newest preview, and streaming PNG
//! export of whole regions.

mod cancel;
mod color;
mod error;
mod export;
mod profile;
mod raster;
mod region;
mod render;
mod worker;

pub use cancel::CancelToken;
pub use color::BiomeColorTable;
pub use error::PreviewError;
pub use export::{
    BiomeImageExporter, ExportError, ExportProgress, ExportRequest, ExportSummary,
    suggested_filename, with_png_extension,
};
pub use profile::{BiomeColor, BiomeProfile, ProfileError};
pub use raster::PreviewRaster;
pub use region::{ResolutionMode, WorldCoord, WorldRegion};
pub use render::{DEFAULT_PREVIEW_SIZE, PreviewLayout, RegionPreviewRenderer};
pub use worker::{PreviewOutcome, PreviewRequest, PreviewSlot, PreviewWorker};

pub use biomap_world::{BiomeId, BiomeLookup, LookupError};
