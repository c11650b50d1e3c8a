//! Preview rendering error types.

use biomap_world::{BiomeId, LookupError};

use crate::WorldCoord;

/// Errors that can occur while validating a region or rendering it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    /// The region is empty or inverted on at least one axis.
    #[error("invalid region: top-left {top_left} must lie strictly above and left of bottom-right {bottom_right}")]
    InvalidRegion {
        top_left: WorldCoord,
        bottom_right: WorldCoord,
    },

    /// The biome lookup had no data for a sampled coordinate.
    #[error("biome data unavailable at ({x}, {y}): {reason}")]
    LookupUnavailable { x: i64, y: i64, reason: String },

    /// A biome id with no color and no unknown-color fallback.
    #[error("no color for biome {0} and no unknown-biome color configured")]
    UnknownBiome(BiomeId),

    /// The render was superseded or explicitly cancelled.
    #[error("render cancelled")]
    Cancelled,
}

impl From<LookupError> for PreviewError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Unavailable { x, y, reason } => {
                PreviewError::LookupUnavailable { x, y, reason }
            }
            LookupError::UnknownBiome(id) => PreviewError::UnknownBiome(id),
        }
    }
}
