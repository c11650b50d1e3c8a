//! The biome lookup interface sampled by the preview renderer and exporter.

use crate::BiomeId;

/// Failures a biome lookup can report for a single coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Biome data for this coordinate cannot be produced (not generated yet,
    /// outside the world, backing store offline).
    #[error("biome data unavailable at ({x}, {y}): {reason}")]
    Unavailable { x: i64, y: i64, reason: String },

    /// The generator produced an identifier nobody knows how to interpret.
    #[error("unknown biome id {0}")]
    UnknownBiome(BiomeId),
}

/// Source of biome identifiers for world coordinates.
///
/// When `coarse` is set, `x` and `y` are in quarter-resolution units (one
/// unit spans four world units) and the implementation may answer from
/// lower-detail data.
///
/// Implementations are shared with the background preview worker, so they
/// must be `Send + Sync` and must not rely on interior state that changes
/// between calls of one render.
pub trait BiomeLookup: Send + Sync {
    fn biome_at(&self, x: i64, y: i64, coarse: bool) -> Result<BiomeId, LookupError>;
}

impl<F> BiomeLookup for F
where
    F: Fn(i64, i64, bool) -> Result<BiomeId, LookupError> + Send + Sync,
{
    fn biome_at(&self, x: i64, y: i64, coarse: bool) -> Result<BiomeId, LookupError> {
        self(x, y, coarse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_lookup() {
        let lookup = |x: i64, _y: i64, _coarse: bool| {
            if x < 0 {
                Err(LookupError::Unavailable {
                    x,
                    y: 0,
                    reason: "west of spawn".into(),
                })
            } else {
                Ok(BiomeId::PLAINS)
            }
        };
        let dynamic: &dyn BiomeLookup = &lookup;
        assert_eq!(dynamic.biome_at(3, 0, false), Ok(BiomeId::PLAINS));
        assert!(dynamic.biome_at(-1, 0, false).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = LookupError::Unavailable {
            x: 1,
            y: -2,
            reason: "not generated".into(),
        };
        assert_eq!(err.to_string(), "biome data unavailable at (1, -2): not generated");
        assert_eq!(
            LookupError::UnknownBiome(BiomeId(99)).to_string(),
            "unknown biome id 99"
        );
    }
}
