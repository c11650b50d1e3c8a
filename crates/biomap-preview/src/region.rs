//! World-space regions and the sampling resolution used to render them.

use std::fmt;

use crate::PreviewError;

/// A point in the horizontal plane of the world. `y` grows southward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldCoord {
    pub x: i64,
    pub y: i64,
}

impl WorldCoord {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for WorldCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A non-empty axis-aligned rectangle in world space.
///
/// Always satisfies `top_left.x < bottom_right.x` and
/// `top_left.y < bottom_right.y`, with both extents representable as `i64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldRegion {
    top_left: WorldCoord,
    bottom_right: WorldCoord,
}

impl WorldRegion {
    /// Validates and builds a region.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::InvalidRegion`] if either extent is zero,
    /// negative, or overflows `i64`.
    pub fn new(top_left: WorldCoord, bottom_right: WorldCoord) -> Result<Self, PreviewError> {
        let positive = |from: i64, to: i64| to.checked_sub(from).is_some_and(|d| d > 0);
        if !positive(top_left.x, bottom_right.x) || !positive(top_left.y, bottom_right.y) {
            tracing::warn!(%top_left, %bottom_right, "rejecting invalid region");
            return Err(PreviewError::InvalidRegion {
                top_left,
                bottom_right,
            });
        }
        Ok(Self {
            top_left,
            bottom_right,
        })
    }

    /// Builds a region from its four edges, as entered by a user.
    pub fn from_edges(left: i64, top: i64, right: i64, bottom: i64) -> Result<Self, PreviewError> {
        Self::new(WorldCoord::new(left, top), WorldCoord::new(right, bottom))
    }

    pub fn top_left(&self) -> WorldCoord {
        self.top_left
    }

    pub fn bottom_right(&self) -> WorldCoord {
        self.bottom_right
    }

    /// Extent along x in world units; always positive.
    pub fn width(&self) -> i64 {
        self.bottom_right.x - self.top_left.x
    }

    /// Extent along y in world units; always positive.
    pub fn height(&self) -> i64 {
        self.bottom_right.y - self.top_left.y
    }

    pub fn longest_side(&self) -> i64 {
        self.width().max(self.height())
    }
}

impl fmt::Display for WorldRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.top_left, self.bottom_right)
    }
}

/// How densely a region is sampled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResolutionMode {
    /// One lookup coordinate per world unit.
    Full,
    /// One lookup coordinate per four world units, answered from coarse data.
    #[default]
    Quartered,
}

impl ResolutionMode {
    pub fn from_full_resolution(full: bool) -> Self {
        if full {
            ResolutionMode::Full
        } else {
            ResolutionMode::Quartered
        }
    }

    /// World units per lookup unit.
    pub fn factor(self) -> i64 {
        match self {
            ResolutionMode::Full => 1,
            ResolutionMode::Quartered => 4,
        }
    }

    /// Whether lookups should be answered from coarse data.
    pub fn is_coarse(self) -> bool {
        self == ResolutionMode::Quartered
    }
}
