//! World-side collaborators of the biome map: biome identifiers, the lookup
//! interface the renderers sample, and a seeded noise oracle that implements it.

mod biome;
mod lookup;
mod oracle;

pub use biome::{BiomeId, BiomeInfo, CATALOG};
pub use lookup::{BiomeLookup, LookupError};
pub use oracle::{NoiseBiomeOracle, WORLD_BORDER, WorldType, WorldTypeParseError};
