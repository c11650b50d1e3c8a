//! Biome identifiers and the catalog of biomes the oracle can produce.

use std::fmt;

/// Numeric biome identifier as reported by world generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u16);

impl BiomeId {
    pub const OCEAN: BiomeId = BiomeId(0);
    pub const PLAINS: BiomeId = BiomeId(1);
    pub const DESERT: BiomeId = BiomeId(2);
    pub const MOUNTAINS: BiomeId = BiomeId(3);
    pub const FOREST: BiomeId = BiomeId(4);
    pub const TAIGA: BiomeId = BiomeId(5);
    pub const SWAMP: BiomeId = BiomeId(6);
    pub const RIVER: BiomeId = BiomeId(7);
    pub const FROZEN_OCEAN: BiomeId = BiomeId(10);
    pub const SNOWY_TUNDRA: BiomeId = BiomeId(12);
    pub const BEACH: BiomeId = BiomeId(16);
    pub const JUNGLE: BiomeId = BiomeId(21);
    pub const DEEP_OCEAN: BiomeId = BiomeId(24);
    pub const BIRCH_FOREST: BiomeId = BiomeId(27);
    pub const DARK_FOREST: BiomeId = BiomeId(29);
    pub const SNOWY_TAIGA: BiomeId = BiomeId(30);
    pub const SAVANNA: BiomeId = BiomeId(35);
    pub const BADLANDS: BiomeId = BiomeId(37);

    /// Catalog name of this biome, if it is a known one.
    pub fn name(self) -> Option<&'static str> {
        CATALOG.iter().find(|info| info.id == self).map(|info| info.name)
    }

    /// Looks up a catalog biome by name.
    pub fn from_name(name: &str) -> Option<BiomeId> {
        CATALOG.iter().find(|info| info.name == name).map(|info| info.id)
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({name})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// A catalog entry: id, name and the color used by the built-in profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BiomeInfo {
    pub id: BiomeId,
    pub name: &'static str,
    pub color: [u8; 3],
}

const fn info(id: BiomeId, name: &'static str, color: [u8; 3]) -> BiomeInfo {
    BiomeInfo { id, name, color }
}

/// Every biome the noise oracle emits, ordered by id.
pub const CATALOG: &[BiomeInfo] = &[
    info(BiomeId::OCEAN, "ocean", [0, 0, 112]),
    info(BiomeId::PLAINS, "plains", [141, 179, 96]),
    info(BiomeId::DESERT, "desert", [250, 148, 24]),
    info(BiomeId::MOUNTAINS, "mountains", [96, 96, 96]),
    info(BiomeId::FOREST, "forest", [5, 102, 33]),
    info(BiomeId::TAIGA, "taiga", [11, 102, 89]),
    info(BiomeId::SWAMP, "swamp", [7, 249, 178]),
    info(BiomeId::RIVER, "river", [0, 0, 255]),
    info(BiomeId::FROZEN_OCEAN, "frozen_ocean", [144, 144, 160]),
    info(BiomeId::SNOWY_TUNDRA, "snowy_tundra", [255, 255, 255]),
    info(BiomeId::BEACH, "beach", [250, 222, 85]),
    info(BiomeId::JUNGLE, "jungle", [83, 123, 9]),
    info(BiomeId::DEEP_OCEAN, "deep_ocean", [0, 0, 48]),
    info(BiomeId::BIRCH_FOREST, "birch_forest", [48, 116, 68]),
    info(BiomeId::DARK_FOREST, "dark_forest", [64, 81, 26]),
    info(BiomeId::SNOWY_TAIGA, "snowy_taiga", [49, 85, 74]),
    info(BiomeId::SAVANNA, "savanna", [189, 178, 95]),
    info(BiomeId::BADLANDS, "badlands", [217, 69, 21]),
];
