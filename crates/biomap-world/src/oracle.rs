//! Seeded noise oracle: assigns a biome to every world coordinate from
//! continentalness, temperature, moisture and river noise fields.

use std::fmt;
use std::str::FromStr;

use noise::{NoiseFn, Simplex};

use crate::{BiomeId, BiomeLookup, LookupError};

/// Distance from the origin beyond which no biome data exists.
pub const WORLD_BORDER: i64 = 30_000_000;

/// Layout variant of a generated world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WorldType {
    #[default]
    Default,
    /// Same layout stretched by a factor of four.
    LargeBiomes,
}

impl WorldType {
    /// Text used for this world type in suggested file names.
    pub fn filename_text(self) -> &'static str {
        match self {
            WorldType::Default => "default",
            WorldType::LargeBiomes => "largeBiomes",
        }
    }

    /// Feature size multiplier applied to every noise field.
    fn feature_scale(self) -> f64 {
        match self {
            WorldType::Default => 1.0,
            WorldType::LargeBiomes => 4.0,
        }
    }
}

impl fmt::Display for WorldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldType::Default => f.write_str("default"),
            WorldType::LargeBiomes => f.write_str("large_biomes"),
        }
    }
}

/// Error returned when parsing an unrecognized world type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown world type `{0}` (expected `default` or `large_biomes`)")]
pub struct WorldTypeParseError(pub String);

impl FromStr for WorldType {
    type Err = WorldTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(WorldType::Default),
            "large_biomes" | "largebiomes" => Ok(WorldType::LargeBiomes),
            _ => Err(WorldTypeParseError(s.to_string())),
        }
    }
}

/// Deterministic biome oracle for a seed and world type.
///
/// Two oracles built from the same seed and world type answer identically.
/// Coordinates outside [`WORLD_BORDER`] report [`LookupError::Unavailable`].
pub struct NoiseBiomeOracle {
    seed: i64,
    world_type: WorldType,
    continent_noise: Simplex,
    temp_noise: Simplex,
    moisture_noise: Simplex,
    river_noise: Simplex,
    /// Frequency of the continentalness field. Lower values produce larger landmasses.
    pub continent_frequency: f64,
    /// Frequency of the temperature and moisture fields.
    pub climate_frequency: f64,
    /// Frequency of the river field.
    pub river_frequency: f64,
}

impl NoiseBiomeOracle {
    /// Creates an oracle; the four noise fields use decorrelated seeds derived from `seed`.
    pub fn new(seed: i64, world_type: WorldType) -> Self {
        let base = (seed as u64) ^ ((seed as u64) >> 32);
        Self {
            seed,
            world_type,
            continent_noise: Simplex::new(base as u32),
            temp_noise: Simplex::new(base.wrapping_add(0xDEAD_BEEF) as u32),
            moisture_noise: Simplex::new(base.wrapping_add(0x5EED_CAFE) as u32),
            river_noise: Simplex::new(base.wrapping_add(0x0B1D_FACE) as u32),
            continent_frequency: 0.0008,
            climate_frequency: 0.0012,
            river_frequency: 0.0025,
        }
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn world_type(&self) -> WorldType {
        self.world_type
    }

    /// Biome at a world coordinate, ignoring the world border.
    fn sample(&self, x: i64, y: i64) -> BiomeId {
        let scale = self.world_type.feature_scale();
        let (fx, fy) = (x as f64 / scale, y as f64 / scale);

        let continent = self
            .continent_noise
            .get([fx * self.continent_frequency, fy * self.continent_frequency]);
        // Normalize from [-1, 1] to [0, 1].
        let temperature =
            (self.temp_noise.get([fx * self.climate_frequency, fy * self.climate_frequency]) + 1.0)
                * 0.5;

        if continent < -0.35 {
            return BiomeId::DEEP_OCEAN;
        }
        if continent < -0.05 {
            return if temperature < 0.2 {
                BiomeId::FROZEN_OCEAN
            } else {
                BiomeId::OCEAN
            };
        }
        if continent < 0.0 {
            return BiomeId::BEACH;
        }

        let river = self
            .river_noise
            .get([fx * self.river_frequency, fy * self.river_frequency]);
        if river.abs() < 0.02 {
            return BiomeId::RIVER;
        }
        if continent > 0.65 {
            return BiomeId::MOUNTAINS;
        }

        let moisture = (self
            .moisture_noise
            .get([fx * self.climate_frequency, fy * self.climate_frequency])
            + 1.0)
            * 0.5;
        climate_biome(temperature, moisture)
    }
}

/// Whittaker-style assignment of land biomes; first matching band wins.
fn climate_biome(temperature: f64, moisture: f64) -> BiomeId {
    const BANDS: &[(f64, &[(f64, BiomeId)])] = &[
        (
            0.25,
            &[
                (0.4, BiomeId::SNOWY_TUNDRA),
                (1.01, BiomeId::SNOWY_TAIGA),
            ],
        ),
        (0.4, &[(0.5, BiomeId::TAIGA), (1.01, BiomeId::BIRCH_FOREST)]),
        (
            0.6,
            &[
                (0.35, BiomeId::PLAINS),
                (0.6, BiomeId::FOREST),
                (0.8, BiomeId::DARK_FOREST),
                (1.01, BiomeId::SWAMP),
            ],
        ),
        (
            1.01,
            &[
                (0.2, BiomeId::DESERT),
                (0.35, BiomeId::BADLANDS),
                (0.6, BiomeId::SAVANNA),
                (1.01, BiomeId::JUNGLE),
            ],
        ),
    ];

    for &(temp_max, moisture_bands) in BANDS {
        if temperature < temp_max {
            for &(moisture_max, biome) in moisture_bands {
                if moisture < moisture_max {
                    return biome;
                }
            }
        }
    }
    BiomeId::PLAINS
}

impl BiomeLookup for NoiseBiomeOracle {
    fn biome_at(&self, x: i64, y: i64, coarse: bool) -> Result<BiomeId, LookupError> {
        let (wx, wy) = if coarse {
            (x.saturating_mul(4), y.saturating_mul(4))
        } else {
            (x, y)
        };

        let border = WORLD_BORDER.unsigned_abs();
        if wx.unsigned_abs() > border || wy.unsigned_abs() > border {
            tracing::trace!(x = wx, y = wy, "lookup outside world border");
            return Err(LookupError::Unavailable {
                x,
                y,
                reason: format!("outside the world border of {WORLD_BORDER}"),
            });
        }

        Ok(self.sample(wx, wy))
    }
}
