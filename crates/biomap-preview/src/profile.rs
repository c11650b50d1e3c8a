//! User-editable biome color profiles stored as RON.
//!
//! Biomes are keyed by catalog name (`"plains"`) or by numeric id (`"42"`),
//! so a profile can color biomes the built-in catalog does not know.

use std::collections::BTreeMap;
use std::path::Path;

use biomap_world::{BiomeId, CATALOG};
use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::BiomeColorTable;

/// Errors that can occur when loading, saving, or resolving a profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Failed to read the profile file from disk.
    #[error("failed to read biome profile: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the profile file to disk.
    #[error("failed to write biome profile: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse biome profile: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize the profile to RON.
    #[error("failed to serialize biome profile: {0}")]
    SerializeError(#[source] ron::Error),

    /// A key is neither a catalog biome name nor a numeric id.
    #[error("unknown biome `{0}` in profile")]
    UnknownBiomeKey(String),
}

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BiomeColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }
}

/// A named set of biome colors plus the color for biomes it does not list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeProfile {
    pub name: String,
    /// Used for biomes missing from `colors`. `None` makes them an error.
    pub unknown: Option<BiomeColor>,
    pub colors: BTreeMap<String, BiomeColor>,
}

impl Default for BiomeProfile {
    /// The built-in profile covering every catalog biome.
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            unknown: Some(BiomeColor::new(255, 0, 255)),
            colors: CATALOG
                .iter()
                .map(|info| {
                    let [r, g, b] = info.color;
                    (info.name.to_string(), BiomeColor::new(r, g, b))
                })
                .collect(),
        }
    }
}

impl BiomeProfile {
    /// Load a profile from a RON file.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let contents = std::fs::read_to_string(path).map_err(ProfileError::ReadError)?;
        let profile: BiomeProfile = ron::from_str(&contents).map_err(ProfileError::ParseError)?;
        tracing::info!(
            name = %profile.name,
            entries = profile.colors.len(),
            "Loaded biome profile from {}",
            path.display()
        );
        Ok(profile)
    }

    /// Save the profile as pretty-printed RON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(ProfileError::WriteError)?;
        }
        let pretty = ron::ser::PrettyConfig::new().depth_limit(2);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ProfileError::SerializeError)?;
        std::fs::write(path, serialized).map_err(ProfileError::WriteError)
    }

    /// Build the read-only table the renderers sample.
    ///
    /// # Errors
    ///
    /// [`ProfileError::UnknownBiomeKey`] for a key that names no biome.
    pub fn to_color_table(&self) -> Result<BiomeColorTable, ProfileError> {
        let mut table = BiomeColorTable::new(self.unknown.map(BiomeColor::to_rgba));
        for (key, color) in &self.colors {
            let id = resolve_key(key).ok_or_else(|| ProfileError::UnknownBiomeKey(key.clone()))?;
            table.insert(id, color.to_rgba());
        }
        Ok(table)
    }
}

fn resolve_key(key: &str) -> Option<BiomeId> {
    let key = key.trim();
    key.parse::<u16>()
        .ok()
        .map(BiomeId)
        .or_else(|| BiomeId::from_name(key))
}
