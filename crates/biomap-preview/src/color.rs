//! Biome id to display color mapping.

use biomap_world::BiomeId;
use image::Rgba;

use crate::PreviewError;

/// Read-only color lookup for biome ids with an optional fallback for ids
/// that have no entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BiomeColorTable {
    colors: Vec<Option<Rgba<u8>>>,
    unknown: Option<Rgba<u8>>,
}

impl BiomeColorTable {
    /// An empty table using `unknown` for every id.
    pub fn new(unknown: Option<Rgba<u8>>) -> Self {
        Self {
            colors: Vec::new(),
            unknown,
        }
    }

    /// Sets the color of `id`, replacing any previous one.
    pub fn insert(&mut self, id: BiomeId, color: Rgba<u8>) {
        let index = id.0 as usize;
        if index >= self.colors.len() {
            self.colors.resize(index + 1, None);
        }
        self.colors[index] = Some(color);
    }

    pub fn with_color(mut self, id: BiomeId, color: Rgba<u8>) -> Self {
        self.insert(id, color);
        self
    }

    /// The color configured for `id` itself, without the fallback.
    pub fn get(&self, id: BiomeId) -> Option<Rgba<u8>> {
        self.colors.get(id.0 as usize).copied().flatten()
    }

    pub fn unknown_color(&self) -> Option<Rgba<u8>> {
        self.unknown
    }

    /// Resolves the display color of `id`, falling back to the unknown color.
    ///
    /// # Errors
    ///
    /// [`PreviewError::UnknownBiome`] if `id` has no entry and no fallback exists.
    pub fn color_for(&self, id: BiomeId) -> Result<Rgba<u8>, PreviewError> {
        self.get(id)
            .or(self.unknown)
            .ok_or(PreviewError::UnknownBiome(id))
    }

    /// Number of ids with an explicit color.
    pub fn len(&self) -> usize {
        self.colors.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 200, 0, 255]);

    #[test]
    fn test_known_id_resolves() {
        let table = BiomeColorTable::new(Some(MAGENTA)).with_color(BiomeId::PLAINS, GREEN);
        assert_eq!(table.color_for(BiomeId::PLAINS), Ok(GREEN));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unknown_id_uses_sentinel() {
        let table = BiomeColorTable::new(Some(MAGENTA)).with_color(BiomeId::PLAINS, GREEN);
        assert_eq!(table.color_for(BiomeId(180)), Ok(MAGENTA));
        assert_eq!(table.color_for(BiomeId::OCEAN), Ok(MAGENTA));
    }

    #[test]
    fn test_unknown_id_without_sentinel_fails() {
        let table = BiomeColorTable::new(None).with_color(BiomeId::PLAINS, GREEN);
        assert_eq!(
            table.color_for(BiomeId::DESERT),
            Err(PreviewError::UnknownBiome(BiomeId::DESERT))
        );
    }

    #[test]
    fn test_insert_replaces() {
        let mut table = BiomeColorTable::new(None);
        table.insert(BiomeId(3), GREEN);
        table.insert(BiomeId(3), MAGENTA);
        assert_eq!(table.get(BiomeId(3)), Some(MAGENTA));
        assert_eq!(table.get(BiomeId(2)), None);
        assert_eq!(table.len(), 1);
    }
}
