//! The pixel buffer produced by a preview render.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// A finished preview image. Pixels never written by the renderer are fully
/// transparent (letterbox bars).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewRaster {
    image: RgbaImage,
}

impl PreviewRaster {
    /// A fully transparent raster.
    pub(crate) fn transparent(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub(crate) fn put_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        self.image.put_pixel(x, y, color);
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn is_transparent(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y)[3] == 0
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Nearest-neighbor enlargement for display; keeps hard biome edges.
    pub fn upscaled(&self, factor: u32) -> RgbaImage {
        let factor = factor.max(1);
        imageops::resize(
            &self.image,
            self.width() * factor,
            self.height() * factor,
            FilterType::Nearest,
        )
    }

    /// Writes the raster as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), image::ImageError> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_raster_is_transparent() {
        let raster = PreviewRaster::transparent(4, 3);
        assert_eq!((raster.width(), raster.height()), (4, 3));
        for y in 0..3 {
            for x in 0..4 {
                assert!(raster.is_transparent(x, y));
            }
        }
    }

    #[test]
    fn test_upscaled_repeats_pixels() {
        let mut raster = PreviewRaster::transparent(2, 1);
        raster.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        raster.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        let big = raster.upscaled(2);
        assert_eq!(big.dimensions(), (4, 2));
        assert_eq!(*big.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*big.get_pixel(2, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let mut raster = PreviewRaster::transparent(3, 3);
        raster.put_pixel(1, 1, Rgba([10, 20, 30, 255]));
        raster.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded, raster.into_image());
    }
}
