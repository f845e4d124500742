//! Image chunking - splits a padded image into square tiles for character matching.

use crate::PaddedImage;
use image::{imageops, Rgb, RgbImage};
use std::iter::FusedIterator;

/// BT.709 luma weights
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

/// A square copy of one region of the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pixels: RgbImage,
}

impl Tile {
    pub fn side(&self) -> u32 {
        self.pixels.width()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.pixels.get_pixel(x, y)
    }

    /// Mean perceptual luminance in [0, 1]
    pub fn luminance(&self) -> f32 {
        let sum: f64 = self
            .pixels
            .pixels()
            .map(|Rgb([r, g, b])| {
                LUMA_R * f64::from(*r) + LUMA_G * f64::from(*g) + LUMA_B * f64::from(*b)
            })
            .sum();
        let count = (u64::from(self.pixels.width()) * u64::from(self.pixels.height())).max(1);
        (sum / (255.0 * count as f64)).clamp(0.0, 1.0) as f32
    }
}

/// Row-major, one-pass iterator over the `tile_size`-square tiles of an image.
///
/// Rows and columns that do not fill a whole tile are dropped.
pub struct SubImages<'a> {
    image: &'a PaddedImage,
    tile_size: u32,
    cols: u32,
    rows: u32,
    next: u32,
}

impl<'a> SubImages<'a> {
    /// # Panics
    /// Panics if `tile_size` is zero.
    pub fn new(image: &'a PaddedImage, tile_size: u32) -> Self {
        assert!(tile_size > 0, "tile size must be positive");
        let cols = image.width() / tile_size;
        let rows = image.height() / tile_size;
        Self { image, tile_size, cols, rows, next: 0 }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    fn total(&self) -> u32 {
        self.cols * self.rows
    }
}

impl Iterator for SubImages<'_> {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        if self.next >= self.total() {
            return None;
        }
        let (row, col) = (self.next / self.cols, self.next % self.cols);
        self.next += 1;

        let s = self.tile_size;
        let pixels = imageops::crop_imm(self.image.as_rgb(), col * s, row * s, s, s).to_image();
        Some(Tile { pixels })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.total() - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for SubImages<'_> {}
impl FusedIterator for SubImages<'_> {}
