//! Image normalization - pads an image to power-of-two dimensions.

use crate::{AsciiArtError, Result};
use image::{imageops, Rgb, RgbImage};

/// Padding colour for the area around the source image
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Smallest power of two >= `n` (1 maps to 1).
pub fn next_power_of_two(n: u32) -> u32 {
    n.max(1).next_power_of_two()
}

/// Largest power of two <= `n` (0 maps to 1).
pub fn prev_power_of_two(n: u32) -> u32 {
    1 << (31 - n.max(1).leading_zeros())
}

/// An RGB image whose width and height are both powers of two.
///
/// Built once by [`PaddedImage::normalize`] and read-only afterwards, so any
/// column count that is itself a power of two (and no larger than the width)
/// splits it into whole square tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedImage {
    pixels: RgbImage,
}

impl PaddedImage {
    /// Center `source` on a white canvas sized to the next power of two in
    /// each dimension. When the padding is odd the extra pixel lands on the
    /// right / bottom edge.
    pub fn normalize(source: &RgbImage) -> Result<Self> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(AsciiArtError::EmptyImage { width, height });
        }

        let (new_w, new_h) = (next_power_of_two(width), next_power_of_two(height));
        let row_pad = (new_h - height) / 2;
        let col_pad = (new_w - width) / 2;

        let mut pixels = RgbImage::from_pixel(new_w, new_h, BACKGROUND);
        imageops::replace(&mut pixels, source, i64::from(col_pad), i64::from(row_pad));

        log::debug!("normalized {width}x{height} -> {new_w}x{new_h}");
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.pixels.get_pixel(x, y)
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }
}
