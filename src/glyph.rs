//! Glyph rasterization into square ink bitmaps.

use crate::Result;

/// Square boolean bitmap of a rendered character, `true` = ink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    resolution: u32,
    ink: Vec<bool>,
}

impl GlyphBitmap {
    pub fn blank(resolution: u32) -> Self {
        Self { resolution, ink: vec![false; (resolution * resolution) as usize] }
    }

    /// Build from a row-major predicate over `(x, y)`
    pub fn from_fn(resolution: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut ink = Vec::with_capacity((resolution * resolution) as usize);
        for y in 0..resolution {
            for x in 0..resolution {
                ink.push(f(x, y));
            }
        }
        Self { resolution, ink }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.ink[(y * self.resolution + x) as usize]
    }

    pub fn ink_count(&self) -> usize {
        self.ink.iter().filter(|&&b| b).count()
    }

    /// Fraction of inked pixels, in [0, 1]
    pub fn density(&self) -> f32 {
        if self.ink.is_empty() {
            return 0.0;
        }
        self.ink_count() as f32 / self.ink.len() as f32
    }
}

/// Renders characters to ink bitmaps.
///
/// Implementations must be deterministic for a given `(ch, resolution)`:
/// results are cached for the lifetime of a [`DensityCache`](crate::DensityCache).
pub trait GlyphRasterizer {
    fn rasterize(&self, ch: char, resolution: u32) -> Result<GlyphBitmap>;
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for &R {
    fn rasterize(&self, ch: char, resolution: u32) -> Result<GlyphBitmap> {
        (**self).rasterize(ch, resolution)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use font::FontRasterizer;

#[cfg(not(target_arch = "wasm32"))]
mod font {
    use super::{GlyphBitmap, GlyphRasterizer};
    use crate::{AsciiArtError, Result};
    use fontdue::{Font, FontSettings};
    use std::path::Path;

    /// Coverage at or above this counts as ink (no anti-aliasing)
    const INK_THRESHOLD: u8 = 128;

    /// Rasterizes glyphs from a TrueType/OpenType font with fontdue.
    pub struct FontRasterizer {
        font: Font,
    }

    impl FontRasterizer {
        pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
            let font = Font::from_bytes(data, FontSettings::default())
                .map_err(|e| AsciiArtError::Font(e.to_string()))?;
            Ok(Self { font })
        }

        pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref();
            let rasterizer = Self::from_bytes(std::fs::read(path)?)?;
            log::info!("loaded font {}", path.display());
            Ok(rasterizer)
        }
    }

    impl GlyphRasterizer for FontRasterizer {
        fn rasterize(&self, ch: char, resolution: u32) -> Result<GlyphBitmap> {
            let size = resolution as i32;
            let font_size = resolution as f32 * 0.875; // ~87.5% to fit with baseline
            let (metrics, coverage) = self.font.rasterize(ch, font_size);

            if metrics.width == 0 || metrics.height == 0 {
                return Ok(GlyphBitmap::blank(resolution));
            }

            // Baseline at ~75% down, centered horizontally
            let baseline_y = (resolution as f32 * 0.75) as i32;
            let y_offset = baseline_y - metrics.height as i32 - metrics.ymin;
            let x_offset = (size - metrics.width as i32) / 2;

            Ok(GlyphBitmap::from_fn(resolution, |x, y| {
                let sx = x as i32 - x_offset;
                let sy = y as i32 - y_offset;
                if sx < 0 || sy < 0 || sx >= metrics.width as i32 || sy >= metrics.height as i32 {
                    return false;
                }
                coverage[sy as usize * metrics.width + sx as usize] >= INK_THRESHOLD
            }))
        }
    }
}
