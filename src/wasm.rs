//! WebAssembly bindings for ascii-art

use wasm_bindgen::prelude::*;
use image::DynamicImage;
use crate::charset::single_chars;
use crate::{AsciiArtError, BrightnessMatcher, CharSet, DensityCache, GlyphBitmap, GlyphRasterizer, PaddedImage};

/// No font rendering in the browser: every density must be pre-seeded
struct NoGlyphs;

impl GlyphRasterizer for NoGlyphs {
    fn rasterize(&self, ch: char, _resolution: u32) -> crate::Result<GlyphBitmap> {
        Err(AsciiArtError::Font(format!("no density supplied for {ch:?}")))
    }
}

#[wasm_bindgen]
pub struct WasmConverter {
    matcher: BrightnessMatcher<NoGlyphs>,
    chars: CharSet,
}

#[wasm_bindgen]
impl WasmConverter {
    /// Create a converter from precomputed glyph densities
    ///
    /// # Arguments
    /// * `chars` - Characters to match with
    /// * `densities` - Raw ink density in [0, 1] for each entry of `chars`
    #[wasm_bindgen(constructor)]
    pub fn new(chars: Vec<String>, densities: Vec<f32>) -> Result<WasmConverter, JsValue> {
        let chars = single_chars(chars.as_slice()).map_err(|i| {
            JsValue::from_str(&format!("Entry {i} must be exactly one character"))
        })?;

        if chars.len() != densities.len() {
            return Err(JsValue::from_str("Densities length doesn't match chars"));
        }

        let mut cache = DensityCache::new();
        for (&ch, &density) in chars.iter().zip(&densities) {
            cache.insert(ch, density);
        }

        Ok(WasmConverter {
            matcher: BrightnessMatcher::new(NoGlyphs).with_cache(cache),
            chars: chars.into_iter().collect(),
        })
    }

    /// Keep only characters in the inclusive code-point range
    #[wasm_bindgen]
    pub fn restrict(&mut self, first: char, last: char) {
        self.chars = self.chars.iter().filter(|c| (first..=last).contains(c)).collect();
    }

    /// Convert RGBA pixels and return one string per output row
    #[wasm_bindgen]
    pub fn convert(&mut self, image_data: &[u8], width: u32, height: u32, columns: u32) -> Result<js_sys::Array, JsValue> {
        let img = image::RgbaImage::from_raw(width, height, image_data.to_vec())
            .ok_or_else(|| JsValue::from_str("Invalid image dimensions"))?;
        let rgb = DynamicImage::ImageRgba8(img).to_rgb8();

        let grid = PaddedImage::normalize(&rgb)
            .and_then(|padded| self.matcher.choose_chars(&padded, columns, &self.chars))
            .map_err(|e| {
                web_sys::console::warn_1(&e.to_string().into());
                JsValue::from_str(&e.to_string())
            })?;

        let rows = js_sys::Array::new();
        for line in grid.lines() {
            rows.push(&line.into());
        }
        Ok(rows)
    }
}
