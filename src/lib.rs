//! Image to ASCII art converter using glyph brightness matching.

pub mod charset;
pub mod chunk;
pub mod density;
pub mod glyph;
pub mod matcher;
pub mod output;
pub mod padded;
pub mod shell;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use charset::CharSet;
pub use chunk::{SubImages, Tile};
pub use density::{DensityCache, NormalizedDensities};
pub use glyph::{GlyphBitmap, GlyphRasterizer};
pub use matcher::{BrightnessMatcher, CharGrid};
pub use padded::PaddedImage;

#[cfg(not(target_arch = "wasm32"))]
pub use glyph::FontRasterizer;

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsciiArtError {
    #[error("Image error: {0}")]
    Load(#[from] image::ImageError),
    #[error("Image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("Font error: {0}")]
    Font(String),
    #[error("Character set is empty")]
    EmptyCharSet,
    #[error("Invalid column count {columns} for image width {width}")]
    InvalidColumns { columns: u32, width: u32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AsciiArtError>;

/// Decode an image file and pad it to power-of-two dimensions.
pub fn load_and_normalize(path: impl AsRef<Path>) -> Result<PaddedImage> {
    let path = path.as_ref();
    let decoded = image::open(path)?;
    log::info!(
        "loaded {} ({}x{})",
        path.display(),
        decoded.width(),
        decoded.height()
    );
    PaddedImage::normalize(&decoded.to_rgb8())
}
