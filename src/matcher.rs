//! Brightness matcher - picks, per tile, the character whose ink density best
//! matches the tile's darkness.

use crate::{AsciiArtError, CharSet, DensityCache, GlyphRasterizer, PaddedImage, Result, SubImages};
use crate::{density::NormalizedDensities, Tile};
use std::fmt;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Row-major character grid produced by one matching pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    rows: usize,
    cols: usize,
    cells: Vec<char>,
}

impl CharGrid {
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<char>) -> Self {
        assert_eq!(cells.len(), rows * cols, "cell count must be rows * cols");
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> char {
        self.cells[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[char] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Each row as a string
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.rows).map(|r| self.row(r).iter().collect())
    }
}

impl fmt::Display for CharGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Maps image tiles to characters by comparing tile darkness with glyph
/// ink density.
///
/// Density is treated as darkness: a tile is matched against
/// `1 - luminance`, so white areas get the sparsest candidate and black
/// areas the densest.
pub struct BrightnessMatcher<R> {
    rasterizer: R,
    cache: DensityCache,
}

impl<R: GlyphRasterizer> BrightnessMatcher<R> {
    pub fn new(rasterizer: R) -> Self {
        Self { rasterizer, cache: DensityCache::new() }
    }

    /// Use a pre-filled (or shared-history) density cache
    pub fn with_cache(mut self, cache: DensityCache) -> Self {
        self.cache = cache;
        self
    }

    /// Measure glyphs at `resolution` pixels square; drops cached densities
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.cache = DensityCache::with_resolution(resolution);
        self
    }

    pub fn cache(&self) -> &DensityCache {
        &self.cache
    }

    pub fn into_cache(self) -> DensityCache {
        self.cache
    }

    /// Choose a character for every tile of `image` split into `columns`
    /// tiles per row.
    ///
    /// Tile side is `width / columns`, so `columns` must divide the width;
    /// rows that do not fill a whole tile are dropped.
    pub fn choose_chars(
        &mut self,
        image: &PaddedImage,
        columns: u32,
        chars: &CharSet,
    ) -> Result<CharGrid> {
        if chars.is_empty() {
            return Err(AsciiArtError::EmptyCharSet);
        }
        let width = image.width();
        if columns == 0 || width % columns != 0 {
            return Err(AsciiArtError::InvalidColumns { columns, width });
        }

        self.cache.fill(chars, &self.rasterizer)?;
        let densities = self.cache.normalized(chars)?;

        let tiles = SubImages::new(image, width / columns);
        let (rows, cols) = (tiles.rows() as usize, tiles.cols() as usize);
        let tiles: Vec<Tile> = tiles.collect();
        let cells = match_tiles(&tiles, &densities);

        log::debug!("matched {rows}x{cols} grid against {} chars", chars.len());
        Ok(CharGrid::from_cells(rows, cols, cells))
    }
}

fn pick(tile: &Tile, densities: &NormalizedDensities) -> char {
    densities.nearest(1.0 - tile.luminance())
}

#[cfg(not(target_arch = "wasm32"))]
fn match_tiles(tiles: &[Tile], densities: &NormalizedDensities) -> Vec<char> {
    tiles.par_iter().map(|tile| pick(tile, densities)).collect()
}

#[cfg(target_arch = "wasm32")]
fn match_tiles(tiles: &[Tile], densities: &NormalizedDensities) -> Vec<char> {
    tiles.iter().map(|tile| pick(tile, densities)).collect()
}
