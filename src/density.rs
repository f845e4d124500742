//! Character ink densities: a lazily filled cache and per-pass normalization.

use crate::{AsciiArtError, CharSet, GlyphRasterizer, Result};
use std::collections::HashMap;

/// Glyph side length, in pixels, used to measure density
pub const DEFAULT_RESOLUTION: u32 = 16;

/// Normalized value given to every candidate when all densities are equal
const DEGENERATE_DENSITY: f32 = 0.5;

/// Raw glyph densities keyed by character.
///
/// Entries never expire: a density depends only on the character, the font
/// and the resolution, and the latter two are fixed for the cache's lifetime.
/// Filling is check-then-insert, so a cache shared between threads must sit
/// behind a single lock (e.g. `Mutex<DensityCache>`).
#[derive(Debug, Clone)]
pub struct DensityCache {
    resolution: u32,
    densities: HashMap<char, f32>,
}

impl Default for DensityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DensityCache {
    pub fn new() -> Self {
        Self::with_resolution(DEFAULT_RESOLUTION)
    }

    pub fn with_resolution(resolution: u32) -> Self {
        Self { resolution, densities: HashMap::new() }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Record a known raw density, skipping rasterization for `ch`
    pub fn insert(&mut self, ch: char, density: f32) {
        self.densities.insert(ch, density.clamp(0.0, 1.0));
    }

    pub fn get(&self, ch: char) -> Option<f32> {
        self.densities.get(&ch).copied()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.densities.contains_key(&ch)
    }

    pub fn len(&self) -> usize {
        self.densities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }

    /// Rasterize every character of `chars` that has no entry yet.
    pub fn fill<R: GlyphRasterizer>(&mut self, chars: &CharSet, rasterizer: &R) -> Result<()> {
        for ch in chars.iter() {
            if self.contains(ch) {
                continue;
            }
            let density = rasterizer.rasterize(ch, self.resolution)?.density();
            log::debug!("density {ch:?} = {density:.4}");
            self.densities.insert(ch, density);
        }
        Ok(())
    }

    /// Stretch the densities of `chars` linearly onto [0, 1].
    pub fn normalized(&self, chars: &CharSet) -> Result<NormalizedDensities> {
        let raw = chars
            .iter()
            .map(|ch| {
                self.get(ch)
                    .map(|d| (ch, d))
                    .ok_or_else(|| AsciiArtError::Font(format!("no density for {ch:?}")))
            })
            .collect::<Result<Vec<_>>>()?;
        NormalizedDensities::from_raw(raw)
    }
}

/// Densities of one candidate set, rescaled so the sparsest is 0.0 and the
/// densest 1.0. Kept in code-point order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDensities {
    entries: Vec<(char, f32)>,
}

impl NormalizedDensities {
    /// When every density is equal each candidate gets 0.5.
    pub fn from_raw(mut raw: Vec<(char, f32)>) -> Result<Self> {
        if raw.is_empty() {
            return Err(AsciiArtError::EmptyCharSet);
        }
        raw.sort_by_key(|&(ch, _)| ch);
        raw.dedup_by_key(|&mut (ch, _)| ch);

        let min = raw.iter().map(|&(_, d)| d).fold(f32::INFINITY, f32::min);
        let max = raw.iter().map(|&(_, d)| d).fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;

        let entries = raw
            .into_iter()
            .map(|(ch, d)| {
                let n = if range > 0.0 { (d - min) / range } else { DEGENERATE_DENSITY };
                (ch, n)
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn get(&self, ch: char) -> Option<f32> {
        self.entries.iter().find(|&&(c, _)| c == ch).map(|&(_, d)| d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, f32)> + '_ {
        self.entries.iter().copied()
    }

    /// Character whose normalized density is closest to `target`; ties go
    /// to the lowest code point.
    pub fn nearest(&self, target: f32) -> char {
        let mut best = self.entries[0];
        let mut best_diff = (best.1 - target).abs();
        for &(ch, d) in &self.entries[1..] {
            let diff = (d - target).abs();
            if diff < best_diff {
                best = (ch, d);
                best_diff = diff;
            }
        }
        best.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GlyphBitmap;
    use std::cell::Cell;

    /// Inks the first `code % 17` rows, counting calls
    struct RowsRasterizer {
        calls: Cell<usize>,
    }

    impl GlyphRasterizer for RowsRasterizer {
        fn rasterize(&self, ch: char, resolution: u32) -> Result<GlyphBitmap> {
            self.calls.set(self.calls.get() + 1);
            let rows = ch as u32 % 17;
            Ok(GlyphBitmap::from_fn(resolution, |_, y| y < rows))
        }
    }

    fn set(s: &str) -> CharSet {
        s.chars().collect()
    }

    #[test]
    fn fill_rasterizes_each_char_once() {
        let raster = RowsRasterizer { calls: Cell::new(0) };
        let mut cache = DensityCache::new();
        cache.fill(&set("ab"), &raster).unwrap();
        cache.fill(&set("abc"), &raster).unwrap();
        assert_eq!(raster.calls.get(), 3);
        assert_eq!(cache.len(), 3);
        // 'a' = 97, 97 % 17 = 12 rows of 16
        assert_eq!(cache.get('a'), Some(12.0 / 16.0));
    }

    #[test]
    fn seeded_entries_skip_rasterization() {
        let raster = RowsRasterizer { calls: Cell::new(0) };
        let mut cache = DensityCache::new();
        cache.insert('x', 0.3);
        cache.fill(&set("x"), &raster).unwrap();
        assert_eq!(raster.calls.get(), 0);
        assert_eq!(cache.get('x'), Some(0.3));
    }

    #[test]
    fn normalization_stretches_to_unit_range() {
        let n = NormalizedDensities::from_raw(vec![('b', 0.2), ('a', 0.6), ('c', 0.4)]).unwrap();
        assert_eq!(n.get('b'), Some(0.0));
        assert_eq!(n.get('a'), Some(1.0));
        assert!((n.get('c').unwrap() - 0.5).abs() < 1e-6);
        let order: Vec<char> = n.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec!['a', 'b', 'c']);
    }

    #[test]
    fn equal_densities_map_to_half() {
        let n = NormalizedDensities::from_raw(vec![('x', 0.4), ('y', 0.4)]).unwrap();
        assert!(n.iter().all(|(_, d)| d == 0.5));
        assert_eq!(n.nearest(0.0), 'x');
        assert_eq!(n.nearest(1.0), 'x');

        let single = NormalizedDensities::from_raw(vec![('q', 0.9)]).unwrap();
        assert_eq!(single.get('q'), Some(0.5));
    }

    #[test]
    fn nearest_breaks_ties_by_code_point() {
        let n = NormalizedDensities::from_raw(vec![('z', 0.0), ('m', 1.0), ('a', 0.0)]).unwrap();
        assert_eq!(n.nearest(0.1), 'a');
        assert_eq!(n.nearest(0.9), 'm');
        // equidistant between 0.0 and 1.0
        assert_eq!(n.nearest(0.5), 'a');
    }

    #[test]
    fn empty_set_is_an_error() {
        let err = NormalizedDensities::from_raw(Vec::new()).unwrap_err();
        assert!(matches!(err, AsciiArtError::EmptyCharSet));
        let err = DensityCache::new().normalized(&CharSet::new()).unwrap_err();
        assert!(matches!(err, AsciiArtError::EmptyCharSet));
    }

    #[test]
    fn missing_density_is_reported() {
        let err = DensityCache::new().normalized(&set("k")).unwrap_err();
        assert!(matches!(err, AsciiArtError::Font(_)));
    }
}
