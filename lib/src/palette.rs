//! Distinct colour extraction and per-tile palettes

use image::{Rgb, RgbImage};

/// Collect the distinct colours of a region in ascending lexicographic order
///
/// Channels are compared most significant first (`[r, g, b]`), so the order
/// depends only on the pixel values and never on their position.
pub fn distinct_colors(region: &RgbImage) -> Vec<Rgb<u8>> {
    let mut colors: Vec<Rgb<u8>> = region.pixels().copied().collect();
    // Adjacent runs are common in flat areas; drop them before sorting
    colors.dedup();
    colors.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    colors.dedup();
    colors
}

/// Palette for one tile: its greatest-valued distinct colours, at most `cap`
///
/// Colours are taken in descending lexicographic order. This ranks by value,
/// not by how often a colour occurs in the tile.
pub fn tile_palette(tile: &RgbImage, cap: usize) -> Vec<Rgb<u8>> {
    let mut colors = distinct_colors(tile);
    colors.reverse();
    colors.truncate(cap);
    colors
}
