//! Glyph rasterization
//!
//! Characters come from the public-domain 8x8 bitmap font shipped by the
//! `font8x8` crate. A glyph is scaled to the nominal size implied by the
//! font scale, then centered in the cell on its measured ink bounding box.

use font8x8::{BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{GrayImage, Luma, Rgb, RgbImage};
use rayon::prelude::*;

/// Side of the source bitmaps, in pixels
const FONT_BITMAP_SIZE: u32 = 8;

/// Nominal glyph height at font scale 1.0
const GLYPH_EM: f64 = 12.0;

const INK: u8 = 255;

/// Look up the 8x8 bitmap for a character
///
/// Each byte is one row, top to bottom; bit 0 is the leftmost pixel.
/// Returns `None` for characters the font does not cover.
pub fn glyph_bitmap(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| BOX_FONTS.get(ch))
        .or_else(|| BLOCK_FONTS.get(ch))
}

/// Nominal glyph box side for a font scale, at least one pixel
pub fn glyph_extent(font_scale: f64) -> u32 {
    ((GLYPH_EM * font_scale).round() as u32).max(1)
}

/// Bounding box of the inked pixels of a mask, as `(x0, y0, x1, y1)` inclusive
pub fn ink_bounds(mask: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in mask.enumerate_pixels() {
        if p[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

/// Ink coverage of one character in a `cell_size` x `cell_size` cell
///
/// Inked pixels are 255, background pixels 0.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    ch: char,
    mask: GrayImage,
}

impl GlyphMask {
    /// Rasterize `ch` centered in a cell
    ///
    /// Characters without a bitmap, and whitespace, produce an empty mask.
    pub fn render(ch: char, cell_size: u32, font_scale: f64) -> Self {
        let mut mask = GrayImage::new(cell_size, cell_size);

        let Some(bitmap) = glyph_bitmap(ch) else {
            return Self { ch, mask };
        };

        // Nearest-neighbour scale the bitmap to the nominal extent
        let extent = glyph_extent(font_scale);
        let scaled = GrayImage::from_fn(extent, extent, |x, y| {
            // Sample at the center of each target pixel
            let src_x = (2 * x + 1) * FONT_BITMAP_SIZE / (2 * extent);
            let src_y = (2 * y + 1) * FONT_BITMAP_SIZE / (2 * extent);
            if bitmap[src_y as usize] & (1 << src_x) != 0 {
                Luma([INK])
            } else {
                Luma([0])
            }
        });

        let Some((x0, y0, x1, y1)) = ink_bounds(&scaled) else {
            return Self { ch, mask };
        };

        // Place the ink box so that it is centered on the cell
        let ink_w = (x1 - x0 + 1) as i64;
        let ink_h = (y1 - y0 + 1) as i64;
        let offset_x = (cell_size as i64 - ink_w) / 2 - x0 as i64;
        let offset_y = (cell_size as i64 - ink_h) / 2 - y0 as i64;

        for (x, y, p) in scaled.enumerate_pixels() {
            if p[0] == 0 {
                continue;
            }
            let dst_x = x as i64 + offset_x;
            let dst_y = y as i64 + offset_y;
            if (0..cell_size as i64).contains(&dst_x) && (0..cell_size as i64).contains(&dst_y) {
                mask.put_pixel(dst_x as u32, dst_y as u32, Luma([INK]));
            }
        }

        Self { ch, mask }
    }

    pub fn ch(&self) -> char {
        self.ch
    }

    pub fn cell_size(&self) -> u32 {
        self.mask.width()
    }

    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }

    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.mask.get_pixel(x, y)[0] != 0
    }

    /// Same as [`render_glyph`], reusing this mask
    pub fn to_rgb(&self, foreground: Rgb<u8>, background: Rgb<u8>) -> RgbImage {
        let size = self.cell_size();
        RgbImage::from_fn(size, size, |x, y| {
            if self.is_ink(x, y) { foreground } else { background }
        })
    }
}

/// Render a character as an RGB cell
///
/// # Arguments
/// * `ch` - Character to draw
/// * `cell_size` - Cell edge in pixels
/// * `font_scale` - Font scale (see [`crate::AsciifyConfig::font_scale`])
/// * `foreground` - Ink colour
/// * `background` - Fill colour
///
/// # Returns
/// A `cell_size` x `cell_size` image; blank (background only) if the
/// character has no glyph
pub fn render_glyph(
    ch: char,
    cell_size: u32,
    font_scale: f64,
    foreground: Rgb<u8>,
    background: Rgb<u8>,
) -> RgbImage {
    GlyphMask::render(ch, cell_size, font_scale).to_rgb(foreground, background)
}

/// Masks for every character of a character set, in charset order
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    glyphs: Vec<GlyphMask>,
}

impl GlyphAtlas {
    /// Rasterize all characters once for a job
    pub fn new(chars: &[char], cell_size: u32, font_scale: f64) -> Self {
        // Order is preserved by collect, so search priority is unchanged
        let glyphs = chars
            .par_iter()
            .map(|&ch| GlyphMask::render(ch, cell_size, font_scale))
            .collect();
        Self { glyphs }
    }

    pub fn glyphs(&self) -> &[GlyphMask] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
