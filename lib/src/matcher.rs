use crate::color::{Lab8, LabImage, lab8_distance, rgb_to_lab8, weighted_distance};
use crate::error::AsciifyError;
use crate::glyph::{GlyphAtlas, GlyphMask};
use image::{Rgb, RgbImage};

/// One (character, background, foreground) combination
///
/// Colour indices point into the tile palette, with `background < foreground`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub ch: char,
    pub background: usize,
    pub foreground: usize,
}

/// Outcome of matching a single tile
#[derive(Debug, Clone)]
pub struct TileMatch {
    /// Pixels to write back for this tile
    pub image: RgbImage,
    /// Winning candidate, `None` when the tile was passed through
    pub candidate: Option<Candidate>,
    /// Distance of the winner (0 for pass-through tiles)
    pub distance: u64,
    /// Number of candidates scored
    pub scored: usize,
    /// Whether the search stopped on an exact match
    pub exact: bool,
}

impl TileMatch {
    fn passthrough(tile: &RgbImage) -> Self {
        Self {
            image: tile.clone(),
            candidate: None,
            distance: 0,
            scored: 0,
            exact: false,
        }
    }
}

/// Distance between a tile and a glyph drawn in the given Lab colours
///
/// Equivalent to rendering the candidate and comparing it with
/// [`crate::color::perceptual_distance`], without building the RGB cell.
pub fn score_candidate(
    tile: &LabImage,
    glyph: &GlyphMask,
    foreground: Lab8,
    background: Lab8,
) -> u64 {
    let (width, height) = tile.dimensions();
    weighted_distance(width, height, |x, y| {
        let rendered = if glyph.is_ink(x, y) { foreground } else { background };
        lab8_distance(tile.get(x, y), rendered)
    })
}

/// Find the candidate that best approximates a tile
///
/// Candidates are visited character by character (atlas order), then by
/// background index, then by foreground index above it. The first strictly
/// smaller distance wins, so earlier candidates win ties. A distance of 0
/// ends the search immediately.
///
/// # Arguments
/// * `tile` - Square tile whose side matches the atlas cell size
/// * `atlas` - Pre-rendered glyph masks, in search order
/// * `palette` - Tile palette (see [`crate::palette::tile_palette`])
/// * `cap` - Maximum number of palette entries to use
///
/// # Returns
/// The winning rendering, or the tile itself when fewer than two colours
/// are usable
///
/// # Errors
/// [`AsciifyError::DimensionMismatch`] if the tile is not cell sized.
pub fn match_tile(
    tile: &RgbImage,
    atlas: &GlyphAtlas,
    palette: &[Rgb<u8>],
    cap: usize,
) -> Result<TileMatch, AsciifyError> {
    let n_colors = palette.len().min(cap);
    if n_colors < 2 || atlas.is_empty() {
        return Ok(TileMatch::passthrough(tile));
    }

    let cell = atlas.glyphs()[0].cell_size();
    if tile.dimensions() != (cell, cell) {
        return Err(AsciifyError::DimensionMismatch {
            left: tile.dimensions(),
            right: (cell, cell),
        });
    }

    let tile_lab = LabImage::from_rgb(tile);
    let palette_lab: Vec<Lab8> = palette[..n_colors].iter().map(|c| rgb_to_lab8(*c)).collect();

    let mut best: Option<(usize, Candidate, u64)> = None;
    let mut scored = 0;
    let mut exact = false;

    'search: for (glyph_idx, glyph) in atlas.glyphs().iter().enumerate() {
        for bg in 0..n_colors {
            for fg in (bg + 1)..n_colors {
                let distance = score_candidate(&tile_lab, glyph, palette_lab[fg], palette_lab[bg]);
                scored += 1;

                if best.is_none_or(|(_, _, d)| distance < d) {
                    let candidate = Candidate {
                        ch: glyph.ch(),
                        background: bg,
                        foreground: fg,
                    };
                    best = Some((glyph_idx, candidate, distance));
                }

                if distance == 0 {
                    exact = true;
                    break 'search;
                }
            }
        }
    }

    let Some((glyph_idx, candidate, distance)) = best else {
        return Ok(TileMatch::passthrough(tile));
    };

    let image = atlas.glyphs()[glyph_idx].to_rgb(
        palette[candidate.foreground],
        palette[candidate.background],
    );

    Ok(TileMatch {
        image,
        candidate: Some(candidate),
        distance,
        scored,
        exact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::perceptual_distance;
    use crate::glyph::render_glyph;
    use crate::palette::tile_palette;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    fn split_tile(size: u32) -> RgbImage {
        RgbImage::from_fn(size, size, |x, _| if x < size / 2 { BLACK } else { WHITE })
    }

    #[test]
    fn test_single_color_tile_passes_through() {
        let tile = RgbImage::from_pixel(16, 16, BLACK);
        let atlas = GlyphAtlas::new(&['0', '1'], 16, 1.0);
        let palette = tile_palette(&tile, 4);

        let result = match_tile(&tile, &atlas, &palette, 4).unwrap();
        assert_eq!(result.image, tile);
        assert_eq!(result.candidate, None);
        assert_eq!(result.scored, 0);
    }

    #[test]
    fn test_cap_below_two_passes_through() {
        let tile = split_tile(8);
        let atlas = GlyphAtlas::new(&['0'], 8, 0.5);
        let palette = tile_palette(&tile, 1);

        let result = match_tile(&tile, &atlas, &palette, 1).unwrap();
        assert_eq!(result.image, tile);
    }

    #[test]
    fn test_exact_match_stops_search() {
        // The tile is exactly what '1' looks like in red on white
        let tile = render_glyph('1', 16, 1.0, RED, WHITE);
        let atlas = GlyphAtlas::new(&['1', '0', '#'], 16, 1.0);
        let palette = tile_palette(&tile, 4);
        assert_eq!(palette, vec![WHITE, RED]);

        let result = match_tile(&tile, &atlas, &palette, 4).unwrap();
        assert!(result.exact);
        assert_eq!(result.distance, 0);
        assert_eq!(result.scored, 1);
        assert_eq!(result.image, tile);
        assert_eq!(
            result.candidate,
            Some(Candidate {
                ch: '1',
                background: 0,
                foreground: 1,
            })
        );
    }

    #[test]
    fn test_background_takes_greater_color() {
        // Palette is [WHITE, RED]: a blank glyph can only come out white
        let tile = RgbImage::from_pixel(8, 8, RED);
        let mut tile_with_white = tile.clone();
        tile_with_white.put_pixel(0, 0, WHITE);

        let atlas = GlyphAtlas::new(&[' '], 8, 0.5);
        let palette = tile_palette(&tile_with_white, 4);
        let result = match_tile(&tile_with_white, &atlas, &palette, 4).unwrap();

        assert_eq!(result.scored, 1);
        assert!(result.image.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_half_split_is_deterministic() {
        let tile = split_tile(16);
        let atlas = GlyphAtlas::new(&['0', '1'], 16, 1.0);
        let palette = tile_palette(&tile, 4);
        assert_eq!(palette.len(), 2);

        let first = match_tile(&tile, &atlas, &palette, 4).unwrap();
        assert_eq!(first.scored, 2);
        for _ in 0..5 {
            let again = match_tile(&tile, &atlas, &palette, 4).unwrap();
            assert_eq!(again.candidate, first.candidate);
            assert_eq!(again.image, first.image);
        }
    }

    #[test]
    fn test_winner_has_minimum_distance() {
        let tile = RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 32) as u8, (y * 32) as u8, 90]));
        let chars = ['0', '1', '#', '.', '/'];
        let atlas = GlyphAtlas::new(&chars, 8, 0.5);
        let palette = tile_palette(&tile, 3);

        let result = match_tile(&tile, &atlas, &palette, 3).unwrap();
        assert_eq!(result.scored, chars.len() * 3);

        for &ch in &chars {
            for bg in 0..3 {
                for fg in (bg + 1)..3 {
                    let rendered = render_glyph(ch, 8, 0.5, palette[fg], palette[bg]);
                    let d = perceptual_distance(&tile, &rendered).unwrap();
                    assert!(result.distance <= d);
                }
            }
        }
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        // Two blank glyphs score identically; the first one must win
        let tile = split_tile(8);
        let atlas = GlyphAtlas::new(&[' ', '\u{10FFFF}'], 8, 0.5);
        let palette = tile_palette(&tile, 4);

        let result = match_tile(&tile, &atlas, &palette, 4).unwrap();
        assert_eq!(result.candidate.map(|c| c.ch), Some(' '));
    }

    #[test]
    fn test_score_matches_rendered_distance() {
        let tile = split_tile(12);
        let glyph = GlyphMask::render('0', 12, 0.75);
        let score = score_candidate(
            &LabImage::from_rgb(&tile),
            &glyph,
            rgb_to_lab8(RED),
            rgb_to_lab8(BLACK),
        );
        let rendered = glyph.to_rgb(RED, BLACK);
        assert_eq!(score, perceptual_distance(&tile, &rendered).unwrap());
    }

    #[test]
    fn test_wrong_tile_size_rejected() {
        let tile = split_tile(8);
        let atlas = GlyphAtlas::new(&['0'], 16, 1.0);
        let palette = tile_palette(&tile, 4);
        assert!(matches!(
            match_tile(&tile, &atlas, &palette, 4),
            Err(AsciifyError::DimensionMismatch { .. })
        ));
    }
}
