use asciify::color::perceptual_distance;
use asciify::glyph::{GlyphAtlas, render_glyph};
use asciify::matcher::match_tile;
use asciify::palette::{distinct_colors, tile_palette};
use asciify::{AsciifyConfig, AsciifyError, NoProgress, asciify, asciify_image, assemble_mosaic};
use image::{DynamicImage, Rgb, RgbImage};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn config_16() -> AsciifyConfig {
    AsciifyConfig {
        cell_size: 16,
        color_budget: 16,
        charset: "01".to_string(),
        ..Default::default()
    }
}

fn noise(width: u32, height: u32, seed: u32) -> RgbImage {
    // Small LCG so the fixture is stable without pulling in a RNG
    let mut state = seed;
    RgbImage::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let v = (state >> 16) as u8;
        Rgb([v & 0xC0, v.rotate_left(2) & 0xC0, v.rotate_left(4) & 0xC0])
    })
}

#[test]
fn all_black_tile_is_unchanged() {
    let img = RgbImage::from_pixel(16, 16, BLACK);
    assert_eq!(distinct_colors(&img).len(), 1);

    let out = asciify(&img, &config_16(), &mut NoProgress).unwrap();
    assert_eq!(out, img);
}

#[test]
fn half_split_tile_is_reproducible() {
    let img = RgbImage::from_fn(16, 16, |x, _| if x < 8 { BLACK } else { WHITE });
    let palette = tile_palette(&img, 4);
    assert_eq!(palette, vec![WHITE, BLACK]);

    let atlas = GlyphAtlas::new(&['0', '1'], 16, 1.0);
    let result = match_tile(&img, &atlas, &palette, 4).unwrap();
    assert_eq!(result.scored, 2);

    let first = asciify(&img, &config_16(), &mut NoProgress).unwrap();
    for _ in 0..3 {
        assert_eq!(asciify(&img, &config_16(), &mut NoProgress).unwrap(), first);
    }
    assert_eq!(first, result.image);
}

#[test]
fn exact_rendering_scores_zero() {
    let tile = render_glyph('1', 16, 1.0, BLACK, WHITE);
    assert_eq!(perceptual_distance(&tile, &tile).unwrap(), 0);

    let out = asciify(&tile, &config_16(), &mut NoProgress).unwrap();
    assert_eq!(out, tile);
}

#[test]
fn oversize_request_leaves_input_untouched() {
    let img = DynamicImage::ImageRgb8(noise(64, 64, 7));
    let config = AsciifyConfig {
        size_limit: 64 * 64 * 16 * 2 - 1,
        ..Default::default()
    };
    let result = asciify_image(&img, &config, &mut NoProgress);
    match result {
        Err(AsciifyError::OversizeRequest { cost, limit }) => {
            assert_eq!(cost, 64 * 64 * 16 * 2);
            assert_eq!(limit, 64 * 64 * 16 * 2 - 1);
        }
        other => panic!("expected OversizeRequest, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn oversized_cell_size_is_clamped() {
    let config = AsciifyConfig {
        cell_size: 20,
        ..config_16()
    };
    let img = noise(40, 24, 3);
    let clamped = asciify(&img, &config, &mut NoProgress).unwrap();
    let direct = asciify(&img, &config_16(), &mut NoProgress).unwrap();
    assert_eq!(clamped, direct);
}

#[test]
fn output_has_input_dimensions() {
    for cell_size in [2, 3, 8, 16] {
        let config = AsciifyConfig {
            cell_size,
            ..Default::default()
        };
        for (w, h) in [(5, 9), (17, 16), (32, 1)] {
            let out = asciify(&noise(w, h, w * h), &config, &mut NoProgress).unwrap();
            assert_eq!(out.dimensions(), (w, h));
        }
    }
}

#[test]
fn padding_round_trip_matches_direct_output() {
    let img = noise(32, 24, 11);
    let direct = AsciifyConfig::default();
    let padded = AsciifyConfig {
        keep_padding: true,
        ..Default::default()
    };

    let (a, _) = assemble_mosaic(&img, &direct, &mut NoProgress).unwrap();
    let (b, _) = assemble_mosaic(&img, &padded, &mut NoProgress).unwrap();
    assert_eq!(b.dimensions(), (32, 24));
    let cropped = image::imageops::crop_imm(&b, 0, 0, 32, 24).to_image();
    assert_eq!(a, cropped);
}

#[test]
fn palette_never_exceeds_budget() {
    let img = noise(16, 16, 5);
    for budget in [4, 9, 16, 50, 128] {
        let cap = (budget as f64).sqrt() as usize;
        let palette = tile_palette(&img, cap);
        assert!(palette.len() <= cap);
        assert!(palette.len() <= distinct_colors(&img).len());
    }
}
