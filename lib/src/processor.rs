use crate::config::AsciifyConfig;
use crate::error::AsciifyError;
use crate::glyph::GlyphAtlas;
use crate::matcher::match_tile;
use crate::palette::tile_palette;
use image::{
    DynamicImage, GrayAlphaImage, GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage, imageops,
};
use imageproc::rect::Rect;

/// Receives row-level progress from the mosaic assembler
///
/// `update` is called once per completed tile row with a non-decreasing
/// fraction in `[0, 1)`. `is_cancelled` is polled before each row; a tile
/// row is never interrupted.
pub trait Progress {
    fn update(&mut self, fraction: f64);

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Progress sink that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _fraction: f64) {}
}

impl<F: FnMut(f64)> Progress for F {
    fn update(&mut self, fraction: f64) {
        self(fraction)
    }
}

/// Counters collected while assembling a mosaic
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MosaicReport {
    /// Tiles processed
    pub tiles: usize,
    /// Tiles left unchanged for lack of colours
    pub passed_through: usize,
    /// Tiles whose search stopped on an exact match
    pub exact: usize,
    /// Candidates scored over all tiles
    pub candidates: usize,
}

/// Pad an image on the right and bottom to multiples of `cell_size`
///
/// Border pixels are replicated into the padding.
///
/// # Arguments
/// * `input` - The image to pad
/// * `cell_size` - Grid step, at least 1
///
/// # Returns
/// A tuple of (padded_image, was_padded) where was_padded indicates if padding occurred
pub fn pad_to_multiple(input: &RgbImage, cell_size: u32) -> (RgbImage, bool) {
    let (width, height) = input.dimensions();

    let target_width = width + (cell_size - width % cell_size) % cell_size;
    let target_height = height + (cell_size - height % cell_size) % cell_size;

    if width == target_width && height == target_height {
        return (input.clone(), false);
    }

    let padded = RgbImage::from_fn(target_width, target_height, |x, y| {
        *input.get_pixel(x.min(width - 1), y.min(height - 1))
    });
    (padded, true)
}

/// Replaces every tile of an image with its best glyph rendering
///
/// Pipeline:
/// 1. Pad to a multiple of the cell size by edge replication
/// 2. Rasterize the character set once
/// 3. For each tile, row by row: build its palette, match, write back
/// 4. Crop back to the input size unless `keep_padding` is set
///
/// Tiles are processed strictly in row-major order on the calling thread.
///
/// # Arguments
/// * `source` - The image to convert
/// * `config` - Configuration; it is normalized before use
/// * `progress` - Row-level progress and cancellation
///
/// # Returns
/// The converted image and the counters for the run
///
/// # Errors
/// [`AsciifyError::Cancelled`] if `progress` asked to stop between rows.
pub fn assemble_mosaic(
    source: &RgbImage,
    config: &AsciifyConfig,
    progress: &mut impl Progress,
) -> Result<(RgbImage, MosaicReport), AsciifyError> {
    let config = config.normalized();
    let cell = config.cell_size;
    let mut report = MosaicReport::default();

    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Ok((source.clone(), report));
    }

    let (padded, was_padded) = pad_to_multiple(source, cell);
    let (padded_width, padded_height) = padded.dimensions();
    if was_padded {
        log::debug!(
            "padded {}x{} to {}x{}",
            width,
            height,
            padded_width,
            padded_height
        );
    }

    let step_x = padded_width / cell;
    let step_y = padded_height / cell;
    if step_x == 0 || step_y == 0 {
        return Ok((source.clone(), report));
    }

    let atlas = GlyphAtlas::new(&config.characters(), cell, config.font_scale());
    let cap = config.palette_cap();
    let mut canvas = padded.clone();

    for gy in 0..step_y {
        if progress.is_cancelled() {
            log::debug!("cancelled before tile row {}", gy);
            return Err(AsciifyError::Cancelled);
        }

        for gx in 0..step_x {
            let x = gx * cell;
            let y = gy * cell;

            let tile = imageops::crop_imm(&padded, x, y, cell, cell).to_image();
            let palette = tile_palette(&tile, cap);
            let result = match_tile(&tile, &atlas, &palette, cap)?;

            log::trace!(
                "tile ({}, {}): {:?} distance {} after {} candidates",
                gx,
                gy,
                result.candidate,
                result.distance,
                result.scored
            );

            report.tiles += 1;
            report.candidates += result.scored;
            if result.candidate.is_none() {
                report.passed_through += 1;
            }
            if result.exact {
                report.exact += 1;
            }

            imageops::replace(&mut canvas, &result.image, i64::from(x), i64::from(y));
        }

        progress.update(f64::from(gy) / f64::from(step_y));
    }

    if !config.keep_padding && was_padded {
        canvas = imageops::crop_imm(&canvas, 0, 0, width, height).to_image();
    }

    Ok((canvas, report))
}

/// Converts an RGB image into a glyph mosaic of the same size
///
/// The configuration is normalized (clamped), validated, and the request is
/// checked against `size_limit` before any pixel work starts.
///
/// # Errors
/// [`AsciifyError::OversizeRequest`] when the estimated cost is too high,
/// [`AsciifyError::InvalidConfig`] for an unusable configuration and
/// [`AsciifyError::Cancelled`] if the progress sink stopped the run.
pub fn asciify(
    input: &RgbImage,
    config: &AsciifyConfig,
    progress: &mut impl Progress,
) -> Result<RgbImage, AsciifyError> {
    let config = config.normalized();
    config.validate()?;

    let (width, height) = input.dimensions();
    config.admit(width, height)?;

    let (output, report) = assemble_mosaic(input, &config, progress)?;
    log::info!(
        "asciified {}x{}: {} tiles, {} unchanged, {} exact, {} candidates scored",
        width,
        height,
        report.tiles,
        report.passed_through,
        report.exact,
        report.candidates
    );

    Ok(output)
}

/// Converts an image of any supported colour model
///
/// RGB is processed directly. Gray images are expanded to RGB and collapsed
/// back afterwards. Alpha is set aside and re-attached unchanged.
///
/// # Errors
/// [`AsciifyError::UnsupportedColorModel`] for anything other than 8-bit
/// RGB, RGBA, gray or gray-alpha, plus everything [`asciify`] returns.
pub fn asciify_image(
    input: &DynamicImage,
    config: &AsciifyConfig,
    progress: &mut impl Progress,
) -> Result<DynamicImage, AsciifyError> {
    match input {
        DynamicImage::ImageRgb8(img) => Ok(DynamicImage::ImageRgb8(asciify(img, config, progress)?)),
        DynamicImage::ImageRgba8(img) => {
            let rgb = RgbImage::from_fn(img.width(), img.height(), |x, y| {
                let p = img.get_pixel(x, y);
                Rgb([p[0], p[1], p[2]])
            });
            let out = asciify(&rgb, config, progress)?;
            let merged = RgbaImage::from_fn(out.width(), out.height(), |x, y| {
                let p = out.get_pixel(x, y);
                let alpha = img.get_pixel(x.min(img.width() - 1), y.min(img.height() - 1))[3];
                Rgba([p[0], p[1], p[2], alpha])
            });
            Ok(DynamicImage::ImageRgba8(merged))
        }
        DynamicImage::ImageLuma8(img) => {
            let rgb = RgbImage::from_fn(img.width(), img.height(), |x, y| {
                let v = img.get_pixel(x, y)[0];
                Rgb([v, v, v])
            });
            let out = asciify(&rgb, config, progress)?;
            let gray = GrayImage::from_fn(out.width(), out.height(), |x, y| {
                Luma([out.get_pixel(x, y)[0]])
            });
            Ok(DynamicImage::ImageLuma8(gray))
        }
        DynamicImage::ImageLumaA8(img) => {
            let rgb = RgbImage::from_fn(img.width(), img.height(), |x, y| {
                let v = img.get_pixel(x, y)[0];
                Rgb([v, v, v])
            });
            let out = asciify(&rgb, config, progress)?;
            let merged = GrayAlphaImage::from_fn(out.width(), out.height(), |x, y| {
                let alpha = img.get_pixel(x.min(img.width() - 1), y.min(img.height() - 1))[1];
                LumaA([out.get_pixel(x, y)[0], alpha])
            });
            Ok(DynamicImage::ImageLumaA8(merged))
        }
        other => Err(AsciifyError::UnsupportedColorModel(format!(
            "{:?}",
            other.color()
        ))),
    }
}

/// Converts a rectangular selection of a canvas in place
///
/// The selection is clipped to the canvas, read once, converted and written
/// back once. On error the canvas is left untouched. Padding is never kept
/// here, since the result has to fit back into the selection.
///
/// # Errors
/// [`AsciifyError::EmptySelection`] if the selection misses the canvas,
/// plus everything [`asciify_image`] returns.
pub fn asciify_region(
    canvas: &mut DynamicImage,
    selection: Rect,
    config: &AsciifyConfig,
    progress: &mut impl Progress,
) -> Result<(), AsciifyError> {
    if canvas.width() == 0 || canvas.height() == 0 {
        return Err(AsciifyError::EmptySelection);
    }
    let bounds = Rect::at(0, 0).of_size(canvas.width(), canvas.height());
    let clip = selection
        .intersect(bounds)
        .ok_or(AsciifyError::EmptySelection)?;

    let config = AsciifyConfig {
        keep_padding: false,
        ..config.normalized()
    };
    config.validate()?;
    config.admit(clip.width(), clip.height())?;

    let (left, top) = (clip.left() as u32, clip.top() as u32);
    let region = canvas.crop_imm(left, top, clip.width(), clip.height());
    let output = asciify_image(&region, &config, progress)?;

    imageops::replace(canvas, &output, i64::from(left), i64::from(top));
    Ok(())
}
