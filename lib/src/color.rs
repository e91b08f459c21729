use crate::error::AsciifyError;
use image::{Rgb, RgbImage};
use lab::Lab;

/// An 8-bit encoded CIE L*a*b* sample
///
/// L is scaled from [0, 100] to [0, 255]; a and b are offset by 128.
/// Distances are measured in this encoding.
pub type Lab8 = [u8; 3];

/// Convert an sRGB colour to 8-bit encoded Lab
///
/// # Arguments
/// * `color` - sRGB colour
///
/// # Returns
/// The colour's `[L, a, b]` in the 8-bit encoding
pub fn rgb_to_lab8(color: Rgb<u8>) -> Lab8 {
    let lab = Lab::from_rgb(&color.0);
    [
        quantize(lab.l * 255.0 / 100.0),
        quantize(lab.a + 128.0),
        quantize(lab.b + 128.0),
    ]
}

fn quantize(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Euclidean distance between two encoded Lab samples
pub fn lab8_distance(a: Lab8, b: Lab8) -> f32 {
    let dl = f32::from(a[0]) - f32::from(b[0]);
    let da = f32::from(a[1]) - f32::from(b[1]);
    let db = f32::from(a[2]) - f32::from(b[2]);
    (dl * dl + da * da + db * db).sqrt()
}

/// Squared distance from `(x, y)` to the integer center `(cx, cy)`, never below 1
pub fn center_weight(x: u32, y: u32, cx: u32, cy: u32) -> u64 {
    let dx = u64::from(x.abs_diff(cx));
    let dy = u64::from(y.abs_diff(cy));
    (dx.pow(2) + dy.pow(2)).max(1)
}

/// A region converted to encoded Lab, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabImage {
    width: u32,
    height: u32,
    samples: Vec<Lab8>,
}

impl LabImage {
    /// Convert an RGB region sample by sample
    pub fn from_rgb(img: &RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            samples: img.pixels().map(|p| rgb_to_lab8(*p)).collect(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> Lab8 {
        self.samples[y as usize * self.width as usize + x as usize]
    }

    /// Center-weighted distance to another region of the same size
    ///
    /// See [`weighted_distance`] for the weighting.
    pub fn distance(&self, other: &LabImage) -> Result<u64, AsciifyError> {
        if self.dimensions() != other.dimensions() {
            return Err(AsciifyError::DimensionMismatch {
                left: self.dimensions(),
                right: other.dimensions(),
            });
        }
        Ok(weighted_distance(self.width, self.height, |x, y| {
            lab8_distance(self.get(x, y), other.get(x, y))
        }))
    }
}

/// Accumulate a per-pixel error, weighted down by squared distance from the center
///
/// Each pixel contributes `floor(error / d²)` where `d²` is its squared
/// distance to `(width / 2, height / 2)`, clamped to at least 1. Truncating
/// before summing keeps candidate rankings reproducible.
///
/// # Arguments
/// * `width` - Region width
/// * `height` - Region height
/// * `error` - Non-negative colour error at a pixel
///
/// # Returns
/// The accumulated distance; zero only if every truncated term is zero
pub fn weighted_distance(width: u32, height: u32, error: impl Fn(u32, u32) -> f32) -> u64 {
    let cx = width / 2;
    let cy = height / 2;
    let mut total = 0u64;

    for y in 0..height {
        for x in 0..width {
            let d_sq = center_weight(x, y, cx, cy) as f32;
            total += (error(x, y) / d_sq) as u64;
        }
    }

    total
}

/// Perceptual distance between two equally sized RGB regions
///
/// Both regions are converted to Lab and compared with [`weighted_distance`].
/// A result of 0 means the regions are indistinguishable under the metric.
///
/// # Errors
/// [`AsciifyError::DimensionMismatch`] if the regions differ in size.
pub fn perceptual_distance(a: &RgbImage, b: &RgbImage) -> Result<u64, AsciifyError> {
    if a.dimensions() != b.dimensions() {
        return Err(AsciifyError::DimensionMismatch {
            left: a.dimensions(),
            right: b.dimensions(),
        });
    }
    LabImage::from_rgb(a).distance(&LabImage::from_rgb(b))
}
