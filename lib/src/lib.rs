//! Asciify - image to glyph mosaic engine
//!
//! Every tile of the input is replaced by the character, background colour
//! and foreground colour that best approximate it under a center-weighted
//! perceptual (Lab) distance. Colours are taken from the tile itself, so the
//! result keeps the look of the original at glyph resolution.
//!
//! # Example
//! ```no_run
//! use asciify::{asciify_image, AsciifyConfig, NoProgress};
//!
//! let input = image::open("photo.png").unwrap();
//! let config = AsciifyConfig {
//!     cell_size: 12,
//!     charset: "01#".to_string(),
//!     ..Default::default()
//! };
//! let output = asciify_image(&input, &config, &mut NoProgress).unwrap();
//! output.save("asciified.png").unwrap();
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod glyph;
pub mod matcher;
pub mod palette;
pub mod processor;

// Re-export main types for convenience
pub use config::AsciifyConfig;
pub use error::AsciifyError;
pub use processor::{
    MosaicReport, NoProgress, Progress, asciify, asciify_image, asciify_region, assemble_mosaic,
};
