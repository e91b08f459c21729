use anyhow::{Context, Result};
use asciify::{AsciifyConfig, Progress, asciify_image, asciify_region};
use image::{DynamicImage, ImageReader};
use imageproc::rect::Rect;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Global flag for handling Ctrl+C
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Set up the Ctrl+C handler.
///
/// A running job stops at the next tile row boundary.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
        eprintln!("\nReceived Ctrl+C, stopping after the current row...");
    })
}

/// Reports row progress through the logger and honours Ctrl+C
struct LogProgress<'a> {
    cancel: &'a AtomicBool,
    last_percent: Option<u32>,
}

impl Progress for LogProgress<'_> {
    fn update(&mut self, fraction: f64) {
        // Log in 10% steps so large images don't flood the output
        let percent = (fraction * 10.0).floor() as u32 * 10;
        if self.last_percent != Some(percent) {
            log::info!("{:>3}%", percent);
            self.last_percent = Some(percent);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

/// Command-line host: loads the canvas, runs the engine, writes the result
pub struct AsciifyApp {
    /// Engine configuration
    config: AsciifyConfig,
    /// Optional selection; the whole image when `None`
    region: Option<Rect>,
}

impl AsciifyApp {
    pub fn new(config: AsciifyConfig, region: Option<Rect>) -> Self {
        Self { config, region }
    }

    /// Load an image from file path
    pub fn load_image(path: &Path) -> Result<DynamicImage> {
        ImageReader::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?
            .decode()
            .with_context(|| format!("failed to decode {}", path.display()))
    }

    /// Save the output image to file
    pub fn save_output(image: &DynamicImage, path: &Path) -> Result<()> {
        image
            .save(path)
            .with_context(|| format!("failed to save {}", path.display()))
    }

    /// Run the engine over the loaded canvas
    ///
    /// On error the canvas is left as it was.
    pub fn process(&self, canvas: &mut DynamicImage, cancel: &AtomicBool) -> Result<()> {
        let mut progress = LogProgress {
            cancel,
            last_percent: None,
        };

        match self.region {
            Some(selection) => {
                asciify_region(canvas, selection, &self.config, &mut progress)?;
            }
            None => {
                *canvas = asciify_image(canvas, &self.config, &mut progress)?;
            }
        }
        Ok(())
    }

    pub fn run(&self, input: &Path, output: &Path) -> Result<()> {
        let mut canvas = Self::load_image(input)?;
        log::info!(
            "Loaded {} ({}x{}, {:?})",
            input.display(),
            canvas.width(),
            canvas.height(),
            canvas.color()
        );

        let start = Instant::now();
        self.process(&mut canvas, &CTRLC_RECEIVED)
            .context("asciify failed, output not written")?;
        log::info!(
            "Processed in {:.1} ms",
            start.elapsed().as_secs_f64() * 1000.0
        );

        Self::save_output(&canvas, output)?;
        log::info!("Saved {}", output.display());
        Ok(())
    }
}
