use crate::error::AsciifyError;

/// Smallest and largest supported cell edge, in pixels
pub const CELL_SIZE_RANGE: (u32, u32) = (2, 16);

/// Smallest and largest supported colour budget
pub const COLOR_BUDGET_RANGE: (u32, u32) = (4, 128);

/// Character set used when the configured one is empty
pub const DEFAULT_CHARSET: &str = "01";

/// Default admission ceiling for `width * height * color_budget * chars`
pub const DEFAULT_SIZE_LIMIT: u64 = 300_000_000;

/// Configuration for a single asciify job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciifyConfig {
    /// Tiling
    pub cell_size: u32,          // 2-16, default 8
    pub color_budget: u32,       // 4-128, default 16

    /// Candidate characters, in search priority order
    pub charset: String,         // default "01"

    /// Admission control
    pub size_limit: u64,         // default 300_000_000

    /// Output
    pub keep_padding: bool,      // default false
}

impl Default for AsciifyConfig {
    fn default() -> Self {
        Self {
            // Tiling
            cell_size: 8,
            color_budget: 16,

            charset: DEFAULT_CHARSET.to_string(),

            size_limit: DEFAULT_SIZE_LIMIT,

            // Output
            keep_padding: false,
        }
    }
}

impl AsciifyConfig {
    /// Returns a copy with every field brought into its supported range
    ///
    /// Out-of-range sizes are clamped rather than rejected. The character set
    /// loses control characters and repeated characters (first occurrence
    /// wins), and falls back to [`DEFAULT_CHARSET`] when nothing is left.
    pub fn normalized(&self) -> Self {
        let cell_size = self.cell_size.clamp(CELL_SIZE_RANGE.0, CELL_SIZE_RANGE.1);
        if cell_size != self.cell_size {
            log::debug!("cell_size {} clamped to {}", self.cell_size, cell_size);
        }

        let color_budget = self
            .color_budget
            .clamp(COLOR_BUDGET_RANGE.0, COLOR_BUDGET_RANGE.1);
        if color_budget != self.color_budget {
            log::debug!("color_budget {} clamped to {}", self.color_budget, color_budget);
        }

        let charset = sanitize_charset(&self.charset);
        if charset != self.charset {
            log::debug!("charset {:?} sanitized to {:?}", self.charset, charset);
        }

        Self {
            cell_size,
            color_budget,
            charset,
            size_limit: self.size_limit,
            keep_padding: self.keep_padding,
        }
    }

    /// Validates the parameters that cannot be recovered by clamping
    pub fn validate(&self) -> Result<(), AsciifyError> {
        if self.size_limit == 0 {
            return Err(AsciifyError::InvalidConfig(
                "size_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Characters of the character set, in search order
    pub fn characters(&self) -> Vec<char> {
        self.charset.chars().collect()
    }

    /// Font scale derived from the cell size (1.0 at a 16 pixel cell)
    ///
    /// The percentage is truncated to an integer before scaling back,
    /// so a 5 pixel cell yields 0.31 rather than 0.3125.
    pub fn font_scale(&self) -> f64 {
        f64::from(self.cell_size * 100 / 16) / 100.0
    }

    /// Maximum number of palette entries considered per tile
    pub fn palette_cap(&self) -> usize {
        (self.color_budget as f64).sqrt().floor() as usize
    }

    /// Estimated cost of processing a `width` x `height` region
    pub fn estimated_cost(&self, width: u32, height: u32) -> u64 {
        u64::from(width)
            .saturating_mul(u64::from(height))
            .saturating_mul(u64::from(self.color_budget))
            .saturating_mul(self.charset.chars().count() as u64)
    }

    /// Rejects a `width` x `height` region whose estimated cost exceeds the ceiling
    pub fn admit(&self, width: u32, height: u32) -> Result<(), AsciifyError> {
        let cost = self.estimated_cost(width, height);
        if cost > self.size_limit {
            log::debug!(
                "rejecting {}x{} region: cost {} exceeds limit {}",
                width,
                height,
                cost,
                self.size_limit
            );
            return Err(AsciifyError::OversizeRequest {
                cost,
                limit: self.size_limit,
            });
        }
        Ok(())
    }
}

fn sanitize_charset(charset: &str) -> String {
    let mut out = String::with_capacity(charset.len());
    for c in charset.chars() {
        if c.is_control() || out.contains(c) {
            continue;
        }
        out.push(c);
    }

    if out.is_empty() {
        DEFAULT_CHARSET.to_string()
    } else {
        out
    }
}
