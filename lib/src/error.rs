use thiserror::Error;

/// Errors reported by the asciify engine
///
/// None of these are fatal to the host: when one is returned the input is
/// left untouched and the transform is simply not applied.
#[derive(Debug, Error)]
pub enum AsciifyError {
    #[error("unsupported color model: {0}")]
    UnsupportedColorModel(String),

    #[error(
        "selection too big or too many colors: estimated cost {cost} exceeds limit {limit}"
    )]
    OversizeRequest { cost: u64, limit: u64 },

    #[error("region size mismatch: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch { left: (u32, u32), right: (u32, u32) },

    #[error("selection does not intersect the canvas")]
    EmptySelection,

    #[error("cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
