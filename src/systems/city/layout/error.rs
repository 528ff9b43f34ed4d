use thiserror::Error;

/// Configuration errors raised while building the city hierarchy.
/// Any of these aborts the whole generation pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("block too small for its own building bounds: size {size} < max width {max_width} or max depth {max_depth}")]
    BlockTooSmall {
        size: f32,
        max_width: f32,
        max_depth: f32,
    },

    #[error("packing budget divisor must be finite and at least 1, got {0}")]
    InvalidBudgetDivisor(f32),

    #[error("city size must be finite and non-negative, got {0}")]
    InvalidCitySize(f32),
}
