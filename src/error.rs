//! Error type for phase-image operations.

use thiserror::Error;

/// Result alias used by the library operations.
pub type GpaResult<T> = Result<T, GpaError>;

/// Errors raised by the geometrical phase operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GpaError {
    /// The value supplied as a region of interest cannot select a region.
    #[error("A valid ROI must be provided: {0}")]
    InvalidRoi(String),

    /// `refine_phase` was called while no gradient is stored.
    #[error("Gradient needs to be calculated first.")]
    GradientNotComputed,

    /// The ROI selected no finite samples.
    #[error("ROI selects no finite samples")]
    EmptyRegion,

    /// Image or axis dimensions disagree.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Raw data cannot be interpreted as a phase signal.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl GpaError {
    /// True for usage errors caused by the ROI argument rather than the data.
    pub fn is_roi_error(&self) -> bool {
        matches!(self, GpaError::InvalidRoi(_) | GpaError::EmptyRegion)
    }
}
