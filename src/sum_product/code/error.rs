//! Error taxonomy shared by every kernel.

use thiserror::Error;

/// Errors raised at kernel entry, before any work is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SumProductError {
    #[error("length mismatch: left input has {left} elements, right input has {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("invalid degree {0}: at least one worker is required")]
    InvalidDegree(usize),

    #[error("invalid lane width {0}: supported widths are 2 and 4")]
    InvalidWidth(usize),

    #[error("range {start}..{end} is not within 0..{len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("unsupported operation: {feature} is not available on this processor")]
    Unsupported { feature: &'static str },
}

/// Fail fast when the two inputs differ in length.
pub fn check_lengths(a: &[f64], b: &[f64]) -> Result<(), SumProductError> {
    if a.len() != b.len() {
        return Err(SumProductError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}
