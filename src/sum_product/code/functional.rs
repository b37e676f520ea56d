//! Declarative pair-multiply-reduce kernel.
//!
//! Correctness baseline rather than a performance target: the iterator
//! pipeline is free to sum in a different order than [`super::scalar_sum`],
//! so results may differ in the last few bits.

use super::error::{check_lengths, SumProductError};

/// Compute the sum of products with a `zip`/`map`/`sum` pipeline.
///
/// # Errors
/// Returns [`SumProductError::LengthMismatch`] if the inputs differ in length.
pub fn functional_sum(a: &[f64], b: &[f64]) -> Result<f64, SumProductError> {
    check_lengths(a, b)?;

    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}
