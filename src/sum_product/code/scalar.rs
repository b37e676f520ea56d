//! Sequential accumulate-in-a-loop kernel.
//!
//! Besides being a variant on its own, [`accumulate`] is the remainder tail
//! of every lane strategy and the default per-chunk body of the partitioner.

use super::error::{check_lengths, SumProductError};

/// Sum of `a[i] * b[i]` over the whole input.
///
/// # Errors
/// Returns [`SumProductError::LengthMismatch`] if the inputs differ in length.
///
/// # Example
/// ```
/// use sum_product::sum_product::scalar_sum;
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 5.0, 6.0];
/// assert_eq!(scalar_sum(&a, &b).unwrap(), 32.0);
/// ```
pub fn scalar_sum(a: &[f64], b: &[f64]) -> Result<f64, SumProductError> {
    check_lengths(a, b)?;
    Ok(accumulate(a, b))
}

/// Sum of `a[i] * b[i]` for `i` in `start..end`.
///
/// # Errors
/// Returns [`SumProductError::LengthMismatch`] if the inputs differ in length,
/// or [`SumProductError::InvalidRange`] if `start > end` or `end > a.len()`.
pub fn scalar_sum_range(
    a: &[f64],
    b: &[f64],
    start: usize,
    end: usize,
) -> Result<f64, SumProductError> {
    check_lengths(a, b)?;
    if start > end || end > a.len() {
        return Err(SumProductError::InvalidRange {
            start,
            end,
            len: a.len(),
        });
    }
    Ok(accumulate(&a[start..end], &b[start..end]))
}

/// Single running accumulator, strictly increasing index order.
///
/// Callers guarantee equal lengths; a shorter `b` would silently truncate.
#[inline]
pub(crate) fn accumulate(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut acc = 0.0;
    for (x, y) in a.iter().zip(b) {
        acc += x * y;
    }
    acc
}
