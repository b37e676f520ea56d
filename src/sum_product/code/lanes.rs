//! Lane strategies: the shared shape of every fixed-width kernel.
//!
//! A strategy only knows how to run its strided main loop and how to fold its
//! lanes into one scalar. Remainder handling lives in [`reduce`] so a new
//! width is a new strategy, nothing more.

use super::scalar::accumulate;

/// A fixed-width reduction over `WIDTH` independent lane accumulators.
pub trait LaneStrategy {
    /// Number of lanes, i.e. elements consumed per step.
    const WIDTH: usize;

    /// Instruction set the strategy relies on, used in error messages.
    const FEATURE: &'static str;

    /// Lane accumulators as produced by the main loop.
    type Lanes;

    /// Runtime capability check for the executing processor.
    fn is_supported() -> bool;

    /// Strided multiply-accumulate over the whole of `a` and `b`.
    ///
    /// # Safety
    /// `Self::is_supported()` must have returned `true`, both slices must have
    /// the same length, and that length must be a multiple of `WIDTH`.
    unsafe fn reduce_main(a: &[f64], b: &[f64]) -> Self::Lanes;

    /// Fold the lanes into one scalar in a fixed pairwise order.
    fn horizontal_sum(lanes: Self::Lanes) -> f64;
}

/// Main loop over `floor(n / WIDTH) * WIDTH` elements, then the scalar tail.
///
/// # Safety
/// `S::is_supported()` must have returned `true`.
///
/// # Panics
/// Panics if the slices have different lengths.
pub(crate) unsafe fn reduce<S: LaneStrategy>(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    let main = a.len() - a.len() % S::WIDTH;

    // SAFETY: capability is the caller's contract; lengths are equal and
    // `main` is a multiple of the width.
    let lanes = unsafe { S::reduce_main(&a[..main], &b[..main]) };

    S::horizontal_sum(lanes) + accumulate(&a[main..], &b[main..])
}

/// Four scalar accumulators, no vector instructions.
///
/// Same lane layout and horizontal order as the 256-bit kernel, which makes it
/// the portable multi-lane variant on targets without AVX.
pub struct Unrolled4;

impl LaneStrategy for Unrolled4 {
    const WIDTH: usize = 4;
    const FEATURE: &'static str = "scalar";
    type Lanes = [f64; 4];

    fn is_supported() -> bool {
        true
    }

    unsafe fn reduce_main(a: &[f64], b: &[f64]) -> Self::Lanes {
        let mut lanes = [0.0; 4];
        for (x, y) in a.chunks_exact(4).zip(b.chunks_exact(4)) {
            lanes[0] += x[0] * y[0];
            lanes[1] += x[1] * y[1];
            lanes[2] += x[2] * y[2];
            lanes[3] += x[3] * y[3];
        }
        lanes
    }

    fn horizontal_sum(lanes: Self::Lanes) -> f64 {
        (lanes[0] + lanes[1]) + (lanes[2] + lanes[3])
    }
}

/// Compute the sum of products with [`Unrolled4`]; always available.
pub fn unrolled4_sum(a: &[f64], b: &[f64]) -> Result<f64, super::SumProductError> {
    super::error::check_lengths(a, b)?;
    // SAFETY: Unrolled4 has no capability requirement.
    Ok(unsafe { reduce::<Unrolled4>(a, b) })
}
