//! Fixed-width vector kernels and their capability check.

use super::error::{check_lengths, SumProductError};
use super::lanes::{self, LaneStrategy};

#[cfg(target_arch = "aarch64")]
use super::aarch64_neon::Neon;
#[cfg(target_arch = "x86_64")]
use super::x86_64_avx::Avx;
#[cfg(target_arch = "x86_64")]
use super::x86_64_sse2::Sse2;

/// Number of f64 lanes in one vector register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LaneWidth {
    /// 128-bit registers.
    Two,
    /// 256-bit registers.
    Four,
}

impl LaneWidth {
    pub const ALL: [LaneWidth; 2] = [LaneWidth::Two, LaneWidth::Four];

    pub fn lanes(self) -> usize {
        match self {
            LaneWidth::Two => 2,
            LaneWidth::Four => 4,
        }
    }

    pub fn register_bits(self) -> usize {
        self.lanes() * 64
    }
}

impl TryFrom<usize> for LaneWidth {
    type Error = SumProductError;

    fn try_from(width: usize) -> Result<Self, Self::Error> {
        match width {
            2 => Ok(LaneWidth::Two),
            4 => Ok(LaneWidth::Four),
            other => Err(SumProductError::InvalidWidth(other)),
        }
    }
}

/// A vector kernel whose instruction set has been confirmed on this CPU.
///
/// The only way to obtain one is [`VectorKernel::detect`], so holding a value
/// is proof that the capability check passed.
#[derive(Clone, Copy)]
pub struct VectorKernel {
    width: LaneWidth,
    feature: &'static str,
    reduce: unsafe fn(&[f64], &[f64]) -> f64,
}

impl VectorKernel {
    /// Pick the strategy for `width` on the current target and check it.
    ///
    /// # Errors
    /// [`SumProductError::Unsupported`] when the target has no such register
    /// width or the executing processor lacks the instruction set. There is no
    /// silent fallback to the scalar path.
    pub fn detect(width: LaneWidth) -> Result<Self, SumProductError> {
        match width {
            LaneWidth::Two => {
                #[cfg(target_arch = "x86_64")]
                {
                    Self::from_strategy::<Sse2>(width)
                }
                #[cfg(target_arch = "aarch64")]
                {
                    Self::from_strategy::<Neon>(width)
                }
                #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
                {
                    Err(SumProductError::Unsupported {
                        feature: "128-bit f64 vectors",
                    })
                }
            }
            LaneWidth::Four => {
                #[cfg(target_arch = "x86_64")]
                {
                    Self::from_strategy::<Avx>(width)
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    Err(SumProductError::Unsupported {
                        feature: "256-bit f64 vectors",
                    })
                }
            }
        }
    }

    #[cfg_attr(
        not(any(target_arch = "x86_64", target_arch = "aarch64")),
        allow(dead_code)
    )]
    fn from_strategy<S: LaneStrategy>(width: LaneWidth) -> Result<Self, SumProductError> {
        debug_assert_eq!(S::WIDTH, width.lanes());

        if !S::is_supported() {
            return Err(SumProductError::Unsupported { feature: S::FEATURE });
        }
        Ok(Self {
            width,
            feature: S::FEATURE,
            reduce: lanes::reduce::<S>,
        })
    }

    pub fn width(&self) -> LaneWidth {
        self.width
    }

    /// Instruction set backing this kernel, e.g. `"avx"`.
    pub fn feature(&self) -> &'static str {
        self.feature
    }

    /// Sum of products over the whole input.
    ///
    /// # Errors
    /// Returns [`SumProductError::LengthMismatch`] if the inputs differ in length.
    pub fn sum(&self, a: &[f64], b: &[f64]) -> Result<f64, SumProductError> {
        check_lengths(a, b)?;
        Ok(self.reduce(a, b))
    }

    /// Same as [`VectorKernel::sum`] for inputs already known to match.
    ///
    /// # Panics
    /// Panics if the slices have different lengths.
    pub(crate) fn reduce(&self, a: &[f64], b: &[f64]) -> f64 {
        // SAFETY: `self` only exists if the strategy's capability check passed.
        unsafe { (self.reduce)(a, b) }
    }
}

impl std::fmt::Debug for VectorKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorKernel")
            .field("width", &self.width)
            .field("feature", &self.feature)
            .finish()
    }
}

/// Compute the sum of products with `width` lanes per register.
///
/// The trailing `n % width` elements go through the scalar kernel.
///
/// # Errors
/// [`SumProductError::Unsupported`] if the CPU lacks the required instruction
/// set, [`SumProductError::LengthMismatch`] if the inputs differ in length.
pub fn vector_sum(a: &[f64], b: &[f64], width: LaneWidth) -> Result<f64, SumProductError> {
    check_lengths(a, b)?;
    Ok(VectorKernel::detect(width)?.reduce(a, b))
}
