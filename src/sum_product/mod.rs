//! # Sum of Products
//!
//! Computes `Σ a[i] * b[i]` over two equal-length `f64` sequences with several
//! interchangeable strategies:
//!
//! - **Scalar**: one accumulator, strictly increasing index order
//! - **Functional**: `zip` / `map` / `sum` pipeline, the correctness baseline
//! - **Vector**: 2 or 4 lane accumulators in one SIMD register, horizontal sum,
//!   scalar tail for the last `n % width` elements
//! - **Partitioned**: `degree` contiguous chunks reduced on the rayon pool,
//!   partial results combined in chunk order
//!
//! Floating-point addition is not associative, so strategies agree within a
//! tolerance, not bit for bit.

pub mod code;
pub mod data;
#[cfg(test)]
pub mod test;

pub use code::*;

use std::sync::Arc;

use crate::utils::timer::Variant;

/// Seed of the random verification inputs.
const VERIFY_SEED: u64 = 0x5eed_cafe;

/// Catalogue of the variants runnable on this CPU for a given worker count.
pub struct SumProductRunner {
    degree: usize,
}

impl SumProductRunner {
    /// # Errors
    /// Returns [`SumProductError::InvalidDegree`] if `degree` is zero.
    pub fn new(degree: usize) -> Result<Self, SumProductError> {
        if degree == 0 {
            return Err(SumProductError::InvalidDegree(degree));
        }
        Ok(Self { degree })
    }

    pub fn name(&self) -> &'static str {
        "sum_product"
    }

    pub fn description(&self) -> &'static str {
        "Sum of elementwise products of two f64 sequences"
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Get list of available variant names
    pub fn available_variants(&self) -> Vec<&'static str> {
        code::available_variants(self.degree)
            .iter()
            .map(|v| v.name)
            .collect()
    }

    /// One timed closure per variant over the wave fixture of length `size`.
    pub fn get_variant_closures(&self, size: usize) -> Vec<Variant<'static>> {
        let (a, b) = data::wave_pair(size);
        let a = Arc::new(a);
        let b = Arc::new(b);

        code::available_variants(self.degree)
            .into_iter()
            .map(|v| {
                let a = Arc::clone(&a);
                let b = Arc::clone(&b);
                let func = v.function;

                Variant {
                    name: v.name,
                    description: v.description,
                    run: Box::new(move || {
                        let (elapsed, result) = crate::measure!(func(a.as_slice(), b.as_slice()));
                        (elapsed, result.ok())
                    }),
                }
            })
            .collect()
    }

    /// Run every variant once over the wave fixture of length `size`.
    pub fn evaluate(&self, size: usize) -> Vec<(&'static str, Result<f64, SumProductError>)> {
        let (a, b) = data::wave_pair(size);
        code::available_variants(self.degree)
            .into_iter()
            .map(|v| (v.name, (v.function)(&a, &b)))
            .collect()
    }

    /// Verify every variant against the scalar baseline.
    ///
    /// Uses random inputs and the wave fixture at lengths that are not
    /// multiples of any lane width or of the degree.
    pub fn verify(&self) -> Result<(), String> {
        let inputs = [
            data::random_pair(1023, VERIFY_SEED),
            data::random_pair(self.degree * 4 + 3, VERIFY_SEED),
            data::wave_pair(10_007),
        ];

        let variants = code::available_variants(self.degree);
        let baseline = variants
            .iter()
            .find(|v| v.name == BASELINE)
            .ok_or("No 'scalar' variant found for reference")?;

        for (a, b) in &inputs {
            let expected = (baseline.function)(a, b).map_err(|e| e.to_string())?;
            let scale = data::magnitude(a, b);

            for variant in &variants {
                let result = (variant.function)(a, b)
                    .map_err(|e| format!("Variant '{}' failed: {}", variant.name, e))?;

                if !data::approx_eq(result, expected, scale) {
                    return Err(format!(
                        "Variant '{}' failed verification at n={}. Expected {}, got {}, diff {}",
                        variant.name,
                        a.len(),
                        expected,
                        result,
                        (result - expected).abs()
                    ));
                }
            }
        }

        Ok(())
    }
}
