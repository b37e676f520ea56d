//! Sum-of-products implementations.
//!
//! This module contains every kernel variant plus the partitioning and
//! combination logic the parallel variants share.

mod combine;
mod error;
mod functional;
mod lanes;
mod partition;
mod scalar;
mod vector;

#[cfg(target_arch = "aarch64")]
mod aarch64_neon;
#[cfg(target_arch = "x86_64")]
mod x86_64_avx;
#[cfg(target_arch = "x86_64")]
mod x86_64_sse2;

pub use combine::combine;
pub use error::{check_lengths, SumProductError};
pub use functional::functional_sum;
pub use lanes::{unrolled4_sum, LaneStrategy, Unrolled4};
pub use partition::{
    chunks, partitioned_sum, partitioned_vector_sum, reduce_chunks, Chunk, ChunkWorker,
};
pub use scalar::{scalar_sum, scalar_sum_range};
pub use vector::{vector_sum, LaneWidth, VectorKernel};

#[cfg(target_arch = "aarch64")]
pub use aarch64_neon::Neon;
#[cfg(target_arch = "x86_64")]
pub use x86_64_avx::Avx;
#[cfg(target_arch = "x86_64")]
pub use x86_64_sse2::Sse2;

use crate::utils::VariantInfo;

/// Boxed kernel as the harness sees it: both inputs in, one scalar out.
pub type KernelFn = Box<dyn Fn(&[f64], &[f64]) -> Result<f64, SumProductError> + Send + Sync>;

/// Name of the variant every other one is compared against.
pub const BASELINE: &str = "scalar";

/// Get all variants runnable on the current CPU.
///
/// Vector and hybrid variants are listed only for the widths whose capability
/// check passes, so every returned kernel can run without `Unsupported`.
pub fn available_variants(degree: usize) -> Vec<VariantInfo<KernelFn>> {
    let mut variants: Vec<VariantInfo<KernelFn>> = vec![
        VariantInfo {
            name: BASELINE,
            description: "Sequential loop with a single accumulator",
            function: Box::new(scalar_sum),
        },
        VariantInfo {
            name: "functional",
            description: "zip / map / sum iterator pipeline",
            function: Box::new(functional_sum),
        },
        VariantInfo {
            name: "unrolled4",
            description: "Four scalar accumulators, portable",
            function: Box::new(unrolled4_sum),
        },
        VariantInfo {
            name: "parallel",
            description: "Scalar loop per chunk on the worker pool",
            function: Box::new(move |a: &[f64], b: &[f64]| {
                partitioned_sum(a, b, degree, ChunkWorker::Scalar)
            }),
        },
    ];

    for width in LaneWidth::ALL {
        let Ok(kernel) = VectorKernel::detect(width) else {
            continue;
        };

        let (name, parallel_name, description, parallel_description) = match width {
            LaneWidth::Two => (
                "vector2",
                "parallel-vector2",
                "128-bit registers, 2 lanes",
                "128-bit kernel per chunk on the worker pool",
            ),
            LaneWidth::Four => (
                "vector4",
                "parallel-vector4",
                "256-bit registers, 4 lanes",
                "256-bit kernel per chunk on the worker pool",
            ),
        };

        variants.push(VariantInfo {
            name,
            description,
            function: Box::new(move |a: &[f64], b: &[f64]| kernel.sum(a, b)),
        });
        variants.push(VariantInfo {
            name: parallel_name,
            description: parallel_description,
            function: Box::new(move |a: &[f64], b: &[f64]| {
                partitioned_vector_sum(a, b, degree, width)
            }),
        });
    }

    variants
}
