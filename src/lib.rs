//! # Sum-Product
//!
//! Dot-product reduction kernels over `f64` sequences (scalar, functional,
//! fixed-width SIMD and partitioned across worker threads) together with the
//! harness that times and compares them.

pub mod config;
pub mod sum_product;
pub mod utils;

/// Re-export tui from utils
pub use utils::tui;

/// Re-export run_benchmarks from utils::runner
pub use utils::runner::run_benchmarks;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::sum_product::{
        functional_sum, partitioned_sum, partitioned_vector_sum, scalar_sum, scalar_sum_range,
        vector_sum, ChunkWorker, LaneWidth, SumProductError, SumProductRunner,
    };
}
