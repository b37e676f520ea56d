//! x86_64 SSE2 lane strategy.
//!
//! SSE2 is available on all x86_64 CPUs, processing 2 f64 values per iteration
//! in one 128-bit register.

use std::arch::x86_64::*;

use super::lanes::LaneStrategy;

pub struct Sse2;

impl LaneStrategy for Sse2 {
    const WIDTH: usize = 2;
    const FEATURE: &'static str = "sse2";
    type Lanes = [f64; 2];

    fn is_supported() -> bool {
        is_x86_feature_detected!("sse2")
    }

    unsafe fn reduce_main(a: &[f64], b: &[f64]) -> Self::Lanes {
        // SAFETY: forwarded from the trait contract.
        unsafe { reduce_main_sse2(a, b) }
    }

    fn horizontal_sum(lanes: Self::Lanes) -> f64 {
        lanes[0] + lanes[1]
    }
}

#[target_feature(enable = "sse2")]
unsafe fn reduce_main_sse2(a: &[f64], b: &[f64]) -> [f64; 2] {
    let mut acc = _mm_setzero_pd();

    for (x, y) in a.chunks_exact(2).zip(b.chunks_exact(2)) {
        let prod = _mm_mul_pd(_mm_loadu_pd(x.as_ptr()), _mm_loadu_pd(y.as_ptr()));
        acc = _mm_add_pd(acc, prod);
    }

    let mut lanes = [0.0; 2];
    _mm_storeu_pd(lanes.as_mut_ptr(), acc);
    lanes
}
