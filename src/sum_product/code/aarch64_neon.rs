//! aarch64 NEON lane strategy, 2 f64 values per 128-bit register.

use std::arch::aarch64::*;

use super::lanes::LaneStrategy;

pub struct Neon;

impl LaneStrategy for Neon {
    const WIDTH: usize = 2;
    const FEATURE: &'static str = "neon";
    type Lanes = [f64; 2];

    fn is_supported() -> bool {
        std::arch::is_aarch64_feature_detected!("neon")
    }

    unsafe fn reduce_main(a: &[f64], b: &[f64]) -> Self::Lanes {
        // SAFETY: forwarded from the trait contract.
        unsafe { reduce_main_neon(a, b) }
    }

    fn horizontal_sum(lanes: Self::Lanes) -> f64 {
        lanes[0] + lanes[1]
    }
}

#[target_feature(enable = "neon")]
unsafe fn reduce_main_neon(a: &[f64], b: &[f64]) -> [f64; 2] {
    let mut acc = vdupq_n_f64(0.0);

    for (x, y) in a.chunks_exact(2).zip(b.chunks_exact(2)) {
        let prod = vmulq_f64(vld1q_f64(x.as_ptr()), vld1q_f64(y.as_ptr()));
        acc = vaddq_f64(acc, prod);
    }

    let mut lanes = [0.0; 2];
    vst1q_f64(lanes.as_mut_ptr(), acc);
    lanes
}
