//! x86_64 AVX lane strategy.
//!
//! Processes 4 f64 values per iteration using 256-bit registers. Only the
//! AVX float instructions are needed, so AVX2 and FMA are not required.

use std::arch::x86_64::*;

use super::lanes::LaneStrategy;

pub struct Avx;

impl LaneStrategy for Avx {
    const WIDTH: usize = 4;
    const FEATURE: &'static str = "avx";
    type Lanes = [f64; 4];

    fn is_supported() -> bool {
        is_x86_feature_detected!("avx")
    }

    unsafe fn reduce_main(a: &[f64], b: &[f64]) -> Self::Lanes {
        // SAFETY: forwarded from the trait contract.
        unsafe { reduce_main_avx(a, b) }
    }

    fn horizontal_sum(lanes: Self::Lanes) -> f64 {
        (lanes[0] + lanes[1]) + (lanes[2] + lanes[3])
    }
}

#[target_feature(enable = "avx")]
unsafe fn reduce_main_avx(a: &[f64], b: &[f64]) -> [f64; 4] {
    let mut acc = _mm256_setzero_pd();

    for (x, y) in a.chunks_exact(4).zip(b.chunks_exact(4)) {
        let prod = _mm256_mul_pd(_mm256_loadu_pd(x.as_ptr()), _mm256_loadu_pd(y.as_ptr()));
        acc = _mm256_add_pd(acc, prod);
    }

    let mut lanes = [0.0; 4];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
    lanes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avx_lanes() {
        if !Avx::is_supported() {
            return;
        }
        let a = [1.0, 2.0, 3.0, 4.0, 1.0, 1.0, 1.0, 1.0];
        let b = [5.0, 6.0, 7.0, 8.0, 1.0, 2.0, 3.0, 4.0];
        let lanes = unsafe { Avx::reduce_main(&a, &b) };
        assert_eq!(lanes, [6.0, 14.0, 24.0, 36.0]);
        assert_eq!(Avx::horizontal_sum(lanes), 80.0);
    }
}
