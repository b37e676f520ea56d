//! Input fixtures for benchmarks and verification.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic wave-shaped inputs of length `n`.
///
/// `a[i] = 10 sin(i) + ln(i + 10)` and `b[i] = 15 (0.5 + cos(i / 4))`.
pub fn wave_pair(n: usize) -> (Vec<f64>, Vec<f64>) {
    let a = (0..n)
        .map(|i| {
            let x = i as f64;
            10.0 * x.sin() + (x + 10.0).ln()
        })
        .collect();
    let b = (0..n)
        .map(|i| 15.0 * (0.5 + (0.25 * i as f64).cos()))
        .collect();
    (a, b)
}

/// Uniform inputs in `[-1, 1)`, reproducible for a given seed.
pub fn random_pair(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();
    let b = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();
    (a, b)
}

/// `Σ |a[i] * b[i]|`, the scale against which rounding error is judged.
pub fn magnitude(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x * y).abs()).sum()
}

/// Relative agreement used when comparing variants that sum in different
/// orders: `|x - y| <= 1e-9 * max(1, scale)`.
pub fn approx_eq(x: f64, y: f64, scale: f64) -> bool {
    (x - y).abs() <= 1e-9 * scale.max(1.0)
}
