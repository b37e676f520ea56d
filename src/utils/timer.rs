//! Timing of kernel variants.
//!
//! - Cycles or wall-clock time, chosen by cargo feature
//! - Per-execution or global CPU pinning
//! - Variants interleaved in a shuffled order so none benefits from running
//!   first or last
//! - Optional trimming of extreme samples

use std::hint::black_box;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::bench::{time_seed, to_nanos, trim_outliers, Measurement};
use super::cpu_affinity::CpuPinGuard;

/// Share of samples dropped from each end when filtering is on.
pub const OUTLIER_FRACTION: f64 = 0.01;

/// CPU pinning strategy during measurements
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinStrategy {
    /// Pin once before all measurements
    Global,
    /// Pin/unpin around each execution
    #[default]
    PerExecution,
}

/// Configuration for timing measurements
#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Number of samples to collect per variant (default: 30)
    pub runs_per_variant: usize,
    /// Number of warmup executions before measurement (default: 10)
    pub warmup_iterations: usize,
    /// CPU pinning strategy (default: PerExecution)
    pub pin_strategy: PinStrategy,
    /// Seed for the execution schedule; time-based when `None`
    pub seed: Option<u64>,
    /// Trim [`OUTLIER_FRACTION`] of samples from both ends
    pub filter_outliers: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            runs_per_variant: 30,
            warmup_iterations: 10,
            pin_strategy: PinStrategy::default(),
            seed: None,
            filter_outliers: false,
        }
    }
}

/// A variant to be measured
pub struct Variant<'a> {
    pub name: &'static str,
    pub description: &'static str,
    /// One timed execution: returns the measurement and the kernel's result.
    /// Timing happens inside the closure so the boxed call is not measured.
    pub run: Box<dyn FnMut() -> (Measurement, Option<f64>) + 'a>,
}

/// Statistics for one measured variant
#[derive(Clone, Debug)]
pub struct VariantResult {
    pub name: String,
    pub description: String,
    /// Average measurement (cycles are stored in the nanosecond field)
    pub avg_time: Duration,
    /// Precise average as f64
    pub avg_nanos_f64: f64,
    pub median_time: Duration,
    pub min_time: Duration,
    pub max_time: Duration,
    pub std_dev: Duration,
    /// Number of samples the statistics are computed from
    pub runs: usize,
    /// Result of the last execution, if the kernel produced one
    pub result_sample: Option<f64>,
}

/// Measure every variant `config.runs_per_variant` times in a shuffled order.
pub fn measure_variants(mut variants: Vec<Variant>, config: &TimingConfig) -> Vec<VariantResult> {
    if variants.is_empty() {
        return Vec::new();
    }

    // Workers inherit the affinity of the thread that spawns them, so the
    // global pool must exist before this thread is pinned.
    rayon::current_num_threads();

    let samples = config.runs_per_variant;

    for variant in &mut variants {
        for _ in 0..config.warmup_iterations {
            black_box((variant.run)());
        }
    }

    let mut tasks: Vec<usize> = (0..variants.len())
        .flat_map(|v| std::iter::repeat(v).take(samples))
        .collect();
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(time_seed));
    tasks.shuffle(&mut rng);

    let mut measurements: Vec<Vec<u64>> = (0..variants.len())
        .map(|_| Vec::with_capacity(samples))
        .collect();
    let mut result_samples: Vec<Option<f64>> = vec![None; variants.len()];

    let _global_pin = (config.pin_strategy == PinStrategy::Global).then(CpuPinGuard::new);

    for variant_idx in tasks {
        let variant = &mut variants[variant_idx];
        let _per_exec_pin =
            (config.pin_strategy == PinStrategy::PerExecution).then(CpuPinGuard::new);
        let (elapsed, result) = (variant.run)();

        measurements[variant_idx].push(to_nanos(elapsed));
        result_samples[variant_idx] = result;
    }

    variants
        .into_iter()
        .zip(measurements)
        .zip(result_samples)
        .map(|((variant, mut raw), result_sample)| {
            raw.sort_unstable();
            let kept = if config.filter_outliers {
                trim_outliers(&raw, OUTLIER_FRACTION)
            } else {
                &raw[..]
            };
            compute_variant_result(variant.name, variant.description, kept, result_sample)
        })
        .collect()
}

/// Compute statistics from sorted raw measurements
fn compute_variant_result(
    name: &'static str,
    description: &'static str,
    sorted: &[u64],
    result_sample: Option<f64>,
) -> VariantResult {
    if sorted.is_empty() {
        return VariantResult {
            name: name.to_string(),
            description: description.to_string(),
            avg_time: Duration::ZERO,
            avg_nanos_f64: 0.0,
            median_time: Duration::ZERO,
            min_time: Duration::ZERO,
            max_time: Duration::ZERO,
            std_dev: Duration::ZERO,
            runs: 0,
            result_sample,
        };
    }

    let n = sorted.len();
    let avg = sorted.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let variance = sorted
        .iter()
        .map(|&v| {
            let diff = v as f64 - avg;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1).max(1) as f64;

    VariantResult {
        name: name.to_string(),
        description: description.to_string(),
        avg_time: Duration::from_nanos(avg as u64),
        avg_nanos_f64: avg,
        median_time: Duration::from_nanos(sorted[n / 2]),
        min_time: Duration::from_nanos(sorted[0]),
        max_time: Duration::from_nanos(sorted[n - 1]),
        std_dev: Duration::from_nanos(variance.sqrt() as u64),
        runs: n,
        result_sample,
    }
}
