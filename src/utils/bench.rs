//! Measurement primitives shared by the harness.
//!
//! By default (`cpu_cycles` feature), measurements use CPU cycle counters
//! for precise micro-benchmarking. Use `--features use_time` or
//! `--no-default-features` to use wall-clock time instead.

use std::time::Duration;

// ============================================================================
// Measurement abstraction: cycles or time depending on feature flags
// ============================================================================

/// Measurement value type - cycles (u64) or Duration depending on feature
#[cfg(all(feature = "cpu_cycles", not(feature = "use_time")))]
pub type Measurement = u64;

#[cfg(any(not(feature = "cpu_cycles"), feature = "use_time"))]
pub type Measurement = Duration;

/// Read current measurement (cycles or time)
#[cfg(all(feature = "cpu_cycles", not(feature = "use_time")))]
#[inline(always)]
pub fn now() -> Measurement {
    read_cycles()
}

#[cfg(any(not(feature = "cpu_cycles"), feature = "use_time"))]
#[inline(always)]
pub fn now() -> std::time::Instant {
    std::time::Instant::now()
}

/// Calculate elapsed measurement
#[cfg(all(feature = "cpu_cycles", not(feature = "use_time")))]
#[inline(always)]
pub fn elapsed(start: Measurement) -> Measurement {
    read_cycles().saturating_sub(start)
}

#[cfg(any(not(feature = "cpu_cycles"), feature = "use_time"))]
#[inline(always)]
pub fn elapsed(start: std::time::Instant) -> Measurement {
    start.elapsed()
}

/// Raw count of a measurement: cycles/ticks, or nanoseconds
#[cfg(all(feature = "cpu_cycles", not(feature = "use_time")))]
pub fn to_nanos(m: Measurement) -> u64 {
    m
}

#[cfg(any(not(feature = "cpu_cycles"), feature = "use_time"))]
pub fn to_nanos(m: Measurement) -> u64 {
    m.as_nanos() as u64
}

/// Get the measurement unit name
#[cfg(all(feature = "cpu_cycles", not(feature = "use_time")))]
pub const fn unit_name() -> &'static str {
    #[cfg(target_arch = "aarch64")]
    {
        "ticks"
    }
    #[cfg(target_arch = "x86_64")]
    {
        "cycles"
    }
    #[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
    {
        "units"
    }
}

#[cfg(any(not(feature = "cpu_cycles"), feature = "use_time"))]
pub const fn unit_name() -> &'static str {
    "ns"
}

/// Time an expression, returning `(measurement, value)`.
#[macro_export]
macro_rules! measure {
    ($e:expr) => {{
        let start = $crate::utils::bench::now();
        let value = ::std::hint::black_box($e);
        ($crate::utils::bench::elapsed(start), value)
    }};
}

// ============================================================================
// Cycle counters
// ============================================================================

/// Read the CPU cycle counter (x86_64, LFENCE-serialized RDTSC) or the
/// virtual timer (aarch64 `cntvct_el0`, fixed frequency).
#[cfg(all(feature = "cpu_cycles", not(feature = "use_time")))]
#[inline(always)]
pub fn read_cycles() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        use std::arch::x86_64::{_mm_lfence, _rdtsc};
        // SAFETY: lfence and rdtsc are baseline x86_64 instructions.
        unsafe {
            _mm_lfence();
            let cycles = _rdtsc();
            _mm_lfence();
            cycles
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        let val: u64;
        // SAFETY: cntvct_el0 is readable from userspace.
        unsafe {
            std::arch::asm!("mrs {}, cntvct_el0", out(reg) val);
        }
        val
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        compile_error!("cpu_cycles feature requires x86_64 or aarch64; build with --features use_time");
    }
}

// ============================================================================
// Formatting and statistics helpers
// ============================================================================

/// Render a measurement stored as a `Duration` in the active unit.
///
/// In cycle mode the nanosecond field carries the raw cycle count.
pub fn format_measurement(d: Duration) -> String {
    let raw = d.as_nanos() as f64;
    let unit = unit_name();

    if unit != "ns" {
        return if raw >= 1e6 {
            format!("{:.2}M {}", raw / 1e6, unit)
        } else if raw >= 1e3 {
            format!("{:.2}k {}", raw / 1e3, unit)
        } else {
            format!("{:.0} {}", raw, unit)
        };
    }

    if raw >= 1e9 {
        format!("{:.2} s", raw / 1e9)
    } else if raw >= 1e6 {
        format!("{:.2} ms", raw / 1e6)
    } else if raw >= 1e3 {
        format!("{:.2} µs", raw / 1e3)
    } else {
        format!("{:.0} ns", raw)
    }
}

/// Get a seed from current time for randomization
pub fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x12345678)
}

/// Drop the lowest and highest `fraction` of sorted samples.
///
/// At least one sample is removed from each end once there are enough
/// samples for the trim to leave something behind.
pub fn trim_outliers(sorted: &[u64], fraction: f64) -> &[u64] {
    if sorted.len() < 3 {
        return sorted;
    }
    let cut = ((sorted.len() as f64 * fraction).ceil() as usize).max(1);
    if cut * 2 >= sorted.len() {
        return sorted;
    }
    &sorted[cut..sorted.len() - cut]
}
