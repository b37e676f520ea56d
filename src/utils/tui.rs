//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use terminal_size::{terminal_size, Width};

use crate::sum_product::{LaneWidth, SumProductError, SumProductRunner, VectorKernel, BASELINE};
use crate::utils::bench::{format_measurement, unit_name};
use crate::utils::timer::VariantResult;

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Sorting priority: baseline first, then scalar-style, parallel, vector.
fn variant_sort_key(result: &VariantResult) -> (u8, String) {
    let name = result.name.to_lowercase();
    let group = if name == BASELINE {
        0
    } else if name.starts_with("parallel") {
        2
    } else if name.starts_with("vector") {
        3
    } else {
        1
    };
    (group, name)
}

pub fn sort_variants(results: &mut [VariantResult]) {
    results.sort_by_key(variant_sort_key);
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

/// Relative difference of `value` from `baseline`, absolute near zero.
fn relative_error(value: f64, baseline: f64) -> f64 {
    let diff = (value - baseline).abs();
    if baseline.abs() > 1e-9 {
        diff / baseline.abs()
    } else {
        diff
    }
}

/// Short description of the vector widths this CPU can run.
fn capability_line() -> String {
    let widths: Vec<String> = LaneWidth::ALL
        .iter()
        .map(|&w| match VectorKernel::detect(w) {
            Ok(kernel) => format!("{}-bit ({})", w.register_bits(), kernel.feature()),
            Err(_) => format!("{}-bit (unavailable)", w.register_bits()),
        })
        .collect();
    format!("Vectors:   {}", widths.join(", "))
}

/// Print the info box describing the run
pub fn print_info_box(runner: &SumProductRunner) {
    let term_width = get_term_width();
    let max_content_width = term_width.saturating_sub(4).max(40);

    let lines = [
        format!("Algorithm: {}", runner.name()),
        runner.description().to_string(),
        format!("Degree:    {} workers", runner.degree()),
        capability_line(),
        format!("Variants:  {}", runner.available_variants().join(", ")),
    ];

    let content_width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(60)
        .min(max_content_width);

    let border = "─".repeat(content_width + 2);

    println!("┌{}┐", border);
    for (i, line) in lines.iter().enumerate() {
        if i == lines.len() - 1 {
            println!("├{}┤", border);
        }
        println!(
            "│ {:<width$} │",
            truncate(line, content_width),
            width = content_width
        );
    }
    println!("└{}┘", border);
    println!();
}

/// Print each kernel's result once, four decimals, before any timing.
pub fn print_kernel_results(size: usize, results: &[(&'static str, Result<f64, SumProductError>)]) {
    println!("  Results for n = {}", size);
    let width = results.iter().map(|(name, _)| name.len()).max().unwrap_or(10);
    for (name, result) in results {
        match result {
            Ok(value) => println!("  {:<width$}  {:.4}", name, value, width = width),
            Err(e) => println!("  {:<width$}  error: {}", name, e, width = width),
        }
    }
    println!();
}

/// The row speedups and errors are measured against: the baseline variant
/// when present, otherwise the first row.
fn baseline_of(results: &[VariantResult]) -> &VariantResult {
    results
        .iter()
        .find(|r| r.name == BASELINE)
        .unwrap_or(&results[0])
}

/// Print results table for a single size
pub fn print_results_table(results: &[VariantResult], size: usize, runs: usize, filtered: bool) {
    if results.is_empty() {
        return;
    }

    let term_width = get_term_width();
    let fixed_width = 72;
    let variant_col_width = term_width.saturating_sub(fixed_width).max(15);
    let table_width = variant_col_width + 64 + 6;

    let baseline = baseline_of(results);
    let baseline_time = baseline.avg_nanos_f64.max(1.0);

    let filter_note = if filtered { ", filtered" } else { "" };
    println!(
        "  Size: {} ({} runs{}, {}, baseline '{}')",
        size,
        runs,
        filter_note,
        unit_name(),
        baseline.name
    );
    println!("  {}", "─".repeat(table_width));
    println!(
        "  {:<v_width$} {:>12} {:>12} {:>12} {:>9} {:>9} {:>10}",
        "Variant",
        "Average",
        "Min",
        "Max",
        "Speedup",
        "CV",
        "Rel. Error",
        v_width = variant_col_width
    );
    println!("  {}", "─".repeat(table_width));

    for result in results {
        let speedup = baseline_time / result.avg_nanos_f64.max(1.0);

        let cv = if result.avg_nanos_f64 > 0.0 {
            result.std_dev.as_nanos() as f64 / result.avg_nanos_f64
        } else {
            0.0
        };

        let error = match (result.result_sample, baseline.result_sample) {
            (Some(value), Some(base)) => relative_error(value, base),
            _ => 0.0,
        };

        println!(
            "  {:<v_width$} {:>12} {:>12} {:>12} {:>8.2}x {:>8.2}% {:>10.2e}",
            truncate(&result.name, variant_col_width),
            format_measurement(result.avg_time),
            format_measurement(result.min_time),
            format_measurement(result.max_time),
            speedup,
            cv * 100.0,
            error,
            v_width = variant_col_width
        );
    }
    println!();
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80);
    let title = " Sum-Product Kernel Benchmarks ";
    let padding = term_width.saturating_sub(title.len() + 2) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!(
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    );
    println!("╚{}╝", border);
    println!();
}

/// Print the help message
pub fn print_help() {
    println!("Usage: sum-product [OPTIONS] [VARIANT...]");
    println!();
    println!("Options:");
    println!("  --list, -l          List variants available on this CPU");
    println!("  --help, -h          Show this help message");
    println!("  --sizes N,N,...     Input lengths (default: 1000,100000,1000000)");
    println!("  --runs N, -r N      Measured samples per variant (default: 30)");
    println!("  --warmup N          Warmup executions per variant (default: 10)");
    println!("  --degree N, -d N    Workers for partitioned variants (default: 4)");
    println!("  --seed N            Seed for the execution order (default: time-based)");
    println!("  --filter, -f        Trim 1% extremes from measurements");
    println!("  --csv PATH          Export timings to CSV");
    println!("  --no-bench          Print kernel results only, skip timing");
    println!();
    println!("Arguments:");
    println!("  VARIANT             Names of variants to run (omit for all)");
    println!();
    println!("Examples:");
    println!("  sum-product                       # All variants, default sizes");
    println!("  sum-product scalar vector4        # Only these two");
    println!("  sum-product --degree 8 parallel   # Eight workers");
    println!("  sum-product --csv data.csv        # Export raw timings");
}

/// Print the variants runnable on this CPU
pub fn print_available_variants(runner: &SumProductRunner) {
    println!("Available variants (degree {}):", runner.degree());
    println!();
    for name in runner.available_variants() {
        println!("  {}", name);
    }
    println!();
    println!("{}", capability_line());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn result(name: &str) -> VariantResult {
        VariantResult {
            name: name.to_string(),
            description: String::new(),
            avg_time: Duration::ZERO,
            avg_nanos_f64: 0.0,
            median_time: Duration::ZERO,
            min_time: Duration::ZERO,
            max_time: Duration::ZERO,
            std_dev: Duration::ZERO,
            runs: 0,
            result_sample: None,
        }
    }

    #[test]
    fn test_sort_variants() {
        let mut results: Vec<_> = ["vector4", "parallel", "functional", "scalar", "parallel-vector4"]
            .iter()
            .map(|n| result(n))
            .collect();
        sort_variants(&mut results);
        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["scalar", "functional", "parallel", "parallel-vector4", "vector4"]
        );
    }

    #[test]
    fn test_baseline_of() {
        let mut results: Vec<_> = ["vector4", "scalar"].iter().map(|n| result(n)).collect();
        assert_eq!(baseline_of(&results).name, BASELINE);

        results.retain(|r| r.name != BASELINE);
        assert_eq!(baseline_of(&results).name, "vector4");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-long-variant-name", 10), "a-long-...");
    }

    #[test]
    fn test_relative_error() {
        assert_eq!(relative_error(70.0, 70.0), 0.0);
        assert!((relative_error(71.0, 70.0) - 1.0 / 70.0).abs() < 1e-15);
        assert_eq!(relative_error(1e-12, 0.0), 1e-12);
    }
}
