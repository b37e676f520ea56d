//! Benchmark driver for the sum-product kernels.
//!
//! Usage:
//!   sum-product                  # Run all variants
//!   sum-product --list           # List variants available on this CPU
//!   sum-product scalar vector4   # Run specific variants
//!   sum-product --help           # Show help

use std::process::ExitCode;

use sum_product::config::Config;
use sum_product::sum_product::{SumProductRunner, BASELINE};
use sum_product::tui;
use sum_product::utils::runner::{export_csv, raw_timings};

fn main() -> ExitCode {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage.");
            return ExitCode::from(2);
        }
    };

    if config.show_help {
        tui::print_help();
        return ExitCode::SUCCESS;
    }

    let runner = match SumProductRunner::new(config.degree) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    if config.show_list {
        tui::print_available_variants(&runner);
        return ExitCode::SUCCESS;
    }

    let available = runner.available_variants();
    if let Some(unknown) = config
        .variants
        .iter()
        .find(|name| !available.iter().any(|a| *a == name.as_str()))
    {
        eprintln!("Variant '{}' not available on this CPU.", unknown);
        eprintln!("Available: {:?}", available);
        return ExitCode::from(1);
    }

    tui::print_header();
    tui::print_info_box(&runner);

    let size = config.largest_size();
    let results: Vec<_> = runner
        .evaluate(size)
        .into_iter()
        .filter(|(name, _)| {
            config.variants.is_empty() || config.variants.iter().any(|v| v == name)
        })
        .collect();
    tui::print_kernel_results(size, &results);

    if !config.bench {
        return ExitCode::SUCCESS;
    }

    let timing = config.timing();
    let grouped = sum_product::run_benchmarks(&runner, &config.sizes, &config.variants, &timing);

    if let Some(path) = &config.csv_path {
        let rows = raw_timings(&grouped, runner.degree());
        match export_csv(path, &rows) {
            Ok(()) => println!("  Raw data exported to: {}", path.display()),
            Err(e) => eprintln!("  Warning: Failed to export CSV: {}", e),
        }
        println!();
    }

    for group in grouped {
        let mut results = group.results;
        tui::sort_variants(&mut results);
        tui::print_results_table(
            &results,
            group.size,
            timing.runs_per_variant,
            timing.filter_outliers,
        );
    }

    println!(
        "Note: Speedup and error are relative to the '{}' variant.",
        BASELINE
    );
    ExitCode::SUCCESS
}
