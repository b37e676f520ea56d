//! Benchmark driver loop and CSV export.

use std::io::Write;
use std::path::Path;

use super::bench::unit_name;
use super::timer::{measure_variants, TimingConfig, VariantResult};
use crate::sum_product::{SumProductRunner, BASELINE};

/// Results for every variant at one input length.
#[derive(Clone, Debug)]
pub struct SizeResults {
    pub size: usize,
    pub results: Vec<VariantResult>,
}

/// Raw timing data for a single (variant, size) pair, one CSV row
#[derive(Clone, Debug, PartialEq)]
pub struct RawTimingData {
    pub variant_name: String,
    pub degree: usize,
    pub input_size: usize,
    pub avg: f64,
    pub median: u64,
    pub min: u64,
    pub max: u64,
    pub result_sample: Option<f64>,
}

/// Time every selected variant of `runner` at each size.
///
/// `only` restricts the run to the named variants; empty means all. The
/// baseline is always timed so speedups have a reference.
pub fn run_benchmarks(
    runner: &SumProductRunner,
    sizes: &[usize],
    only: &[String],
    config: &TimingConfig,
) -> Vec<SizeResults> {
    sizes
        .iter()
        .map(|&size| {
            let variants = runner
                .get_variant_closures(size)
                .into_iter()
                .filter(|v| {
                    only.is_empty()
                        || v.name == BASELINE
                        || only.iter().any(|name| name == v.name)
                })
                .collect();
            SizeResults {
                size,
                results: measure_variants(variants, config),
            }
        })
        .collect()
}

/// Flatten grouped results into CSV rows.
pub fn raw_timings(grouped: &[SizeResults], degree: usize) -> Vec<RawTimingData> {
    grouped
        .iter()
        .flat_map(|group| {
            group.results.iter().map(move |r| RawTimingData {
                variant_name: r.name.clone(),
                degree,
                input_size: group.size,
                avg: r.avg_nanos_f64,
                median: r.median_time.as_nanos() as u64,
                min: r.min_time.as_nanos() as u64,
                max: r.max_time.as_nanos() as u64,
                result_sample: r.result_sample,
            })
        })
        .collect()
}

/// Write timing rows as CSV.
pub fn write_csv<W: Write>(mut out: W, data: &[RawTimingData]) -> std::io::Result<()> {
    writeln!(out, "variant,degree,input_size,unit,avg,median,min,max,result")?;

    for entry in data {
        writeln!(
            out,
            "{},{},{},{},{:.2},{},{},{},{}",
            entry.variant_name,
            entry.degree,
            entry.input_size,
            unit_name(),
            entry.avg,
            entry.median,
            entry.min,
            entry.max,
            entry.result_sample.map(|v| v.to_string()).unwrap_or_default()
        )?;
    }

    Ok(())
}

/// Export timing data to a CSV file
pub fn export_csv(path: &Path, data: &[RawTimingData]) -> std::io::Result<()> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_csv(&mut out, data)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv() {
        let rows = vec![
            RawTimingData {
                variant_name: "scalar".to_string(),
                degree: 4,
                input_size: 1000,
                avg: 812.5,
                median: 800,
                min: 790,
                max: 900,
                result_sample: Some(70.0),
            },
            RawTimingData {
                variant_name: "parallel".to_string(),
                degree: 4,
                input_size: 1000,
                avg: 3000.0,
                median: 2900,
                min: 2500,
                max: 4000,
                result_sample: None,
            },
        ];

        let mut out = Vec::new();
        write_csv(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "variant,degree,input_size,unit,avg,median,min,max,result");
        assert_eq!(
            lines[1],
            format!("scalar,4,1000,{},812.50,800,790,900,70", unit_name())
        );
        assert!(lines[2].ends_with(",2500,4000,"));
    }

    #[test]
    fn test_run_benchmarks_filters_variants() {
        let runner = SumProductRunner::new(2).unwrap();
        let config = TimingConfig {
            runs_per_variant: 3,
            warmup_iterations: 1,
            seed: Some(1),
            ..TimingConfig::default()
        };
        let only = vec!["scalar".to_string(), "parallel".to_string()];

        let grouped = run_benchmarks(&runner, &[16, 33], &only, &config);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[1].size, 33);
        for group in &grouped {
            let names: Vec<_> = group.results.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["scalar", "parallel"]);
        }

        let rows = raw_timings(&grouped, 2);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.degree == 2));
    }

    #[test]
    fn test_run_benchmarks_always_times_baseline() {
        let runner = SumProductRunner::new(2).unwrap();
        let config = TimingConfig {
            runs_per_variant: 2,
            warmup_iterations: 0,
            seed: Some(7),
            ..TimingConfig::default()
        };
        let only = vec!["parallel".to_string()];

        let grouped = run_benchmarks(&runner, &[64], &only, &config);
        let names: Vec<_> = grouped[0].results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec![BASELINE, "parallel"]);
    }
}
