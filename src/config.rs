//! Command-line configuration for the benchmark driver.

use std::path::PathBuf;

use thiserror::Error;

use crate::utils::timer::TimingConfig;

/// Default input lengths; the largest matches the classic one-million-element run.
pub const DEFAULT_SIZES: [usize; 3] = [1_000, 100_000, 1_000_000];

/// Default worker count for the partitioned variants.
pub const DEFAULT_DEGREE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("option {0} requires a value")]
    MissingValue(&'static str),

    #[error("invalid value '{value}' for {option}: {reason}")]
    InvalidValue {
        option: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Everything the driver needs for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub show_help: bool,
    pub show_list: bool,
    pub sizes: Vec<usize>,
    pub runs: usize,
    pub warmup: usize,
    pub degree: usize,
    pub seed: Option<u64>,
    pub filter_outliers: bool,
    pub csv_path: Option<PathBuf>,
    pub bench: bool,
    /// Variant names to run; empty means all.
    pub variants: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let timing = TimingConfig::default();
        Self {
            show_help: false,
            show_list: false,
            sizes: DEFAULT_SIZES.to_vec(),
            runs: timing.runs_per_variant,
            warmup: timing.warmup_iterations,
            degree: DEFAULT_DEGREE,
            seed: None,
            filter_outliers: false,
            csv_path: None,
            bench: true,
            variants: Vec::new(),
        }
    }
}

impl Config {
    /// Parse arguments, excluding the program name.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--list" | "-l" => config.show_list = true,
                "--help" | "-h" => config.show_help = true,
                "--filter" | "-f" => config.filter_outliers = true,
                "--no-bench" => config.bench = false,
                "--sizes" => {
                    let value = next_value(&mut args, "--sizes")?;
                    config.sizes = parse_sizes(&value)?;
                }
                "--runs" | "-r" => {
                    config.runs = parse_positive(&next_value(&mut args, "--runs")?, "--runs")?;
                }
                "--warmup" => {
                    let value = next_value(&mut args, "--warmup")?;
                    config.warmup = parse_number(&value, "--warmup")?;
                }
                "--degree" | "-d" => {
                    let value = next_value(&mut args, "--degree")?;
                    config.degree = parse_positive(&value, "--degree")?;
                }
                "--seed" => {
                    let value = next_value(&mut args, "--seed")?;
                    config.seed = Some(value.parse().map_err(|_| ConfigError::InvalidValue {
                        option: "--seed",
                        value: value.clone(),
                        reason: "expected an unsigned integer",
                    })?);
                }
                "--csv" => {
                    config.csv_path = Some(PathBuf::from(next_value(&mut args, "--csv")?));
                }
                name if !name.starts_with('-') => config.variants.push(name.to_string()),
                other => return Err(ConfigError::UnknownOption(other.to_string())),
            }
        }

        Ok(config)
    }

    /// Harness settings derived from this configuration.
    pub fn timing(&self) -> TimingConfig {
        TimingConfig {
            runs_per_variant: self.runs,
            warmup_iterations: self.warmup,
            seed: self.seed,
            filter_outliers: self.filter_outliers,
            ..TimingConfig::default()
        }
    }

    /// Length used for the one-shot result listing.
    pub fn largest_size(&self) -> usize {
        self.sizes.iter().copied().max().unwrap_or(0)
    }
}

fn next_value<I>(args: &mut I, option: &'static str) -> Result<String, ConfigError>
where
    I: Iterator<Item = String>,
{
    args.next().ok_or(ConfigError::MissingValue(option))
}

fn parse_number(value: &str, option: &'static str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        option,
        value: value.to_string(),
        reason: "expected an unsigned integer",
    })
}

fn parse_positive(value: &str, option: &'static str) -> Result<usize, ConfigError> {
    match parse_number(value, option)? {
        0 => Err(ConfigError::InvalidValue {
            option,
            value: value.to_string(),
            reason: "must be at least 1",
        }),
        n => Ok(n),
    }
}

fn parse_sizes(value: &str) -> Result<Vec<usize>, ConfigError> {
    let sizes = value
        .split(',')
        .map(|s| parse_number(s, "--sizes"))
        .collect::<Result<Vec<_>, _>>()?;
    if sizes.is_empty() {
        return Err(ConfigError::MissingValue("--sizes"));
    }
    Ok(sizes)
}
