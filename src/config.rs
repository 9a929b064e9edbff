use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

/// Predictors whose result directories are read when none are given.
pub const DEFAULT_PREDICTORS: &[&str] = &["tepitope", "netmhciipan", "iedbmhc1", "mhcflurry"];

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Serve precomputed epitope prediction results as an interactive report.
#[derive(Debug, Parser)]
#[command(name = "epiview", version, about)]
pub struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Default results directory (one subdirectory per predictor).
    #[arg(long, default_value = "results")]
    pub results: PathBuf,

    /// Known predictors, in track order.
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_PREDICTORS.iter().map(|p| p.to_string()))]
    pub predictors: Vec<String>,

    /// Entity shown when the request does not name one.
    #[arg(long, default_value = "Rv0011c")]
    pub default_name: String,

    /// Default binder score cutoff.
    #[arg(long, default_value_t = 5.0)]
    pub cutoff: f64,

    /// Default minimum number of consecutive binders per drawn segment.
    #[arg(long, default_value_t = 2)]
    pub n: usize,

    /// Step between the start positions of consecutive peptides.
    #[arg(long, default_value_t = 1)]
    pub stride: usize,

    /// Position value of the first peptide window.
    #[arg(long, default_value_t = 1)]
    pub origin: i64,

    /// Number of HTTP worker threads (defaults to the number of CPUs).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

// ---------------------------------------------------------------------------
// Settings – immutable, shared by every request
// ---------------------------------------------------------------------------

/// Sliding-window layout of the peptides in a result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceWindow {
    pub stride: usize,
    pub origin: i64,
}

impl Default for SequenceWindow {
    fn default() -> Self {
        Self { stride: 1, origin: 1 }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub results: PathBuf,
    pub predictors: Vec<String>,
    pub default_name: String,
    pub default_cutoff: f64,
    pub default_n: usize,
    pub window: SequenceWindow,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            results: PathBuf::from("results"),
            predictors: DEFAULT_PREDICTORS.iter().map(|p| p.to_string()).collect(),
            default_name: "Rv0011c".to_string(),
            default_cutoff: 5.0,
            default_n: 2,
            window: SequenceWindow::default(),
        }
    }
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let predictors: Vec<String> = cli
            .predictors
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if predictors.is_empty() {
            bail!("at least one predictor is required");
        }
        if cli.stride == 0 {
            bail!("--stride must be at least 1");
        }
        if !cli.cutoff.is_finite() {
            bail!("--cutoff must be a finite number");
        }

        Ok(Self {
            results: cli.results.clone(),
            predictors,
            default_name: cli.default_name.clone(),
            default_cutoff: cli.cutoff,
            default_n: cli.n,
            window: SequenceWindow {
                stride: cli.stride,
                origin: cli.origin,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_settings_default() {
        let cli = Cli::parse_from(["epiview"]);
        let settings = Settings::from_cli(&cli).unwrap();
        let expected = Settings::default();

        assert_eq!(cli.port, 5000);
        assert_eq!(settings.results, expected.results);
        assert_eq!(settings.predictors, expected.predictors);
        assert_eq!(settings.default_name, "Rv0011c");
        assert_eq!(settings.default_cutoff, 5.0);
        assert_eq!(settings.default_n, 2);
        assert_eq!(settings.window, SequenceWindow { stride: 1, origin: 1 });
    }

    #[test]
    fn test_predictor_list_is_split_and_trimmed() {
        let cli = Cli::parse_from(["epiview", "--predictors", "tepitope, mhcflurry,"]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.predictors, vec!["tepitope", "mhcflurry"]);
    }

    #[test]
    fn test_zero_stride_rejected() {
        let cli = Cli::parse_from(["epiview", "--stride", "0"]);
        assert!(Settings::from_cli(&cli).is_err());
    }
}
