pub mod analyze;
pub mod config;
pub mod months;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use cashflow_analytics::error::Result;
use cashflow_analytics::input::{load_monthly_summaries, load_transactions};
use cashflow_analytics::settings::{load_settings_from, settings_path, Settings};
use cashflow_analytics::CashflowAnalyzer;

#[derive(Parser)]
#[command(
    name = "cashflow",
    version,
    about = "Bank cash flow analytics for underwriting."
)]
pub struct Cli {
    /// Settings file (default: ~/.config/cashflow-analytics/settings.json)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every analysis and print the underwriting report.
    Analyze {
        /// Transactions file (.json or .csv with date, amount, description)
        file: PathBuf,
        /// JSON file of manually entered monthly statement figures
        #[arg(long)]
        months: Option<PathBuf>,
        /// Output format (default comes from settings)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Print the flattened cash flow summary instead of the full report
        #[arg(long)]
        summary: bool,
    },
    /// Show the monthly buckets built from a transactions file.
    Months {
        /// Transactions file (.json or .csv)
        file: PathBuf,
        /// JSON file of manually entered monthly statement figures
        #[arg(long)]
        months: Option<PathBuf>,
    },
    /// Inspect or create the settings file.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings as JSON.
    Show,
    /// Write a settings file with default thresholds.
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        match settings.default_format.as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

pub(crate) fn resolve_settings_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map(Path::to_path_buf).unwrap_or_else(settings_path)
}

pub(crate) fn load(explicit: Option<&Path>) -> Settings {
    load_settings_from(&resolve_settings_path(explicit))
}

/// Build an analyzer from the input files: manual months first, then
/// transactions, so derived months win where both exist.
pub(crate) fn build_analyzer(
    settings: &Settings,
    file: &Path,
    months: Option<&Path>,
) -> Result<CashflowAnalyzer> {
    let mut analyzer = CashflowAnalyzer::with_thresholds(settings.thresholds.clone());
    if let Some(path) = months {
        for summary in load_monthly_summaries(path)? {
            analyzer.add_monthly_summary(&summary);
        }
    }
    analyzer.load_transactions(load_transactions(file)?);
    Ok(analyzer)
}

pub fn banner() {
    println!();
    println!("Bank Cash Flow Analyzer v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage:");
    println!("  cashflow analyze transactions.json [--months months.json] [--format json]");
    println!("  cashflow analyze transactions.csv --summary");
    println!("  cashflow months transactions.csv");
    println!("  cashflow config show");
    println!();
    println!("Run `cashflow --help` for all options.");
}
