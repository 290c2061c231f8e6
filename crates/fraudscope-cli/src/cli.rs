use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fraudscope_client::commands::common::FilterArgs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(index, byte)| index == 4 || index == 7 || byte.is_ascii_digit());
    if !shaped {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

pub fn parse_amount(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err("amount must be a finite number".to_string()),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "fraudscope",
    version,
    about = "credit card fraud exploration and data pipeline",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Configuration file (defaults to $FRAUDSCOPE_CONFIG, ./fraudscope.yaml, ~/.fraudscope/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

/// Selection flags shared by `dashboard` and `export`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterFlags {
    /// Transaction CSV to load; repeat to combine sources (replaces configured sources)
    #[arg(long = "source", value_name = "PATH")]
    pub sources: Vec<PathBuf>,
    /// First transaction date to keep (YYYY-MM-DD)
    #[arg(long, value_parser = parse_iso_date)]
    pub from: Option<IsoDate>,
    /// Last transaction date to keep (YYYY-MM-DD)
    #[arg(long, value_parser = parse_iso_date)]
    pub to: Option<IsoDate>,
    /// Lower amount bound, inclusive
    #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
    pub min_amount: Option<f64>,
    /// Upper amount bound, inclusive
    #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
    pub max_amount: Option<f64>,
    /// Two-letter region code to keep; repeat for several (default: all)
    #[arg(long = "region", value_name = "CODE")]
    pub regions: Vec<String>,
    /// Merchant to keep; repeat for several (default: all)
    #[arg(long = "merchant", value_name = "NAME")]
    pub merchants: Vec<String>,
    /// Which labels to keep
    #[arg(long, value_parser = ["both", "fraud-only", "non-fraud-only"])]
    pub label: Option<String>,
    /// Drop rows whose amount was unreadable and stored as 0
    #[arg(long)]
    pub exclude_coerced_amounts: bool,
}

impl FilterFlags {
    pub fn to_filter_args(&self) -> FilterArgs {
        FilterArgs {
            from: self.from.as_ref().map(|value| value.as_str().to_string()),
            to: self.to.as_ref().map(|value| value.as_str().to_string()),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            regions: self.regions.clone(),
            merchants: self.merchants.clone(),
            label: self.label.clone(),
            exclude_coerced_amounts: self.exclude_coerced_amounts,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Filter the transaction store and print every dashboard view
    Dashboard {
        #[command(flatten)]
        filters: FilterFlags,
        /// Timeline bucket size
        #[arg(long, value_parser = ["day", "week", "month"])]
        granularity: Option<String>,
        /// Geographic layer to include; repeat for several
        #[arg(
            long = "layer",
            value_name = "LAYER",
            value_parser = ["customer-heat", "merchant-heat", "customer-points", "merchant-points"]
        )]
        layers: Vec<String>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Write the filtered transactions to a CSV file
    Export {
        #[command(flatten)]
        filters: FilterFlags,
        /// Destination file (default: <artifacts_root>/filtered_fraud_data.csv)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Check a dataset's columns against the expected schema and record the status
    Validate {
        /// Dataset to check (default: validation.data_path)
        #[arg(long, value_name = "PATH")]
        data_path: Option<PathBuf>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Clean a validated dataset and write cleaned, train, and test splits
    Transform {
        /// Dataset to transform (default: transformation.data_path)
        #[arg(long, value_name = "PATH")]
        data_path: Option<PathBuf>,
        /// Output directory (default: transformation.root_dir)
        #[arg(long, value_name = "DIR")]
        root_dir: Option<PathBuf>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Profile a dataset and write summary statistics artifacts
    Stats {
        /// Dataset to profile (default: stats.data_path)
        #[arg(long, value_name = "PATH")]
        data_path: Option<PathBuf>,
        /// Parent directory for run folders (default: stats.root_dir)
        #[arg(long, value_name = "DIR")]
        root_dir: Option<PathBuf>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
