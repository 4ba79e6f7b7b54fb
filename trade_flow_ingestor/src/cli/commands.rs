use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::{
    cli::params::{CategoryArg, parse_date_arg, parse_horizon, parse_symbol},
    models::horizon::Horizon,
};

#[derive(Debug, Parser)]
#[command(name = "trade-flow", author, version, about)]
pub struct Cli {
    /// Path to the config file (trade_flow.toml); falls back to TRADE_FLOW_CONFIG
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every source.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Ticker symbol (e.g. "HPG")
    #[arg(long, value_parser = parse_symbol)]
    pub symbol: String,

    /// Which flow to fetch
    #[arg(long, value_enum, default_value_t = CategoryArg::Both)]
    pub category: CategoryArg,

    /// Resample to a horizon: 1M, 6M, 1Y, 2Y, 3Y, 5Y
    #[arg(long, value_parser = parse_horizon)]
    pub horizon: Option<Horizon>,

    /// Directory to write one CSV file per category into
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Number of rows to print per category
    #[arg(long, default_value_t = 10)]
    pub preview: usize,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch from the CafeF paginated history endpoints
    Cafef {
        #[command(flatten)]
        output: OutputArgs,

        /// First trading day to include, dd/mm/yyyy
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,

        /// Last trading day to include, dd/mm/yyyy
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,

        /// Rows per request; defaults to the configured size for each category
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: Option<u32>,
    },

    /// Fetch the trailing window embedded in the Smoney stock page
    Smoney {
        #[command(flatten)]
        output: OutputArgs,
    },
}

impl Commands {
    pub fn output(&self) -> &OutputArgs {
        match self {
            Commands::Cafef { output, .. } | Commands::Smoney { output } => output,
        }
    }
}
