use chrono::NaiveDate;
use clap::ValueEnum;

use crate::models::{
    category::TradeCategory,
    date::{QUERY_DATE_FORMAT, parse_query_date},
    horizon::{Horizon, HorizonError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Foreign,
    #[value(name = "self")]
    Self_,
    Both,
}

impl CategoryArg {
    pub fn categories(self) -> Vec<TradeCategory> {
        match self {
            CategoryArg::Foreign => vec![TradeCategory::Foreign],
            CategoryArg::Self_ => vec![TradeCategory::Proprietary],
            CategoryArg::Both => TradeCategory::ALL.to_vec(),
        }
    }
}

pub fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_query_date(value.trim())
        .map_err(|e| format!("invalid date {value:?} (expected {QUERY_DATE_FORMAT}): {e}"))
}

pub fn parse_horizon(value: &str) -> Result<Horizon, HorizonError> {
    value.parse()
}

/// Trims and upper-cases a ticker; rejects blanks and non-alphanumerics.
pub fn parse_symbol(value: &str) -> Result<String, String> {
    let symbol = value.trim().to_uppercase();
    if symbol.is_empty() {
        return Err("symbol must not be empty".to_string());
    }
    if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("invalid symbol: {value}"));
    }
    Ok(symbol)
}
